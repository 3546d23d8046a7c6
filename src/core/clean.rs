//! Text cleaning rules.
//!
//! Each rule is a pure `&str -> Cow<str>` function that can be tested on its
//! own. [`clean_text`] chains them in [`CleanRule::ALL`] order.
//!
//! | Rule | Function | Removes |
//! |------|----------|---------|
//! | Emoji | [`remove_emoji`] | Pictographs, flags, dingbats, ZWJ/VS16 glue |
//! | Mentions | [`remove_mentions`] | `@channel` handles |
//! | Markdown links | [`remove_markdown_links`] | `[label](target)` |
//! | URLs | [`remove_urls`] | `http://…`, `https://…` |
//! | Telegram links | [`remove_telegram_links`] | `t.me/…`, `telegram.me/…`, `tg://…` |
//! | Separators | [`remove_separators`] | `---`, `===`, `___` runs |
//! | Whitespace | [`collapse_whitespace`] | Runs of whitespace, leading/trailing space |
//!
//! # Example
//!
//! ```
//! use tgbrief::core::clean::clean_text;
//!
//! let cleaned = clean_text("🔥 Breaking   news\n\nfrom @wire t.me/+AbCdEf ---");
//! assert_eq!(cleaned, "Breaking news from");
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("mention pattern is valid"));

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]\n]*\]\([^)\n]*\)").expect("markdown link pattern is valid")
});

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S+").expect("url pattern is valid"));

static TELEGRAM_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)tg://\S+|\b(?:www\.)?(?:t|telegram)\.(?:me|dog)/\S+")
        .expect("telegram link pattern is valid")
});

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{3,}|={3,}|_{3,}").expect("separator pattern is valid"));

/// One emoji codepoint, see [`is_emoji`].
const EMOJI_CLASS: &str = r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{FE0E}\x{FE0F}\x{20E3}\x{E0020}-\x{E007F}]";

static EMOJI_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMOJI_CLASS).expect("emoji pattern is valid"));

/// An emoji run together with the joiners on either side of it.
static EMOJI_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\x{{200D}}*{EMOJI_CLASS}(?:\x{{200D}}|{EMOJI_CLASS})*"))
        .expect("emoji run pattern is valid")
});

/// A single cleaning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanRule {
    Emoji,
    Mentions,
    MarkdownLinks,
    Urls,
    TelegramLinks,
    Separators,
    Whitespace,
}

impl CleanRule {
    /// Every rule, in application order.
    ///
    /// Emoji go first so that `-🔥--` becomes a separator run, and
    /// whitespace goes last to tidy the gaps left by the other rules.
    pub const ALL: [CleanRule; 7] = [
        CleanRule::Emoji,
        CleanRule::Mentions,
        CleanRule::MarkdownLinks,
        CleanRule::Urls,
        CleanRule::TelegramLinks,
        CleanRule::Separators,
        CleanRule::Whitespace,
    ];

    /// Applies this rule to `text`.
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            CleanRule::Emoji => remove_emoji(text),
            CleanRule::Mentions => remove_mentions(text),
            CleanRule::MarkdownLinks => remove_markdown_links(text),
            CleanRule::Urls => remove_urls(text),
            CleanRule::TelegramLinks => remove_telegram_links(text),
            CleanRule::Separators => remove_separators(text),
            CleanRule::Whitespace => collapse_whitespace(text),
        }
    }
}

/// Runs every rule once, in order.
fn clean_pass(text: &str) -> String {
    CleanRule::ALL
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned())
}

/// Cleans a message body.
///
/// The rule chain is repeated until the text stops changing. A single pass
/// is not enough in general: `@---wire` only becomes a mention once the
/// separator is gone. Every changing pass either shortens the text or turns
/// non-space whitespace into spaces, so the loop terminates, and the result
/// is idempotent: `clean_text(clean_text(x)) == clean_text(x)`.
pub fn clean_text(text: &str) -> String {
    let mut current = clean_pass(text);
    loop {
        let next = clean_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Returns `true` for codepoints rendered as emoji or pictographs.
///
/// Covers every `Extended_Pictographic` codepoint (which includes text-style
/// symbols such as `©`, `‼` or `▶` that become emoji with VS16) and the glue
/// that builds emoji sequences: skin-tone modifiers, regional indicators,
/// variation selectors, the keycap mark and tag characters. Digits, `#` and
/// `*` are never matched even though they can start a keycap sequence.
pub fn is_emoji(c: char) -> bool {
    let mut buf = [0u8; 4];
    EMOJI_CHAR.is_match(c.encode_utf8(&mut buf))
}

/// Removes emoji codepoints.
///
/// A zero-width joiner is removed only when it glues emoji together; joiners
/// inside scripts that need them (Persian, Devanagari…) are kept.
pub fn remove_emoji(text: &str) -> Cow<'_, str> {
    EMOJI_RUN.replace_all(text, "")
}

/// Removes `@handle` mentions.
pub fn remove_mentions(text: &str) -> Cow<'_, str> {
    MENTION.replace_all(text, "")
}

/// Removes Markdown links, label included.
pub fn remove_markdown_links(text: &str) -> Cow<'_, str> {
    MARKDOWN_LINK.replace_all(text, "")
}

/// Removes `http(s)://` URLs up to the next whitespace.
pub fn remove_urls(text: &str) -> Cow<'_, str> {
    URL.replace_all(text, "")
}

/// Removes Telegram deep-links and invites without a scheme.
pub fn remove_telegram_links(text: &str) -> Cow<'_, str> {
    TELEGRAM_LINK.replace_all(text, "")
}

/// Removes decorative separator runs of three or more `-`, `=` or `_`.
pub fn remove_separators(text: &str) -> Cow<'_, str> {
    SEPARATOR.replace_all(text, "")
}

/// Collapses every whitespace run into one space and trims both ends.
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(collapsed)
    }
}
