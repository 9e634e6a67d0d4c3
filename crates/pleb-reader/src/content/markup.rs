//! Lightweight markup to rich text.
//!
//! Text segments are rendered through a fixed sequence of passes, each
//! operating on the output of the previous one:
//!
//! 1. Escape `&`, `<`, `>`
//! 2. Headers (`#`, `##`, `###`)
//! 3. Emphasis, longest delimiter first (`***`, `**`, `*` and the `_` forms)
//! 4. Inline code
//! 5. Fenced code blocks
//! 6. Blockquotes (matched on the escaped `&gt; ` form)
//! 7. Markdown links
//! 8. Bare URLs (image URLs are dropped, long URLs elided)
//! 9. Horizontal rules
//! 10. List markers
//! 11. Line breaks
//!
//! Unmatched syntax is left as literal, escaped text. Formatting never fails.

use std::fmt;
use std::sync::LazyLock;

use maud::Render;
use regex::{Captures, Regex};

use super::segment::{is_image_url, trim_trailing_punctuation};

/// Maximum display length of an auto-linked URL before it is elided.
pub const MAX_LINK_DISPLAY_LEN: usize = 60;

/// Characters kept from a URL when it is elided.
const ELIDED_LINK_PREFIX_LEN: usize = 57;

const CODE_STYLE: &str =
    "font-family:monospace;background-color:#2a2a2a;padding:1px 4px;border-radius:3px;";
const CODE_BLOCK_STYLE: &str =
    "font-family:monospace;background-color:#1e1e1e;padding:8px;border-radius:4px;margin:4px 0;";
const BLOCKQUOTE_STYLE: &str = "border-left:3px solid #555;padding-left:8px;margin:4px 0;color:#aaa;";

static HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,3}) (.+)$").expect("header regex should compile"));

static BOLD_ITALIC_STAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*\*(\S(?:.*?\S)?)\*\*\*").expect("bold italic regex should compile")
});

static BOLD_ITALIC_UNDERSCORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b___(\S(?:.*?\S)?)___\b").expect("bold italic regex should compile")
});

static BOLD_STAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").expect("bold regex should compile")
});

static BOLD_UNDERSCORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b__(\S(?:.*?\S)?)__\b").expect("bold regex should compile")
});

static ITALIC_STAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*(\S(?:.*?\S)?)\*").expect("italic regex should compile")
});

static ITALIC_UNDERSCORE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b_(\S(?:.*?\S)?)_\b").expect("italic regex should compile")
});

static INLINE_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("inline code regex should compile"));

static CODE_FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+\-]*\n?(.*?)```").expect("code fence regex should compile")
});

static BLOCKQUOTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^&gt; (.+)$").expect("blockquote regex should compile"));

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]\n]+)\]\((https?://[^)\s"]+)\)"#).expect("link regex should compile")
});

/// Either an anchor produced by the link pass (kept as-is) or a bare URL.
static BARE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<a\s[^>]*>.*?</a>)|(https?://[^\s<>"'\)\]]+)"#).expect("URL regex should compile")
});

static RULE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-{3,}$").expect("rule regex should compile"));

static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[*-] (.+)$").expect("bullet regex should compile"));

static ORDERED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\d+)\. (.+)$").expect("ordered list regex should compile"));

static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("paragraph regex should compile"));

static BREAK_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<br>\s*){3,}").expect("break run regex should compile"));

/// Formatted rich text (HTML subset), safe to embed without further escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText(String);

impl RichText {
    /// Borrow the markup.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the markup.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the markup is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Render for RichText {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&self.0);
    }
}

/// Format a text segment as rich text.
pub fn format(text: &str) -> RichText {
    let html = escape(text);
    let html = headers(&html);
    let html = emphasis(&html);
    let html = INLINE_CODE_REGEX
        .replace_all(&html, format!(r#"<code style="{CODE_STYLE}">${{1}}</code>"#))
        .into_owned();
    let html = code_blocks(&html);
    let html = BLOCKQUOTE_REGEX
        .replace_all(
            &html,
            format!(r#"<blockquote style="{BLOCKQUOTE_STYLE}">${{1}}</blockquote>"#),
        )
        .into_owned();
    let html = LINK_REGEX
        .replace_all(&html, r#"<a href="${2}">${1}</a>"#)
        .into_owned();
    let html = bare_urls(&html);
    let html = RULE_REGEX.replace_all(&html, "<hr/>").into_owned();
    let html = lists(&html);
    RichText(line_breaks(&html))
}

fn escape(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn headers(html: &str) -> String {
    HEADER_REGEX
        .replace_all(html, |caps: &Captures| {
            let (level, style) = match caps[1].len() {
                1 => (1, "font-size:22px;font-weight:bold;margin:12px 0 6px 0;"),
                2 => (2, "font-size:19px;font-weight:bold;margin:10px 0 5px 0;"),
                _ => (3, "font-size:16px;font-weight:bold;margin:8px 0 4px 0;"),
            };
            format!(r#"<h{level} style="{style}">{}</h{level}>"#, &caps[2])
        })
        .into_owned()
}

fn emphasis(html: &str) -> String {
    let passes: [(&Regex, &str); 6] = [
        (&*BOLD_ITALIC_STAR_REGEX, "<b><i>${1}</i></b>"),
        (&*BOLD_ITALIC_UNDERSCORE_REGEX, "<b><i>${1}</i></b>"),
        (&*BOLD_STAR_REGEX, "<b>${1}</b>"),
        (&*BOLD_UNDERSCORE_REGEX, "<b>${1}</b>"),
        (&*ITALIC_STAR_REGEX, "<i>${1}</i>"),
        (&*ITALIC_UNDERSCORE_REGEX, "<i>${1}</i>"),
    ];
    passes
        .iter()
        .fold(html.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        })
}

fn code_blocks(html: &str) -> String {
    CODE_FENCE_REGEX
        .replace_all(html, |caps: &Captures| {
            format!(
                r#"<div style="{CODE_BLOCK_STYLE}">{}</div>"#,
                caps[1].trim_end_matches('\n')
            )
        })
        .into_owned()
}

fn bare_urls(html: &str) -> String {
    BARE_URL_REGEX
        .replace_all(html, |caps: &Captures| {
            if let Some(anchor) = caps.get(1) {
                return anchor.as_str().to_string();
            }
            let (url, trailing) = split_trailing_punctuation(&caps[2]);
            if is_image_url(url) {
                // Rendered as an image segment upstream
                return trailing.to_string();
            }
            let display = escape(&elide_url(&unescape(url)));
            format!(r#"<a href="{url}">{display}</a>{trailing}"#)
        })
        .into_owned()
}

/// Split an escaped URL match into the URL and the sentence punctuation
/// after it. The `;` closing an escaped entity stays with the URL.
fn split_trailing_punctuation(url: &str) -> (&str, &str) {
    let mut end = trim_trailing_punctuation(url).len();
    if ["&amp", "&lt", "&gt"]
        .iter()
        .any(|entity| url[..end].ends_with(*entity))
    {
        end += 1;
    }
    url.split_at(end)
}

fn unescape(html: &str) -> String {
    html.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Display text for a URL: the URL itself, or its first 57 characters plus
/// `...` when longer than [`MAX_LINK_DISPLAY_LEN`].
pub fn elide_url(url: &str) -> String {
    if url.chars().count() <= MAX_LINK_DISPLAY_LEN {
        return url.to_string();
    }
    let prefix: String = url.chars().take(ELIDED_LINK_PREFIX_LEN).collect();
    format!("{prefix}...")
}

fn lists(html: &str) -> String {
    let html = BULLET_REGEX.replace_all(html, "&nbsp;&nbsp;• ${1}");
    ORDERED_REGEX
        .replace_all(&html, r#"&nbsp;&nbsp;<span style="font-weight:bold;">${1}.</span> ${2}"#)
        .into_owned()
}

fn line_breaks(html: &str) -> String {
    let html = PARAGRAPH_REGEX.replace_all(html, "<br><br>");
    let html = html.replace('\n', "<br>");
    BREAK_RUN_REGEX.replace_all(&html, "<br><br>").into_owned()
}
