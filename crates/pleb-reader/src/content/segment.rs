//! Note content segmentation.
//!
//! Splits raw note text into an ordered list of non-overlapping segments:
//! - Markdown images (`![alt](url)`)
//! - Bare image URLs (`https://host/pic.png?w=800`)
//! - Embedded note references (`nostr:note1...`, `nostr:nevent1...`, `nostr:naddr1...`)
//! - Embedded profile references (`nostr:npub1...`, `nostr:nprofile1...`)
//! - Text runs between them (whitespace-trimmed)
//!
//! Overlapping candidates are settled by a fixed priority table, in the
//! order above: a candidate is dropped if it overlaps any span already taken
//! by a higher-priority class (or an earlier span of the same class).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Image file extensions recognized in bare URLs.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

/// Regex for markdown image syntax: `![alt](url)`.
static MARKDOWN_IMAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]\n]*)\]\(([^)\s]+)\)").expect("markdown image regex should compile")
});

/// Regex for URLs in text content. Image URLs are picked out with [`is_image_url`].
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'\)\]]+"#).expect("URL regex should compile")
});

/// Regex for `nostr:` URIs that reference a note.
static NOTE_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"nostr:(?:nevent|naddr|note)[a-zA-Z0-9]+")
        .expect("note reference regex should compile")
});

/// Regex for `nostr:` URIs that reference a profile.
static PROFILE_REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"nostr:(?:nprofile|npub)[a-zA-Z0-9]+")
        .expect("profile reference regex should compile")
});

/// One classified unit of parsed note content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Segment {
    /// A run of plain text, to be passed through the markup formatter.
    Text { content: String },
    /// An image to fetch and display.
    Image { url: String, alt: String },
    /// An embedded note reference; `uri` includes the `nostr:` scheme.
    NoteReference { uri: String },
    /// An embedded profile reference; `uri` includes the `nostr:` scheme.
    ProfileReference { uri: String },
}

impl Segment {
    /// Build a text segment.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Build an image segment.
    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::Image {
            url: url.into(),
            alt: alt.into(),
        }
    }

    /// The `nostr:` URI of an embedded reference segment.
    pub fn reference_uri(&self) -> Option<&str> {
        match self {
            Self::NoteReference { uri } | Self::ProfileReference { uri } => Some(uri),
            _ => None,
        }
    }
}

/// Match classes, in priority order (highest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchClass {
    MarkdownImage,
    BareImageUrl,
    NoteReference,
    ProfileReference,
}

/// A candidate match: byte range in the input plus the segment it yields.
#[derive(Debug)]
struct Span {
    start: usize,
    end: usize,
    class: MatchClass,
    segment: Segment,
}

/// Split note text into ordered, non-overlapping segments.
///
/// Blank input yields no segments. Input without any special match yields a
/// single text segment holding the input as-is; otherwise text between
/// matches is trimmed and empty runs are dropped.
pub fn segment(text: &str) -> Vec<Segment> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let spans = resolve_overlaps(collect_candidates(text));
    if spans.is_empty() {
        return vec![Segment::text(text)];
    }

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for span in spans {
        push_text(&mut segments, &text[cursor..span.start]);
        cursor = span.end;
        segments.push(span.segment);
    }
    push_text(&mut segments, &text[cursor..]);

    segments
}

fn push_text(segments: &mut Vec<Segment>, gap: &str) {
    let trimmed = gap.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::text(trimmed));
    }
}

/// Scan the input once per match class.
fn collect_candidates(text: &str) -> Vec<Span> {
    let mut candidates = Vec::new();

    for cap in MARKDOWN_IMAGE_REGEX.captures_iter(text) {
        let (Some(whole), Some(alt), Some(url)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        candidates.push(Span {
            start: whole.start(),
            end: whole.end(),
            class: MatchClass::MarkdownImage,
            segment: Segment::image(url.as_str(), alt.as_str()),
        });
    }

    for m in URL_REGEX.find_iter(text) {
        let url = trim_trailing_punctuation(m.as_str());
        if is_image_url(url) {
            candidates.push(Span {
                start: m.start(),
                end: m.start() + url.len(),
                class: MatchClass::BareImageUrl,
                segment: Segment::image(url, ""),
            });
        }
    }

    for m in NOTE_REFERENCE_REGEX.find_iter(text) {
        candidates.push(Span {
            start: m.start(),
            end: m.end(),
            class: MatchClass::NoteReference,
            segment: Segment::NoteReference {
                uri: m.as_str().to_string(),
            },
        });
    }

    for m in PROFILE_REFERENCE_REGEX.find_iter(text) {
        candidates.push(Span {
            start: m.start(),
            end: m.end(),
            class: MatchClass::ProfileReference,
            segment: Segment::ProfileReference {
                uri: m.as_str().to_string(),
            },
        });
    }

    candidates
}

/// Keep the highest-priority candidates that do not overlap, in offset order.
fn resolve_overlaps(mut candidates: Vec<Span>) -> Vec<Span> {
    candidates.sort_by_key(|span| (span.class, span.start));

    // start offset -> accepted span; accepted spans never overlap
    let mut accepted: BTreeMap<usize, Span> = BTreeMap::new();
    for candidate in candidates {
        let overlaps = accepted
            .range(..candidate.end)
            .next_back()
            .is_some_and(|(_, prev)| prev.end > candidate.start);
        if overlaps {
            continue;
        }
        accepted.insert(candidate.start, candidate);
    }

    accepted.into_values().collect()
}

/// Strip sentence punctuation that a URL match picked up from the prose
/// around it.
pub fn trim_trailing_punctuation(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}

/// Check if a URL points to an image (case-insensitive, query string ignored).
pub fn is_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = lower.split('?').next().unwrap_or(&lower);
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NPUB: &str = "npub1sg6plzptd64u62a878hep2kev88swjh3tw00gjsfl8f237lmu63q0uf63m";
    const NEVENT: &str = "nevent1qqsqzh75xs5mkljtarlz82jk225vksu4m6wp355taepnwdphlhdfz6gnwh8jr";

    fn text(s: &str) -> Segment {
        Segment::text(s)
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment(" ").is_empty());
        assert!(segment("\n\t \n").is_empty());
    }

    #[test]
    fn plain_text_is_kept_untrimmed() {
        assert_eq!(segment("  hello world \n"), [text("  hello world \n")]);
    }

    #[test]
    fn markdown_image_alone() {
        assert_eq!(
            segment("![a](http://x/y.png)"),
            [Segment::image("http://x/y.png", "a")]
        );
    }

    #[test]
    fn markdown_image_does_not_duplicate_inner_url() {
        let segments = segment("look ![cat](https://x.com/cat.jpg) here");
        assert_eq!(
            segments,
            [
                text("look"),
                Segment::image("https://x.com/cat.jpg", "cat"),
                text("here"),
            ]
        );
    }

    #[test]
    fn markdown_image_with_non_image_url() {
        assert_eq!(
            segment("![diagram](https://x.com/render?id=4)"),
            [Segment::image("https://x.com/render?id=4", "diagram")]
        );
    }

    #[test]
    fn bare_image_between_text() {
        assert_eq!(
            segment("see http://x/y.png now"),
            [text("see"), Segment::image("http://x/y.png", ""), text("now")]
        );
    }

    #[test]
    fn bare_image_extension_is_case_insensitive_and_allows_query() {
        assert_eq!(
            segment("https://cdn.example.com/PHOTO.JPEG?w=800&h=600"),
            [Segment::image("https://cdn.example.com/PHOTO.JPEG?w=800&h=600", "")]
        );
    }

    #[test]
    fn trailing_punctuation_is_left_in_text() {
        assert_eq!(
            segment("look at this https://x.io/cat.png. wow"),
            [
                text("look at this"),
                Segment::image("https://x.io/cat.png", ""),
                text(". wow"),
            ]
        );
        assert_eq!(
            segment("https://x.io/cat.png, ok"),
            [Segment::image("https://x.io/cat.png", ""), text(", ok")]
        );
        assert_eq!(
            segment("https://x.io/cat.png."),
            [Segment::image("https://x.io/cat.png", ""), text(".")]
        );
        assert_eq!(
            segment("wow https://x.io/a.gif?!"),
            [text("wow"), Segment::image("https://x.io/a.gif", ""), text("?!")]
        );
    }

    #[test]
    fn non_image_url_stays_in_text() {
        assert_eq!(
            segment("read https://example.com/post.html today"),
            [text("read https://example.com/post.html today")]
        );
    }

    #[test]
    fn malformed_markdown_image_falls_into_text() {
        let segments = segment("broken ![alt(https://x.com/a.gif) end");
        assert_eq!(
            segments,
            [
                text("broken ![alt("),
                Segment::image("https://x.com/a.gif", ""),
                text(") end"),
            ]
        );
    }

    #[test]
    fn note_and_profile_references() {
        let input = format!("by nostr:{NPUB} quoting nostr:{NEVENT}");
        assert_eq!(
            segment(&input),
            [
                text("by"),
                Segment::ProfileReference {
                    uri: format!("nostr:{NPUB}")
                },
                text("quoting"),
                Segment::NoteReference {
                    uri: format!("nostr:{NEVENT}")
                },
            ]
        );
    }

    #[test]
    fn reference_prefixes_are_classified() {
        for (uri, is_note) in [
            ("nostr:note1abc", true),
            ("nostr:nevent1abc", true),
            ("nostr:naddr1abc", true),
            ("nostr:npub1abc", false),
            ("nostr:nprofile1abc", false),
        ] {
            let segments = segment(uri);
            assert_eq!(segments.len(), 1, "{uri}");
            assert_eq!(
                matches!(segments[0], Segment::NoteReference { .. }),
                is_note,
                "{uri}"
            );
            assert_eq!(segments[0].reference_uri(), Some(uri));
        }
    }

    #[test]
    fn unknown_nostr_prefix_is_text() {
        assert_eq!(segment("nostr:nsec1abc"), [text("nostr:nsec1abc")]);
    }

    #[test]
    fn adjacent_matches_without_gap() {
        let segments = segment("https://a.io/1.png https://a.io/2.gif");
        assert_eq!(
            segments,
            [
                Segment::image("https://a.io/1.png", ""),
                Segment::image("https://a.io/2.gif", ""),
            ]
        );
    }

    #[test]
    fn higher_priority_class_wins_overlap() {
        // The image URL swallows the nostr: URI that sits inside its path.
        let segments = segment("https://x.io/nostr:npub1abc/p.png");
        assert_eq!(
            segments,
            [Segment::image("https://x.io/nostr:npub1abc/p.png", "")]
        );
    }

    #[test]
    fn alt_text_with_spaces_and_empty_alt() {
        assert_eq!(
            segment("![a sunny day](https://x.io/s.webp) ![](https://x.io/t.svg)"),
            [
                Segment::image("https://x.io/s.webp", "a sunny day"),
                Segment::image("https://x.io/t.svg", ""),
            ]
        );
    }

    #[test]
    fn output_covers_every_non_whitespace_character_once() {
        let input = format!(
            "gm https://a.io/x.png\n\nread nostr:{NEVENT} and ping nostr:{NPUB}   bye"
        );
        let rebuilt: String = segment(&input)
            .iter()
            .map(|s| match s {
                Segment::Text { content } => content.clone(),
                Segment::Image { url, .. } => url.clone(),
                Segment::NoteReference { uri } | Segment::ProfileReference { uri } => uri.clone(),
            })
            .collect();
        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        assert_eq!(strip(&rebuilt), strip(&input));
    }

    #[test]
    fn unicode_text_around_matches() {
        let segments = segment("café ☕ https://x.io/latte.png 🎉");
        assert_eq!(
            segments,
            [
                text("café ☕"),
                Segment::image("https://x.io/latte.png", ""),
                text("🎉"),
            ]
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&segment("hi https://x.io/a.png")).unwrap();
        assert_eq!(
            json,
            r#"[{"type":"text","content":"hi"},{"type":"image","url":"https://x.io/a.png","alt":""}]"#
        );
    }

    // -- is_image_url() tests --

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("https://example.com/photo.jpg"));
        assert!(is_image_url("https://example.com/photo.PNG"));
        assert!(is_image_url("https://example.com/photo.webp?w=800"));
        assert!(is_image_url("https://example.com/logo.svg"));
        assert!(!is_image_url("https://example.com/page.html"));
        assert!(!is_image_url("https://example.com/video.mp4"));
        assert!(!is_image_url(""));
    }
}
