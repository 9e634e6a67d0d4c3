//! Segment rendering for note text.
//!
//! Each [`Segment`] is dispatched to its own renderer:
//! - text through the markup formatter
//! - images by their load status
//! - note references as quote cards
//! - profile references as mentions
//!
//! Anything that cannot be resolved falls back to a plain link.

use std::collections::HashMap;

use maud::{Markup, html};
use pleb_core::{ContentSource, Note};

use super::components::{is_safe_url, note_link, truncate, truncate_key};
use crate::content::{Embed, EmbedResolver, Segment, format, segment};

/// Load status of an image, as reported by the image loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Ready,
    Error,
}

/// Everything segment rendering needs besides the segments themselves.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Prefix for links to notes and profiles.
    pub base_url: &'a str,
    /// Render images inline; when off, images become plain links.
    pub auto_load_images: bool,
    /// Image load status by URL. Untracked URLs are left to the browser.
    pub images: &'a HashMap<String, ImageStatus>,
    pub source: &'a dyn ContentSource,
    pub embeds: &'a EmbedResolver,
}

impl RenderContext<'_> {
    /// Status of an image URL.
    pub fn image_status(&self, url: &str) -> ImageStatus {
        self.images.get(url).copied().unwrap_or(ImageStatus::Ready)
    }
}

/// Segment and render raw note text.
pub fn render_content(text: &str, ctx: &RenderContext<'_>) -> Markup {
    let segments = segment(text);
    html! {
        div class="content" { (render_segments(&segments, ctx)) }
    }
}

/// Render segments in order.
pub fn render_segments(segments: &[Segment], ctx: &RenderContext<'_>) -> Markup {
    html! {
        @for segment in segments {
            @match segment {
                Segment::Text { content } => {
                    span class="text" { (format(content)) }
                }
                Segment::Image { url, alt } => {
                    (render_image(url, alt, ctx))
                }
                Segment::NoteReference { uri } => {
                    (render_note_reference(uri, ctx))
                }
                Segment::ProfileReference { uri } => {
                    (render_profile_reference(uri, ctx))
                }
            }
        }
    }
}

fn render_image(url: &str, alt: &str, ctx: &RenderContext<'_>) -> Markup {
    if !is_safe_url(url) {
        return html! { (url) };
    }
    let label = if alt.is_empty() { url } else { alt };

    if !ctx.auto_load_images {
        return html! {
            a href=(url) rel="nofollow noopener" target="_blank" { (label) }
        };
    }

    match ctx.image_status(url) {
        ImageStatus::Ready => html! {
            img class="segment-image" src=(url) alt=(alt) loading="lazy";
        },
        ImageStatus::Loading => html! {
            div class="image-loading" data-src=(url) { "Loading image…" }
        },
        ImageStatus::Error => html! {
            div class="image-error" {
                "Image failed to load "
                a href=(url) rel="nofollow noopener" target="_blank" { "(open)" }
            }
        },
    }
}

fn bech32_of(uri: &str) -> &str {
    uri.strip_prefix(crate::content::reference::NOSTR_SCHEME)
        .unwrap_or(uri)
}

fn render_note_reference(uri: &str, ctx: &RenderContext<'_>) -> Markup {
    match ctx.embeds.resolve(uri, ctx.source) {
        Embed::Note(note) => render_quote_card(&note, ctx.base_url),
        _ => {
            let bech32 = bech32_of(uri);
            html! {
                a href={(ctx.base_url) "/" (bech32)} { (truncate_key(bech32)) }
            }
        }
    }
}

fn render_profile_reference(uri: &str, ctx: &RenderContext<'_>) -> Markup {
    let bech32 = bech32_of(uri);
    let name = match ctx.embeds.resolve(uri, ctx.source) {
        Embed::Profile(profile) => profile.display_name(),
        _ => truncate_key(bech32),
    };
    html! {
        a class="mention" href={(ctx.base_url) "/" (bech32)} { "@" (name) }
    }
}

/// Render a quoted note as an inline card.
/// Content is rendered as plain text only (depth 1, no recursive embeds).
fn render_quote_card(quoted: &Note, base_url: &str) -> Markup {
    let time_str = chrono::DateTime::from_timestamp(quoted.created_at, 0)
        .filter(|_| quoted.created_at > 0)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_default();
    let display_content = truncate(&quoted.content, 280);

    html! {
        a class="quote-card" href=(note_link(base_url, &quoted.id)) {
            div class="quote-card-author" {
                span class="quote-card-name" { (quoted.display_name()) }
                @if !time_str.is_empty() {
                    span class="quote-card-time" { (time_str) }
                }
            }
            div class="quote-card-content" { (display_content) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr::{EventId, PublicKey, ToBech32};
    use pleb_core::MemorySource;

    const PUBKEY_HEX: &str = "82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2";
    const EVENT_HEX: &str = "a84c5de86efc2ec2cff7bad077c4171e09146b633b7ad117fffe088d9579ac33";

    struct Fixture {
        source: MemorySource,
        embeds: EmbedResolver,
        images: HashMap<String, ImageStatus>,
    }

    impl Fixture {
        fn new() -> Self {
            let source = MemorySource::from_notes([Note {
                id: EVENT_HEX.to_string(),
                pubkey: PUBKEY_HEX.to_string(),
                author_name: "alice".to_string(),
                content: "the quoted <text>".to_string(),
                created_at: 1_704_067_200,
                ..Default::default()
            }]);
            Self {
                source,
                embeds: EmbedResolver::new(16),
                images: HashMap::new(),
            }
        }

        fn ctx(&self) -> RenderContext<'_> {
            RenderContext {
                base_url: "https://njump.me",
                auto_load_images: true,
                images: &self.images,
                source: &self.source,
                embeds: &self.embeds,
            }
        }

        fn render(&self, text: &str) -> String {
            render_content(text, &self.ctx()).into_string()
        }
    }

    #[test]
    fn text_goes_through_formatter() {
        let html = Fixture::new().render("**hi** <there>");
        assert!(html.contains("<b>hi</b>"));
        assert!(html.contains("&lt;there&gt;"));
        assert!(!html.contains("<there>"));
    }

    #[test]
    fn ready_image_renders_inline() {
        let html = Fixture::new().render("look https://x.io/a.png");
        assert!(html.contains(r#"<img class="segment-image" src="https://x.io/a.png""#));
        // Image URL is not repeated as a link
        assert!(!html.contains(r#"<a href="https://x.io/a.png""#));
    }

    #[test]
    fn image_status_drives_rendering() {
        let mut fixture = Fixture::new();
        fixture
            .images
            .insert("https://x.io/a.png".to_string(), ImageStatus::Loading);
        fixture
            .images
            .insert("https://x.io/b.png".to_string(), ImageStatus::Error);

        let html = fixture.render("https://x.io/a.png https://x.io/b.png");
        assert!(html.contains("Loading image"));
        assert!(html.contains("Image failed to load"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn images_become_links_when_auto_load_is_off() {
        let fixture = Fixture::new();
        let ctx = RenderContext {
            auto_load_images: false,
            ..fixture.ctx()
        };
        let html = render_content("![cat](https://x.io/cat.gif)", &ctx).into_string();
        assert!(html.contains(r#"href="https://x.io/cat.gif""#));
        assert!(html.contains(">cat</a>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn resolved_note_reference_is_quote_card() {
        let note = EventId::from_hex(EVENT_HEX).unwrap().to_bech32().unwrap();
        let html = Fixture::new().render(&format!("quoting nostr:{note}"));
        assert!(html.contains(r#"class="quote-card""#));
        assert!(html.contains("alice"));
        assert!(html.contains("the quoted &lt;text&gt;"));
        assert!(html.contains("Jan 01, 2024"));
    }

    #[test]
    fn unresolved_note_reference_is_link() {
        let id = EventId::from_hex(&"1".repeat(64)).unwrap();
        let note = id.to_bech32().unwrap();
        let html = Fixture::new().render(&format!("nostr:{note}"));
        assert!(html.contains(&format!(r#"href="https://njump.me/{note}""#)));
        assert!(!html.contains("quote-card"));
    }

    #[test]
    fn profile_reference_is_mention() {
        let npub = PublicKey::from_hex(PUBKEY_HEX).unwrap().to_bech32().unwrap();
        let html = Fixture::new().render(&format!("hi nostr:{npub}"));
        assert!(html.contains(r#"class="mention""#));
        assert!(html.contains("@alice"));
    }

    #[test]
    fn unknown_profile_mention_uses_short_key() {
        let pk = PublicKey::from_hex(&"2".repeat(64));
        // Not every 32-byte string is a valid x-only key
        if let Ok(pk) = pk {
            let npub = pk.to_bech32().unwrap();
            let html = Fixture::new().render(&format!("nostr:{npub}"));
            assert!(html.contains(&format!("@{}", truncate_key(&npub))));
        }
    }

    #[test]
    fn segments_render_in_order() {
        let html = Fixture::new().render("first https://x.io/a.png second");
        let first = html.find("first").unwrap();
        let image = html.find("segment-image").unwrap();
        let second = html.find("second").unwrap();
        assert!(first < image && image < second);
    }

    #[test]
    fn empty_content_renders_empty_container() {
        assert_eq!(Fixture::new().render("   "), r#"<div class="content"></div>"#);
    }
}
