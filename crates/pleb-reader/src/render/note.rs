//! Note card and feed renderers.
//!
//! Renders a note with author info, segmented content, engagement counts,
//! and timestamp.

use maud::{Markup, html};
use pleb_core::{KIND_REPOST, KIND_TEXT_NOTE, Note};

use super::components::{author_header, engagement_bar, kind_badge, note_link, page_shell};
use super::content::{RenderContext, render_content};

/// Render a single note card. `highlighted` marks the focus note of a thread.
pub fn note_card(note: &Note, highlighted: bool, ctx: &RenderContext<'_>) -> Markup {
    let card_class = if highlighted { "card target" } else { "card" };
    let badge_kind = if note.is_repost { KIND_REPOST } else { note.kind };

    html! {
        article class=(card_class) id=(note.id) {
            @if badge_kind != KIND_TEXT_NOTE {
                (kind_badge(badge_kind))
            }
            (author_header(&note.author_profile(), ctx.base_url))

            @if let Some(parent) = note.reply_to.as_deref() {
                div class="reply-context" {
                    "Replying to "
                    a href=(note_link(ctx.base_url, parent)) { "a note" }
                }
            }

            (render_content(&note.content, ctx))
            (engagement_bar(note, note.created_at))
        }
    }
}

/// Render a feed page.
pub fn render_feed(notes: &[Note], ctx: &RenderContext<'_>) -> Markup {
    let body = html! {
        @if notes.is_empty() {
            div class="thread-status" { "Nothing in the feed yet." }
        }
        @for note in notes {
            (note_card(note, false, ctx))
        }
    };
    page_shell("Feed", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::EmbedResolver;
    use pleb_core::MemorySource;
    use std::collections::HashMap;

    fn render_with<F: FnOnce(&RenderContext<'_>) -> String>(f: F) -> String {
        let source = MemorySource::new();
        let embeds = EmbedResolver::new(4);
        let images = HashMap::new();
        let ctx = RenderContext {
            base_url: "https://njump.me",
            auto_load_images: true,
            images: &images,
            source: &source,
            embeds: &embeds,
        };
        f(&ctx)
    }

    fn note(id: &str) -> Note {
        Note {
            id: id.to_string(),
            kind: pleb_core::KIND_TEXT_NOTE,
            author_name: "bob".to_string(),
            content: format!("hello from {id}"),
            likes: 7,
            ..Default::default()
        }
    }

    #[test]
    fn note_card_contains_author_content_and_counts() {
        let html = render_with(|ctx| note_card(&note("n1"), false, ctx).into_string());
        assert!(html.contains(r#"<article class="card" id="n1">"#));
        assert!(html.contains("bob"));
        assert!(html.contains("hello from n1"));
        assert!(html.contains("Likes"));
        assert!(!html.contains("kind-badge"));
    }

    #[test]
    fn repost_flag_shows_repost_badge() {
        let repost = Note {
            is_repost: true,
            ..note("n1")
        };
        let html = render_with(|ctx| note_card(&repost, false, ctx).into_string());
        assert!(html.contains(r#"<span class="kind-badge">Repost</span>"#));
    }

    #[test]
    fn highlighted_card_is_marked() {
        let html = render_with(|ctx| note_card(&note("n1"), true, ctx).into_string());
        assert!(html.contains(r#"class="card target""#));
    }

    #[test]
    fn reply_shows_context() {
        let reply = Note {
            reply_to: Some("n0".to_string()),
            is_reply: true,
            ..note("n1")
        };
        let html = render_with(|ctx| note_card(&reply, false, ctx).into_string());
        assert!(html.contains("Replying to"));
        assert!(html.contains(r#"href="https://njump.me/n0""#));
    }

    #[test]
    fn feed_renders_every_note_in_order() {
        let notes = vec![note("a"), note("b")];
        let html = render_with(|ctx| render_feed(&notes, ctx).into_string());
        let a = html.find("hello from a").unwrap();
        let b = html.find("hello from b").unwrap();
        assert!(a < b);
        assert!(!html.contains("Nothing in the feed"));
    }

    #[test]
    fn empty_feed_message() {
        let html = render_with(|ctx| render_feed(&[], ctx).into_string());
        assert!(html.contains("Nothing in the feed yet."));
    }
}
