//! Long-form article renderer.
//!
//! Renders articles with hero image, title, summary, author info, and the
//! body through the same segment pipeline as short notes.

use maud::{Markup, html};

use super::components::{
    author_header, engagement_bar, format_timestamp, is_safe_url, kind_badge, page_shell,
};
use super::content::{RenderContext, render_content};
use crate::article::Article;

/// Render an article page.
pub fn render_article(article: &Article, ctx: &RenderContext<'_>) -> Markup {
    let body = html! {
        article class="card" id=(article.id) {
            @if let Some(img_url) = article.image.as_deref() {
                @if is_safe_url(img_url) && ctx.auto_load_images {
                    img class="article-image" src=(img_url) alt=(article.title) loading="lazy";
                }
            }

            (kind_badge(article.note.kind))
            h1 class="article-title" { (article.title) }

            @if let Some(summary) = article.summary.as_deref() {
                p class="article-summary" { (summary) }
            }

            (author_header(&article.author, ctx.base_url))

            @if let Some((display, iso)) = format_timestamp(article.published_at) {
                div class="article-date" {
                    "Published " time datetime=(iso) { (display) }
                }
            }

            (render_content(&article.content, ctx))
            (engagement_bar(&article.note, article.published_at))
        }
    };

    page_shell(&article.title, body)
}
