//! HTML rendering for notes, threads, feeds, and articles.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! generation with automatic XSS protection (all dynamic values are escaped).
//! The only unescaped markup is formatter output, which escapes its input
//! before adding tags.

pub mod article;
pub mod components;
pub mod content;
pub mod note;
pub mod thread;

pub use article::render_article;
pub use content::{ImageStatus, RenderContext, render_content, render_segments};
pub use note::{note_card, render_feed};
pub use thread::render_thread;
