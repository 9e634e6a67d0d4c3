//! Pleb Reader - content pipeline for a Nostr note reader.
//!
//! Turns raw note text into renderable pieces and keeps a thread view in
//! step with an asynchronous content source.
//!
//! # Architecture
//!
//! - **Content**: Splits note text into text, image, and `nostr:` reference
//!   segments, and formats text segments as lightweight rich text
//! - **Thread**: Materializes the thread around a focus note, discarding
//!   superseded loads by generation
//! - **Render**: Generates HTML pages using maud (compile-time templates)
//! - **Reader**: Session tying the above to an in-memory note store
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - The formatter escapes note text before adding any tags
//! - URLs are validated (HTTPS/HTTP only) before use in attributes

pub mod article;
pub mod config;
pub mod content;
pub mod notify;
pub mod reader;
pub mod render;
pub mod thread;

pub use article::{Article, find_article};
pub use config::Config;
pub use content::{EmbedResolver, RichText, Segment, format, segment};
pub use notify::{Notification, NotificationQueue};
pub use reader::Reader;
pub use thread::{ThreadMaterializer, ThreadSnapshot, ThreadState};
