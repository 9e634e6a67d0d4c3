//! Note content parsing.
//!
//! Raw note text is split into typed segments by [`segment`]; text segments
//! are styled by [`format`], and embedded references are resolved through
//! an [`EmbedResolver`].

pub mod markup;
pub mod reference;
pub mod segment;

pub use markup::{RichText, format};
pub use reference::{Embed, EmbedResolver, EmbeddedReference};
pub use segment::{Segment, is_image_url, segment, trim_trailing_punctuation};
