//! Long-form article lookup.

use pleb_core::{ContentSource, Error, Note, Profile, Result};

/// Title shown when an article carries none.
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// A note prepared for the article view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: String,
    pub author: Profile,
    pub title: String,
    pub summary: Option<String>,
    /// Hero image URL.
    pub image: Option<String>,
    /// Publication time, falling back to the creation time.
    pub published_at: i64,
    /// Raw body, rendered through the segment pipeline.
    pub content: String,
    pub note: Note,
}

impl Article {
    pub fn from_note(note: Note) -> Self {
        let title = note
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_ARTICLE)
            .to_string();

        Self {
            id: note.id.clone(),
            author: note.author_profile(),
            title,
            summary: note.summary.clone().filter(|s| !s.trim().is_empty()),
            image: note.image.clone().filter(|s| !s.trim().is_empty()),
            published_at: note.published_at.unwrap_or(note.created_at),
            content: note.content.clone(),
            note,
        }
    }
}

/// Look up a note by id and prepare it as an article.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the source has no note with that id.
pub fn find_article(source: &dyn ContentSource, id: &str) -> Result<Article> {
    let json = source
        .note_by_id(id)
        .ok_or_else(|| Error::NotFound(format!("note {id}")))?;
    Ok(Article::from_note(Note::from_json_or_placeholder(&json)))
}
