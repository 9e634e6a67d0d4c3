//! Note and profile records as handed out by a content source.
//!
//! Content sources serialize notes as camelCase JSON. Decoding is lenient:
//! every field except the content-addressed `id` has a default, and a record
//! that cannot be decoded at all is replaced by a placeholder note instead of
//! failing the caller.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Kind number of a short text note.
pub const KIND_TEXT_NOTE: u16 = 1;

/// Kind number of a repost.
pub const KIND_REPOST: u16 = 6;

/// Kind number of a long-form article.
pub const KIND_LONG_FORM: u16 = 30023;

/// A note ready for display.
///
/// The core treats notes as read-only input; ownership stays with the
/// content source that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    /// Content-addressed identifier (hex event id, or any caller-defined string).
    pub id: String,
    /// Author pubkey (hex).
    pub pubkey: String,
    /// Event kind.
    #[serde(default = "default_kind")]
    pub kind: u16,
    /// Author display name as resolved by the content source.
    pub author_name: String,
    /// Author avatar URL.
    pub author_picture: Option<String>,
    /// Author NIP-05 identifier.
    pub author_nip05: Option<String>,
    /// Raw, unparsed note body.
    pub content: String,
    /// Created at (unix timestamp).
    pub created_at: i64,
    /// Number of likes.
    pub likes: u32,
    /// Number of reposts.
    pub reposts: u32,
    /// Number of replies.
    pub replies: u32,
    /// Total zapped amount in sats.
    pub zap_amount: u64,
    /// Number of zaps received.
    pub zap_count: u32,
    /// Whether this note replies to another note.
    pub is_reply: bool,
    /// Id of the note this one replies to.
    pub reply_to: Option<String>,
    /// Whether this note is a repost.
    pub is_repost: bool,
    /// Long-form title.
    pub title: Option<String>,
    /// Long-form summary.
    pub summary: Option<String>,
    /// Long-form hero image URL.
    pub image: Option<String>,
    /// Long-form publication time (unix timestamp).
    pub published_at: Option<i64>,
    /// Long-form `d` tag (article slug).
    pub d_tag: Option<String>,
}

fn default_kind() -> u16 {
    KIND_TEXT_NOTE
}

impl Note {
    /// Decode a serialized note record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the record is not a JSON object of the
    /// expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a serialized note record, substituting an empty placeholder on
    /// failure.
    pub fn from_json_or_placeholder(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(note) => note,
            Err(e) => {
                tracing::warn!(error = %e, "malformed note record, using placeholder");
                Self::placeholder()
            }
        }
    }

    /// An empty note standing in for a record that could not be decoded.
    pub fn placeholder() -> Self {
        Self {
            kind: KIND_TEXT_NOTE,
            ..Self::default()
        }
    }

    /// Whether this note is the empty placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }

    /// Serialize to the camelCase JSON record format.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Whether this note is a long-form article.
    pub fn is_article(&self) -> bool {
        self.kind == KIND_LONG_FORM
    }

    /// Get the best display name available, falling back to a shortened pubkey.
    pub fn display_name(&self) -> String {
        if self.author_name.trim().is_empty() {
            shorten_pubkey(&self.pubkey)
        } else {
            self.author_name.clone()
        }
    }

    /// The author profile carried inline by this note.
    pub fn author_profile(&self) -> Profile {
        Profile {
            pubkey: self.pubkey.clone(),
            name: Some(self.author_name.clone()).filter(|n| !n.trim().is_empty()),
            picture: self.author_picture.clone(),
            nip05: self.author_nip05.clone(),
        }
    }
}

/// Author metadata for an embedded profile reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    /// Pubkey (hex).
    pub pubkey: String,
    /// Display name.
    pub name: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
    /// NIP-05 identifier.
    pub nip05: Option<String>,
}

impl Profile {
    /// Get the best display name available, falling back to a shortened pubkey.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| shorten_pubkey(&self.pubkey))
    }
}

/// Shorten a hex pubkey for display (first 8 chars + `...`).
pub fn shorten_pubkey(pubkey: &str) -> String {
    match pubkey.get(..8) {
        Some(prefix) if pubkey.len() > 8 => format!("{prefix}..."),
        _ if pubkey.is_empty() => "unknown".to_string(),
        _ => pubkey.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTE_JSON: &str = r#"{"id":"n1","pubkey":"82341f882b6eabcd2ba7f1ef90aad961cf074af15b9ef44a09f9d2a8fbfbe6a2","authorName":"jack","content":"hello","createdAt":1700000000,"likes":3,"isReply":true,"replyTo":"n0"}"#;

    #[test]
    fn from_json_reads_camel_case_fields() {
        let note = Note::from_json(NOTE_JSON).unwrap();
        assert_eq!(note.id, "n1");
        assert_eq!(note.author_name, "jack");
        assert_eq!(note.created_at, 1_700_000_000);
        assert_eq!(note.likes, 3);
        assert!(note.is_reply);
        assert_eq!(note.reply_to.as_deref(), Some("n0"));
    }

    #[test]
    fn from_json_defaults_missing_fields() {
        let note = Note::from_json(r#"{"id":"x"}"#).unwrap();
        assert_eq!(note.kind, KIND_TEXT_NOTE);
        assert_eq!(note.content, "");
        assert_eq!(note.zap_amount, 0);
        assert!(note.title.is_none());
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(Note::from_json("not json").is_err());
        assert!(Note::from_json("[1,2,3]").is_err());
    }

    #[test]
    fn placeholder_on_malformed_record() {
        let note = Note::from_json_or_placeholder("{broken");
        assert!(note.is_placeholder());
        assert_eq!(note.content, "");
    }

    #[test]
    fn to_json_round_trips_through_from_json() {
        let note = Note::from_json(NOTE_JSON).unwrap();
        let again = Note::from_json(&note.to_json()).unwrap();
        assert_eq!(note, again);
    }

    #[test]
    fn article_detection() {
        let note = Note::from_json(r#"{"id":"a","kind":30023,"title":"Essay"}"#).unwrap();
        assert!(note.is_article());
        assert_eq!(note.title.as_deref(), Some("Essay"));
    }

    #[test]
    fn display_name_falls_back_to_pubkey() {
        let note = Note {
            pubkey: "82341f882b6eabcd".to_string(),
            ..Note::default()
        };
        assert_eq!(note.display_name(), "82341f88...");
    }

    #[test]
    fn author_profile_drops_blank_name() {
        let note = Note {
            pubkey: "abcdef0123456789".to_string(),
            author_name: "  ".to_string(),
            ..Note::default()
        };
        let profile = note.author_profile();
        assert!(profile.name.is_none());
        assert_eq!(profile.display_name(), "abcdef01...");
    }

    #[test]
    fn shorten_pubkey_edge_cases() {
        assert_eq!(shorten_pubkey(""), "unknown");
        assert_eq!(shorten_pubkey("abc"), "abc");
        assert_eq!(shorten_pubkey("abcdefgh"), "abcdefgh");
        assert_eq!(shorten_pubkey("abcdefghi"), "abcdefgh...");
    }
}
