//! The content-source contract.
//!
//! A content source owns note storage and retrieval and executes user
//! actions. Readers only ever see serialized note records through this trait;
//! thread loads and actions are fire-and-forget, with completion reported
//! out-of-band.

use std::fmt;

use crate::note::Profile;

/// A thread load issued by a reader.
///
/// The generation is echoed back in [`ThreadLoaded`] so the reader can tell a
/// superseded completion from the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRequest {
    /// Monotonic request generation, owned by the issuing reader.
    pub generation: u64,
    /// Id of the note the thread is centered on.
    pub focus_id: String,
}

/// Completion signal for a [`ThreadRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadLoaded {
    /// Generation of the request that completed.
    pub generation: u64,
}

/// User actions a content source can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Like,
    Repost,
    Reply,
    Zap,
}

impl ActionKind {
    /// Lowercase verb for logs and notifications.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Repost => "repost",
            Self::Reply => "reply",
            Self::Zap => "zap",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a fire-and-forget action, delivered separately from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEvent {
    /// The action was accepted.
    Succeeded {
        action: ActionKind,
        note_id: String,
        /// Zapped amount; `None` for actions without an amount.
        amount_sats: Option<u64>,
    },
    /// The action was rejected.
    Failed {
        action: ActionKind,
        note_id: String,
        error: String,
    },
}

impl ActionEvent {
    /// The action this event reports on.
    pub fn action(&self) -> ActionKind {
        match self {
            Self::Succeeded { action, .. } | Self::Failed { action, .. } => *action,
        }
    }

    /// Id of the note the action targeted.
    pub fn note_id(&self) -> &str {
        match self {
            Self::Succeeded { note_id, .. } | Self::Failed { note_id, .. } => note_id,
        }
    }

    /// Whether the action was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Note storage, retrieval, and actions, as consumed by the reader.
///
/// Record accessors return serialized notes; decoding (and recovering from
/// malformed records) is the reader's job.
pub trait ContentSource {
    /// Start loading the thread for `request.focus_id`.
    ///
    /// Completion is signaled later with a [`ThreadLoaded`] carrying
    /// `request.generation`.
    fn load_thread(&mut self, request: &ThreadRequest);

    /// Number of entries in the most recently completed thread load.
    fn thread_entry_count(&self) -> usize;

    /// Serialized note at `index` of the loaded thread.
    fn thread_entry(&self, index: usize) -> Option<String>;

    /// Release materialized thread state.
    fn clear_thread(&mut self);

    /// Number of entries in the current feed.
    fn feed_entry_count(&self) -> usize;

    /// Serialized note at `index` of the current feed.
    fn feed_entry(&self, index: usize) -> Option<String>;

    /// Serialized note with the given id.
    fn note_by_id(&self, id: &str) -> Option<String>;

    /// Serialized replaceable note addressed by `kind:pubkey:d_tag`.
    fn find_replaceable(&self, kind: u16, pubkey: &str, d_tag: &str) -> Option<String>;

    /// Profile metadata for a hex pubkey.
    fn profile(&self, pubkey: &str) -> Option<Profile>;

    /// Like a note.
    fn like(&mut self, note_id: &str);

    /// Repost a note.
    fn repost(&mut self, note_id: &str);

    /// Reply to a note.
    fn reply(&mut self, note_id: &str, text: &str);

    /// Zap a note.
    fn zap(&mut self, note_id: &str, amount_sats: u64, comment: &str);
}
