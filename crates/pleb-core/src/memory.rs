//! In-memory content source.
//!
//! Notes are kept in feed order with an id → position index, so by-id lookup
//! is a map hit rather than a feed scan. Thread loads are queued and only
//! complete when the owner calls [`MemorySource::complete_next_load`], which
//! mirrors the out-of-band completion of a networked source.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::note::{KIND_TEXT_NOTE, Note, Profile};
use crate::source::{ActionEvent, ActionKind, ContentSource, ThreadLoaded, ThreadRequest};

/// Maximum number of direct replies included in an assembled thread.
pub const MAX_THREAD_REPLIES: usize = 50;

/// Content source backed by an in-memory note list.
#[derive(Debug, Default)]
pub struct MemorySource {
    /// Notes in feed order.
    notes: Vec<Note>,
    /// Note id → position in `notes`.
    index: HashMap<String, usize>,
    /// Issued but not yet completed thread loads, oldest first.
    pending: VecDeque<ThreadRequest>,
    /// Serialized entries of the last completed thread load.
    thread: Vec<String>,
    /// Action results not yet drained by the reader.
    action_events: Vec<ActionEvent>,
    /// Author used for replies created through [`ContentSource::reply`].
    local_author: Profile,
    /// Counter for ids of locally created notes.
    next_local_id: u64,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `notes` in the given feed order.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut source = Self::new();
        for note in notes {
            source.insert(note);
        }
        source
    }

    /// Set the author attached to locally created replies.
    pub fn set_local_author(&mut self, author: Profile) {
        self.local_author = author;
    }

    /// Insert a note, replacing any existing note with the same id in place.
    ///
    /// Returns `true` if the id was not known before.
    pub fn insert(&mut self, note: Note) -> bool {
        if let Some(&pos) = self.index.get(&note.id) {
            self.notes[pos] = note;
            return false;
        }
        self.index.insert(note.id.clone(), self.notes.len());
        self.notes.push(note);
        true
    }

    /// Number of notes held.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the source holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Borrow a note by id.
    pub fn note(&self, id: &str) -> Option<&Note> {
        self.index.get(id).map(|&pos| &self.notes[pos])
    }

    fn note_mut(&mut self, id: &str) -> Option<&mut Note> {
        let pos = *self.index.get(id)?;
        Some(&mut self.notes[pos])
    }

    /// Number of thread loads issued but not yet completed.
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Complete the oldest pending thread load.
    ///
    /// The thread buffer is replaced by the assembly for that request's focus
    /// id, whether or not the reader still wants it.
    pub fn complete_next_load(&mut self) -> Option<ThreadLoaded> {
        let request = self.pending.pop_front()?;
        self.thread = self
            .assemble_thread(&request.focus_id)
            .into_iter()
            .map(Note::to_json)
            .collect();

        tracing::debug!(
            generation = request.generation,
            focus_id = %request.focus_id,
            entries = self.thread.len(),
            "thread load completed"
        );

        Some(ThreadLoaded {
            generation: request.generation,
        })
    }

    /// Complete every pending load, returning the completion signals in order.
    pub fn complete_all_loads(&mut self) -> Vec<ThreadLoaded> {
        std::iter::from_fn(|| self.complete_next_load()).collect()
    }

    /// Assemble the thread around `focus_id`: ancestors (oldest first), the
    /// focus note, then direct replies by creation time.
    ///
    /// Returns an empty thread if the focus note is unknown.
    pub fn assemble_thread(&self, focus_id: &str) -> Vec<&Note> {
        let Some(target) = self.note(focus_id) else {
            return Vec::new();
        };

        let mut seen = HashSet::from([target.id.as_str()]);
        let mut ancestors = Vec::new();
        let mut cursor = target.reply_to.as_deref();
        while let Some(parent_id) = cursor {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.note(parent_id) else {
                break;
            };
            ancestors.push(parent);
            cursor = parent.reply_to.as_deref();
        }
        ancestors.sort_by_key(|n| n.created_at);

        let mut replies: Vec<&Note> = self
            .notes
            .iter()
            .filter(|n| n.reply_to.as_deref() == Some(focus_id) && !seen.contains(n.id.as_str()))
            .collect();
        replies.sort_by_key(|n| n.created_at);
        replies.truncate(MAX_THREAD_REPLIES);

        let mut thread = ancestors;
        thread.push(target);
        thread.extend(replies);
        thread
    }

    /// Drain action results delivered since the last call.
    pub fn take_action_events(&mut self) -> Vec<ActionEvent> {
        std::mem::take(&mut self.action_events)
    }

    fn succeed(&mut self, action: ActionKind, note_id: &str, amount_sats: Option<u64>) {
        tracing::info!(%action, note_id, "action succeeded");
        self.action_events.push(ActionEvent::Succeeded {
            action,
            note_id: note_id.to_string(),
            amount_sats,
        });
    }

    fn fail(&mut self, action: ActionKind, note_id: &str, error: impl Into<String>) {
        let error = error.into();
        tracing::warn!(%action, note_id, error = %error, "action failed");
        self.action_events.push(ActionEvent::Failed {
            action,
            note_id: note_id.to_string(),
            error,
        });
    }
}

impl ContentSource for MemorySource {
    fn load_thread(&mut self, request: &ThreadRequest) {
        tracing::debug!(
            generation = request.generation,
            focus_id = %request.focus_id,
            "thread load queued"
        );
        self.pending.push_back(request.clone());
    }

    fn thread_entry_count(&self) -> usize {
        self.thread.len()
    }

    fn thread_entry(&self, index: usize) -> Option<String> {
        self.thread.get(index).cloned()
    }

    fn clear_thread(&mut self) {
        self.thread.clear();
    }

    fn feed_entry_count(&self) -> usize {
        self.notes.len()
    }

    fn feed_entry(&self, index: usize) -> Option<String> {
        self.notes.get(index).map(Note::to_json)
    }

    fn note_by_id(&self, id: &str) -> Option<String> {
        self.note(id).map(Note::to_json)
    }

    fn find_replaceable(&self, kind: u16, pubkey: &str, d_tag: &str) -> Option<String> {
        self.notes
            .iter()
            .filter(|n| n.kind == kind && n.pubkey == pubkey && n.d_tag.as_deref() == Some(d_tag))
            .max_by_key(|n| n.created_at)
            .map(Note::to_json)
    }

    fn profile(&self, pubkey: &str) -> Option<Profile> {
        self.notes
            .iter()
            .filter(|n| n.pubkey == pubkey)
            .max_by_key(|n| n.created_at)
            .map(Note::author_profile)
    }

    fn like(&mut self, note_id: &str) {
        match self.note_mut(note_id) {
            Some(note) => {
                note.likes += 1;
                self.succeed(ActionKind::Like, note_id, None);
            }
            None => self.fail(ActionKind::Like, note_id, "note not found"),
        }
    }

    fn repost(&mut self, note_id: &str) {
        match self.note_mut(note_id) {
            Some(note) => {
                note.reposts += 1;
                self.succeed(ActionKind::Repost, note_id, None);
            }
            None => self.fail(ActionKind::Repost, note_id, "note not found"),
        }
    }

    fn reply(&mut self, note_id: &str, text: &str) {
        if text.trim().is_empty() {
            self.fail(ActionKind::Reply, note_id, "reply is empty");
            return;
        }
        let Some(parent) = self.note_mut(note_id) else {
            self.fail(ActionKind::Reply, note_id, "note not found");
            return;
        };
        parent.replies += 1;
        let created_at = chrono::Utc::now().timestamp().max(parent.created_at + 1);

        self.next_local_id += 1;
        let reply = Note {
            id: format!("local-{}", self.next_local_id),
            pubkey: self.local_author.pubkey.clone(),
            kind: KIND_TEXT_NOTE,
            author_name: self.local_author.name.clone().unwrap_or_default(),
            author_picture: self.local_author.picture.clone(),
            author_nip05: self.local_author.nip05.clone(),
            content: text.to_string(),
            created_at,
            is_reply: true,
            reply_to: Some(note_id.to_string()),
            ..Note::default()
        };
        self.insert(reply);
        self.succeed(ActionKind::Reply, note_id, None);
    }

    fn zap(&mut self, note_id: &str, amount_sats: u64, comment: &str) {
        if amount_sats == 0 {
            self.fail(ActionKind::Zap, note_id, "zap amount must be positive");
            return;
        }
        match self.note_mut(note_id) {
            Some(note) => {
                note.zap_amount += amount_sats;
                note.zap_count += 1;
                tracing::debug!(note_id, amount_sats, comment, "zap recorded");
                self.succeed(ActionKind::Zap, note_id, Some(amount_sats));
            }
            None => self.fail(ActionKind::Zap, note_id, "note not found"),
        }
    }
}
