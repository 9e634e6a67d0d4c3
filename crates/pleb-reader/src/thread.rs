//! Thread materialization.
//!
//! A [`ThreadMaterializer`] turns a focus note id into the ordered list of
//! notes shown in a thread view. Loads are fire-and-forget: the materializer
//! issues a [`ThreadRequest`] and applies the matching [`ThreadLoaded`] when
//! it arrives. Every request carries a generation number, and a completion is
//! only applied if its generation is the latest one issued, so a slow load
//! for a previous focus can never overwrite the current thread.

use std::collections::HashSet;

use pleb_core::{ActionEvent, ActionKind, ContentSource, Note, ThreadLoaded, ThreadRequest};

/// Lifecycle of the materialized thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreadState {
    /// No focus id.
    #[default]
    Idle,
    /// A load has been issued and not yet applied.
    Loading,
    /// The last load produced this many entries.
    Loaded(usize),
    /// The last load produced nothing, or no content source is bound.
    Empty,
}

/// One materialized thread entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadEntry {
    pub note: Note,
    /// Whether this entry is the focus note.
    pub is_target: bool,
}

/// Request to re-render the thread list after its entry count changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest {
    pub previous_count: usize,
    pub count: usize,
}

/// Immutable view of a materialized thread, handed to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadSnapshot {
    pub focus_id: String,
    pub state: ThreadState,
    pub entries: Vec<ThreadEntry>,
}

/// Changes between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadDiff {
    /// Indices (in the newer snapshot) of entries the older one lacked.
    pub inserted: Vec<usize>,
    /// Ids present in the older snapshot but not in the newer one.
    pub removed: Vec<String>,
    /// Whether the target entry changed position.
    pub target_moved: bool,
}

impl ThreadDiff {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && !self.target_moved
    }
}

impl ThreadSnapshot {
    /// Whether a load is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == ThreadState::Loading
    }

    /// Whether there is nothing to show and nothing coming.
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.entries.is_empty()
    }

    /// Index of the first entry flagged as target.
    pub fn target_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_target)
    }

    /// Compare against an older snapshot.
    pub fn diff(&self, previous: &ThreadSnapshot) -> ThreadDiff {
        let before: HashSet<&str> = previous.entries.iter().map(|e| e.note.id.as_str()).collect();
        let after: HashSet<&str> = self.entries.iter().map(|e| e.note.id.as_str()).collect();

        let inserted = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !before.contains(e.note.id.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut seen = HashSet::new();
        let removed = previous
            .entries
            .iter()
            .map(|e| e.note.id.as_str())
            .filter(|id| !after.contains(id) && seen.insert(*id))
            .map(str::to_string)
            .collect();

        ThreadDiff {
            inserted,
            removed,
            target_moved: self.target_index() != previous.target_index(),
        }
    }
}

/// Materializes the thread for the current focus id.
#[derive(Debug, Default)]
pub struct ThreadMaterializer {
    focus_id: String,
    generation: u64,
    state: ThreadState,
    entries: Vec<ThreadEntry>,
}

impl ThreadMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the focus id.
    ///
    /// Setting the current id again does nothing, unless the thread is
    /// [`ThreadState::Empty`] and a source is now bound, in which case the
    /// load is retried. Otherwise previously shown entries are dropped
    /// immediately and, if a source is bound, a load is issued for the new
    /// id. An empty id returns to [`ThreadState::Idle`].
    pub fn set_focus(
        &mut self,
        focus_id: &str,
        source: Option<&mut dyn ContentSource>,
    ) -> Option<RenderRequest> {
        let retry = self.state == ThreadState::Empty && source.is_some();
        if focus_id == self.focus_id && !retry {
            return None;
        }

        self.focus_id = focus_id.to_string();
        self.generation += 1;
        let render = self.replace_entries(Vec::new());

        if focus_id.is_empty() {
            self.state = ThreadState::Idle;
            return render;
        }

        match source {
            Some(source) => self.issue_load(source),
            None => {
                tracing::debug!(focus_id, "no content source bound, thread is empty");
                self.state = ThreadState::Empty;
            }
        }
        render
    }

    /// Reload the current focus, keeping the shown entries until the new
    /// load completes.
    pub fn reload(&mut self, source: &mut dyn ContentSource) {
        if self.focus_id.is_empty() {
            return;
        }
        self.generation += 1;
        self.issue_load(source);
    }

    fn issue_load(&mut self, source: &mut dyn ContentSource) {
        let request = ThreadRequest {
            generation: self.generation,
            focus_id: self.focus_id.clone(),
        };
        tracing::info!(
            focus_id = %request.focus_id,
            generation = request.generation,
            "loading thread"
        );
        self.state = ThreadState::Loading;
        source.load_thread(&request);
    }

    /// Apply a load completion.
    ///
    /// Completions for anything but the latest request are discarded.
    pub fn on_loaded(
        &mut self,
        loaded: ThreadLoaded,
        source: &dyn ContentSource,
    ) -> Option<RenderRequest> {
        if loaded.generation != self.generation || self.state != ThreadState::Loading {
            tracing::debug!(
                generation = loaded.generation,
                current = self.generation,
                "discarding stale thread load"
            );
            return None;
        }

        let count = source.thread_entry_count();
        let entries = (0..count)
            .map(|index| {
                let note = match source.thread_entry(index) {
                    Some(json) => Note::from_json_or_placeholder(&json),
                    None => {
                        tracing::warn!(index, "thread entry missing, using placeholder");
                        Note::placeholder()
                    }
                };
                ThreadEntry {
                    is_target: note.id == self.focus_id,
                    note,
                }
            })
            .collect();

        self.state = if count == 0 {
            ThreadState::Empty
        } else {
            ThreadState::Loaded(count)
        };
        tracing::info!(
            focus_id = %self.focus_id,
            generation = self.generation,
            entries = count,
            "thread loaded"
        );
        self.replace_entries(entries)
    }

    /// Drop the focus and all entries, releasing the source's thread state.
    pub fn clear(&mut self, source: Option<&mut dyn ContentSource>) -> Option<RenderRequest> {
        self.focus_id.clear();
        self.generation += 1;
        self.state = ThreadState::Idle;
        if let Some(source) = source {
            source.clear_thread();
        }
        self.replace_entries(Vec::new())
    }

    /// React to an action result.
    ///
    /// A successful reply to a note in this thread reloads it. Returns whether
    /// a reload was issued.
    pub fn on_action(&mut self, event: &ActionEvent, source: &mut dyn ContentSource) -> bool {
        let in_thread = event.note_id() == self.focus_id
            || self.entries.iter().any(|e| e.note.id == event.note_id());
        if event.is_success() && event.action() == ActionKind::Reply && in_thread {
            self.reload(source);
            return true;
        }
        false
    }

    fn replace_entries(&mut self, entries: Vec<ThreadEntry>) -> Option<RenderRequest> {
        let previous_count = self.entries.len();
        self.entries = entries;
        let count = self.entries.len();
        (previous_count != count).then_some(RenderRequest {
            previous_count,
            count,
        })
    }

    pub fn focus_id(&self) -> &str {
        &self.focus_id
    }

    /// Generation of the latest issued request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> ThreadState {
        self.state
    }

    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_loading(&self) -> bool {
        self.state == ThreadState::Loading
    }

    /// Whether there is nothing to show and nothing coming.
    pub fn is_empty(&self) -> bool {
        !self.is_loading() && self.entries.is_empty()
    }

    /// Index of the first entry flagged as target.
    pub fn target_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_target)
    }

    /// Snapshot the current thread.
    pub fn snapshot(&self) -> ThreadSnapshot {
        ThreadSnapshot {
            focus_id: self.focus_id.clone(),
            state: self.state,
            entries: self.entries.clone(),
        }
    }
}
