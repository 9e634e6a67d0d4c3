//! Core types for the Pleb note reader.
//!
//! This crate provides:
//! - The note and profile records handed out by content sources
//! - The [`ContentSource`] contract (thread loads, feed access, by-id lookup, actions)
//! - [`MemorySource`], an indexed in-memory content source
//! - JSONL note store loading
//! - Shared error types

mod error;
pub mod jsonl;
pub mod memory;
pub mod note;
pub mod source;

pub use error::{Error, Result};
pub use jsonl::{JsonlConfig, JsonlStats, load_jsonl, load_jsonl_with};
pub use memory::{MAX_THREAD_REPLIES, MemorySource};
pub use note::{KIND_LONG_FORM, KIND_REPOST, KIND_TEXT_NOTE, Note, Profile, shorten_pubkey};
pub use source::{ActionEvent, ActionKind, ContentSource, ThreadLoaded, ThreadRequest};
