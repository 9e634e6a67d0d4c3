//! Error types shared by the note store and the reader.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or decoding notes.
#[derive(Error, Debug)]
pub enum Error {
    /// A serialized note record could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `nostr:` URI or bech32 identifier could not be decoded.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The requested note or profile is not known to the content source.
    #[error("not found: {0}")]
    NotFound(String),

    /// A line of a note store could not be turned into a note.
    #[error("invalid record at line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number in the store file.
        line: usize,
        /// Description of what's wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_display() {
        let err = Error::InvalidIdentifier("nostr:npub1zzz".to_string());
        assert_eq!(err.to_string(), "invalid identifier: nostr:npub1zzz");
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound("note abc".to_string());
        assert_eq!(err.to_string(), "not found: note abc");
    }

    #[test]
    fn test_invalid_record_display() {
        let err = Error::InvalidRecord {
            line: 7,
            reason: "missing id".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("missing id"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }
}
