//! JSONL note store loader.
//!
//! Reads notes from JSONL files (one camelCase note record per line) into a
//! [`MemorySource`], in file order. A directory input loads every
//! `.jsonl`/`.json`/`.ndjson` file in it, sorted by name.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::memory::MemorySource;
use crate::note::Note;
use crate::{Error, Result};

/// Configuration for loading a JSONL store.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Input file or directory path.
    pub input: PathBuf,

    /// Continue on malformed lines (log and skip) instead of failing.
    pub continue_on_error: bool,
}

impl JsonlConfig {
    /// Lenient configuration for `input`.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            continue_on_error: true,
        }
    }
}

/// Statistics for a JSONL load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JsonlStats {
    /// Files read.
    pub files_processed: usize,
    /// Non-blank lines seen.
    pub total_records: usize,
    /// Records turned into notes.
    pub valid_records: usize,
    /// Records skipped as malformed.
    pub invalid_records: usize,
    /// Records whose id was already loaded (later record wins).
    pub duplicate_ids: usize,
}

/// Load a JSONL note store with lenient defaults.
pub fn load_jsonl(path: impl AsRef<Path>) -> Result<(MemorySource, JsonlStats)> {
    load_jsonl_with(&JsonlConfig::new(path.as_ref()))
}

/// Load a JSONL note store.
///
/// # Errors
///
/// Returns [`Error::Io`] if the input does not exist or cannot be read, and
/// [`Error::InvalidRecord`] for a malformed line when `continue_on_error` is
/// off.
pub fn load_jsonl_with(config: &JsonlConfig) -> Result<(MemorySource, JsonlStats)> {
    let files = collect_files(&config.input)?;
    let mut source = MemorySource::new();
    let mut stats = JsonlStats::default();

    for file_path in &files {
        load_file(file_path, config, &mut source, &mut stats)?;
        stats.files_processed += 1;
    }

    tracing::info!(
        files = stats.files_processed,
        valid = stats.valid_records,
        invalid = stats.invalid_records,
        duplicates = stats.duplicate_ids,
        "note store loaded"
    );

    Ok((source, stats))
}

/// Collect files to load based on the input path.
fn collect_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    if input.is_dir() {
        let mut entries: Vec<_> = fs::read_dir(input)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == "jsonl" || ext == "json" || ext == "ndjson")
            })
            .collect();

        // Sort for deterministic feed order
        entries.sort();
        return Ok(entries);
    }

    Err(Error::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("note store does not exist: {}", input.display()),
    )))
}

fn load_file(
    file_path: &Path,
    config: &JsonlConfig,
    source: &mut MemorySource,
    stats: &mut JsonlStats,
) -> Result<()> {
    let reader = BufReader::new(File::open(file_path)?);

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        stats.total_records += 1;

        match parse_record(&line, line_num + 1) {
            Ok(note) => {
                if !source.insert(note) {
                    stats.duplicate_ids += 1;
                }
                stats.valid_records += 1;
            }
            Err(e) => {
                stats.invalid_records += 1;
                if !config.continue_on_error {
                    return Err(e);
                }
                tracing::warn!(file = %file_path.display(), error = %e, "skipping note record");
            }
        }
    }

    Ok(())
}

fn parse_record(line: &str, line_num: usize) -> Result<Note> {
    let note = Note::from_json(line).map_err(|e| Error::InvalidRecord {
        line: line_num,
        reason: e.to_string(),
    })?;
    if note.id.trim().is_empty() {
        return Err(Error::InvalidRecord {
            line: line_num,
            reason: "missing id".to_string(),
        });
    }
    Ok(note)
}
