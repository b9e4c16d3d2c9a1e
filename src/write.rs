//! Write operations: span replacement over a source buffer, and rewriting
//! files on disk.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RewriteConfig;
use crate::error::RewriteError;
use crate::rewrite::{rewrite_source, CallFailure};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Replacement {start}..{end} partially overlaps an earlier one")]
    Overlap { start: usize, end: usize },

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

// ─── Span replacement ───────────────────────────────────────────

/// What [`SourceRewriter::replace`] did with a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replacement {
    Registered,
    /// The range lies inside an already registered replacement.
    Absorbed,
}

#[derive(Debug, Clone)]
struct Edit {
    range: Range<usize>,
    text: String,
}

/// Collects non-overlapping replacements over a borrowed buffer and applies
/// them in one pass. Text outside the replaced ranges is copied unchanged.
#[derive(Debug)]
pub struct SourceRewriter<'a> {
    source: &'a str,
    /// Sorted by start offset.
    edits: Vec<Edit>,
}

impl<'a> SourceRewriter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Register `text` in place of `range`.
    ///
    /// A range inside an existing replacement is absorbed; a range that
    /// contains existing replacements supersedes them. Partial overlaps are
    /// rejected.
    pub fn replace(
        &mut self,
        range: Range<usize>,
        text: impl Into<String>,
    ) -> Result<Replacement, WriteError> {
        self.check_range(&range)?;

        let mut superseded = Vec::new();
        for (index, edit) in self.edits.iter().enumerate() {
            if edit.range.start <= range.start && range.end <= edit.range.end {
                return Ok(Replacement::Absorbed);
            }
            if range.start <= edit.range.start && edit.range.end <= range.end {
                superseded.push(index);
            } else if range.start < edit.range.end && edit.range.start < range.end {
                return Err(WriteError::Overlap {
                    start: range.start,
                    end: range.end,
                });
            }
        }
        for index in superseded.into_iter().rev() {
            self.edits.remove(index);
        }

        let at = self
            .edits
            .partition_point(|edit| edit.range.start <= range.start);
        self.edits.insert(
            at,
            Edit {
                range,
                text: text.into(),
            },
        );
        Ok(Replacement::Registered)
    }

    /// Original text of `range`, if it is a valid slice of the buffer.
    pub fn source_text(&self, range: Range<usize>) -> Option<&'a str> {
        self.source.get(range)
    }

    /// Number of registered replacements.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// The buffer with every registered replacement applied.
    pub fn apply(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&self.source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), WriteError> {
        if range.start > range.end || range.end > self.source.len() {
            return Err(WriteError::InvalidInput(format!(
                "Range {}..{} is outside a buffer of {} bytes",
                range.start,
                range.end,
                self.source.len()
            )));
        }
        if !self.source.is_char_boundary(range.start) || !self.source.is_char_boundary(range.end) {
            return Err(WriteError::InvalidInput(format!(
                "Range {}..{} splits a character",
                range.start, range.end
            )));
        }
        Ok(())
    }
}

// ─── File operations ────────────────────────────────────────────

/// Whether rewritten files are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    DryRun,
    InPlace,
}

impl WriteMode {
    fn operation(self) -> &'static str {
        match self {
            WriteMode::DryRun => "check",
            WriteMode::InPlace => "rewrite",
        }
    }
}

/// Rewrite one file.
///
/// In [`WriteMode::InPlace`] the file is written only when its text
/// changed; the rewritten text is returned in [`WriteResult::output`]
/// either way.
pub fn rewrite_file(
    path: &Path,
    config: &RewriteConfig,
    mode: WriteMode,
) -> Result<WriteResult, WriteError> {
    let start = std::time::Instant::now();

    let original = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WriteError::FileNotFound(path.to_path_buf()),
        _ => WriteError::IoError(e),
    })?;

    let rewritten = rewrite_source(&original, config)?;
    let changed = rewritten.changed(&original);

    let mut bytes_written = 0;
    if changed && mode == WriteMode::InPlace {
        fs::write(path, &rewritten.output)?;
        bytes_written = rewritten.output.len();
    }

    let elapsed = start.elapsed();
    debug!(
        path = %path.display(),
        changed,
        rewritten = rewritten.stats.rewritten,
        failed = rewritten.stats.failed,
        "processed file"
    );

    Ok(WriteResult {
        operation: mode.operation().to_string(),
        path: path.display().to_string(),
        changed,
        time_ms: elapsed.as_millis() as u64,
        rewritten: rewritten.stats.rewritten,
        skipped: rewritten.stats.skipped,
        failed: rewritten.stats.failed,
        bytes_written,
        failures: rewritten.failures,
        output: rewritten.output,
    })
}

/// Result of a file rewrite.
#[derive(Debug, serde::Serialize)]
pub struct WriteResult {
    pub operation: String,
    pub path: String,
    pub changed: bool,
    pub time_ms: u64,
    pub rewritten: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_written: usize,
    pub failures: Vec<CallFailure>,
    #[serde(skip)]
    pub output: String,
}

impl WriteResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Rewrite several files in parallel.
pub fn batch_rewrite_files(
    paths: &[PathBuf],
    config: &RewriteConfig,
    mode: WriteMode,
) -> Vec<Result<WriteResult, WriteError>> {
    use rayon::prelude::*;

    paths
        .par_iter()
        .map(|path| rewrite_file(path, config, mode))
        .collect()
}

/// Summary of batch operation results.
#[derive(Debug, serde::Serialize)]
pub struct BatchWriteResult {
    pub total_files: usize,
    pub successful: usize,
    pub changed: usize,
    pub failed: usize,
    pub total_time_ms: u64,
    pub errors: Vec<String>,
    pub results: Vec<WriteResult>,
}

impl BatchWriteResult {
    pub fn from_results(results: Vec<Result<WriteResult, WriteError>>) -> Self {
        let total_files = results.len();
        let mut errors = Vec::new();
        let mut write_results = Vec::new();
        for result in results {
            match result {
                Ok(result) => write_results.push(result),
                Err(e) => errors.push(e.to_string()),
            }
        }

        let successful = write_results.len();
        let changed = write_results.iter().filter(|r| r.changed).count();
        let total_time_ms = write_results.iter().map(|r| r.time_ms).sum();

        Self {
            total_files,
            successful,
            changed,
            failed: total_files - successful,
            total_time_ms,
            errors,
            results: write_results,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
