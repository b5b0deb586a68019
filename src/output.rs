//! Result types returned by the file-level entry points.

use crate::error::{FileError, ScrubError};
use crate::pipeline::CleanReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The cleaned document plus what was done to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubOutput {
    /// Cleaned Markdown.
    pub markdown: String,
    pub stats: ScrubStats,
}

/// Per-document statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrubStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub report: CleanReport,
    pub duration_ms: u64,
}

impl ScrubStats {
    /// Bytes dropped by sanitizing.
    pub fn bytes_removed(&self) -> usize {
        self.input_bytes.saturating_sub(self.output_bytes)
    }
}

/// Outcome for one file of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub input: PathBuf,
    /// Where the cleaned text was written; `None` on failure.
    pub output: Option<PathBuf>,
    pub stats: Option<ScrubStats>,
    pub error: Option<FileError>,
}

impl FileResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// All file results of a batch, in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub files: Vec<FileResult>,
    pub totals: BatchTotals,
}

/// Aggregated statistics over a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchTotals {
    pub succeeded: usize,
    pub failed: usize,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub report: CleanReport,
    pub duration_ms: u64,
}

impl BatchOutput {
    /// Build totals from the individual file results.
    pub fn from_results(files: Vec<FileResult>, duration_ms: u64) -> Self {
        let mut totals = BatchTotals {
            duration_ms,
            ..BatchTotals::default()
        };
        for file in &files {
            match file.stats {
                Some(ref s) if file.is_ok() => {
                    totals.succeeded += 1;
                    totals.input_bytes += s.input_bytes;
                    totals.output_bytes += s.output_bytes;
                    totals.report.merge(&s.report);
                }
                _ => totals.failed += 1,
            }
        }
        Self { files, totals }
    }

    /// Treat any failed file as an error.
    pub fn into_result(self) -> Result<Self, ScrubError> {
        let total = self.files.len();
        let failed = self.totals.failed;
        if failed == 0 {
            return Ok(self);
        }
        if failed == total {
            let first_error = self
                .files
                .iter()
                .find_map(|f| f.error.as_ref())
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ScrubError::AllFilesFailed { total, first_error });
        }
        Err(ScrubError::PartialFailure {
            success: total - failed,
            failed,
            total,
        })
    }
}
