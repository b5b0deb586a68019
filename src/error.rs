//! Error types for the mdscrub library.
//!
//! The text transformations in [`crate::pipeline`] are total and never
//! return an error. Everything here belongs to the file layer around them:
//!
//! * [`ScrubError`]: **Fatal**: the run cannot proceed (input missing,
//!   not UTF-8, output not writable, bad configuration). Returned as
//!   `Err(ScrubError)` from the `sanitize*` entry points.
//!
//! * [`FileError`]: **Non-fatal**: one document of a batch failed while
//!   the others were cleaned. Stored inside [`crate::output::FileResult`]
//!   so callers can report partial success.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the mdscrub library.
#[derive(Debug, Error)]
pub enum ScrubError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but its bytes are not valid UTF-8.
    #[error("File '{path}' is not valid UTF-8 (first invalid byte at offset {valid_up_to})")]
    NotUtf8 { path: PathBuf, valid_up_to: usize },

    /// Any other I/O failure while reading an input.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input expansion produced no Markdown documents.
    #[error("No Markdown inputs found in: {inputs}")]
    NoInputs { inputs: String },

    // ── Batch errors ──────────────────────────────────────────────────────
    /// Every file of a batch failed.
    #[error("All {total} files failed.\nFirst error: {first_error}")]
    AllFilesFailed { total: usize, first_error: String },

    /// Some files succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::BatchOutput::into_result`] when the
    /// caller wants to treat any file failure as an error.
    #[error("{failed}/{total} files failed during cleaning")]
    PartialFailure {
        success: usize,
        failed: usize,
        total: usize,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the cleaned output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScrubError {
    /// Map an `io::Error` raised while reading `path` to the closest variant.
    pub fn from_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => ScrubError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => ScrubError::PermissionDenied { path },
            _ => ScrubError::ReadFailed { path, source: err },
        }
    }
}

/// A non-fatal error for a single file of a batch.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The input could not be read or decoded.
    #[error("{path}: read failed: {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// The cleaned output could not be written.
    #[error("{path}: write failed: {detail}")]
    WriteFailed { path: PathBuf, detail: String },

    /// Another input of the same batch already writes to `output`.
    #[error("{path}: output '{output}' collides with '{claimed_by}'; rename one input or drop --output-dir")]
    OutputCollision {
        path: PathBuf,
        output: PathBuf,
        claimed_by: PathBuf,
    },
}

impl FileError {
    /// Classify a fatal single-file error as a per-file batch error.
    pub fn from_scrub(path: impl Into<PathBuf>, err: &ScrubError) -> Self {
        let path = path.into();
        match err {
            ScrubError::OutputWriteFailed { .. } => FileError::WriteFailed {
                path,
                detail: err.to_string(),
            },
            _ => FileError::ReadFailed {
                path,
                detail: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display() {
        let e = ScrubError::PartialFailure {
            success: 9,
            failed: 1,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("1/10"), "got: {msg}");
    }

    #[test]
    fn not_found_maps_from_io_kind() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e = ScrubError::from_read("paper.md", err);
        assert!(matches!(e, ScrubError::FileNotFound { .. }));
        assert!(e.to_string().contains("paper.md"));
    }

    #[test]
    fn permission_denied_maps_from_io_kind() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e = ScrubError::from_read("secret.md", err);
        assert!(matches!(e, ScrubError::PermissionDenied { .. }));
    }

    #[test]
    fn other_io_errors_keep_source() {
        let err = std::io::Error::other("disk on fire");
        let e = ScrubError::from_read("paper.md", err);
        assert!(e.to_string().contains("disk on fire"));
    }

    #[test]
    fn write_errors_become_write_failed() {
        let e = ScrubError::OutputWriteFailed {
            path: "out.md".into(),
            source: std::io::Error::other("full"),
        };
        let fe = FileError::from_scrub("in.md", &e);
        assert!(matches!(fe, FileError::WriteFailed { .. }));
        assert!(fe.to_string().starts_with("in.md"));
    }

    #[test]
    fn output_collision_names_both_inputs() {
        let fe = FileError::OutputCollision {
            path: "b/x.md".into(),
            output: "out/x_cleaned.md".into(),
            claimed_by: "a/x.md".into(),
        };
        let msg = fe.to_string();
        assert!(msg.starts_with("b/x.md"), "got: {msg}");
        assert!(msg.contains("a/x.md"), "got: {msg}");
    }

    #[test]
    fn not_utf8_display() {
        let e = ScrubError::NotUtf8 {
            path: "scan.md".into(),
            valid_up_to: 17,
        };
        assert!(e.to_string().contains("offset 17"));
    }
}
