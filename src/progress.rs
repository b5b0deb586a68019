//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::ScrubConfigBuilder::progress_callback`] to receive
//! events as a batch is processed. The trait is `Send + Sync` because files
//! are cleaned concurrently.
//!
//! # Example
//!
//! ```rust
//! use mdscrub::{BatchProgressCallback, ScrubConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, input: &str, _output_bytes: usize) {
//!         let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}: {input}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//! let config = ScrubConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch runner as it processes each file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. `on_file_*` may be called concurrently from
/// different tasks.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before any file is read.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is read.
    fn on_file_start(&self, input: &str) {
        let _ = input;
    }

    /// Called when a file was cleaned and written.
    ///
    /// # Arguments
    /// * `input`:        input label (path or `<stdin>`)
    /// * `output_bytes`: byte length of the cleaned Markdown
    fn on_file_complete(&self, input: &str, output_bytes: usize) {
        let _ = (input, output_bytes);
    }

    /// Called when a file failed to read or write.
    fn on_file_error(&self, input: &str, error: &str) {
        let _ = (input, error);
    }

    /// Called once after all files have been attempted.
    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ScrubConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;
