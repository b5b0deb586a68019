//! Streaming batch API: emit file results as they complete.
//!
//! Unlike [`crate::sanitize::sanitize_batch`], which returns only after
//! every file is done, [`sanitize_stream`] yields each [`FileResult`] as
//! soon as its output is written. Results arrive in completion order; sort
//! by `input` if order matters. Batch-level progress events
//! (`on_batch_start` / `on_batch_complete`) are left to the caller.

use crate::config::ScrubConfig;
use crate::output::FileResult;
use crate::sanitize::sanitize_batch_file;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::pin::Pin;
use tokio_stream::Stream;

/// A boxed stream of per-file results.
pub type FileStream = Pin<Box<dyn Stream<Item = FileResult> + Send>>;

/// Results tagged with the position of their input in the batch.
pub(crate) type IndexedFileStream = Pin<Box<dyn Stream<Item = (usize, FileResult)> + Send>>;

/// Sanitize `inputs` concurrently, streaming results as files finish.
///
/// At most [`ScrubConfig::concurrency`] files are in flight at once.
pub fn sanitize_stream(inputs: Vec<PathBuf>, config: &ScrubConfig) -> FileStream {
    let indexed = inputs.into_iter().enumerate().collect();
    Box::pin(sanitize_indexed(indexed, config).map(|(_, result)| result))
}

/// [`sanitize_stream`] over pre-numbered inputs; each index comes back
/// with its result.
pub(crate) fn sanitize_indexed(
    inputs: Vec<(usize, PathBuf)>,
    config: &ScrubConfig,
) -> IndexedFileStream {
    let concurrency = config.concurrency.max(1);
    let config = config.clone();

    let results = stream::iter(inputs)
        .map(move |(index, input)| {
            let config = config.clone();
            async move { (index, sanitize_batch_file(input, &config).await) }
        })
        .buffer_unordered(concurrency);

    Box::pin(results)
}
