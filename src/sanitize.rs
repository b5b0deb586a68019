//! File-level sanitizing entry points.
//!
//! The text pipeline in [`crate::pipeline`] is pure; this module adds the
//! I/O around it: reading documents, atomic output writes, and concurrent
//! batches. Use [`crate::stream::sanitize_stream`] instead of
//! [`sanitize_batch`] to receive file results as they complete.

use crate::config::ScrubConfig;
use crate::error::{FileError, ScrubError};
use crate::output::{BatchOutput, FileResult, ScrubOutput, ScrubStats};
use crate::pipeline::{self, input};
use crate::stream::sanitize_indexed;
use futures::StreamExt;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Sanitize an in-memory document.
///
/// Never fails: the text transformations are total.
pub fn sanitize_str(text: &str, config: &ScrubConfig) -> ScrubOutput {
    let start = Instant::now();
    let (markdown, report) = pipeline::process_with_report(text, &config.options);
    let stats = ScrubStats {
        input_bytes: text.len(),
        output_bytes: markdown.len(),
        report,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    ScrubOutput { markdown, stats }
}

/// Read a Markdown file and sanitize it.
///
/// # Errors
/// - File not found / permission denied / other read failure
/// - File is not valid UTF-8
pub async fn sanitize_file(
    input_path: impl AsRef<Path>,
    config: &ScrubConfig,
) -> Result<ScrubOutput, ScrubError> {
    let path = input_path.as_ref();
    info!("Sanitizing {}", path.display());
    let text = input::read_document(path).await?;
    let output = sanitize_str(&text, config);
    debug!(
        "{}: {} → {} bytes",
        path.display(),
        output.stats.input_bytes,
        output.stats.output_bytes
    );
    Ok(output)
}

/// Sanitize a file and write the result to `output_path`.
///
/// Uses atomic write (temp file + rename) so a failure never leaves a
/// truncated output file behind.
pub async fn sanitize_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ScrubConfig,
) -> Result<ScrubStats, ScrubError> {
    let output = sanitize_file(input_path, config).await?;
    write_atomic(output_path.as_ref(), output.markdown).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`sanitize_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn sanitize_sync(
    input_path: impl AsRef<Path>,
    config: &ScrubConfig,
) -> Result<ScrubOutput, ScrubError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScrubError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(sanitize_file(input_path, config))
}

/// Sanitize many files concurrently, each to its derived output path.
///
/// Outputs go to [`ScrubConfig::output_dir`] when set, otherwise next to
/// the input, named with [`ScrubConfig::output_suffix`]. One failing file
/// does not stop the others; results come back in input order. When two
/// inputs derive the same output path (same file name in different
/// directories under one `output_dir`), the first keeps it and the later
/// ones fail with [`FileError::OutputCollision`] without being read.
pub async fn sanitize_batch(inputs: Vec<PathBuf>, config: &ScrubConfig) -> BatchOutput {
    let start = Instant::now();
    let total = inputs.len();
    info!("Sanitizing {} files (concurrency {})", total, config.concurrency);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(total);
    let mut runnable = Vec::with_capacity(total);
    let mut results: Vec<(usize, FileResult)> = Vec::new();

    for (index, input_path) in inputs.into_iter().enumerate() {
        let output_path = batch_output_path(&input_path, config);
        match claimed.get(&output_path) {
            Some(first) => {
                let error = FileError::OutputCollision {
                    path: input_path.clone(),
                    output: output_path,
                    claimed_by: first.clone(),
                };
                warn!("{}", error);
                if let Some(ref cb) = config.progress_callback {
                    let label = input_path.display().to_string();
                    cb.on_file_start(&label);
                    cb.on_file_error(&label, &error.to_string());
                }
                results.push((
                    index,
                    FileResult {
                        input: input_path,
                        output: None,
                        stats: None,
                        error: Some(error),
                    },
                ));
            }
            None => {
                claimed.insert(output_path, input_path.clone());
                runnable.push((index, input_path));
            }
        }
    }

    results.extend(sanitize_indexed(runnable, config).collect::<Vec<_>>().await);
    results.sort_unstable_by_key(|(index, _)| *index);
    let files = results.into_iter().map(|(_, result)| result).collect();

    let batch = BatchOutput::from_results(files, start.elapsed().as_millis() as u64);
    info!(
        "Batch complete: {}/{} files, {}ms",
        batch.totals.succeeded, total, batch.totals.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, batch.totals.succeeded);
    }
    batch
}

/// Where a batch writes the cleaned version of `input`.
pub fn batch_output_path(input: &Path, config: &ScrubConfig) -> PathBuf {
    let derived = input::default_output_path(input, &config.output_suffix);
    match (&config.output_dir, derived.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => derived,
    }
}

/// Clean one file of a batch, reporting progress and capturing failure.
pub(crate) async fn sanitize_batch_file(input_path: PathBuf, config: &ScrubConfig) -> FileResult {
    let label = input_path.display().to_string();
    if let Some(ref cb) = config.progress_callback {
        cb.on_file_start(&label);
    }

    let output_path = batch_output_path(&input_path, config);
    match sanitize_to_file(&input_path, &output_path, config).await {
        Ok(stats) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_complete(&label, stats.output_bytes);
            }
            FileResult {
                input: input_path,
                output: Some(output_path),
                stats: Some(stats),
                error: None,
            }
        }
        Err(e) => {
            warn!("{}: {}", label, e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_error(&label, &e.to_string());
            }
            FileResult {
                error: Some(FileError::from_scrub(&input_path, &e)),
                input: input_path,
                output: None,
                stats: None,
            }
        }
    }
}

/// Write `contents` to `path` through a temp file in the same directory.
///
/// The temp file is renamed over `path` only after every byte is written
/// and flushed; on failure it is deleted and `path` is left untouched.
pub async fn write_atomic(path: &Path, contents: String) -> Result<(), ScrubError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, contents.as_bytes()))
        .await
        .map_err(|e| ScrubError::Internal(format!("write task failed: {e}")))?
}

fn write_atomic_blocking(path: &Path, contents: &[u8]) -> Result<(), ScrubError> {
    let write_err = |source: std::io::Error| ScrubError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitize_str_reports_bytes() {
        let config = ScrubConfig::default();
        let out = sanitize_str("Claim [1].\n", &config);
        assert_eq!(out.markdown, "Claim .\n");
        assert_eq!(out.stats.input_bytes, 11);
        assert_eq!(out.stats.output_bytes, 8);
        assert_eq!(out.stats.report.citations_removed, 1);
    }

    #[test]
    fn batch_output_path_uses_output_dir() {
        let config = ScrubConfig::builder()
            .output_dir("/tmp/clean")
            .build()
            .unwrap();
        assert_eq!(
            batch_output_path(Path::new("corpus/a.md"), &config),
            PathBuf::from("/tmp/clean/a_cleaned.md")
        );
    }

    #[test]
    fn batch_output_path_defaults_next_to_input() {
        let config = ScrubConfig::default();
        assert_eq!(
            batch_output_path(Path::new("corpus/a.md"), &config),
            PathBuf::from("corpus/a_cleaned.md")
        );
    }

    #[tokio::test]
    async fn write_atomic_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.md");
        write_atomic(&path, "first".into()).await.unwrap();
        write_atomic(&path, "second".into()).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .collect();
        assert_eq!(leftovers.len(), 1, "temp files must not be left behind");
    }

    #[tokio::test]
    async fn batch_keeps_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["d.md", "b.md", "a.md", "c.md"];
        let inputs: Vec<PathBuf> = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, "Text [2].\n").unwrap();
                path
            })
            .collect();

        let config = ScrubConfig::builder().concurrency(4).build().unwrap();
        let batch = sanitize_batch(inputs.clone(), &config).await;
        let order: Vec<PathBuf> = batch.files.iter().map(|f| f.input.clone()).collect();
        assert_eq!(order, inputs);
        assert_eq!(batch.totals.succeeded, 4);
    }

    #[tokio::test]
    async fn same_name_under_output_dir_is_a_collision() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a/x.md");
        let b = dir.path().join("b/x.md");
        std::fs::create_dir_all(a.parent().unwrap()).unwrap();
        std::fs::create_dir_all(b.parent().unwrap()).unwrap();
        std::fs::write(&a, "from a [1].\n").unwrap();
        std::fs::write(&b, "from b [1].\n").unwrap();

        let out_dir = dir.path().join("out");
        let config = ScrubConfig::builder().output_dir(&out_dir).build().unwrap();
        let batch = sanitize_batch(vec![a.clone(), b.clone()], &config).await;

        assert_eq!(batch.totals.succeeded, 1);
        assert_eq!(batch.totals.failed, 1);
        assert!(batch.files[0].is_ok());
        assert_eq!(batch.files[1].input, b);
        assert!(matches!(
            batch.files[1].error,
            Some(FileError::OutputCollision { ref claimed_by, .. }) if *claimed_by == a
        ));
        assert_eq!(
            std::fs::read_to_string(out_dir.join("x_cleaned.md")).unwrap(),
            "from a .\n"
        );
    }

    #[tokio::test]
    async fn failed_read_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.md");
        let err = sanitize_to_file(dir.path().join("missing.md"), &out, &ScrubConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrubError::FileNotFound { .. }));
        assert!(!out.exists());
    }
}
