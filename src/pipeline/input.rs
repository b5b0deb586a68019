//! Input resolution: expand user arguments into Markdown documents.
//!
//! An argument is either `-` (standard input), a Markdown file, or a
//! directory whose `*.md` / `*.markdown` entries are taken in name order
//! (non-recursive). Reading validates UTF-8 up front so the text stages can
//! stay total.

use crate::error::ScrubError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Extensions treated as Markdown when expanding a directory.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

/// A single document to sanitize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Read from standard input, write to standard output.
    Stdin,
    /// A Markdown file on disk.
    File(PathBuf),
}

impl InputSource {
    /// Human-readable label for logs and progress lines.
    pub fn label(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(p) => p.display().to_string(),
        }
    }

    /// Read the whole document as UTF-8 text.
    pub async fn read(&self) -> Result<String, ScrubError> {
        match self {
            InputSource::Stdin => read_stdin().await,
            InputSource::File(p) => read_document(p).await,
        }
    }
}

/// Check whether `path` has a Markdown extension (case-insensitive).
pub fn is_markdown_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| ext.eq_ignore_ascii_case(m))
        })
}

/// Expand user arguments into a list of input sources.
///
/// Files are taken as given regardless of extension; directories contribute
/// only their Markdown entries, minus files whose stem ends with
/// `skip_suffix` (outputs of an earlier run). Errors when a path does not
/// exist or when the expansion is empty.
pub fn resolve_inputs<S: AsRef<str>>(
    args: &[S],
    skip_suffix: Option<&str>,
) -> Result<Vec<InputSource>, ScrubError> {
    let mut sources = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if arg == "-" {
            sources.push(InputSource::Stdin);
            continue;
        }

        let path = PathBuf::from(arg);
        let meta = std::fs::metadata(&path).map_err(|e| ScrubError::from_read(&path, e))?;
        if meta.is_dir() {
            let mut entries = list_markdown_files(&path, skip_suffix)?;
            info!("{}: {} Markdown files", path.display(), entries.len());
            sources.append(&mut entries);
        } else {
            sources.push(InputSource::File(path));
        }
    }

    if sources.is_empty() {
        return Err(ScrubError::NoInputs {
            inputs: args
                .iter()
                .map(|a| a.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }
    Ok(sources)
}

fn list_markdown_files(
    dir: &Path,
    skip_suffix: Option<&str>,
) -> Result<Vec<InputSource>, ScrubError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| ScrubError::from_read(dir, e))?;
    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ScrubError::from_read(dir, e))?;
        let path = entry.path();
        if !path.is_file() || !is_markdown_path(&path) {
            continue;
        }
        if skip_suffix.is_some_and(|sfx| !sfx.is_empty() && has_stem_suffix(&path, sfx)) {
            debug!("Skipping earlier output {}", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files.into_iter().map(InputSource::File).collect())
}

fn has_stem_suffix(path: &Path, suffix: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(suffix))
}

/// Read a file as UTF-8 text.
pub async fn read_document(path: &Path) -> Result<String, ScrubError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ScrubError::from_read(path, e))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode(path, bytes)
}

async fn read_stdin() -> Result<String, ScrubError> {
    let mut bytes = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| ScrubError::from_read("<stdin>", e))?;
    decode(Path::new("<stdin>"), bytes)
}

fn decode(path: &Path, bytes: Vec<u8>) -> Result<String, ScrubError> {
    String::from_utf8(bytes).map_err(|e| ScrubError::NotUtf8 {
        path: path.to_path_buf(),
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// Derive the output path for `input`: `dir/paper.md` → `dir/paper<suffix>.md`.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(name)
}
