//! Configuration types for Markdown sanitizing.
//!
//! The pure text pipeline only needs [`ScrubOptions`]: which passes run and
//! which section names are removed. [`ScrubConfig`] wraps those options
//! with the knobs of the file layer (concurrency, output naming, progress
//! reporting) and is built via [`ScrubConfigBuilder`], which validates the
//! section table before any file is touched.

use crate::error::ScrubError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Section names removed when the caller does not supply its own list.
///
/// Matching is case-insensitive, so one spelling per title is enough.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "acknowledgements",
    "acknowledgments",
    "references",
    "bibliography",
    "works cited",
    "citations",
];

/// Suffix appended to the file stem when no explicit output path is given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_cleaned";

/// Options for the in-memory sanitizer pipeline.
///
/// # Example
/// ```rust
/// use mdscrub::{process, ScrubOptions};
///
/// let opts = ScrubOptions::default();
/// let out = process("See [12] and [0, \\pi / 4].", &opts);
/// assert_eq!(out, "See  and [0, \\pi / 4].");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubOptions {
    /// Strip citation brackets and OCR image tags. Default: true.
    pub clean_citations: bool,

    /// Section names to remove, in evaluation order. `None` means
    /// [`DEFAULT_SECTIONS`].
    pub sections: Option<Vec<String>>,

    /// Skip the section-removal stage entirely. Default: false.
    pub skip_section_removal: bool,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            clean_citations: true,
            sections: None,
            skip_section_removal: false,
        }
    }
}

impl ScrubOptions {
    /// The effective section table: the caller's list or the defaults.
    ///
    /// Names are trimmed and blank names dropped, so options built by hand
    /// behave like ones that went through [`ScrubConfigBuilder::build`].
    pub fn section_names(&self) -> Vec<&str> {
        match self.sections {
            Some(ref names) => names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .collect(),
            None => DEFAULT_SECTIONS.to_vec(),
        }
    }
}

/// Configuration for file-level sanitizing.
///
/// Built via [`ScrubConfig::builder()`] or using [`ScrubConfig::default()`].
///
/// # Example
/// ```rust
/// use mdscrub::ScrubConfig;
///
/// let config = ScrubConfig::builder()
///     .sections(["references", "appendix"])
///     .concurrency(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.options.section_names(), vec!["references", "appendix"]);
/// ```
#[derive(Clone)]
pub struct ScrubConfig {
    /// Options forwarded to [`crate::pipeline::process`].
    pub options: ScrubOptions,

    /// Maximum number of documents processed at once in a batch. Default: 8.
    pub concurrency: usize,

    /// Suffix for derived output names (`paper.md` → `paper_cleaned.md`).
    pub output_suffix: String,

    /// Directory for batch outputs. `None` writes next to each input.
    pub output_dir: Option<PathBuf>,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            options: ScrubOptions::default(),
            concurrency: 8,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            output_dir: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ScrubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrubConfig")
            .field("options", &self.options)
            .field("concurrency", &self.concurrency)
            .field("output_suffix", &self.output_suffix)
            .field("output_dir", &self.output_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ScrubConfig {
    /// Create a new builder for `ScrubConfig`.
    pub fn builder() -> ScrubConfigBuilder {
        ScrubConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScrubConfig`].
#[derive(Debug)]
pub struct ScrubConfigBuilder {
    config: ScrubConfig,
}

impl ScrubConfigBuilder {
    pub fn clean_citations(mut self, v: bool) -> Self {
        self.config.options.clean_citations = v;
        self
    }

    /// Replace the default section table.
    pub fn sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.options.sections = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn skip_section_removal(mut self, v: bool) -> Self {
        self.config.options.skip_section_removal = v;
        self
    }

    pub fn options(mut self, options: ScrubOptions) -> Self {
        self.config.options = options;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.output_suffix = suffix.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Section names are trimmed; blank names and names spanning several
    /// lines are rejected since they can never match a heading.
    pub fn build(mut self) -> Result<ScrubConfig, ScrubError> {
        if let Some(ref mut names) = self.config.options.sections {
            for name in names.iter_mut() {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(ScrubError::InvalidConfig(
                        "section names must not be empty".into(),
                    ));
                }
                if trimmed.contains('\n') {
                    return Err(ScrubError::InvalidConfig(format!(
                        "section name {trimmed:?} spans multiple lines"
                    )));
                }
                *name = trimmed.to_string();
            }
        }
        if self.config.concurrency == 0 {
            return Err(ScrubError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if self.config.output_suffix.contains(['/', '\\']) {
            return Err(ScrubError::InvalidConfig(format!(
                "output suffix {:?} must not contain path separators",
                self.config.output_suffix
            )));
        }
        Ok(self.config)
    }
}
