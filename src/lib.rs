//! # mdscrub
//!
//! Strip citation brackets, OCR image tags, and reference-style sections from
//! Markdown produced by PDF OCR.
//!
//! OCR services return the text of academic papers faithfully, including
//! everything that gets in the way of reading or indexing it: `[12]`-style
//! citation markers, `![img-3.jpeg](img-3.jpeg)` placeholders for figures,
//! and whole References / Acknowledgments sections. This crate removes
//! those while leaving bracketed math such as `[0, \pi / 4]` untouched.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Input      file, directory of *.md, or stdin
//!  ├─ 2. Citations  drop [12] / [Smith 2020] and OCR image tags, keep math
//!  ├─ 3. Sections   drop named YAML block scalars, ATX and setext sections
//!  └─ 4. Output     atomic write (temp file + rename) + per-file stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mdscrub::{process, ScrubOptions};
//!
//! let raw = "Known [3].\n\n## References\n[3] Moulton (1910).\n";
//! let clean = process(raw, &ScrubOptions::default());
//! assert_eq!(clean, "Known .\n\n");
//! ```
//!
//! File-level helpers ([`sanitize_file`], [`sanitize_to_file`],
//! [`sanitize_batch`]) add reading, atomic writes and concurrent batches.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdscrub` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdscrub = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod sanitize;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScrubConfig, ScrubConfigBuilder, ScrubOptions, DEFAULT_SECTIONS};
pub use error::{FileError, ScrubError};
pub use output::{BatchOutput, BatchTotals, FileResult, ScrubOutput, ScrubStats};
pub use pipeline::{clean, process, process_with_report, remove_sections, CleanReport};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use sanitize::{
    sanitize_batch, sanitize_file, sanitize_str, sanitize_sync, sanitize_to_file, write_atomic,
};
pub use stream::sanitize_stream;
