//! Pipeline stages for Markdown sanitizing.
//!
//! Each submodule implements exactly one step. The text stages are pure
//! `&str → String` functions with no shared state, so documents can be
//! processed independently and in any order.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ citations ──▶ front_matter + sections ──▶ output
//! (file)    (brackets,     (YAML block scalars,
//!            image tags)    ATX + setext headings)
//! ```
//!
//! 1. [`input`]:        expand user arguments into Markdown files and read them
//! 2. [`citations`]:    drop citation brackets and OCR image tags, keep math
//! 3. [`front_matter`]: cut named block scalars out of leading YAML
//! 4. [`sections`]:     drop named sections under ATX or setext headings

pub mod citations;
pub mod front_matter;
pub mod input;
pub mod sections;

use crate::config::ScrubOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use citations::clean;
pub use sections::remove_sections;

/// What one [`process_with_report`] call removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub citations_removed: usize,
    pub images_removed: usize,
    pub front_matter_blocks_removed: usize,
    pub atx_sections_removed: usize,
    pub setext_sections_removed: usize,
}

impl CleanReport {
    /// Total sections removed across all three section passes.
    pub fn sections_removed(&self) -> usize {
        self.front_matter_blocks_removed + self.atx_sections_removed + self.setext_sections_removed
    }

    /// Accumulate another report into this one.
    pub fn merge(&mut self, other: &CleanReport) {
        self.citations_removed += other.citations_removed;
        self.images_removed += other.images_removed;
        self.front_matter_blocks_removed += other.front_matter_blocks_removed;
        self.atx_sections_removed += other.atx_sections_removed;
        self.setext_sections_removed += other.setext_sections_removed;
    }
}

/// Run the sanitizer on one document.
///
/// Citation cleaning runs first (unless disabled), then section removal
/// (unless skipped) with the configured or default section table.
pub fn process(text: &str, options: &ScrubOptions) -> String {
    process_with_report(text, options).0
}

/// [`process`] plus a [`CleanReport`] of what was removed.
pub fn process_with_report(text: &str, options: &ScrubOptions) -> (String, CleanReport) {
    let mut report = CleanReport::default();
    let mut out = text.to_string();

    if options.clean_citations {
        let (cleaned, counts) = citations::clean_with_counts(&out);
        report.citations_removed = counts.citations;
        report.images_removed = counts.images;
        out = cleaned;
    }

    if !options.skip_section_removal {
        let names = options.section_names();
        let (cleaned, counts) = sections::remove_sections_with_counts(&out, &names);
        report.front_matter_blocks_removed = counts.front_matter;
        report.atx_sections_removed = counts.atx;
        report.setext_sections_removed = counts.setext;
        out = cleaned;
    }

    debug!(
        citations = report.citations_removed,
        images = report.images_removed,
        sections = report.sections_removed(),
        "sanitized document"
    );
    (out, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAPER: &str = "# On Central Configurations\n\
Known results [3, 7] extend to [0, \\pi / 4].\n\
![img-1.jpeg](img-1.jpeg)\n\
\n\
## References\n\
[1] Moulton, F. R. (1910).\n\
[2] Smale, S. (1998).\n\
\n\
## Appendix\n\
Proof of [x^2 + y^2 = 1].\n";

    #[test]
    fn default_pipeline_cleans_brackets_and_sections() {
        let (out, report) = process_with_report(PAPER, &ScrubOptions::default());
        assert_eq!(
            out,
            "# On Central Configurations\n\
Known results  extend to [0, \\pi / 4].\n\
\n\
\n\
## Appendix\n\
Proof of [x^2 + y^2 = 1].\n"
        );
        assert_eq!(report.citations_removed, 3);
        assert_eq!(report.images_removed, 1);
        assert_eq!(report.atx_sections_removed, 1);
        assert_eq!(report.sections_removed(), 1);
    }

    #[test]
    fn citations_disabled_keeps_brackets() {
        let opts = ScrubOptions {
            clean_citations: false,
            ..ScrubOptions::default()
        };
        let out = process(PAPER, &opts);
        assert!(out.contains("[3, 7]"));
        assert!(out.contains("![img-1.jpeg](img-1.jpeg)"));
        assert!(!out.contains("## References"));
    }

    #[test]
    fn skip_sections_keeps_references() {
        let opts = ScrubOptions {
            skip_section_removal: true,
            ..ScrubOptions::default()
        };
        let out = process(PAPER, &opts);
        assert!(out.contains("## References\n"));
        assert!(!out.contains("[3, 7]"));
    }

    #[test]
    fn custom_sections_replace_defaults() {
        let opts = ScrubOptions {
            sections: Some(vec!["appendix".into()]),
            clean_citations: false,
            ..ScrubOptions::default()
        };
        let out = process(PAPER, &opts);
        assert!(out.contains("## References"));
        assert!(!out.contains("## Appendix"));
    }

    #[test]
    fn blank_section_name_removes_nothing() {
        let opts = ScrubOptions {
            sections: Some(vec![String::new()]),
            clean_citations: false,
            ..ScrubOptions::default()
        };
        let input = "# Intro\nText.\n\n## Next\nMore.\n";
        let (out, report) = process_with_report(input, &opts);
        assert_eq!(out, input);
        assert_eq!(report.sections_removed(), 0);
    }

    #[test]
    fn everything_disabled_is_identity() {
        let opts = ScrubOptions {
            clean_citations: false,
            skip_section_removal: true,
            sections: None,
        };
        assert_eq!(process(PAPER, &opts), PAPER);
    }

    #[test]
    fn plain_document_is_unchanged() {
        let input = "# Notes\n\nNothing to remove here.\n\n## Results\nAll good.\n";
        assert_eq!(process(input, &ScrubOptions::default()), input);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let opts = ScrubOptions::default();
        let once = process(PAPER, &opts);
        assert_eq!(process(&once, &opts), once);
    }

    #[test]
    fn report_merge_accumulates() {
        let mut total = CleanReport::default();
        let one = CleanReport {
            citations_removed: 2,
            images_removed: 1,
            front_matter_blocks_removed: 0,
            atx_sections_removed: 1,
            setext_sections_removed: 1,
        };
        total.merge(&one);
        total.merge(&one);
        assert_eq!(total.citations_removed, 4);
        assert_eq!(total.sections_removed(), 4);
    }
}
