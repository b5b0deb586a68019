//! YAML front-matter handling for section removal.
//!
//! Converters that emit metadata sometimes store long free-text fields as
//! YAML block scalars:
//!
//! ```text
//! ---
//! title: On Central Configurations
//! acknowledgments: |
//!   We thank the referees.
//! ---
//! ```
//!
//! Only the delimited block is edited here; the Markdown body after the
//! closing delimiter is returned untouched so the heading passes can run on
//! it separately.

use once_cell::sync::Lazy;
use regex::Regex;

/// End of a block scalar: the next top-level `key:` line or a `---`.
static RE_BLOCK_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\w+:|---").unwrap());

/// Split `text` into `(front_matter, rest)`.
///
/// The first line must be exactly `---`. The front matter runs up to and
/// including the next `---` found after the opening delimiter; `rest` is
/// everything after it. Returns `None` when there is no front matter or it
/// is never closed.
pub fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let first_line = text.split('\n').next().unwrap_or("");
    if first_line.trim_end_matches('\r') != "---" {
        return None;
    }
    let close = text[3..].find("---")? + 3;
    Some(text.split_at(close + 3))
}

/// Remove every `<name>: |` block scalar from a front-matter block.
///
/// The name is matched case-insensitively. The removed span starts at the
/// key and stops right before the next top-level key (its leading newline
/// is kept) or the next `---`, whichever comes first. Returns the edited
/// block and the number of blocks removed.
pub fn remove_block_scalar(front_matter: &str, name: &str) -> (String, usize) {
    let head = match Regex::new(&format!(r"(?i){}:\s*\|", regex::escape(name))) {
        Ok(re) => re,
        Err(_) => return (front_matter.to_string(), 0),
    };

    let mut yaml = front_matter.to_string();
    let mut removed = 0;
    let mut search_from = 0;

    while let Some(key) = head.find_at(&yaml, search_from).map(|m| m.range()) {
        match RE_BLOCK_END.find_at(&yaml, key.end).map(|m| m.start()) {
            Some(end) => {
                yaml.replace_range(key.start..end, "");
                removed += 1;
                search_from = key.start;
            }
            None => {
                // Unterminated block: leave it and keep scanning past the key.
                search_from = key.start
                    + yaml[key.start..]
                        .chars()
                        .next()
                        .map_or(1, char::len_utf8);
            }
        }
    }

    (yaml, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_requires_opening_line() {
        assert!(split_front_matter("# Title\n---\n").is_none());
        assert!(split_front_matter("----\na: b\n---\n").is_none());
        assert!(split_front_matter("--- x\na: b\n---\n").is_none());
    }

    #[test]
    fn split_unclosed_front_matter_is_none() {
        assert!(split_front_matter("---\ntitle: x\nbody").is_none());
    }

    #[test]
    fn split_at_closing_delimiter() {
        let (fm, rest) = split_front_matter("---\ntitle: x\n---\n# Body\n").unwrap();
        assert_eq!(fm, "---\ntitle: x\n---");
        assert_eq!(rest, "\n# Body\n");
    }

    #[test]
    fn split_accepts_crlf_opening() {
        let (fm, rest) = split_front_matter("---\r\ntitle: x\r\n---\r\nBody").unwrap();
        assert_eq!(fm, "---\r\ntitle: x\r\n---");
        assert_eq!(rest, "\r\nBody");
    }

    #[test]
    fn block_before_closing_delimiter() {
        let fm = "---\ntitle: T\nreferences: |\n  some text\n---";
        let (out, n) = remove_block_scalar(fm, "references");
        assert_eq!(out, "---\ntitle: T\n---");
        assert_eq!(n, 1);
    }

    #[test]
    fn block_before_next_key_keeps_key() {
        let fm = "---\nReferences: |\n  a\n  b\nauthor: Z\n---";
        let (out, n) = remove_block_scalar(fm, "references");
        assert_eq!(out, "---\n\nauthor: Z\n---");
        assert_eq!(n, 1);
    }

    #[test]
    fn consecutive_blocks_removed_one_name_at_a_time() {
        let fm = "---\nacknowledgments: |\n  a\nreferences: |\n  b\ntitle: T\n---";
        let (after_ack, n_ack) = remove_block_scalar(fm, "acknowledgments");
        assert_eq!(after_ack, "---\n\nreferences: |\n  b\ntitle: T\n---");
        assert_eq!(n_ack, 1);

        let (out, n_ref) = remove_block_scalar(&after_ack, "references");
        assert_eq!(out, "---\n\n\ntitle: T\n---");
        assert_eq!(n_ref, 1);
    }

    #[test]
    fn repeated_key_removed_on_rescan() {
        let fm = "---\nreferences: |\n  a\nreferences: |\n  b\n---";
        let (out, n) = remove_block_scalar(fm, "references");
        assert_eq!(out, "---\n\n---");
        assert_eq!(n, 2);
    }

    #[test]
    fn plain_scalar_is_not_a_block() {
        let fm = "---\nreferences: none\n---";
        let (out, n) = remove_block_scalar(fm, "references");
        assert_eq!(out, fm);
        assert_eq!(n, 0);
    }

    #[test]
    fn unterminated_block_is_kept() {
        let yaml = "references: |\n  dangling";
        let (out, n) = remove_block_scalar(yaml, "references");
        assert_eq!(out, yaml);
        assert_eq!(n, 0);
    }

    #[test]
    fn name_with_regex_metacharacters_is_literal() {
        let fm = "---\nnotes (v2): |\n  text\n---";
        let (out, n) = remove_block_scalar(fm, "notes (v2)");
        assert_eq!(out, "---\n---");
        assert_eq!(n, 1);
    }
}
