//! Named-section removal (references, acknowledgments, …).
//!
//! Three passes run in a fixed order:
//!
//! 1. **Front matter**: `<name>: |` block scalars are cut out of a leading
//!    YAML block (see [`super::front_matter`]).
//! 2. **ATX headings**: `## References` and everything up to the next
//!    `#`-heading of any level.
//! 3. **Setext headings**: `References` over a `====`/`----` underline and
//!    everything up to the next heading of either style.
//!
//! Heading passes work line by line on the text after the front matter.
//! A heading matches when its title *starts with* the section name, case
//! insensitively, so `## References and Further Reading` is removed under
//! `references`. Each heading line is evaluated on its own: two target
//! sections back to back are both removed.

use super::front_matter::{remove_block_scalar, split_front_matter};
use regex::Regex;
use tracing::warn;

/// Removal counters for one [`remove_sections_with_counts`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub front_matter: usize,
    pub atx: usize,
    pub setext: usize,
}

/// Remove the named sections from `text`.
pub fn remove_sections<S: AsRef<str>>(text: &str, names: &[S]) -> String {
    remove_sections_with_counts(text, names).0
}

/// [`remove_sections`] plus per-pass removal counters.
pub fn remove_sections_with_counts<S: AsRef<str>>(
    text: &str,
    names: &[S],
) -> (String, SectionCounts) {
    let mut counts = SectionCounts::default();

    let (front_matter, body) = match split_front_matter(text) {
        Some((fm, rest)) => {
            let mut fm = fm.to_string();
            for name in names {
                let (edited, n) = remove_block_scalar(&fm, name.as_ref());
                fm = edited;
                counts.front_matter += n;
            }
            (fm, rest)
        }
        None => (String::new(), text),
    };

    let mut body = body.to_string();
    for name in names {
        let Some(re) = heading_title_regex(name.as_ref(), HeadingStyle::Atx) else {
            continue;
        };
        let (next, n) = remove_atx_sections(&body, &re);
        body = next;
        counts.atx += n;
    }
    for name in names {
        let Some(re) = heading_title_regex(name.as_ref(), HeadingStyle::Setext) else {
            continue;
        };
        let (next, n) = remove_setext_sections(&body, &re);
        body = next;
        counts.setext += n;
    }

    (front_matter + &body, counts)
}

#[derive(Debug, Clone, Copy)]
enum HeadingStyle {
    Atx,
    Setext,
}

fn heading_title_regex(name: &str, style: HeadingStyle) -> Option<Regex> {
    let escaped = regex::escape(name);
    let pattern = match style {
        HeadingStyle::Atx => format!(r"(?i)^#{{1,6}}\s+{escaped}"),
        HeadingStyle::Setext => format!(r"(?i)^{escaped}"),
    };
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping section {:?}: {}", name, e);
            None
        }
    }
}

// ── ATX pass ─────────────────────────────────────────────────────────────────

fn remove_atx_sections(text: &str, title: &Regex) -> (String, usize) {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());
    let mut removed = 0;
    let mut i = 0;

    while i < lines.len() {
        if title.is_match(content(lines[i])) {
            removed += 1;
            i += 1;
            while i < lines.len() && !is_atx_heading(lines[i]) {
                i += 1;
            }
            continue;
        }
        out.push_str(lines[i]);
        i += 1;
    }

    (out, removed)
}

// ── Setext pass ──────────────────────────────────────────────────────────────

fn remove_setext_sections(text: &str, title: &Regex) -> (String, usize) {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());
    let mut removed = 0;
    let mut i = 0;

    while i < lines.len() {
        let underlined = lines.get(i + 1).is_some_and(|next| is_underline(next));
        if underlined && title.is_match(content(lines[i])) {
            removed += 1;
            i += 2;
            while i < lines.len() && !starts_heading(&lines, i) {
                i += 1;
            }
            continue;
        }
        out.push_str(lines[i]);
        i += 1;
    }

    (out, removed)
}

/// A heading of either style begins at `lines[i]`.
fn starts_heading(lines: &[&str], i: usize) -> bool {
    if is_atx_heading(lines[i]) {
        return true;
    }
    !content(lines[i]).is_empty() && lines.get(i + 1).is_some_and(|next| is_underline(next))
}

// ── Line helpers ─────────────────────────────────────────────────────────────

/// The line without its `\n` terminator.
fn content(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

/// 1–6 `#` followed by whitespace or the end of the line.
fn is_atx_heading(line: &str) -> bool {
    let line = content(line);
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&hashes) {
        return false;
    }
    line[hashes..]
        .chars()
        .next()
        .is_none_or(char::is_whitespace)
}

/// A non-empty line made only of `=` and `-`.
fn is_underline(line: &str) -> bool {
    let line = content(line).trim_end_matches('\r');
    !line.is_empty() && line.bytes().all(|b| b == b'=' || b == b'-')
}
