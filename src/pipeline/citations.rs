//! Citation-bracket and OCR image-tag removal.
//!
//! OCR output of academic papers is littered with bracketed citation
//! markers (`[12]`, `[3, 7]`, `[Smith 2020]`) that add nothing once the
//! bibliography is gone. The same bracket syntax also carries inline math
//! (`[0, \pi / 4]`, `[x^2]`), which must survive intact.
//!
//! Each innermost `[...]` span is classified by its interior in a single
//! pass:
//!
//! | Interior                                      | Action  |
//! |-----------------------------------------------|---------|
//! | contains any of `\ / + - * = ( ) . ^ { }`     | keep    |
//! | only ASCII letters, digits, whitespace, `,`   | delete  |
//! | anything else (other punctuation, `é`, empty) | keep    |
//!
//! OCR image tags of the shape `![img-N.jpeg](img-N.jpeg)` are deleted
//! first: their bracket interior (`img-N.jpeg`) would otherwise be kept by
//! the math rule.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Removal counters for one [`clean_with_counts`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CitationCounts {
    pub citations: usize,
    pub images: usize,
}

static RE_OCR_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[img-\d+\.jpeg\]\(img-\d+\.jpeg\)").unwrap());

/// Innermost bracket span: no `[` or `]` in between.
static RE_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").unwrap());

const MATH_SYMBOLS: &[char] = &['\\', '/', '+', '-', '*', '=', '(', ')', '.', '^', '{', '}'];

/// Remove citation brackets and OCR image tags, preserving math brackets.
pub fn clean(text: &str) -> String {
    clean_with_counts(text).0
}

/// [`clean`] plus the number of citations and images removed.
pub fn clean_with_counts(text: &str) -> (String, CitationCounts) {
    let mut counts = CitationCounts::default();

    let without_images = RE_OCR_IMAGE.replace_all(text, |_: &Captures<'_>| {
        counts.images += 1;
        ""
    });

    let cleaned = RE_BRACKET.replace_all(&without_images, |caps: &Captures<'_>| {
        match classify(&caps[1]) {
            BracketKind::Citation => {
                counts.citations += 1;
                String::new()
            }
            BracketKind::Math | BracketKind::Other => caps[0].to_string(),
        }
    });

    (cleaned.into_owned(), counts)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BracketKind {
    Math,
    Citation,
    Other,
}

fn classify(interior: &str) -> BracketKind {
    if interior.contains(MATH_SYMBOLS) {
        BracketKind::Math
    } else if !interior.is_empty()
        && interior
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == ',')
    {
        BracketKind::Citation
    } else {
        BracketKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn latex_bracket_survives_numeric_citation_goes() {
        let input = r"The range is [0, \pi / 4] and result [42].";
        assert_eq!(clean(input), r"The range is [0, \pi / 4] and result .");
    }

    #[test]
    fn image_tag_removed() {
        assert_eq!(
            clean("See ![img-15.jpeg](img-15.jpeg) below."),
            "See  below."
        );
    }

    #[test]
    fn image_tag_with_other_extension_kept() {
        let input = "See ![img-15.png](img-15.png) below.";
        assert_eq!(clean(input), input);
    }

    #[test]
    fn author_year_citation_removed() {
        assert_eq!(clean("as shown [Smith 2020, Doe 2019]."), "as shown .");
    }

    #[test]
    fn every_math_symbol_protects_its_bracket() {
        for sym in MATH_SYMBOLS {
            let input = format!("x [a{sym}b] y");
            assert_eq!(clean(&input), input, "symbol {sym:?}");
        }
    }

    #[test]
    fn other_punctuation_is_left_alone() {
        for input in ["[see: 4]", "[Müller 2020]", "[]", "[a;b]", "[12]!"] {
            let expected = if input == "[12]!" { "!" } else { input };
            assert_eq!(clean(input), expected);
        }
    }

    #[test]
    fn whitespace_only_bracket_is_a_citation() {
        assert_eq!(clean("a [ ] b"), "a  b");
    }

    #[test]
    fn nested_math_keeps_outer_text() {
        let input = r"[see [x^2] and [7]]";
        // The inner citation goes; the outer span is not innermost and stays.
        assert_eq!(clean(input), r"[see [x^2] and ]");
    }

    #[test]
    fn unbalanced_brackets_untouched() {
        let input = "open [12 and close 3] done";
        // `[12 and close 3]` is one span of letters/digits/spaces.
        assert_eq!(clean(input), "open  done");
        assert_eq!(clean("only [ open"), "only [ open");
        assert_eq!(clean("only ] close"), "only ] close");
    }

    #[test]
    fn counts_are_reported() {
        let (out, counts) =
            clean_with_counts("[1] a ![img-1.jpeg](img-1.jpeg) [2, 3] [x+1]");
        assert_eq!(out, " a   [x+1]");
        assert_eq!(
            counts,
            CitationCounts {
                citations: 2,
                images: 1
            }
        );
    }

    #[test]
    fn idempotent_on_typical_text() {
        let input = "Result [4] holds for [a, b] with [0, \\pi / 2].\n![img-2.jpeg](img-2.jpeg)\n";
        let once = clean(input);
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn no_brackets_is_identity() {
        let input = "Plain prose with (parentheses) and no brackets.\n";
        assert_eq!(clean(input), input);
    }
}
