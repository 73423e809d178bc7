//! Text normalization for cell and heading text
//!
//! Wikipedia cell text arrives with footnote markers (`[12]`, `(citation
//! needed)`), non-breaking spaces and line breaks. [`sanitize`] strips those
//! and, for headings, turns the label into a machine-safe key.

/// Which transforms [`sanitize`] applies on top of whitespace collapsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Replace runs of spaces, periods and underscores with one underscore
    pub underscores: bool,
    /// Drop every bracketed or parenthesized span with its delimiters
    pub brackets: bool,
    pub lowercase: bool,
}

impl SanitizeOptions {
    /// Only strip bracketed spans; used for cell values
    pub const BRACKETS: Self = Self {
        underscores: false,
        brackets: true,
        lowercase: false,
    };

    /// Everything on; used for column headings
    pub const HEADING: Self = Self {
        underscores: true,
        brackets: true,
        lowercase: true,
    };
}

/// Normalize `text` according to `options`.
///
/// Whitespace runs are always collapsed to single spaces and the ends
/// trimmed. The result is stable: sanitizing it again with the same options
/// returns it unchanged.
///
/// # Examples
/// ```
/// use trek_core::parser::{sanitize, SanitizeOptions};
///
/// assert_eq!(sanitize("Title (Part 1)", SanitizeOptions::BRACKETS), "Title");
/// assert_eq!(sanitize("No. in\u{a0}season[a]", SanitizeOptions::HEADING), "no_in_season");
/// ```
pub fn sanitize(text: &str, options: SanitizeOptions) -> String {
    let text = if options.brackets {
        strip_brackets(text)
    } else {
        text.to_string()
    };

    let mut text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if options.underscores {
        text = underscore_runs(&text);
    }

    if options.lowercase {
        text = text.to_lowercase();
    }

    text
}

/// Remove bracketed spans, tracking depth so nested spans go with their parent.
///
/// An unmatched closer is dropped on its own; an unmatched opener swallows
/// the rest of the text.
fn strip_brackets(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }

    out
}

fn underscore_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c == ' ' || c == '.' || c == '_' {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [SanitizeOptions; 8] = [
        SanitizeOptions { underscores: false, brackets: false, lowercase: false },
        SanitizeOptions { underscores: true, brackets: false, lowercase: false },
        SanitizeOptions { underscores: false, brackets: true, lowercase: false },
        SanitizeOptions { underscores: false, brackets: false, lowercase: true },
        SanitizeOptions { underscores: true, brackets: true, lowercase: false },
        SanitizeOptions { underscores: true, brackets: false, lowercase: true },
        SanitizeOptions { underscores: false, brackets: true, lowercase: true },
        SanitizeOptions { underscores: true, brackets: true, lowercase: true },
    ];

    #[test]
    fn test_whitespace_always_collapsed() {
        assert_eq!(
            sanitize("  The\u{a0}Man \n Trap  ", SanitizeOptions::default()),
            "The Man Trap"
        );
    }

    #[test]
    fn test_brackets_removed() {
        let opts = SanitizeOptions::BRACKETS;
        assert_eq!(sanitize("Title (Part 1)", opts), "Title");
        assert_eq!(sanitize("Marc Daniels[12]", opts), "Marc Daniels");
        assert_eq!(sanitize("79 (citation needed) episodes", opts), "79 episodes");
        assert_eq!(sanitize("a (b [c] d) e", opts), "a e");
        assert_eq!(sanitize("[a][b]22", opts), "22");
    }

    #[test]
    fn test_unbalanced_brackets() {
        let opts = SanitizeOptions::BRACKETS;
        assert_eq!(sanitize("close) only", opts), "close only");
        assert_eq!(sanitize("open (never closed", opts), "open");
    }

    #[test]
    fn test_heading_keys() {
        let opts = SanitizeOptions::HEADING;
        assert_eq!(sanitize("No. overall", opts), "no_overall");
        assert_eq!(sanitize("Directed by", opts), "directed_by");
        assert_eq!(sanitize("Directed By[a]", opts), "directed_by");
        assert_eq!(sanitize("directed_by", opts), "directed_by");
        assert_eq!(sanitize("Original air date", opts), "original_air_date");
        assert_eq!(sanitize("Original release date [b]", opts), "original_release_date");
    }

    #[test]
    fn test_lowercase_only() {
        let opts = SanitizeOptions {
            lowercase: true,
            ..SanitizeOptions::default()
        };
        assert_eq!(sanitize("Deep Space Nine", opts), "deep space nine");
    }

    proptest! {
        #[test]
        fn prop_sanitize_idempotent(text in "[a-zA-Z0-9 ._\u{a0}\t\n()\\[\\]\"]{0,40}") {
            for opts in ALL {
                let once = sanitize(&text, opts);
                prop_assert_eq!(sanitize(&once, opts), once.clone());
            }
        }

        #[test]
        fn prop_brackets_leave_no_delimiters(text in "[a-z ()\\[\\]]{0,40}") {
            let cleaned = sanitize(&text, SanitizeOptions::BRACKETS);
            prop_assert!(!cleaned.contains(['(', ')', '[', ']']));
        }
    }
}
