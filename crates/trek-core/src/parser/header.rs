//! Header-derived column index
//!
//! Episode tables change their column set between series and even between
//! seasons, so fields are looked up by heading text instead of position.

use regex_lite::Regex;
use tracing::warn;

use crate::error::{Result, TrekError};

use super::sanitize::{sanitize, SanitizeOptions};

/// Keys of the row-label column; its cells are `th`, not `td`.
/// Older tables head it with a bare "No.".
pub const OVERALL_NUMBER_KEYS: [&str; 3] = ["no_overall", "no_", "no"];

/// Default air-date heading patterns, matched against sanitized labels
pub const DEFAULT_AIR_DATE_PATTERNS: [&str; 2] = ["^original.*date$", "^paramount.*date$"];

/// Episode field resolved through the header index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SeasonNumber,
    Title,
    DirectedBy,
    AirDate,
}

impl Field {
    /// Heading keys accepted for this field. Air date is matched by pattern.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::SeasonNumber => &["no_inseason", "no_in_season"],
            Field::Title => &["title"],
            Field::DirectedBy => &["directed_by"],
            Field::AirDate => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::SeasonNumber => "no_inseason",
            Field::Title => "title",
            Field::DirectedBy => "directed_by",
            Field::AirDate => "air_date",
        }
    }
}

/// Mapping from sanitized heading keys to data-cell positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    keys: Vec<String>,
    air_date: Option<usize>,
}

impl HeaderIndex {
    /// Build the index using the default air-date patterns.
    pub fn build<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with_patterns(labels, &DEFAULT_AIR_DATE_PATTERNS)
    }

    /// Build the index from raw heading labels.
    ///
    /// Labels are sanitized into keys and the overall-number heading is
    /// dropped, since data rows carry that value in their row-label cell.
    /// Patterns that fail to compile are logged and ignored.
    pub fn build_with_patterns<I, S, P>(labels: I, air_date_patterns: &[P]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: AsRef<str>,
    {
        let mut keys: Vec<String> = labels
            .into_iter()
            .map(|label| sanitize(label.as_ref(), SanitizeOptions::HEADING))
            .collect();

        if let Some(pos) = keys
            .iter()
            .position(|k| OVERALL_NUMBER_KEYS.contains(&k.as_str()))
        {
            keys.remove(pos);
        }

        let patterns: Vec<Regex> = air_date_patterns
            .iter()
            .filter_map(|p| match Regex::new(p.as_ref()) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!(pattern = p.as_ref(), %err, "ignoring invalid air-date pattern");
                    None
                }
            })
            .collect();

        let air_date = keys
            .iter()
            .position(|k| patterns.iter().any(|re| re.is_match(k)));

        Self { keys, air_date }
    }

    /// Number of data columns
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Position of the column whose heading sanitizes to the same key as `name`.
    pub fn position(&self, name: &str) -> Result<usize> {
        let key = sanitize(name, SanitizeOptions::HEADING);
        self.keys
            .iter()
            .position(|k| *k == key)
            .ok_or(TrekError::FieldNotFound(key))
    }

    /// Position of `field`, trying each of its aliases.
    ///
    /// Air date resolves by pattern and does not fall back here; see
    /// [`HeaderIndex::air_date_position`].
    pub fn resolve(&self, field: Field) -> Result<usize> {
        if field == Field::AirDate {
            return self
                .air_date
                .ok_or_else(|| TrekError::FieldNotFound(field.name().to_string()));
        }

        field
            .aliases()
            .iter()
            .find_map(|alias| self.position(alias).ok())
            .ok_or_else(|| TrekError::FieldNotFound(field.name().to_string()))
    }

    /// Air-date column, or the last column when no heading matches.
    pub fn air_date_position(&self) -> usize {
        self.air_date
            .unwrap_or_else(|| self.keys.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overall_number_removed() {
        let index = HeaderIndex::build([
            "No. overall",
            "No. in season",
            "Title",
            "Directed by",
            "Original air date",
        ]);
        assert_eq!(index.len(), 4);
        assert_eq!(index.resolve(Field::SeasonNumber).unwrap(), 0);
        assert_eq!(index.resolve(Field::Title).unwrap(), 1);
        assert_eq!(index.resolve(Field::DirectedBy).unwrap(), 2);
        assert_eq!(index.resolve(Field::AirDate).unwrap(), 3);
    }

    #[test]
    fn test_bare_number_heading_removed() {
        let index = HeaderIndex::build(["No.", "Title", "Directed by", "Original air date"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.resolve(Field::Title).unwrap(), 0);
    }

    #[test]
    fn test_only_first_overall_heading_removed() {
        let index = HeaderIndex::build(["no_overall", "no_overall", "Title"]);
        assert_eq!(index.keys(), ["no_overall".to_string(), "title".to_string()]);
    }

    #[test]
    fn test_extra_columns_do_not_shift_fields() {
        let index = HeaderIndex::build([
            "No. overall",
            "No. in season",
            "Title",
            "Directed by",
            "Written by",
            "Original air date[10]",
            "Prod. code",
            "U.S. viewers (millions)",
        ]);
        assert_eq!(index.resolve(Field::DirectedBy).unwrap(), 2);
        assert_eq!(index.position("Written by").unwrap(), 3);
        assert_eq!(index.air_date_position(), 4);
    }

    #[test]
    fn test_directed_by_variants_resolve_alike() {
        for label in ["Directed by", "directed_by", "Directed By[a]"] {
            let index = HeaderIndex::build(["No. in season", "Title", label, "Original air date"]);
            assert_eq!(index.resolve(Field::DirectedBy).unwrap(), 2, "label {label:?}");
        }
    }

    #[test]
    fn test_broadcaster_air_date_heading() {
        let index = HeaderIndex::build([
            "No. overall",
            "No. in season",
            "Title",
            "Directed by",
            "Written by",
            "Paramount+ release date",
        ]);
        assert_eq!(index.resolve(Field::AirDate).unwrap(), 4);
    }

    #[test]
    fn test_air_date_falls_back_to_last_column() {
        let index = HeaderIndex::build(["Title", "Directed by", "Released"]);
        assert!(matches!(
            index.resolve(Field::AirDate),
            Err(TrekError::FieldNotFound(_))
        ));
        assert_eq!(index.air_date_position(), 2);
    }

    #[test]
    fn test_missing_field() {
        let index = HeaderIndex::build(["No. overall", "Title", "Original air date"]);
        match index.resolve(Field::SeasonNumber) {
            Err(TrekError::FieldNotFound(name)) => assert_eq!(name, "no_inseason"),
            other => panic!("Expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_patterns_and_invalid_pattern_ignored() {
        let index = HeaderIndex::build_with_patterns(
            ["Title", "First aired", "Notes"],
            &["(", "^first_aired$"],
        );
        assert_eq!(index.air_date_position(), 1);
    }

    proptest! {
        #[test]
        fn prop_resolution_ignores_case_and_footnotes(
            upper in proptest::bool::ANY,
            note in "(\\[[a-z0-9]{1,2}\\])?",
        ) {
            let base = if upper { "DIRECTED BY" } else { "Directed by" };
            let label = format!("{base}{note}");
            let index = HeaderIndex::build(["No. in season", "Title", label.as_str()]);
            prop_assert_eq!(index.resolve(Field::DirectedBy).unwrap(), 2);
        }
    }
}
