//! Extractor configuration
//!
//! Everything about the source pages that is known to drift lives here rather
//! than in the parsers: which series keep their episodes on their own article,
//! which heading level carries the episode-list link, the air-date heading
//! patterns, the short-row recovery table and the one-off corrections.
//!
//! Every field has a default, so a partial TOML file only needs to name what
//! it changes.

use serde::Deserialize;

use crate::parser::reconcile::RecoveryTable;

/// Heading level to scan for series whose article URL contains `pattern`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadingRoute {
    pub pattern: String,
    pub tag: String,
}

/// Replace a season count the listing is known to get wrong
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonCountOverride {
    pub series: String,
    /// Only applied while the listing still shows this value
    pub reported: u32,
    pub corrected: u32,
}

/// Replace a displayed season end date known to be wrong
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeasonEndOverride {
    pub series: String,
    pub season: u32,
    pub season_end: String,
}

/// One-off literal corrections keyed by series name (case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub season_counts: Vec<SeasonCountOverride>,
    pub season_ends: Vec<SeasonEndOverride>,
}

impl Default for Overrides {
    fn default() -> Self {
        Self {
            season_counts: vec![SeasonCountOverride {
                series: "Lower Decks".to_string(),
                reported: 2,
                corrected: 3,
            }],
            season_ends: vec![SeasonEndOverride {
                series: "Discovery".to_string(),
                season: 1,
                season_end: "February 11, 2018".to_string(),
            }],
        }
    }
}

impl Overrides {
    /// Corrected season count for `series`, or `reported` when no entry applies
    pub fn season_count(&self, series: &str, reported: u32) -> u32 {
        self.season_counts
            .iter()
            .find(|o| o.series.eq_ignore_ascii_case(series) && o.reported == reported)
            .map(|o| o.corrected)
            .unwrap_or(reported)
    }

    pub fn season_end(&self, series: &str, season: u32) -> Option<&str> {
        self.season_ends
            .iter()
            .find(|o| o.series.eq_ignore_ascii_case(series) && o.season == season)
            .map(|o| o.season_end.as_str())
    }
}

/// Configuration for the extraction engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Franchise listing page
    pub main_url: String,
    /// Scheme and host prefixed to site-relative links
    pub site_origin: String,
    /// Id of the heading that introduces the series listing table
    pub index_section_id: String,
    /// URL fragments of series whose article already holds the episode tables
    pub exception_series: Vec<String>,
    /// Per-series heading level overrides for the episode-list link search
    pub heading_routes: Vec<HeadingRoute>,
    pub default_heading_tag: String,
    /// Patterns an air-date column heading may match (after sanitizing)
    pub air_date_patterns: Vec<String>,
    pub recovery: RecoveryTable,
    pub overrides: Overrides,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            main_url: "https://en.wikipedia.org/wiki/Star_Trek".to_string(),
            site_origin: "https://en.wikipedia.org".to_string(),
            index_section_id: "Television".to_string(),
            exception_series: [
                "Animated",
                "Short_Treks",
                "Picard",
                "Lower_Decks",
                "Prodigy",
                "Strange_New_Worlds",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            heading_routes: vec![HeadingRoute {
                pattern: "Enterprise".to_string(),
                tag: "h3".to_string(),
            }],
            default_heading_tag: "h2".to_string(),
            air_date_patterns: vec![
                "^original.*date$".to_string(),
                "^paramount.*date$".to_string(),
            ],
            recovery: RecoveryTable::default(),
            overrides: Overrides::default(),
        }
    }
}

impl ExtractorConfig {
    /// Make a site-relative href absolute.
    ///
    /// Protocol-relative hrefs (`//upload...`) get an `https:` scheme,
    /// absolute URLs pass through untouched.
    pub fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(rest) = href.strip_prefix("//") {
            format!("https://{}", rest)
        } else if href.starts_with('/') {
            format!("{}{}", self.site_origin.trim_end_matches('/'), href)
        } else {
            format!("{}/{}", self.site_origin.trim_end_matches('/'), href)
        }
    }
}
