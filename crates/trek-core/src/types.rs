//! Data types for Trekpedia
//!
//! Plain value records for the series catalog and the per-series episode
//! lists. Serialized field names follow the JSON layout consumed downstream.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parser::sanitize::{sanitize, SanitizeOptions};

/// Catalog of series keyed by their 1-based position in the listing
pub type SeriesCatalog = BTreeMap<u32, SeriesEntry>;

/// Where a series keeps its episode tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EpisodesUrl {
    /// Resolution has not run yet
    #[default]
    Pending,
    /// Page holding the per-episode tables
    Resolved(String),
    /// Resolution ran but found no episode list
    Unresolved,
}

impl EpisodesUrl {
    /// The resolved URL, if any
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Resolved(url) => Some(url),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Pending serializes as `""`, unresolved as `null`.
impl Serialize for EpisodesUrl {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Pending => serializer.serialize_str(""),
            Self::Resolved(url) => serializer.serialize_str(url),
            Self::Unresolved => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for EpisodesUrl {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => Self::Unresolved,
            Some(url) if url.is_empty() => Self::Pending,
            Some(url) => Self::Resolved(url),
        })
    }
}

/// One series of the franchise, as listed on the main page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    /// Display name of the series
    pub name: String,
    /// Absolute URL of the series' own article
    #[serde(rename = "url")]
    pub detail_url: String,
    /// Number of seasons declared by the listing
    pub season_count: u32,
    /// Number of episodes declared by the listing
    pub episode_count: u32,
    /// Page holding the episode tables
    pub episodes_url: EpisodesUrl,
    /// Air-date range, e.g. "September 8, 1966 - June 3, 1969"
    #[serde(rename = "dates")]
    pub air_date_range: String,
    /// Absolute URL of the series logo, empty when the article has none
    #[serde(rename = "logo")]
    pub logo_url: String,
}

impl SeriesEntry {
    /// Lowercase, underscore-joined name used for file naming
    pub fn slug(&self) -> String {
        sanitize(
            &self.name,
            SanitizeOptions {
                underscores: true,
                lowercase: true,
                ..SanitizeOptions::default()
            },
        )
    }
}

/// One episode row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    #[serde(rename = "num_overall")]
    pub overall_number: String,
    #[serde(rename = "num_in_season")]
    pub season_number: String,
    pub title: String,
    /// Absolute article URL, empty when the row carried no usable link
    pub link: String,
    pub director: String,
    pub air_date: String,
}

/// One season with its overview metadata and episodes in broadcast order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonEntry {
    #[serde(rename = "total")]
    pub total_episodes: String,
    pub season_start: String,
    pub season_end: String,
    pub episodes: Vec<EpisodeEntry>,
}

/// Episode file contents for one series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEpisodes {
    pub seasons: BTreeMap<u32, SeasonEntry>,
}

/// Result of processing one series
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesOutcome {
    /// Seasons were extracted
    Extracted(SeriesEpisodes),
    /// The series was passed over; nothing should be written for it
    Skipped { reason: String },
}
