//! Trekpedia Core Library
//!
//! Builds a catalog of the Star Trek television series from Wikipedia and
//! extracts every season and episode of each series.
//!
//! # Features
//! - Series listing with season/episode counts, air dates and logo
//! - Episode-list link resolution per series
//! - Season overview and episode table extraction with short-row recovery
//! - Rate-limited HTTP client

pub mod client;
pub mod config;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, RateLimiter, WikiClient};
pub use config::{ExtractorConfig, Overrides};
pub use error::{Result, TrekError};
pub use scraper::TrekScraper;
pub use types::{
    EpisodeEntry, EpisodesUrl, SeasonEntry, SeriesCatalog, SeriesEntry, SeriesEpisodes, SeriesOutcome,
};
