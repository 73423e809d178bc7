//! Main Trekpedia API
//!
//! Combines the HTTP client with the parsers: build the series catalog from
//! the franchise article, then extract each series' seasons on request. Every
//! page is fetched, parsed and dropped before the next fetch.

use tracing::{info, warn};

use crate::client::{ClientConfig, WikiClient};
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::parser::{parse_logo, parse_series_episodes, parse_series_index, resolve_episodes_url, route_for, LinkRoute};
use crate::types::{EpisodesUrl, SeriesCatalog, SeriesEntry, SeriesOutcome};

/// Main scraper API
///
/// # Example
/// ```no_run
/// use trek_core::{SeriesOutcome, TrekScraper};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = TrekScraper::new()?;
///
///     let catalog = scraper.series_catalog().await?;
///     for (index, series) in &catalog {
///         if let SeriesOutcome::Extracted(episodes) = scraper.series_episodes(series).await? {
///             println!("{index}. {} - {} seasons", series.name, episodes.seasons.len());
///         }
///     }
///
///     Ok(())
/// }
/// ```
pub struct TrekScraper {
    client: WikiClient,
    config: ExtractorConfig,
}

impl TrekScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default(), ExtractorConfig::default())
    }

    /// Create a new scraper with custom client and extractor configuration.
    pub fn with_config(client: ClientConfig, config: ExtractorConfig) -> Result<Self> {
        Ok(Self::with_client(WikiClient::with_config(client)?, config))
    }

    /// Create a new scraper with a pre-built client.
    pub fn with_client(client: WikiClient, config: ExtractorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Build the series catalog.
    ///
    /// Each series article is fetched once for its logo and episode-list link.
    /// A series whose article cannot be fetched stays in the catalog with no
    /// logo, unresolved unless its episode tables live in that article.
    ///
    /// # Errors
    /// Fails when the franchise article cannot be fetched or has no series
    /// listing.
    pub async fn series_catalog(&self) -> Result<SeriesCatalog> {
        let html = self.client.fetch(&self.config.main_url).await?;
        let mut catalog = parse_series_index(&html, &self.config)?;
        info!(count = catalog.len(), "series listing parsed");

        for entry in catalog.values_mut() {
            self.enrich(entry).await;
        }

        Ok(catalog)
    }

    /// Fill in logo and episodes URL from the series article.
    ///
    /// Series whose article holds the episode tables keep that URL even when
    /// the article cannot be fetched; only the logo is lost.
    async fn enrich(&self, entry: &mut SeriesEntry) {
        match self.client.fetch(&entry.detail_url).await {
            Ok(html) => {
                entry.logo_url = parse_logo(&html, &self.config);
                entry.episodes_url = resolve_episodes_url(&entry.detail_url, &html, &self.config);
            }
            Err(err) => {
                warn!(series = %entry.name, url = %entry.detail_url, %err, "series article unavailable");
                entry.episodes_url = match route_for(&entry.detail_url, &self.config) {
                    LinkRoute::DetailPage => EpisodesUrl::Resolved(entry.detail_url.clone()),
                    LinkRoute::Headings(_) => EpisodesUrl::Unresolved,
                };
            }
        }

        if !entry.episodes_url.is_resolved() {
            warn!(series = %entry.name, "no episode list found");
        }
    }

    /// Resolve the episodes URL for a single series article.
    ///
    /// Series whose article holds the episode tables are resolved without a
    /// request.
    pub async fn resolve_episodes_url(&self, detail_url: &str) -> Result<EpisodesUrl> {
        if route_for(detail_url, &self.config) == LinkRoute::DetailPage {
            return Ok(EpisodesUrl::Resolved(detail_url.to_string()));
        }

        let html = self.client.fetch(detail_url).await?;
        Ok(resolve_episodes_url(detail_url, &html, &self.config))
    }

    /// Extract all seasons of a series.
    ///
    /// # Returns
    /// * `Ok(SeriesOutcome::Extracted)` with the seasons found
    /// * `Ok(SeriesOutcome::Skipped)` when the series has no episodes URL or
    ///   its page lacks the expected tables
    /// * `Err(TrekError)` when the episodes page cannot be fetched
    pub async fn series_episodes(&self, series: &SeriesEntry) -> Result<SeriesOutcome> {
        let Some(url) = series.episodes_url.as_url() else {
            return Ok(SeriesOutcome::Skipped {
                reason: "episodes URL unresolved".to_string(),
            });
        };

        info!(series = %series.name, url, "processing series");
        let html = self.client.fetch(url).await?;

        Ok(parse_series_episodes(&html, series, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(episodes_url: EpisodesUrl) -> SeriesEntry {
        SeriesEntry {
            name: "Voyager".to_string(),
            detail_url: "https://en.wikipedia.org/wiki/Star_Trek:_Voyager".to_string(),
            season_count: 7,
            episode_count: 172,
            episodes_url,
            air_date_range: "January 16, 1995 - May 23, 2001".to_string(),
            logo_url: String::new(),
        }
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = TrekScraper::new();
        assert!(scraper.is_ok());
    }

    #[tokio::test]
    async fn test_unresolved_series_is_skipped() {
        let scraper = TrekScraper::new().unwrap();
        let outcome = scraper.series_episodes(&entry(EpisodesUrl::Unresolved)).await.unwrap();
        assert_eq!(
            outcome,
            SeriesOutcome::Skipped {
                reason: "episodes URL unresolved".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_pending_series_is_skipped() {
        let scraper = TrekScraper::new().unwrap();
        let outcome = scraper.series_episodes(&entry(EpisodesUrl::Pending)).await.unwrap();
        assert!(matches!(outcome, SeriesOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_exception_series_resolves_without_fetch() {
        let scraper = TrekScraper::new().unwrap();
        let url = "https://en.wikipedia.org/wiki/Star_Trek:_Picard";
        let resolved = scraper.resolve_episodes_url(url).await.unwrap();
        assert_eq!(resolved, EpisodesUrl::Resolved(url.to_string()));
    }
}
