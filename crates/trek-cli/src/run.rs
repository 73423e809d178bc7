//! Catalog and per-series extraction run

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};
use trek_core::{SeriesCatalog, SeriesOutcome, TrekScraper};

use crate::cli::Cli;
use crate::output;

/// Series counts by outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Write the catalog, then the episode file of every selected series.
pub async fn run(scraper: &TrekScraper, cli: &Cli) -> Result<RunSummary> {
    std::fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("Failed to create {}", cli.output_dir.display()))?;

    let catalog = scraper.series_catalog().await.context("Failed to build the series catalog")?;
    let catalog_path = cli.output_dir.join(output::CATALOG_FILE);
    output::save_json(&catalog_path, &catalog)?;
    info!(series = catalog.len(), path = %catalog_path.display(), "catalog written");

    if cli.catalog_only {
        return Ok(RunSummary::default());
    }

    extract_all(scraper, &catalog, &cli.output_dir, |index| cli.selects(index)).await
}

/// Extract the selected series one after another.
///
/// Only extracted series get a file. Skipped and failed series are logged
/// and the run moves on; a file that cannot be written stops it.
pub async fn extract_all<F>(
    scraper: &TrekScraper,
    catalog: &SeriesCatalog,
    output_dir: &Path,
    selects: F,
) -> Result<RunSummary>
where
    F: Fn(u32) -> bool,
{
    let mut summary = RunSummary::default();

    for (&index, series) in catalog {
        if !selects(index) {
            continue;
        }

        match scraper.series_episodes(series).await {
            Ok(SeriesOutcome::Extracted(episodes)) => {
                let path = output_dir.join(output::episodes_file_name(index, series));
                output::save_json(&path, &episodes)?;
                info!(
                    series = %series.name,
                    seasons = episodes.seasons.len(),
                    path = %path.display(),
                    "episodes written"
                );
                summary.extracted += 1;
            }
            Ok(SeriesOutcome::Skipped { reason }) => {
                warn!(series = %series.name, %reason, "series skipped");
                summary.skipped += 1;
            }
            Err(err) => {
                error!(series = %series.name, %err, "series failed");
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;
    use trek_core::{ClientConfig, ExtractorConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING: &str = r#"<html><body>
        <h2 id="Television">Television</h2>
        <table class="wikitable plainrowheaders"><tbody>
        <tr><th>Series</th><th>Seasons</th><th>Episodes</th><th>Originally released</th></tr>
        <tr><th><a href="/wiki/Voyager">Voyager</a></th><td>1</td><td>1</td><td>January 16, 1995 &#8211; May 22, 1995</td></tr>
        <tr><th><a href="/wiki/Enterprise">Enterprise</a></th><td>4</td><td>97</td><td>2001 &#8211; 2005</td></tr>
        <tr><th><a href="/wiki/Discovery">Discovery</a></th><td>5</td><td>65</td><td>2017 &#8211; 2024</td></tr>
        </tbody></table>
        </body></html>"#;

    const VOYAGER_EPISODES: &str = r##"<html><body>
        <table class="wikitable plainrowheaders"><tbody>
        <tr><th>Season</th><th>Episodes</th><th colspan="2">Originally released</th></tr>
        <tr><th>First released</th><th>Last released</th></tr>
        <tr><th><a href="#Season_1">1</a></th><td>1</td><td>January 16, 1995</td><td>May 22, 1995</td></tr>
        </tbody></table>
        <h3 id="Season_1">Season 1</h3>
        <table class="wikitable plainrowheaders wikiepisodetable"><tbody>
        <tr><th>No. overall</th><th>No. in season</th><th>Title</th><th>Directed by</th><th>Original air date</th></tr>
        <tr><th>1</th><td>1</td><td>"Caretaker"</td><td>Winrich Kolbe</td><td>January 16, 1995</td></tr>
        </tbody></table>
        </body></html>"##;

    fn detail_page(list: &str) -> String {
        format!(
            r#"<html><body><h2 id="Episodes">Episodes</h2>
            <div role="note"><a href="/wiki/{list}">List of episodes</a></div></body></html>"#
        )
    }

    async fn mount(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Voyager extracts, Enterprise's list page is missing, Discovery's has no tables.
    async fn scraper_for(server: &MockServer) -> TrekScraper {
        mount(server, "/wiki/Star_Trek", LISTING).await;
        mount(server, "/wiki/Voyager", &detail_page("List_of_Voyager_episodes")).await;
        mount(server, "/wiki/Enterprise", &detail_page("List_of_Enterprise_episodes")).await;
        mount(server, "/wiki/Discovery", &detail_page("List_of_Discovery_episodes")).await;
        mount(server, "/wiki/List_of_Voyager_episodes", VOYAGER_EPISODES).await;
        mount(server, "/wiki/List_of_Discovery_episodes", "<html><body><p>Soon.</p></body></html>").await;

        let config = ExtractorConfig {
            main_url: format!("{}/wiki/Star_Trek", server.uri()),
            site_origin: server.uri(),
            exception_series: Vec::new(),
            heading_routes: Vec::new(),
            ..ExtractorConfig::default()
        };
        let client = ClientConfig {
            requests_per_second: 100.0,
            ..ClientConfig::default()
        };
        TrekScraper::with_config(client, config).unwrap()
    }

    fn cli(output_dir: &Path, extra: &[&str]) -> Cli {
        let mut args = vec!["trekpedia", "--output-dir", output_dir.to_str().unwrap()];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    fn written_files(dir: &Path) -> Vec<String> {
        let mut files: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        files
    }

    #[tokio::test]
    async fn test_run_writes_only_extracted_series() {
        let server = MockServer::start().await;
        let scraper = scraper_for(&server).await;
        let temp_dir = TempDir::new().unwrap();

        let summary = run(&scraper, &cli(temp_dir.path(), &[])).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                extracted: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(
            written_files(temp_dir.path()),
            vec![
                "star_trek_series_1_voyager_episodes.json".to_string(),
                output::CATALOG_FILE.to_string(),
            ]
        );

        let episodes: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(temp_dir.path().join("star_trek_series_1_voyager_episodes.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(episodes["seasons"]["1"]["episodes"][0]["title"], "Caretaker");
    }

    #[tokio::test]
    async fn test_catalog_only_writes_catalog() {
        let server = MockServer::start().await;
        let scraper = scraper_for(&server).await;
        let temp_dir = TempDir::new().unwrap();

        let summary = run(&scraper, &cli(temp_dir.path(), &["--catalog-only"])).await.unwrap();

        assert_eq!(summary, RunSummary::default());
        assert_eq!(written_files(temp_dir.path()), vec![output::CATALOG_FILE.to_string()]);
    }

    #[tokio::test]
    async fn test_selection_reaches_the_loop() {
        let server = MockServer::start().await;
        let scraper = scraper_for(&server).await;
        let temp_dir = TempDir::new().unwrap();

        let summary = run(&scraper, &cli(temp_dir.path(), &["--only", "1", "--only", "2", "--skip", "1"]))
            .await
            .unwrap();

        assert_eq!(
            summary,
            RunSummary {
                extracted: 0,
                skipped: 0,
                failed: 1
            }
        );
        assert_eq!(written_files(temp_dir.path()), vec![output::CATALOG_FILE.to_string()]);
    }
}
