use trek_core::{SeriesOutcome, TrekScraper};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = TrekScraper::new()?;

    println!("Reading the series listing...\n");
    let catalog = scraper.series_catalog().await?;

    for (index, series) in &catalog {
        println!(
            "  {}. {} - {} seasons, {} episodes ({})",
            index, series.name, series.season_count, series.episode_count, series.air_date_range
        );
        match series.episodes_url.as_url() {
            Some(url) => println!("     episodes: {}", url),
            None => println!("     episodes: unresolved"),
        }
    }

    // First series with a resolved episode list
    let Some(series) = catalog.values().find(|s| s.episodes_url.is_resolved()) else {
        println!("\nNo series has a resolved episode list.");
        return Ok(());
    };

    println!("\nExtracting {}...\n", series.name);
    match scraper.series_episodes(series).await? {
        SeriesOutcome::Extracted(episodes) => {
            for (number, season) in &episodes.seasons {
                println!(
                    "  Season {}: {} episodes, {} to {}",
                    number, season.total_episodes, season.season_start, season.season_end
                );
                for ep in season.episodes.iter().take(3) {
                    println!("    {} {} [{}]", ep.overall_number, ep.title, ep.air_date);
                }
            }
        }
        SeriesOutcome::Skipped { reason } => println!("  skipped: {}", reason),
    }

    Ok(())
}
