//! Season overview parser and consolidation
//!
//! A series' episode page opens with an overview table, one row per season,
//! whose row headers link to the season's episode table. Each season is built
//! from its overview row plus the episodes parsed from the linked table.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use crate::config::{ExtractorConfig, Overrides};
use crate::error::{Result, TrekError};
use crate::types::{EpisodeEntry, SeasonEntry, SeriesEntry, SeriesEpisodes, SeriesOutcome};

use super::dom::{child_elements, element_text, first_link_href, selector, table_rows};
use super::episodes::{extract_episodes, find_episode_table, TableContext};
use super::sanitize::{sanitize, SanitizeOptions};

/// Overview tables carry exactly these classes; episode tables add more
const OVERVIEW_TABLE: &str = "table.wikitable.plainrowheaders:not(.wikiepisodetable)";

/// Header rows at the top of an overview table
const OVERVIEW_HEADER_ROWS: usize = 2;

/// Anchor of the single episode table on one-season pages
const SINGLE_SEASON_ANCHOR: &str = "Episodes";

/// One season row of an overview table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewRow {
    pub season_number: u32,
    /// Id of the element preceding the season's episode table
    pub anchor: String,
    /// Data cell texts (episode total, first and last air date)
    pub cells: Vec<String>,
}

/// Build a season record from its overview cells and parsed episodes.
///
/// One overview layout puts an extra numeric cell before the dates; when the
/// second cell parses as an integer every date column is read one further
/// right. Configured season-end corrections are applied last.
pub fn consolidate(
    overview_cells: &[String],
    episodes: Vec<EpisodeEntry>,
    season_number: u32,
    series_name: &str,
    overrides: &Overrides,
) -> SeasonEntry {
    let offset = match overview_cells.get(1) {
        Some(cell) if cell.trim().parse::<i64>().is_ok() => 1,
        _ => 0,
    };

    let cell = |pos: usize| {
        overview_cells
            .get(pos)
            .map(|text| sanitize(text, SanitizeOptions::BRACKETS))
            .unwrap_or_default()
    };

    let season_end = match overrides.season_end(series_name, season_number) {
        Some(corrected) => {
            debug!(series = series_name, season = season_number, "season end overridden");
            corrected.to_string()
        }
        None => cell(2 + offset),
    };

    SeasonEntry {
        total_episodes: cell(0),
        season_start: cell(1 + offset),
        season_end,
        episodes,
    }
}

/// Rows of the overview table below its header rows
pub fn overview_rows(document: &Html) -> Result<Option<Vec<ElementRef<'_>>>> {
    let table_selector = selector(OVERVIEW_TABLE)?;
    Ok(document
        .select(&table_selector)
        .next()
        .map(|table| table_rows(table).into_iter().skip(OVERVIEW_HEADER_ROWS).collect()))
}

/// Read a season row; `None` when its header is missing, unlinked or not numeric.
pub fn read_overview_row(row: ElementRef<'_>) -> Option<OverviewRow> {
    let header = child_elements(row, "th").next()?;
    let href = first_link_href(header)?;
    let fragment = href.strip_prefix('#').filter(|f| !f.starts_with("cite_note"))?;
    let anchor = urlencoding::decode(fragment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| fragment.to_string());

    let season_number = sanitize(&element_text(header), SanitizeOptions::BRACKETS)
        .parse()
        .ok()?;

    let cells = child_elements(row, "td").map(element_text).collect();

    Some(OverviewRow {
        season_number,
        anchor,
        cells,
    })
}

/// Extract every season of `series` from its episode page.
///
/// # Errors
/// `StructuralNotFound` when the page has no overview table (and the series
/// is not a single-season one) or a season's episode table is missing. Either
/// way the series as a whole is abandoned.
pub fn extract_seasons(document: &Html, series: &SeriesEntry, config: &ExtractorConfig) -> Result<SeriesEpisodes> {
    let Some(rows) = overview_rows(document)? else {
        if series.season_count == 1 {
            return single_season(document, series, config);
        }
        return Err(TrekError::StructuralNotFound("season overview table".to_string()));
    };

    let mut seasons = BTreeMap::new();

    for (i, row) in rows.into_iter().enumerate() {
        let Some(overview) = read_overview_row(row) else {
            warn!(series = %series.name, row = i + 1, "overview row without a linked season number, skipped");
            continue;
        };

        // seasons still in production are listed before they are counted
        if overview.season_number > series.season_count {
            info!(
                series = %series.name,
                season = overview.season_number,
                season_count = series.season_count,
                "season beyond declared count, stopping"
            );
            break;
        }

        let table = find_episode_table(document, &overview.anchor).ok_or_else(|| {
            TrekError::StructuralNotFound(format!(
                "episode table '{}' for season {}",
                overview.anchor, overview.season_number
            ))
        })?;

        info!(
            series = %series.name,
            "processing season {} of {}",
            overview.season_number,
            series.season_count
        );

        let ctx = TableContext {
            config,
            series: &series.name,
            season: overview.season_number,
        };
        let episodes = extract_episodes(&table, ctx);

        seasons.insert(
            overview.season_number,
            consolidate(
                &overview.cells,
                episodes,
                overview.season_number,
                &series.name,
                &config.overrides,
            ),
        );
    }

    Ok(SeriesEpisodes { seasons })
}

/// One-season pages have no overview; totals and dates come from the catalog.
fn single_season(document: &Html, series: &SeriesEntry, config: &ExtractorConfig) -> Result<SeriesEpisodes> {
    let table = find_episode_table(document, SINGLE_SEASON_ANCHOR)
        .ok_or_else(|| TrekError::StructuralNotFound("single-season episode table".to_string()))?;

    info!(series = %series.name, "processing season 1 of 1");

    let ctx = TableContext {
        config,
        series: &series.name,
        season: 1,
    };
    let episodes = extract_episodes(&table, ctx);

    let mut dates = series.air_date_range.splitn(2, '-').map(str::trim);
    let season = SeasonEntry {
        total_episodes: series.episode_count.to_string(),
        season_start: dates.next().unwrap_or_default().to_string(),
        season_end: dates.next().unwrap_or_default().to_string(),
        episodes,
    };

    Ok(SeriesEpisodes {
        seasons: BTreeMap::from([(1, season)]),
    })
}

/// Parse an episode page into an outcome for `series`.
///
/// Missing structure and pages that yield no seasons are reported as
/// `Skipped` rather than as errors.
pub fn parse_series_episodes(html: &str, series: &SeriesEntry, config: &ExtractorConfig) -> SeriesOutcome {
    let document = Html::parse_document(html);

    match extract_seasons(&document, series, config) {
        Ok(episodes) if episodes.seasons.is_empty() => SeriesOutcome::Skipped {
            reason: "no season rows could be read".to_string(),
        },
        Ok(episodes) => SeriesOutcome::Extracted(episodes),
        Err(err) => SeriesOutcome::Skipped {
            reason: err.to_string(),
        },
    }
}
