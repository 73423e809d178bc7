//! Episode table parser
//!
//! Each season's episode table sits after an anchor whose id the overview
//! table links to. The first row holds the column headings; every following
//! row with a row-label cell is one episode.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::types::EpisodeEntry;

use super::dom::{child_elements, element_text, find_by_id, first_link_href, next_in_document, table_rows};
use super::header::{Field, HeaderIndex};
use super::reconcile::{reconcile, ReconciledRow, RowCell};
use super::sanitize::{sanitize, SanitizeOptions};

/// Characters stripped from titles
const QUOTES: [char; 3] = ['"', '\u{201c}', '\u{201d}'];

/// Where the rows being parsed come from, for log context
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    pub config: &'a ExtractorConfig,
    pub series: &'a str,
    pub season: u32,
}

/// One table row before field mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Text of the row-label (`th`) cell; `None` when the row has none
    pub label: Option<String>,
    /// Data (`td`) cells in order
    pub cells: Vec<RowCell>,
}

impl RawRow {
    pub fn new(label: Option<&str>, cells: Vec<RowCell>) -> Self {
        Self {
            label: label.map(str::to_string),
            cells,
        }
    }
}

/// Rows of the first table following the element with id `anchor`.
pub fn find_episode_table<'a>(document: &'a Html, anchor: &str) -> Option<Vec<ElementRef<'a>>> {
    let start = find_by_id(document, anchor)?;
    let table_selector = Selector::parse("table").ok()?;
    let table = next_in_document(document, start, &table_selector)?;
    Some(table_rows(table))
}

/// Split a `tr` into its row-label text and data cells.
pub fn read_row(row: ElementRef<'_>) -> RawRow {
    let label = child_elements(row, "th").next().map(element_text);
    let cells = child_elements(row, "td")
        .map(|td| RowCell {
            text: element_text(td),
            href: first_link_href(td),
        })
        .collect();
    RawRow { label, cells }
}

/// Heading labels of a header row
pub fn header_labels(row: ElementRef<'_>) -> Vec<String> {
    child_elements(row, "th").map(element_text).collect()
}

/// Parse every episode of a table given as its rows, header row first.
pub fn extract_episodes(rows: &[ElementRef<'_>], ctx: TableContext<'_>) -> Vec<EpisodeEntry> {
    let Some((head, body)) = rows.split_first() else {
        warn!(series = ctx.series, season = ctx.season, "episode table has no rows");
        return Vec::new();
    };

    let labels = header_labels(*head);
    let raw_rows = body.iter().map(|row| read_row(*row)).collect();
    extract_episodes_from_rows(&labels, raw_rows, ctx)
}

/// Map rows to episodes through a header index built from `labels`.
///
/// Rows without a row label are summaries and are skipped, as are rows whose
/// label holds no text. Short rows go through the recovery table; rows it
/// cannot place are logged for review and dropped.
pub fn extract_episodes_from_rows<S: AsRef<str>>(
    labels: &[S],
    rows: Vec<RawRow>,
    ctx: TableContext<'_>,
) -> Vec<EpisodeEntry> {
    let header = HeaderIndex::build_with_patterns(labels, &ctx.config.air_date_patterns);
    debug!(series = ctx.series, season = ctx.season, headers = ?header.keys(), "episode table header");

    for field in [Field::Title, Field::DirectedBy] {
        if let Err(err) = header.resolve(field) {
            warn!(series = ctx.series, season = ctx.season, %err, "column missing, field left empty");
        }
    }

    let mut episodes: Vec<EpisodeEntry> = Vec::new();

    for (i, row) in rows.into_iter().enumerate() {
        let row_number = i + 1;

        let Some(label) = row.label else {
            debug!(series = ctx.series, season = ctx.season, row = row_number, "skipping summary row");
            continue;
        };

        let overall_number = sanitize(&label, SanitizeOptions::BRACKETS);
        if overall_number.is_empty() {
            warn!(series = ctx.series, season = ctx.season, row = row_number, "row label has no text, row dropped");
            continue;
        }

        let reconciled = match reconcile(row.cells, &header, episodes.last(), &ctx.config.recovery) {
            Ok(reconciled) => reconciled,
            Err(err) => {
                warn!(
                    series = ctx.series,
                    season = ctx.season,
                    row = row_number,
                    episode = %overall_number,
                    %err,
                    "row needs manual review, dropped"
                );
                continue;
            }
        };

        let episode = build_episode(overall_number, &reconciled, &header, episodes.last(), ctx.config);
        episodes.push(episode);
    }

    episodes
}

fn build_episode(
    overall_number: String,
    row: &ReconciledRow,
    header: &HeaderIndex,
    previous: Option<&EpisodeEntry>,
    config: &ExtractorConfig,
) -> EpisodeEntry {
    let cell = |field: Field| header.resolve(field).ok().and_then(|pos| row.get(pos));

    let season_number = cell(Field::SeasonNumber)
        .map(|c| sanitize(&c.text, SanitizeOptions::BRACKETS))
        .unwrap_or_else(|| overall_number.clone());

    let title_cell = cell(Field::Title);
    let title = title_cell.map(|c| clean_title(&c.text)).unwrap_or_default();

    let link = match title_cell.and_then(|c| c.href.as_deref()).filter(|href| !is_citation(href)) {
        Some(href) => config.absolute_url(href),
        None => match previous {
            // multi-part episodes link only their first part
            Some(prev) if !title.is_empty() && prev.title == title => prev.link.clone(),
            _ => String::new(),
        },
    };

    let director = cell(Field::DirectedBy)
        .map(|c| sanitize(&c.text, SanitizeOptions::BRACKETS))
        .unwrap_or_default();

    let air_date = row
        .get(header.air_date_position())
        .or_else(|| row.last())
        .map(|c| sanitize(&c.text, SanitizeOptions::BRACKETS))
        .unwrap_or_default();

    EpisodeEntry {
        overall_number,
        season_number,
        title,
        link,
        director,
        air_date,
    }
}

/// Title text without quote characters or footnote markers.
pub fn clean_title(text: &str) -> String {
    sanitize(&text.replace(QUOTES, ""), SanitizeOptions::BRACKETS)
}

/// Links that land on the page's own footnotes rather than an article
fn is_citation(href: &str) -> bool {
    href.starts_with('#') || href.contains("cite_note")
}
