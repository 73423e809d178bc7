//! Series listing parser
//!
//! The franchise article lists every television series in the first table
//! after its "Television" heading: a row header linking to the series
//! article, then season count, episode count and the air-date range.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::error::{Result, TrekError};
use crate::types::{EpisodesUrl, SeriesCatalog, SeriesEntry};

use super::dom::{child_elements, element_text, find_by_id, next_in_document, selector, table_rows};
use super::sanitize::{sanitize, SanitizeOptions};

/// Rows at the top of the listing table that are headings
const LISTING_HEADER_ROWS: usize = 1;

/// Parse the franchise listing into a catalog keyed from 1 in listing order.
///
/// Rows that do not look like a series (no linked row header, missing cells,
/// unreadable season count) are logged and left out; numbering continues
/// with the next good row.
///
/// # Errors
/// `StructuralNotFound` when the section heading or its table is missing.
pub fn parse_series_index(html: &str, config: &ExtractorConfig) -> Result<SeriesCatalog> {
    let document = Html::parse_document(html);

    let section = find_by_id(&document, &config.index_section_id).ok_or_else(|| {
        TrekError::StructuralNotFound(format!("'{}' section", config.index_section_id))
    })?;
    let table_selector = selector("table")?;
    let table = next_in_document(&document, section, &table_selector).ok_or_else(|| {
        TrekError::StructuralNotFound(format!("series table after '{}'", config.index_section_id))
    })?;

    let mut catalog = SeriesCatalog::new();
    for (i, row) in table_rows(table).into_iter().enumerate().skip(LISTING_HEADER_ROWS) {
        match parse_series_row(row, config) {
            Some(entry) => {
                let index = catalog.len() as u32 + 1;
                debug!(index, series = %entry.name, "series listed");
                catalog.insert(index, entry);
            }
            None => warn!(row = i + 1, "listing row is not a series, skipped"),
        }
    }

    Ok(catalog)
}

fn parse_series_row(row: ElementRef<'_>, config: &ExtractorConfig) -> Option<SeriesEntry> {
    let header = child_elements(row, "th").next()?;
    let link_selector = Selector::parse("a[href]").ok()?;
    let link = header.select(&link_selector).next()?;

    let name = sanitize(&element_text(link), SanitizeOptions::default());
    let detail_url = config.absolute_url(link.value().attr("href")?);

    let cells: Vec<String> = child_elements(row, "td").map(element_text).collect();
    if cells.len() < 3 {
        return None;
    }

    let reported = parse_count(&cells[0])?;
    let season_count = config.overrides.season_count(&name, reported);
    if season_count != reported {
        debug!(series = %name, reported, corrected = season_count, "season count overridden");
    }

    let episode_count = parse_count(&cells[1]).unwrap_or_else(|| {
        warn!(series = %name, text = %cells[1], "unreadable episode count, using 0");
        0
    });

    Some(SeriesEntry {
        name,
        detail_url,
        season_count,
        episode_count,
        episodes_url: EpisodesUrl::Pending,
        air_date_range: normalize_date_range(&cells[2]),
        logo_url: String::new(),
    })
}

fn parse_count(text: &str) -> Option<u32> {
    sanitize(text, SanitizeOptions::BRACKETS).parse().ok()
}

/// Keep the part before any parenthetical and turn the en dash into a hyphen.
pub fn normalize_date_range(text: &str) -> String {
    let range = text.split('(').next().unwrap_or_default().replace('\u{2013}', "-");
    sanitize(&range, SanitizeOptions::default())
}

/// Primary image of the article's info panel, or `""` when it has none.
pub fn parse_logo(html: &str, config: &ExtractorConfig) -> String {
    let document = Html::parse_document(html);
    let Ok(image_selector) = Selector::parse("td.infobox-image img[src]") else {
        return String::new();
    };

    document
        .select(&image_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| config.absolute_url(src))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <div class="mw-heading mw-heading2"><h2 id="Film">Film</h2></div>
        <p>Films.</p>
        <div class="mw-heading mw-heading2"><h2 id="Television">Television</h2></div>
        <table class="wikitable plainrowheaders">
            <tbody>
            <tr><th>Series</th><th>Seasons</th><th>Episodes</th><th>Originally released</th></tr>
            <tr><th scope="row"><i><a href="/wiki/Star_Trek:_The_Original_Series">The Original Series</a></i></th>
                <td>3</td><td>79</td><td>September 8, 1966&#160;– June 3, 1969 (NBC)</td></tr>
            <tr><th scope="row">Unlinked row</th><td>1</td><td>1</td><td>2000</td></tr>
            <tr><th scope="row"><i><a href="/wiki/Star_Trek:_Lower_Decks">Lower Decks</a></i></th>
                <td>2<sup>[a]</sup></td><td>50</td><td>August 6, 2020 – present</td></tr>
            </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_series_index() {
        let catalog = parse_series_index(LISTING, &ExtractorConfig::default()).unwrap();
        assert_eq!(catalog.len(), 2);

        let tos = &catalog[&1];
        assert_eq!(tos.name, "The Original Series");
        assert_eq!(
            tos.detail_url,
            "https://en.wikipedia.org/wiki/Star_Trek:_The_Original_Series"
        );
        assert_eq!(tos.season_count, 3);
        assert_eq!(tos.episode_count, 79);
        assert_eq!(tos.air_date_range, "September 8, 1966 - June 3, 1969");
        assert_eq!(tos.episodes_url, EpisodesUrl::Pending);
    }

    #[test]
    fn test_season_count_correction() {
        let catalog = parse_series_index(LISTING, &ExtractorConfig::default()).unwrap();
        let lower_decks = &catalog[&2];
        assert_eq!(lower_decks.name, "Lower Decks");
        assert_eq!(lower_decks.season_count, 3);
        assert_eq!(lower_decks.air_date_range, "August 6, 2020 - present");
    }

    #[test]
    fn test_missing_section() {
        let result = parse_series_index("<html><body><table></table></body></html>", &ExtractorConfig::default());
        assert!(matches!(result, Err(TrekError::StructuralNotFound(_))));
    }

    #[test]
    fn test_normalize_date_range() {
        assert_eq!(
            normalize_date_range("January 16, 1995 \u{2013} May 23, 2001 (UPN)"),
            "January 16, 1995 - May 23, 2001"
        );
        assert_eq!(normalize_date_range("2017\u{2013}2024"), "2017-2024");
    }

    #[test]
    fn test_parse_logo() {
        let html = r#"<html><body><table class="infobox"><tbody>
            <tr><td class="infobox-image"><span><img src="//upload.wikimedia.org/logo.svg.png"></span></td></tr>
            </tbody></table></body></html>"#;
        assert_eq!(
            parse_logo(html, &ExtractorConfig::default()),
            "https://upload.wikimedia.org/logo.svg.png"
        );
    }

    #[test]
    fn test_parse_logo_missing() {
        let html = r#"<html><body><table class="infobox"><tr><td>No image</td></tr></table></body></html>"#;
        assert_eq!(parse_logo(html, &ExtractorConfig::default()), "");
    }
}
