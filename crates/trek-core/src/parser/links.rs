//! Episode-list link resolution
//!
//! Most series articles point to a separate "List of ... episodes" page from
//! a hatnote under their Episodes heading. A few keep the episode tables in
//! the article itself, and one uses a lower heading level for that section.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::types::EpisodesUrl;

use super::dom::{first_link_href, next_in_document};

/// Fragment of a heading id marking an episodes section ("Episodes",
/// "Episode_list", "episodes_2")
const EPISODE_HEADING_ID: &str = "pisode";

/// How to find the episode tables for a series
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRoute {
    /// The article itself holds the tables
    DetailPage,
    /// Scan headings with this tag for the episodes section
    Headings(String),
}

/// Pick the route for a series by matching its article URL against the config.
pub fn route_for(detail_url: &str, config: &ExtractorConfig) -> LinkRoute {
    if config
        .exception_series
        .iter()
        .any(|name| detail_url.contains(name.as_str()))
    {
        return LinkRoute::DetailPage;
    }

    let tag = config
        .heading_routes
        .iter()
        .find(|route| detail_url.contains(route.pattern.as_str()))
        .map(|route| route.tag.clone())
        .unwrap_or_else(|| config.default_heading_tag.clone());

    LinkRoute::Headings(tag)
}

/// Find the episode-list link under the first episodes heading.
///
/// Matches headings whose own id, or the id of a `span.mw-headline` inside
/// them, mentions episodes. The next `div[role=note]` after that heading
/// supplies the link.
pub fn find_episode_list_link(document: &Html, heading_tag: &str, config: &ExtractorConfig) -> Option<String> {
    let heading_selector = match Selector::parse(heading_tag) {
        Ok(selector) => selector,
        Err(err) => {
            warn!(tag = heading_tag, ?err, "invalid heading tag in configuration");
            return None;
        }
    };
    let note_selector = Selector::parse(r#"div[role="note"]"#).ok()?;

    let heading = document
        .select(&heading_selector)
        .find(|heading| is_episode_heading(*heading))?;
    debug!(tag = heading_tag, id = ?heading_id(heading), "episodes heading found");

    let note = next_in_document(document, heading, &note_selector)?;
    let href = first_link_href(note)?;
    Some(config.absolute_url(&href))
}

/// Resolve where the episode tables of a series live.
///
/// `detail_html` is the series article at `detail_url`.
pub fn resolve_episodes_url(detail_url: &str, detail_html: &str, config: &ExtractorConfig) -> EpisodesUrl {
    match route_for(detail_url, config) {
        LinkRoute::DetailPage => EpisodesUrl::Resolved(detail_url.to_string()),
        LinkRoute::Headings(tag) => {
            let document = Html::parse_document(detail_html);
            find_episode_list_link(&document, &tag, config)
                .map(EpisodesUrl::Resolved)
                .unwrap_or(EpisodesUrl::Unresolved)
        }
    }
}

fn is_episode_heading(heading: ElementRef<'_>) -> bool {
    heading_id(heading).is_some_and(|id| id.contains(EPISODE_HEADING_ID))
}

/// Id of the heading, or of its legacy `mw-headline` span
fn heading_id(heading: ElementRef<'_>) -> Option<&str> {
    if let Some(id) = heading.value().id() {
        return Some(id);
    }
    let headline = Selector::parse("span.mw-headline[id]").ok()?;
    heading
        .select(&headline)
        .next()
        .and_then(|span| span.value().id())
}
