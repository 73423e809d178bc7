//! Document traversal helpers shared by the parsers
//!
//! CSS selectors cover "everything below this element". The source pages also
//! need "the next table after this heading", which crosses out of the
//! heading's subtree, so that walk is done over the node tree in document
//! order.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, TrekError};

/// Parse a CSS selector, reporting failures as `ParseError`.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| TrekError::ParseError(format!("Invalid selector {css:?}: {e:?}")))
}

/// Element whose `id` attribute equals `id` exactly.
///
/// Ids on these pages contain parentheses and dashes, so they are compared
/// directly instead of going through a `#id` selector.
pub fn find_by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(id))
}

/// First element after `start` in document order that matches `selector`.
///
/// Elements inside `start` count as "after" it.
pub fn next_in_document<'a>(
    document: &'a Html,
    start: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .skip_while(|node| node.id() != start.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| selector.matches(el))
}

/// Direct child elements with tag `name`
pub fn child_elements<'a>(
    element: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Rows of `table`, ignoring any nested tables.
pub fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(child_elements(child, "tr")),
            _ => {}
        }
    }
    rows
}

/// Text content with text nodes separated by spaces.
///
/// `<br>` separated parts ("No.<br>overall") would otherwise run together.
/// Callers collapse the extra whitespace when sanitizing.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// `href` of the first link inside `element`
pub fn first_link_href(element: ElementRef<'_>) -> Option<String> {
    let link_selector = Selector::parse("a[href]").ok()?;
    element
        .select(&link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}
