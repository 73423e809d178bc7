//! Recovery of collapsed multi-part rows
//!
//! When two episodes form one broadcast unit, table authors often span the
//! shared cells (title, director, air date) over both rows, so the second row
//! arrives with fewer cells than the header. The recovery table maps the number
//! of cells actually present to the fields that must be carried forward from
//! the previous episode.
//!
//! The table reflects layouts seen on the source pages so far. Rows whose shape
//! is not in the table come back as [`TrekError::Unreconciled`] instead of being
//! guessed at.

use serde::Deserialize;

use crate::error::{Result, TrekError};
use crate::types::EpisodeEntry;

use super::header::{Field, HeaderIndex};

/// Text and first hyperlink of one data cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCell {
    pub text: String,
    pub href: Option<String>,
}

impl RowCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: None,
        }
    }

    pub fn with_href(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: Some(href.into()),
        }
    }
}

/// Which fields a short row is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryRule {
    /// Only the season number is present
    SeasonNumberOnly,
    /// Title and director are spanned, the air date cell is real
    KeepAirDate,
    /// Only the title is spanned
    TitleOnly,
}

impl RecoveryRule {
    /// Fields copied from the previous episode
    pub fn synthesized(self) -> &'static [Field] {
        match self {
            RecoveryRule::SeasonNumberOnly => &[Field::Title, Field::DirectedBy, Field::AirDate],
            RecoveryRule::KeepAirDate => &[Field::Title, Field::DirectedBy],
            RecoveryRule::TitleOnly => &[Field::Title],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RecoveryEntry {
    /// Number of data cells present in the short row
    pub cells: usize,
    pub rule: RecoveryRule,
}

/// Cell count → recovery rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecoveryTable {
    pub rules: Vec<RecoveryEntry>,
}

impl Default for RecoveryTable {
    fn default() -> Self {
        let entry = |cells, rule| RecoveryEntry { cells, rule };
        Self {
            rules: vec![
                entry(1, RecoveryRule::SeasonNumberOnly),
                entry(2, RecoveryRule::KeepAirDate),
                entry(3, RecoveryRule::KeepAirDate),
                entry(4, RecoveryRule::TitleOnly),
            ],
        }
    }
}

impl RecoveryTable {
    pub fn rule_for(&self, cells: usize) -> Option<RecoveryRule> {
        self.rules.iter().find(|e| e.cells == cells).map(|e| e.rule)
    }
}

/// Data cells laid out on header positions.
///
/// A slot is empty when the row had no cell for that column, which readers
/// treat the same as reading past the end of the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledRow {
    slots: Vec<Option<RowCell>>,
}

impl ReconciledRow {
    /// A row whose cells line up with the header as they are
    pub fn direct(cells: Vec<RowCell>) -> Self {
        Self {
            slots: cells.into_iter().map(Some).collect(),
        }
    }

    pub fn get(&self, pos: usize) -> Option<&RowCell> {
        self.slots.get(pos).and_then(Option::as_ref)
    }

    /// Last filled slot
    pub fn last(&self) -> Option<&RowCell> {
        self.slots.iter().rev().find_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Line `cells` up with `header`, rebuilding collapsed rows from `previous`.
///
/// Full rows pass through unchanged. For short rows the matching rule's fields
/// are filled from the previous episode at their header positions, and the
/// present cells take the remaining positions left to right.
///
/// # Errors
/// `TrekError::Unreconciled` when the row is longer than the header, its cell
/// count has no rule, there is no previous episode, or the present cells do not
/// fit the positions the rule leaves open.
pub fn reconcile(
    cells: Vec<RowCell>,
    header: &HeaderIndex,
    previous: Option<&EpisodeEntry>,
    table: &RecoveryTable,
) -> Result<ReconciledRow> {
    let width = header.len();
    if cells.len() == width {
        return Ok(ReconciledRow::direct(cells));
    }

    let unreconciled = TrekError::Unreconciled {
        cells: cells.len(),
        headers: width,
    };

    if cells.len() > width {
        return Err(unreconciled);
    }
    let Some(rule) = table.rule_for(cells.len()) else {
        return Err(unreconciled);
    };
    let Some(previous) = previous else {
        return Err(unreconciled);
    };

    let mut slots: Vec<Option<RowCell>> = vec![None; width];
    for &field in rule.synthesized() {
        let pos = match field {
            Field::AirDate => Some(header.air_date_position()),
            _ => header.resolve(field).ok(),
        };
        if let Some(pos) = pos.filter(|&p| p < width) {
            slots[pos] = Some(RowCell::new(carried_value(previous, field)));
        }
    }

    let open: Vec<usize> = (0..width).filter(|&p| slots[p].is_none()).collect();
    if cells.len() > open.len() {
        return Err(unreconciled);
    }

    for (pos, cell) in open.into_iter().zip(cells) {
        slots[pos] = Some(cell);
    }

    Ok(ReconciledRow { slots })
}

fn carried_value(previous: &EpisodeEntry, field: Field) -> &str {
    match field {
        Field::SeasonNumber => &previous.season_number,
        Field::Title => &previous.title,
        Field::DirectedBy => &previous.director,
        Field::AirDate => &previous.air_date,
    }
}
