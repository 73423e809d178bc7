//! JSON output files

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use trek_core::SeriesEntry;

pub const CATALOG_FILE: &str = "star_trek_series_info.json";

/// Episode file name for the series at catalog `index`
pub fn episodes_file_name(index: u32, series: &SeriesEntry) -> String {
    format!("star_trek_series_{}_{}_episodes.json", index, series.slug())
}

/// Write `value` as pretty-printed JSON, replacing any existing file.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
