//! HTML parsers for Wikipedia pages
//!
//! - `series`: franchise listing and series logo
//! - `links`: where a series keeps its episode tables
//! - `seasons`: season overview and per-season consolidation
//! - `episodes`: episode table rows
//! - `header`, `reconcile`: column lookup and short-row recovery
//! - `sanitize`, `dom`: text and tree helpers shared by the above

pub mod dom;
pub mod episodes;
pub mod header;
pub mod links;
pub mod reconcile;
pub mod sanitize;
pub mod seasons;
pub mod series;

// Re-export main parsing functions
pub use episodes::{clean_title, extract_episodes, extract_episodes_from_rows, RawRow, TableContext};
pub use header::{Field, HeaderIndex};
pub use links::{find_episode_list_link, resolve_episodes_url, route_for, LinkRoute};
pub use reconcile::{reconcile, RecoveryRule, RecoveryTable, RowCell};
pub use sanitize::{sanitize, SanitizeOptions};
pub use seasons::{consolidate, extract_seasons, parse_series_episodes};
pub use series::{normalize_date_range, parse_logo, parse_series_index};
