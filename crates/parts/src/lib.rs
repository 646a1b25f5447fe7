//! `partsapp-parts` — part lines and their fulfillment status.
//!
//! Classification and aggregation are pure functions computed on read; nothing
//! in this crate is persisted.

pub mod displayable;
pub mod line;
pub mod search;
pub mod sort;
pub mod status;
pub mod summary;

pub use displayable::{filter_displayable, is_displayable, SUBLET_CATEGORY};
pub use line::{PartLine, PartQuantities};
pub use search::{is_unordered, matches_query, SEARCH_LIMIT};
pub use sort::{sort_lines, PartSortField, SortDirection};
pub use status::{classify, PartState, StatusColor};
pub use summary::{aggregate, completion_percentage, StatusCount, StatusSummary};
