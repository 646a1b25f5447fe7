//! `partsapp-import` — CSV extracts from the shop management system.
//!
//! Parsing is lenient: malformed rows are counted and skipped, never fatal.
//! The only hard failure is a file with no recognizable header row.

pub mod error;
pub mod headers;
pub mod materials;
pub mod rows;
pub mod table;
pub mod values;

pub use error::ImportError;
pub use headers::{clean_field, map_header, KNOWN_HEADERS};
pub use materials::parse_materials_csv;
pub use rows::{
    import_part_lines, import_repair_orders, import_vendors, ImportBatch, ImportSummary,
};
pub use table::{parse_csv, RawRow, RawTable, HEADER_SCAN_LINES, MIN_HEADER_MATCHES};
pub use values::{parse_bool, parse_date, parse_number, parse_quantity};
