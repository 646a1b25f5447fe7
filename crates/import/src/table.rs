use std::collections::HashMap;

use csv::ReaderBuilder;

use crate::error::ImportError;
use crate::headers::{clean_field, known_header_matches, map_header, KNOWN_HEADERS};

/// Lines inspected when looking for the header row.
pub const HEADER_SCAN_LINES: usize = 20;

/// Known column names a line must mention to count as the header row.
pub const MIN_HEADER_MATCHES: usize = 3;

/// One data row keyed by mapped field name.
pub type RawRow = HashMap<String, String>;

/// Parsed extract: non-empty data rows plus per-row parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
    /// `"Row N: message"`, N counted from the first data row.
    pub parsing_errors: Vec<String>,
}

fn find_header_line(content: &str) -> Option<usize> {
    content
        .lines()
        .take(HEADER_SCAN_LINES)
        .position(|line| known_header_matches(line) >= MIN_HEADER_MATCHES)
}

/// Parse an extract exported by the shop system.
///
/// Exports often start with report titles and blank lines, so the header row
/// is located first and everything above it is discarded.
pub fn parse_csv(content: &str) -> Result<RawTable, ImportError> {
    let content = content.trim_start_matches('\u{feff}');
    let Some(header_index) = find_header_line(content) else {
        return Err(ImportError::NoHeaderRow {
            scanned: HEADER_SCAN_LINES,
            min: MIN_HEADER_MATCHES,
            expected: KNOWN_HEADERS.join(", "),
        });
    };
    tracing::debug!(line = header_index + 1, "found header row");

    let body: String = content
        .split_inclusive('\n')
        .skip(header_index)
        .collect();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let headers: Vec<Option<String>> = reader.headers()?.iter().map(map_header).collect();

    let mut table = RawTable::default();
    for (index, result) in reader.records().enumerate() {
        let row_number = index + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                table.parsing_errors.push(format!("Row {row_number}: {e}"));
                continue;
            }
        };

        let mut row = RawRow::new();
        for (key, value) in headers.iter().zip(record.iter()) {
            if let Some(key) = key {
                row.insert(key.clone(), clean_field(value));
            }
        }

        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        table.rows.push(row);
    }

    if !table.parsing_errors.is_empty() {
        tracing::warn!(
            count = table.parsing_errors.len(),
            errors = %table.parsing_errors.join("; "),
            "csv parsing had errors"
        );
    }

    Ok(table)
}
