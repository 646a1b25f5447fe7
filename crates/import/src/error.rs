use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(
        "no header row found in first {scanned} lines of CSV; expected a row with at least {min} of these column names: {expected}"
    )]
    NoHeaderRow {
        scanned: usize,
        min: usize,
        expected: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
