/// Errors that can occur while loading a compound table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading the table file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// The file has no header row
    #[error("Table has no header row")]
    MissingHeader,

    /// One or more required columns are absent
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A row does not have one cell per column
    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        /// Zero-based row index
        row: usize,
        /// Number of cells in the row
        found: usize,
        /// Number of columns in the table
        expected: usize,
    },
}
