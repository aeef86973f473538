use thiserror::Error;

/// Errors that prevent the dataset from being served at all.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the file
    #[error("CSV error: {0}")]
    Csv(#[from] polars::error::PolarsError),

    /// One or more expected columns are absent
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A Value cell is empty, negative or not an integer
    #[error("Invalid Value {value:?} at row {row}")]
    InvalidValue { row: usize, value: String },
}

/// Type alias for Result with LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
