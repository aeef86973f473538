use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from Polars Series operations
    #[error("Series error: {0}")]
    Series(String),

    /// Error from forecast computation
    #[error("Forecast computation error: {0}")]
    Forecast(String),

    /// A control value that the dashboard cannot accept
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A chart definition that cannot be wired into the dashboard
    #[error("Registry error: {0}")]
    Registry(String),

    /// A chart id that is not registered
    #[error("Unknown chart: {0}")]
    UnknownChart(String),
}

// Implement From<polars::error::PolarsError> for ComputeError
impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        match error {
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::Duplicate(_) => {
                let err = ComputeError::DataFrame(format!("Duplicate column: {}", error));
                error!(?err, "DataFrame error: Duplicate column");
                err
            }
            _ => {
                let err = ComputeError::Series(format!("Series error: {}", error));
                error!(?err, "Series error");
                err
            }
        }
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
