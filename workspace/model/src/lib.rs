//! Border-crossing dataset: records, CSV loading and the derived-column pass.

pub mod dataset;
pub mod enrich;
pub mod error;
pub mod loader;
pub mod record;

pub use dataset::Dataset;
pub use error::LoadError;
pub use loader::{load_csv, load_csv_bytes};
pub use record::{Record, columns, parse_month};

// Re-export tracing for use in this crate
pub use tracing;
