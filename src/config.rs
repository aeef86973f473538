use anyhow::{Context, Result};
use common::ControlId;
use compute::binding::Dashboard;
use compute::registry::{ChartDefinition, ChartRegistry};
use compute::summary::summarize;
use moka::future::Cache;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::schemas::AppState;

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "borderflow.toml";

/// Runtime settings, layered from defaults, the config file and
/// `BORDERFLOW__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// CSV file with the border-crossing records
    pub data_path: PathBuf,
    /// Bind address of the web server
    pub bind_address: String,
    /// Controls shown on the dashboard
    pub controls: Vec<ControlId>,
    /// Replaces the standard chart set when present
    #[serde(default)]
    pub charts: Option<Vec<ChartDefinition>>,
    /// Maximum number of cached chart previews
    pub cache_capacity: u64,
    /// Lifetime of a cached chart preview
    pub cache_ttl_secs: u64,
}

impl Settings {
    /// Loads settings. A missing config file is not an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = config_path
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        debug!("Reading configuration from {}", file);

        let settings = ::config::Config::builder()
            .set_default("data_path", "Border_Crossing_Entry_Data.csv")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("controls", vec!["measure", "date_range"])?
            .set_default("cache_capacity", 1000)?
            .set_default("cache_ttl_secs", 300)?
            .add_source(::config::File::with_name(&file).required(config_path.is_some()))
            .add_source(
                ::config::Environment::with_prefix("BORDERFLOW")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("controls")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", file))?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        Ok(settings)
    }

    /// The chart registry these settings describe.
    pub fn registry(&self) -> Result<ChartRegistry> {
        let charts = self
            .charts
            .clone()
            .unwrap_or_else(ChartRegistry::default_charts);
        Ok(ChartRegistry::new(self.controls.clone(), charts)?)
    }
}

/// Loads the dataset and builds the application state.
#[instrument(skip(settings), fields(data_path = %settings.data_path.display()))]
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let dataset = model::load_csv(&settings.data_path)
        .with_context(|| format!("Failed to load {}", settings.data_path.display()))?;

    let summary = summarize(&dataset);
    info!(
        "Loaded {} records with {} measures",
        summary.rows,
        summary.measures.len()
    );
    for (column, missing) in summary.missing.iter().filter(|(_, m)| **m > 0) {
        info!("Column {} has {} missing values", column, missing);
    }

    let registry = settings.registry()?;
    build_app_state(Arc::new(dataset), Arc::new(registry), settings)
}

/// Wires an already loaded dataset into the application state.
pub fn build_app_state(
    dataset: Arc<model::Dataset>,
    registry: Arc<ChartRegistry>,
    settings: &Settings,
) -> Result<AppState> {
    let dashboard = Dashboard::new(dataset.clone(), registry.clone())?;

    let cache = Cache::builder()
        .max_capacity(settings.cache_capacity)
        .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
        .build();

    Ok(AppState {
        dashboard: Arc::new(Mutex::new(dashboard)),
        dataset,
        registry,
        cache,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.controls, vec![ControlId::Measure, ControlId::DateRange]);
        assert!(settings.charts.is_none());
        assert_eq!(settings.registry().unwrap(), ChartRegistry::standard());
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("does-not-exist.toml"))).is_err());
    }
}
