#[cfg(test)]
pub mod test_utils {
    use crate::config::{Settings, build_app_state};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use common::ControlId;
    use compute::registry::ChartRegistry;
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// A small extract in the layout of the published border-crossing file.
    pub const FIXTURE_CSV: &str = "\
Port Name,State,Port Code,Border,Date,Measure,Value,Latitude,Longitude
Detroit,Michigan,3801,US-Canada Border,Jan 2020,Trucks,120,42.33,-83.05
Detroit,Michigan,3801,US-Canada Border,Feb 2020,Trucks,130,42.33,-83.05
Buffalo,New York,901,US-Canada Border,Mar 2020,Trucks,90,,
Laredo,Texas,2304,US-Mexico Border,Jan 2020,Trucks,300,27.50,-99.50
Laredo,Texas,2304,US-Mexico Border,Feb 2020,Trucks,310,27.50,-99.50
El Paso,Texas,2402,US-Mexico Border,Mar 2020,Trucks,200,31.76,-106.45
Otay Mesa,California,2506,US-Mexico Border,Apr 2020,Trucks,150,32.55,-116.94
Detroit,Michigan,3801,US-Canada Border,Jan 2020,Personal Vehicles,500,42.33,-83.05
Laredo,Texas,2304,US-Mexico Border,Jan 2020,Personal Vehicles,800,27.50,-99.50
San Ysidro,California,2504,US-Mexico Border,Feb 2020,Personal Vehicles,900,,
Buffalo,New York,901,US-Canada Border,Jan 2020,Buses,10,,
";

    /// Settings used by every test; nothing is read from disk.
    pub fn test_settings(controls: Vec<ControlId>) -> Settings {
        Settings {
            data_path: "fixture.csv".into(),
            bind_address: "127.0.0.1:0".to_string(),
            controls,
            charts: None,
            cache_capacity: 100,
            cache_ttl_secs: 60,
        }
    }

    /// Create AppState for testing
    pub fn setup_test_app_state_with_controls(controls: Vec<ControlId>) -> AppState {
        let dataset = model::load_csv_bytes(FIXTURE_CSV.as_bytes().to_vec())
            .expect("Failed to load fixture dataset");
        let settings = test_settings(controls);
        let registry = settings.registry().expect("Invalid test registry");
        build_app_state(Arc::new(dataset), Arc::new(registry), &settings)
            .expect("Failed to build test app state")
    }

    /// Create AppState for testing with the standard controls
    pub fn setup_test_app_state() -> AppState {
        setup_test_app_state_with_controls(ChartRegistry::default_controls())
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// Installs a global subscriber the first time it is called; later calls
    /// keep the existing one. The log level is determined by the RUST_LOG
    /// environment variable, defaulting to WARN if not set.
    pub fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        // Fails once a global subscriber is already installed by another test.
        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Create axum app for testing
    pub fn setup_test_app() -> Router {
        init_test_tracing();
        create_router(setup_test_app_state())
    }
}
