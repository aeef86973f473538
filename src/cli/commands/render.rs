use anyhow::Result;
use common::ChartSpec;
use tracing::{info, instrument};

use super::{load, selection};
use crate::cli::SelectionArgs;
use crate::config::Settings;

/// Prints the spec of every chart as a JSON array.
#[instrument(skip(settings, args))]
pub fn render(settings: &Settings, args: &SelectionArgs) -> Result<()> {
    let (dataset, registry) = load(settings)?;
    let selection = selection(&dataset, &registry, args)?;

    let specs = registry
        .charts()
        .iter()
        .map(|chart| chart.build(&dataset, &selection))
        .collect::<compute::error::Result<Vec<ChartSpec>>>()?;
    info!("Rendered {} charts for {}", specs.len(), selection.measure_label());

    println!("{}", serde_json::to_string_pretty(&specs)?);
    Ok(())
}
