use anyhow::{Result, anyhow};
use compute::chart::render_title;
use tracing::{debug, instrument};

use super::{load, selection};
use crate::cli::SelectionArgs;
use crate::config::Settings;

/// Prints the derived table one chart is built from.
#[instrument(skip(settings, args))]
pub fn inspect(settings: &Settings, chart_id: &str, args: &SelectionArgs) -> Result<()> {
    let (dataset, registry) = load(settings)?;
    let chart = registry
        .get(chart_id)
        .ok_or_else(|| anyhow!("Unknown chart {}", chart_id))?;
    let selection = selection(&dataset, &registry, args)?;
    debug!("Inspecting {} with {:?}", chart_id, selection);

    let table = chart.aggregate.run(&dataset, &selection)?;
    println!("{}", render_title(&chart.title, &selection));
    println!("{}", table.to_dataframe()?);

    Ok(())
}
