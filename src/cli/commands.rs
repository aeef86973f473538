pub mod inspect;
pub mod render;
pub mod serve;
pub mod summary;

pub use inspect::inspect;
pub use render::render;
pub use serve::serve;
pub use summary::summary;

use anyhow::Result;
use common::SelectionState;
use compute::binding::{check_selection, explicit_selection};
use compute::registry::ChartRegistry;
use model::Dataset;

use crate::cli::SelectionArgs;
use crate::config::Settings;

/// Loads the dataset and registry the settings point at.
fn load(settings: &Settings) -> Result<(Dataset, ChartRegistry)> {
    let dataset = model::load_csv(&settings.data_path)?;
    let registry = settings.registry()?;
    Ok((dataset, registry))
}

/// Resolves and checks the selection given on the command line.
fn selection(
    dataset: &Dataset,
    registry: &ChartRegistry,
    args: &SelectionArgs,
) -> Result<SelectionState> {
    let selection = explicit_selection(dataset, registry, args.measure.clone(), args.start, args.end);
    check_selection(&selection)?;
    Ok(selection)
}
