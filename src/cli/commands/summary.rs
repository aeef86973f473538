use anyhow::Result;
use compute::summary::summarize;
use polars::prelude::*;
use tracing::instrument;

use crate::config::Settings;

/// Prints the per-column missing counts and describe-style Value statistics.
#[instrument(skip(settings))]
pub fn summary(settings: &Settings) -> Result<()> {
    let dataset = model::load_csv(&settings.data_path)?;
    let summary = summarize(&dataset);

    println!("{} rows, {} columns", summary.rows, summary.columns.len());
    println!("Measures: {}", summary.measures.join(", "));

    let columns: Vec<&str> = summary.columns.iter().map(String::as_str).collect();
    let missing: Vec<u64> = summary
        .columns
        .iter()
        .map(|c| summary.missing.get(c).copied().unwrap_or(0) as u64)
        .collect();
    let missing = DataFrame::new(vec![
        Series::new("column".into(), columns).into(),
        Series::new("missing".into(), missing).into(),
    ])?;
    println!("{}", missing);

    let stats = &summary.value;
    let describe = DataFrame::new(vec![
        Series::new(
            "statistic".into(),
            ["count", "mean", "std", "min", "25%", "50%", "75%", "max"],
        )
        .into(),
        Series::new(
            "Value".into(),
            [
                Some(stats.count as f64),
                stats.mean,
                stats.std,
                stats.min,
                stats.q25,
                stats.median,
                stats.q75,
                stats.max,
            ],
        )
        .into(),
    ])?;
    println!("{}", describe);

    Ok(())
}
