//! CSV loading.
//!
//! Every column is read as text and parsed here, so that a malformed date
//! becomes a null instead of failing the whole file.

use polars::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::dataset::Dataset;
use crate::error::{LoadError, Result};
use crate::record::{Record, columns, parse_month};

/// Loads and enriches the dataset stored at `path`.
#[instrument]
pub fn load_csv(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Loading border crossing data from {}", path.display());

    if !path.exists() {
        return Err(LoadError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let df = text_read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    dataset_from_frame(&df)
}

/// Loads and enriches a dataset from CSV bytes held in memory.
pub fn load_csv_bytes(bytes: Vec<u8>) -> Result<Dataset> {
    let df = text_read_options()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;

    dataset_from_frame(&df)
}

fn text_read_options() -> CsvReadOptions {
    // A zero-row inference window keeps every column as String.
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Converts a text-typed frame into an enriched [`Dataset`].
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    debug!("CSV has {} rows and columns {:?}", df.height(), names);

    let absent: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|required| !names.iter().any(|n| n == *required))
        .map(|required| required.to_string())
        .collect();
    if !absent.is_empty() {
        return Err(LoadError::MissingColumns(absent));
    }

    let mut missing: BTreeMap<String, usize> = BTreeMap::new();
    let mut text = |name: &str| -> Result<Vec<Option<String>>> {
        let values = text_column(df, name)?;
        let nulls = values.iter().filter(|v| v.is_none()).count();
        missing.insert(name.to_string(), nulls);
        Ok(values)
    };

    let port_names = text(columns::PORT_NAME)?;
    let states = text(columns::STATE)?;
    let borders = text(columns::BORDER)?;
    let dates = text(columns::DATE)?;
    let measures = text(columns::MEASURE)?;
    let values = text(columns::VALUE)?;

    let has = |name: &str| names.iter().any(|n| n == name);
    let port_codes = if has(columns::PORT_CODE) {
        Some(text(columns::PORT_CODE)?)
    } else {
        None
    };
    let latitudes = if has(columns::LATITUDE) {
        Some(text(columns::LATITUDE)?)
    } else {
        None
    };
    let longitudes = if has(columns::LONGITUDE) {
        Some(text(columns::LONGITUDE)?)
    } else {
        None
    };

    let mut records = Vec::with_capacity(df.height());
    let mut unparsed_dates = 0usize;
    let mut unparsed_numbers: BTreeMap<&str, usize> = BTreeMap::new();

    for row in 0..df.height() {
        let value = parse_value(values[row].as_deref()).ok_or_else(|| LoadError::InvalidValue {
            row,
            value: values[row].clone().unwrap_or_default(),
        })?;

        let raw_date = dates[row].as_deref();
        let date = raw_date.and_then(parse_month);
        if raw_date.is_some() && date.is_none() {
            unparsed_dates += 1;
        }

        let mut optional_number = |column: &'static str, cells: &Option<Vec<Option<String>>>| {
            let cell = cells.as_ref().and_then(|c| c[row].as_deref());
            let parsed = cell.and_then(|raw| raw.trim().parse::<f64>().ok());
            if cell.is_some() && parsed.is_none() {
                *unparsed_numbers.entry(column).or_default() += 1;
            }
            parsed
        };
        let port_code = optional_number(columns::PORT_CODE, &port_codes).map(|v| v as i64);
        let latitude = optional_number(columns::LATITUDE, &latitudes);
        let longitude = optional_number(columns::LONGITUDE, &longitudes);

        records.push(
            Record::new(
                borders[row].as_deref().unwrap_or_default(),
                date,
                measures[row].as_deref().unwrap_or_default(),
                port_names[row].as_deref().unwrap_or_default(),
                states[row].as_deref().unwrap_or_default(),
                value,
            )
            .with_port_code(port_code)
            .with_coordinates(latitude, longitude),
        );
    }

    if unparsed_dates > 0 {
        warn!("{} Date cells could not be parsed and were set to null", unparsed_dates);
        *missing.entry(columns::DATE.to_string()).or_default() += unparsed_dates;
    }
    for (column, count) in unparsed_numbers {
        warn!("{} {} cells could not be parsed and were set to null", count, column);
        *missing.entry(column.to_string()).or_default() += count;
    }

    let dataset = Dataset::new(records, names, missing).enrich();
    info!(
        "Loaded {} records with {} measures",
        dataset.len(),
        dataset.measures().len()
    );
    Ok(dataset)
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_string))
        .collect();
    Ok(values)
}

/// Parses a non-negative integer count. Whole floats such as `12.0` are accepted.
fn parse_value(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}
