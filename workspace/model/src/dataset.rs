use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

use crate::record::{Record, columns};

/// The in-memory border-crossing table.
///
/// Built once by the loader, enriched once by the derived-column pass, and
/// read-only afterwards. Share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub(crate) records: Vec<Record>,
    pub(crate) columns: Vec<String>,
    pub(crate) missing: BTreeMap<String, usize>,
    pub(crate) enriched: bool,
}

impl Dataset {
    /// Creates a dataset from already parsed parts, as produced by the loader.
    pub fn new(
        records: Vec<Record>,
        columns: Vec<String>,
        missing: BTreeMap<String, usize>,
    ) -> Self {
        Self {
            records,
            columns,
            missing,
            enriched: false,
        }
    }

    /// Creates a dataset straight from records.
    ///
    /// The column list is the required set plus any optional column at least
    /// one record carries; missing counts are derived from the records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let has_port_code = records.iter().any(|r| r.port_code().is_some());
        let has_coordinates = records
            .iter()
            .any(|r| r.latitude().is_some() || r.longitude().is_some());

        let mut column_names = vec![columns::PORT_NAME, columns::STATE];
        if has_port_code {
            column_names.push(columns::PORT_CODE);
        }
        column_names.extend([columns::BORDER, columns::DATE, columns::MEASURE, columns::VALUE]);
        if has_coordinates {
            column_names.extend([columns::LATITUDE, columns::LONGITUDE]);
        }

        let mut missing: BTreeMap<String, usize> = column_names
            .iter()
            .map(|c| (c.to_string(), 0))
            .collect();
        for record in &records {
            if record.date().is_none() {
                *missing.entry(columns::DATE.to_string()).or_default() += 1;
            }
            if has_port_code && record.port_code().is_none() {
                *missing.entry(columns::PORT_CODE.to_string()).or_default() += 1;
            }
            if has_coordinates {
                if record.latitude().is_none() {
                    *missing.entry(columns::LATITUDE.to_string()).or_default() += 1;
                }
                if record.longitude().is_none() {
                    *missing.entry(columns::LONGITUDE.to_string()).or_default() += 1;
                }
            }
        }

        Self::new(
            records,
            column_names.into_iter().map(String::from).collect(),
            missing,
        )
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column names in file order, followed by derived columns once enriched.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Null or unparseable cells per column.
    pub fn missing(&self) -> &BTreeMap<String, usize> {
        &self.missing
    }

    /// Whether the derived-column pass already ran.
    pub fn is_enriched(&self) -> bool {
        self.enriched
    }

    /// Distinct measures in order of first appearance.
    pub fn measures(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.measure()))
            .map(|r| r.measure().to_string())
            .collect()
    }

    /// Earliest and latest parsed date, if any row has one.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(Record::date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    /// Numeric columns present in this dataset, in column order.
    pub fn numeric_columns(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .filter_map(|c| columns::NUMERIC.iter().find(|n| **n == c.as_str()).copied())
            .collect()
    }
}
