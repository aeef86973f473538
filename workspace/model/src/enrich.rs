//! Derived-column pass.
//!
//! Adds `Month` and `Year` to every record. A record without a date simply
//! gets no month and no year.

use chrono::{Datelike, Month};
use tracing::{debug, instrument};

use crate::dataset::Dataset;
use crate::record::columns;

/// Runs the derived-column pass over the whole dataset.
///
/// Calling it on an already enriched dataset returns it unchanged.
#[instrument(skip(dataset), fields(rows = dataset.len()))]
pub fn derive_columns(mut dataset: Dataset) -> Dataset {
    if dataset.enriched {
        debug!("Dataset already enriched, skipping derived-column pass");
        return dataset;
    }

    let mut undated = 0usize;
    for record in &mut dataset.records {
        match record.date() {
            Some(date) => {
                let month = u8::try_from(date.month())
                    .ok()
                    .and_then(|m| Month::try_from(m).ok());
                record.set_calendar(month, Some(date.year()));
            }
            None => {
                undated += 1;
                record.set_calendar(None, None);
            }
        }
    }

    for derived in [columns::MONTH, columns::YEAR] {
        dataset.columns.push(derived.to_string());
        dataset.missing.insert(derived.to_string(), undated);
    }
    dataset.enriched = true;

    debug!("Derived Month/Year columns, {} rows without a date", undated);
    dataset
}

impl Dataset {
    /// Consumes the dataset and returns it with derived columns added.
    pub fn enrich(self) -> Dataset {
        derive_columns(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use chrono::NaiveDate;

    #[test]
    fn test_derived_columns_follow_date() {
        let dataset = Dataset::from_records(vec![
            Record::new(
                "US-Canada Border",
                NaiveDate::from_ymd_opt(2021, 7, 1),
                "Trucks",
                "Sumas",
                "Washington",
                4,
            ),
            Record::new("US-Canada Border", None, "Trucks", "Sumas", "Washington", 1),
        ])
        .enrich();

        let records = dataset.records();
        assert_eq!(records[0].month(), Some(Month::July));
        assert_eq!(records[0].year(), Some(2021));
        assert_eq!(records[1].month(), None);
        assert_eq!(records[1].year(), None);
        assert!(dataset.has_column(columns::YEAR));
        assert_eq!(dataset.missing().get(columns::MONTH), Some(&1));
    }

    #[test]
    fn test_enrich_runs_once() {
        let dataset = Dataset::from_records(vec![]).enrich().enrich();
        let year_columns = dataset
            .columns()
            .iter()
            .filter(|c| c.as_str() == columns::YEAR)
            .count();
        assert_eq!(year_columns, 1);
        assert!(dataset.is_enriched());
    }
}
