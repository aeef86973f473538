//! Row filters shared by the aggregates.

use common::SelectionState;
use model::{Dataset, Record};

/// True when the record carries the selected measure.
///
/// A selection without a measure matches nothing.
pub fn matches_measure(record: &Record, selection: &SelectionState) -> bool {
    selection.measure.as_deref() == Some(record.measure())
}

/// True when the record falls inside the selected date range.
///
/// Without a range every record passes; with one, undated records never do.
pub fn within_range(record: &Record, selection: &SelectionState) -> bool {
    match selection.date_range {
        None => true,
        Some(range) => record.date().is_some_and(|date| range.contains(date)),
    }
}

/// Rows with the selected measure, regardless of the date range.
pub fn measure_rows<'a>(
    dataset: &'a Dataset,
    selection: &'a SelectionState,
) -> impl Iterator<Item = &'a Record> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |record| matches_measure(record, selection))
}

/// Rows with the selected measure inside the selected date range.
pub fn selected_rows<'a>(
    dataset: &'a Dataset,
    selection: &'a SelectionState,
) -> impl Iterator<Item = &'a Record> + 'a {
    measure_rows(dataset, selection).filter(move |record| within_range(record, selection))
}
