use model::{Dataset, Record, columns};
use common::SelectionState;
use std::collections::BTreeMap;
use tracing::debug;

use crate::filter::{measure_rows, selected_rows};
use crate::table::{CategoryTotal, CategoryTotals};

/// Sums Value per key, keys in ascending label order.
fn sum_by<'a>(
    rows: impl Iterator<Item = &'a Record>,
    key: impl Fn(&Record) -> &str,
) -> Vec<CategoryTotal> {
    let mut sums: BTreeMap<String, u64> = BTreeMap::new();
    for record in rows {
        *sums.entry(key(record).to_string()).or_insert(0) += record.value();
    }
    sums.into_iter()
        .map(|(label, value)| CategoryTotal { label, value })
        .collect()
}

/// Value summed per State for the selected measure and date range.
pub fn state_totals(dataset: &Dataset, selection: &SelectionState) -> CategoryTotals {
    let rows = sum_by(selected_rows(dataset, selection), Record::state);
    debug!("State totals for {}: {} states", selection.measure_label(), rows.len());
    CategoryTotals::new(columns::STATE, rows)
}

/// Value summed per Border over the whole dataset.
///
/// This aggregate deliberately ignores the measure selection.
pub fn border_totals(dataset: &Dataset) -> CategoryTotals {
    CategoryTotals::new(
        columns::BORDER,
        sum_by(dataset.records().iter(), Record::border),
    )
}

/// The `n` ports with the largest Value sum for the selected measure.
///
/// Ties keep port-name order.
pub fn top_ports(dataset: &Dataset, selection: &SelectionState, n: usize) -> CategoryTotals {
    let mut rows = sum_by(measure_rows(dataset, selection), Record::port_name);
    // sort_by is stable, so equal sums stay in label order
    rows.sort_by(|a, b| b.value.cmp(&a.value));
    rows.truncate(n);
    CategoryTotals::new(columns::PORT_NAME, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_dataset, two_row_dataset};
    use chrono::NaiveDate;
    use common::DateRange;

    #[test]
    fn test_two_row_scenario() {
        let dataset = two_row_dataset();
        let totals = state_totals(&dataset, &SelectionState::for_measure("Personal Vehicles"));

        assert_eq!(totals.get("Texas"), Some(50));
        assert_eq!(totals.get("California"), Some(30));
        assert_eq!(totals.total(), 80);
        // ordered by label
        assert_eq!(totals.rows[0].label, "California");
    }

    #[test]
    fn test_state_totals_conserve_measure_total() {
        let dataset = sample_dataset();
        for measure in dataset.measures() {
            let selection = SelectionState::for_measure(measure.as_str());
            let expected: u64 = dataset
                .records()
                .iter()
                .filter(|r| r.measure() == measure)
                .map(|r| r.value())
                .sum();
            assert_eq!(state_totals(&dataset, &selection).total(), expected);
        }
    }

    #[test]
    fn test_state_totals_conserve_total_within_range() {
        let dataset = sample_dataset();
        let start = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let mut selection = SelectionState::for_measure("Trucks");
        selection.date_range = Some(DateRange::new(start, end));

        let expected: u64 = dataset
            .records()
            .iter()
            .filter(|r| r.measure() == "Trucks")
            .filter(|r| r.date().is_some_and(|d| d >= start && d <= end))
            .map(|r| r.value())
            .sum();
        assert_eq!(state_totals(&dataset, &selection).total(), expected);
    }

    #[test]
    fn test_border_totals_ignore_measure() {
        let dataset = sample_dataset();
        let everything: u64 = dataset.records().iter().map(|r| r.value()).sum();
        assert_eq!(border_totals(&dataset).total(), everything);
    }

    #[test]
    fn test_top_ports_dominate_excluded_ports() {
        let dataset = sample_dataset();
        for measure in dataset.measures() {
            let selection = SelectionState::for_measure(measure.as_str());
            let all = top_ports(&dataset, &selection, usize::MAX);
            for n in 0..=all.rows.len() + 1 {
                let top = top_ports(&dataset, &selection, n);
                assert!(top.rows.len() <= n);
                let smallest_kept = top.rows.iter().map(|r| r.value).min();
                for excluded in all.rows.iter().skip(top.rows.len()) {
                    if let Some(kept) = smallest_kept {
                        assert!(kept >= excluded.value);
                    }
                }
            }
        }
    }

    #[test]
    fn test_top_ports_ties_keep_label_order() {
        let dataset = Dataset::from_records(vec![
            Record::new("B", None, "Trucks", "Zeta", "S", 5),
            Record::new("B", None, "Trucks", "Alpha", "S", 5),
            Record::new("B", None, "Trucks", "Mid", "S", 9),
        ]);
        let top = top_ports(&dataset, &SelectionState::for_measure("Trucks"), 2);
        let labels: Vec<&str> = top.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Mid", "Alpha"]);
    }

    #[test]
    fn test_unknown_measure_yields_empty_totals() {
        let dataset = sample_dataset();
        let selection = SelectionState::for_measure("Hovercraft");
        assert!(state_totals(&dataset, &selection).rows.is_empty());
        assert!(top_ports(&dataset, &selection, 5).rows.is_empty());
    }
}
