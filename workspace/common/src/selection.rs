use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Identifier of an interactive control on the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    /// Dropdown selecting the Measure.
    Measure,
    /// Start/end month picker.
    DateRange,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::Measure => write!(f, "measure"),
            ControlId::DateRange => write!(f, "date_range"),
        }
    }
}

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    /// First month included
    pub start: NaiveDate,
    /// Last month included
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Snapshot of every control value at a point in time.
///
/// `date_range` is `None` when the dashboard has no date-range control, in
/// which case no date filter applies at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub struct SelectionState {
    /// Selected Measure, `None` only for a dataset without measures
    pub measure: Option<String>,
    /// Selected inclusive date range
    pub date_range: Option<DateRange>,
}

impl SelectionState {
    pub fn new(measure: Option<String>, date_range: Option<DateRange>) -> Self {
        Self {
            measure,
            date_range,
        }
    }

    pub fn for_measure(measure: impl Into<String>) -> Self {
        Self {
            measure: Some(measure.into()),
            date_range: None,
        }
    }

    /// Returns a copy with `change` applied.
    pub fn with_change(&self, change: &ControlChange) -> Self {
        let mut next = self.clone();
        match change {
            ControlChange::Measure { value } => next.measure = Some(value.clone()),
            ControlChange::DateRange { start, end } => {
                next.date_range = Some(DateRange::new(*start, *end))
            }
        }
        next
    }

    /// Human readable label of the selected measure, used in chart titles.
    pub fn measure_label(&self) -> &str {
        self.measure.as_deref().unwrap_or("no measure")
    }
}

/// A single control value change coming from the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum ControlChange {
    Measure { value: String },
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl ControlChange {
    pub fn control(&self) -> ControlId {
        match self {
            ControlChange::Measure { .. } => ControlId::Measure,
            ControlChange::DateRange { .. } => ControlId::DateRange,
        }
    }
}

/// Describes a control and the values it can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ControlDescriptor {
    pub id: ControlId,
    pub label: String,
    /// Allowed values for the measure dropdown, in dataset order
    pub options: Vec<String>,
    /// Earliest selectable month
    pub min_date: Option<NaiveDate>,
    /// Latest selectable month
    pub max_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(date(2020, 1), date(2020, 3));
        assert!(range.contains(date(2020, 1)));
        assert!(range.contains(date(2020, 3)));
        assert!(!range.contains(date(2020, 4)));
        assert!(!range.is_inverted());
    }

    #[test]
    fn test_with_change_leaves_original_untouched() {
        let selection = SelectionState::for_measure("Trucks");
        let next = selection.with_change(&ControlChange::Measure {
            value: "Buses".to_string(),
        });

        assert_eq!(selection.measure.as_deref(), Some("Trucks"));
        assert_eq!(next.measure.as_deref(), Some("Buses"));
        assert_eq!(next.date_range, None);
    }

    #[test]
    fn test_control_change_wire_format() {
        let change: ControlChange = serde_json::from_str(
            r#"{"control":"date_range","start":"2020-01-01","end":"2020-06-01"}"#,
        )
        .unwrap();
        assert_eq!(change.control(), ControlId::DateRange);

        let json = serde_json::to_value(ControlChange::Measure {
            value: "Trains".to_string(),
        })
        .unwrap();
        assert_eq!(json["control"], "measure");
        assert_eq!(json["value"], "Trains");
    }
}
