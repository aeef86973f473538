//! Reactive binding layer.
//!
//! A [`Dashboard`] owns the current selection and the last spec of every
//! chart. A user action is a batch of control changes: it is validated as a
//! whole, every chart triggered by a changed control is rebuilt against the
//! new snapshot, and only when all of them succeed are the selection and the
//! specs committed. Recompute is synchronous and never overlaps.

use chrono::NaiveDate;
use common::{
    ChartSpec, ControlChange, ControlDescriptor, ControlId, DateRange, SelectionState,
};
use model::Dataset;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{ComputeError, Result};
use crate::registry::ChartRegistry;

/// Receives freshly built chart specs.
pub trait ChartSink {
    fn publish(&mut self, spec: ChartSpec);
}

impl ChartSink for Vec<ChartSpec> {
    fn publish(&mut self, spec: ChartSpec) {
        self.push(spec);
    }
}

/// Lifecycle of a single chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartState {
    Idle,
    Recomputing,
}

/// Control id to dependent chart ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyTable {
    dependents: BTreeMap<ControlId, Vec<String>>,
    order: Vec<String>,
}

impl DependencyTable {
    /// Builds the table from the triggers of every chart. Triggers naming a
    /// control the dashboard does not have are ignored.
    pub fn from_registry(registry: &ChartRegistry) -> Self {
        let mut dependents: BTreeMap<ControlId, Vec<String>> = BTreeMap::new();
        for chart in registry.charts() {
            for trigger in &chart.triggers {
                if registry.has_control(*trigger) {
                    dependents.entry(*trigger).or_default().push(chart.id.clone());
                }
            }
        }
        Self {
            dependents,
            order: registry.charts().iter().map(|c| c.id.clone()).collect(),
        }
    }

    pub fn dependents(&self, control: ControlId) -> &[String] {
        self.dependents
            .get(&control)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Charts depending on any of `controls`, each once, in registry order.
    pub fn affected(&self, controls: impl IntoIterator<Item = ControlId>) -> Vec<String> {
        let hit: BTreeSet<&str> = controls
            .into_iter()
            .flat_map(|c| self.dependents(c).iter().map(String::as_str))
            .collect();
        self.order
            .iter()
            .filter(|id| hit.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

/// Checks that a selection is well formed.
///
/// A measure without matching rows is accepted; its charts come out empty.
pub fn check_selection(selection: &SelectionState) -> Result<()> {
    if let Some(range) = selection.date_range {
        if range.is_inverted() {
            return Err(ComputeError::InvalidSelection(format!(
                "date range starts after it ends ({} > {})",
                range.start, range.end
            )));
        }
    }
    Ok(())
}

/// Builds one chart against an explicit selection, outside of any dashboard.
pub fn render_chart(
    dataset: &Dataset,
    registry: &ChartRegistry,
    chart_id: &str,
    selection: &SelectionState,
) -> Result<ChartSpec> {
    let chart = registry
        .get(chart_id)
        .ok_or_else(|| ComputeError::UnknownChart(chart_id.to_string()))?;
    check_selection(selection)?;
    chart.build(dataset, selection)
}

/// First measure in dataset order, plus the full date span when the
/// dashboard has a date-range control.
pub fn default_selection(dataset: &Dataset, registry: &ChartRegistry) -> SelectionState {
    let measure = dataset.measures().into_iter().next();
    let date_range = if registry.has_control(ControlId::DateRange) {
        dataset
            .date_span()
            .map(|(start, end)| DateRange::new(start, end))
    } else {
        None
    };
    SelectionState::new(measure, date_range)
}

/// Selection for a one-off build. Missing values fall back to the first
/// measure and, when dates were requested or the dashboard has a date-range
/// control, to the ends of the dataset's date span.
pub fn explicit_selection(
    dataset: &Dataset,
    registry: &ChartRegistry,
    measure: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> SelectionState {
    let requested = start.is_some() || end.is_some();
    let span = dataset.date_span();
    let start = start.or(span.map(|(start, _)| start));
    let end = end.or(span.map(|(_, end)| end));

    let date_range = match (start, end) {
        (Some(start), Some(end)) if requested || registry.has_control(ControlId::DateRange) => {
            Some(DateRange::new(start, end))
        }
        _ => None,
    };
    let measure = measure.or_else(|| dataset.measures().into_iter().next());
    SelectionState::new(measure, date_range)
}

#[derive(Debug)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    registry: Arc<ChartRegistry>,
    dependencies: DependencyTable,
    selection: SelectionState,
    charts: HashMap<String, ChartSpec>,
    states: HashMap<String, ChartState>,
}

impl Dashboard {
    /// Creates the dashboard with the default selection and renders every
    /// chart once.
    #[instrument(skip_all)]
    pub fn new(dataset: Arc<Dataset>, registry: Arc<ChartRegistry>) -> Result<Self> {
        let selection = default_selection(&dataset, &registry);
        let states = registry
            .charts()
            .iter()
            .map(|c| (c.id.clone(), ChartState::Idle))
            .collect();
        let mut dashboard = Self {
            dependencies: DependencyTable::from_registry(&registry),
            dataset,
            registry,
            selection,
            charts: HashMap::new(),
            states,
        };

        let mut initial: Vec<ChartSpec> = Vec::new();
        dashboard.refresh_all(&mut initial)?;
        info!(
            "Dashboard ready with {} charts for {}",
            initial.len(),
            dashboard.selection.measure_label()
        );
        Ok(dashboard)
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn registry(&self) -> &Arc<ChartRegistry> {
        &self.registry
    }

    pub fn dependencies(&self) -> &DependencyTable {
        &self.dependencies
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.get(id)
    }

    /// Current specs in registry order.
    pub fn charts(&self) -> Vec<&ChartSpec> {
        self.registry
            .charts()
            .iter()
            .filter_map(|c| self.charts.get(&c.id))
            .collect()
    }

    pub fn state(&self, id: &str) -> Option<ChartState> {
        self.states.get(id).copied()
    }

    /// Describes the enabled controls and the values they accept.
    pub fn controls(&self) -> Vec<ControlDescriptor> {
        let span = self.dataset.date_span();
        self.registry
            .controls()
            .iter()
            .map(|control| match control {
                ControlId::Measure => ControlDescriptor {
                    id: *control,
                    label: "Measure".to_string(),
                    options: self.dataset.measures(),
                    min_date: None,
                    max_date: None,
                },
                ControlId::DateRange => ControlDescriptor {
                    id: *control,
                    label: "Date Range".to_string(),
                    options: Vec::new(),
                    min_date: span.map(|(start, _)| start),
                    max_date: span.map(|(_, end)| end),
                },
            })
            .collect()
    }

    /// Applies `changes` to the current selection without committing.
    pub fn validate(&self, changes: &[ControlChange]) -> Result<SelectionState> {
        if changes.is_empty() {
            return Err(ComputeError::InvalidSelection(
                "an action needs at least one control change".to_string(),
            ));
        }

        let mut next = self.selection.clone();
        for change in changes {
            let control = change.control();
            if !self.registry.has_control(control) {
                return Err(ComputeError::InvalidSelection(format!(
                    "control {} is not enabled",
                    control
                )));
            }
            next = next.with_change(change);
        }
        check_selection(&next)?;
        Ok(next)
    }

    /// Handles one user action.
    ///
    /// Returns the ids of the recomputed charts, in registry order. On error
    /// neither the selection nor any chart has changed and the sink received
    /// nothing.
    #[instrument(skip(self, sink))]
    pub fn dispatch(
        &mut self,
        changes: &[ControlChange],
        sink: &mut impl ChartSink,
    ) -> Result<Vec<String>> {
        let next = match self.validate(changes) {
            Ok(next) => next,
            Err(err) => {
                warn!("Rejected action: {}", err);
                return Err(err);
            }
        };

        let changed: BTreeSet<ControlId> = changes.iter().map(ControlChange::control).collect();
        let affected = self.dependencies.affected(changed.iter().copied());
        debug!("{} charts depend on {:?}", affected.len(), changed);

        let rendered = self.recompute(&affected, &next)?;
        self.selection = next;
        self.commit(rendered, sink);
        Ok(affected)
    }

    /// Rebuilds every chart against the current selection.
    pub fn refresh_all(&mut self, sink: &mut impl ChartSink) -> Result<()> {
        let ids: Vec<String> = self
            .registry
            .charts()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let selection = self.selection.clone();
        let rendered = self.recompute(&ids, &selection)?;
        self.commit(rendered, sink);
        Ok(())
    }

    fn recompute(&mut self, ids: &[String], selection: &SelectionState) -> Result<Vec<ChartSpec>> {
        for id in ids {
            self.states.insert(id.clone(), ChartState::Recomputing);
        }

        let result = ids
            .iter()
            .map(|id| {
                trace!("Recomputing chart {}", id);
                let chart = self
                    .registry
                    .get(id)
                    .ok_or_else(|| ComputeError::UnknownChart(id.clone()))?;
                chart.build(&self.dataset, selection)
            })
            .collect::<Result<Vec<_>>>();

        for id in ids {
            self.states.insert(id.clone(), ChartState::Idle);
        }
        result
    }

    fn commit(&mut self, rendered: Vec<ChartSpec>, sink: &mut impl ChartSink) {
        for spec in rendered {
            self.charts.insert(spec.id.clone(), spec.clone());
            sink.publish(spec);
        }
    }
}
