//! History chart for one device.
//!
//! A session is bound to at most one device. New snapshots patch the point
//! arrays in place; changing which series are shown rebuilds the whole model.

use greenhub_domain::history::{HistoryPoint, recent_window};
use greenhub_domain::id::DeviceId;
use greenhub_domain::sensor::SensorField;
use greenhub_domain::time::Timestamp;

use crate::state::DashboardState;

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub field: SensorField,
    pub label: &'static str,
    pub color: &'static str,
    /// One entry per x-axis label; `None` leaves a gap.
    pub points: Vec<Option<f64>>,
}

/// Everything needed to draw the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub device: DeviceId,
    pub labels: Vec<String>,
    /// Parsed form of each label, for a time axis; `None` when unparseable.
    pub times: Vec<Option<Timestamp>>,
    pub series: Vec<ChartSeries>,
    /// Bumped on every rebuild, unchanged by patches.
    pub generation: u64,
}

impl ChartModel {
    /// Build a model from the device's bounded history and the shown series.
    #[must_use]
    pub fn build(device: &DeviceId, state: &DashboardState, generation: u64) -> Self {
        let window = history_window(device, state);
        let series = state
            .series
            .iter()
            .map(|field| ChartSeries {
                field,
                label: field.label(),
                color: field.chart_color(),
                points: points_for(window, field),
            })
            .collect();
        Self {
            device: device.clone(),
            labels: labels_for(window),
            times: times_for(window),
            series,
            generation,
        }
    }

    /// Recompute labels and points from the refreshed window, keeping the
    /// current series composition.
    fn patch(&mut self, state: &DashboardState) {
        let window = history_window(&self.device, state);
        self.labels = labels_for(window);
        self.times = times_for(window);
        for series in &mut self.series {
            series.points = points_for(window, series.field);
        }
    }

    #[must_use]
    pub fn series(&self, field: SensorField) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.field == field)
    }
}

fn history_window<'a>(device: &DeviceId, state: &'a DashboardState) -> &'a [HistoryPoint] {
    state.device(device).map_or(&[][..], |d| {
        recent_window(&d.history, state.settings.history_window())
    })
}

fn labels_for(window: &[HistoryPoint]) -> Vec<String> {
    window.iter().map(|p| p.label.clone()).collect()
}

fn times_for(window: &[HistoryPoint]) -> Vec<Option<Timestamp>> {
    window.iter().map(|p| p.recorded_at).collect()
}

fn points_for(window: &[HistoryPoint], field: SensorField) -> Vec<Option<f64>> {
    window.iter().map(|p| p.readings.get(field)).collect()
}

/// What the UI has to do after a session call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartUpdate {
    /// Tear down and recreate the chart.
    Rebuilt,
    /// Keep the chart and animate to the new points.
    Patched,
    /// Nothing to redraw.
    Unchanged,
}

/// The chart modal's lifecycle.
#[derive(Debug, Clone, Default)]
pub struct ChartSession {
    model: Option<ChartModel>,
    generation: u64,
}

impl ChartSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the chart to `device` and build it.
    pub fn open(&mut self, device: DeviceId, state: &mut DashboardState) -> ChartUpdate {
        state.chart_device = Some(device.clone());
        self.rebuild(&device, state);
        ChartUpdate::Rebuilt
    }

    /// Unbind the chart.
    pub fn close(&mut self, state: &mut DashboardState) {
        state.chart_device = None;
        self.model = None;
    }

    /// Refresh the open chart from a newly applied snapshot.
    ///
    /// If the device is missing from the snapshot the last drawing is kept.
    pub fn on_snapshot(&mut self, state: &DashboardState) -> ChartUpdate {
        let Some(model) = self.model.as_mut() else {
            return ChartUpdate::Unchanged;
        };
        if state.device(&model.device).is_none() {
            return ChartUpdate::Unchanged;
        }
        model.patch(state);
        ChartUpdate::Patched
    }

    /// Show or hide a series. The chart is rebuilt when it is open.
    pub fn set_series_visible(
        &mut self,
        field: SensorField,
        visible: bool,
        state: &mut DashboardState,
    ) -> ChartUpdate {
        if !state.series.set_shown(field, visible) {
            return ChartUpdate::Unchanged;
        }
        let Some(device) = self.model.as_ref().map(|m| m.device.clone()) else {
            return ChartUpdate::Unchanged;
        };
        self.rebuild(&device, state);
        ChartUpdate::Rebuilt
    }

    fn rebuild(&mut self, device: &DeviceId, state: &DashboardState) {
        self.generation += 1;
        tracing::debug!(device = %device, generation = self.generation, "building chart");
        self.model = Some(ChartModel::build(device, state, self.generation));
    }

    #[must_use]
    pub fn model(&self) -> Option<&ChartModel> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.model.is_some()
    }
}
