//! Dashboard context: reactive wrappers around the application state.
//!
//! One [`Dashboard`] is provided at the root. Components read the view models
//! it holds and call its methods in response to user input.

use greenhub_app::config::DashboardConfig;
use greenhub_app::orientation::{ORIENTATION_CHANNEL, OrientationFrame};
use greenhub_app::poller::{PollOutcome, SnapshotPoller};
use greenhub_app::ports::TelemetrySource;
use greenhub_app::render::{CardBoard, ChartSession, TableView};
use greenhub_app::services::command_service::{self, CommandService, RenameOutcome};
use greenhub_app::state::{Column, DashboardState};
use greenhub_domain::actuator::{Actuator, ActuatorMode};
use greenhub_domain::id::DeviceId;
use greenhub_domain::sensor::SensorField;
use greenhub_domain::time::now;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::BroadcastChannel;

use crate::api::HttpClient;

/// Reactive handle on everything the dashboard shows.
#[derive(Clone, Copy)]
pub struct Dashboard {
    pub state: RwSignal<DashboardState>,
    pub cards: RwSignal<CardBoard>,
    pub table: RwSignal<TableView>,
    pub chart: RwSignal<ChartSession>,
    poller: StoredValue<SnapshotPoller>,
    client: StoredValue<HttpClient>,
    channel: StoredValue<Option<BroadcastChannel>, LocalStorage>,
}

impl Dashboard {
    /// Build the dashboard from configuration.
    pub fn new(config: &DashboardConfig) -> Self {
        let channel = match BroadcastChannel::new(ORIENTATION_CHANNEL) {
            Ok(channel) => Some(channel),
            Err(err) => {
                leptos::logging::warn!("orientation channel unavailable: {err:?}");
                None
            }
        };
        Self {
            state: RwSignal::new(DashboardState::from_config(config)),
            cards: RwSignal::new(CardBoard::new()),
            table: RwSignal::new(TableView::default()),
            chart: RwSignal::new(ChartSession::new()),
            poller: StoredValue::new(SnapshotPoller::new()),
            client: StoredValue::new(HttpClient::new(&config.endpoints)),
            channel: StoredValue::new_local(channel),
        }
    }

    /// Fetch one snapshot and, if it is the newest, re-render everything.
    pub async fn refresh(self) {
        let ticket = self.poller.try_update_value(SnapshotPoller::begin);
        let Some(ticket) = ticket else {
            return;
        };
        let client = self.client.get_value();
        let result = TelemetrySource::fetch_snapshot(&client).await;

        let outcome = self
            .state
            .try_update(|state| SnapshotPoller::complete(ticket, result, state));
        match outcome {
            Some(outcome) if outcome.is_applied() => {
                self.render_views();
                self.chart.update(|chart| {
                    self.state.with_untracked(|s| {
                        chart.on_snapshot(s);
                    });
                });
                self.publish_orientation();
            }
            Some(PollOutcome::Failed(err)) => {
                leptos::logging::warn!("Failed to fetch data: {err}");
                // presence still ages while the server is unreachable
                self.render_views();
            }
            _ => {}
        }
    }

    /// Recompute cards and table at the current time.
    pub fn render_views(self) {
        let at = now();
        self.state.with_untracked(|state| {
            self.cards.update(|cards| {
                cards.reconcile(state, at);
            });
            self.table.set(TableView::render(state, at));
        });
    }

    fn publish_orientation(self) {
        let frames = self.state.with_untracked(OrientationFrame::all_from_state);
        self.channel.with_value(|channel| {
            let Some(channel) = channel else {
                return;
            };
            for frame in frames {
                let json = match frame.to_json() {
                    Ok(json) => json,
                    Err(err) => {
                        leptos::logging::warn!("cannot encode orientation of {}: {err}", frame.device);
                        continue;
                    }
                };
                if let Err(err) = channel.post_message(&json.into()) {
                    leptos::logging::warn!("cannot publish orientation of {}: {err:?}", frame.device);
                }
            }
        });
    }

    /// Show or hide a table column.
    pub fn set_column_visible(self, column: Column, visible: bool) {
        self.state.update(|s| s.columns.set_visible(column, visible));
        self.render_views();
    }

    pub fn set_refresh_interval_ms(self, ms: u64) {
        self.state.update(|s| s.settings.set_refresh_interval_ms(ms));
    }

    pub fn set_offline_threshold_ms(self, ms: u64) {
        self.state.update(|s| s.settings.set_offline_threshold_ms(ms));
        self.render_views();
    }

    /// Record rename text as the user types.
    pub fn edit_name(self, device: &DeviceId, text: String) {
        self.state.update(|s| s.renames.edit(device, text));
        self.render_views();
    }

    /// Submit the pending rename for `device`, then re-fetch.
    pub fn submit_rename(self, device: DeviceId) {
        let mut prepared = None;
        self.state.update(|s| {
            prepared = Some(command_service::prepare_rename(&device, s));
        });
        let command = match prepared {
            Some(Ok(command)) => command,
            Some(Err(err)) => {
                leptos::logging::log!("rename of {device} rejected: {err}");
                return;
            }
            None => return,
        };
        self.render_views();

        let service = CommandService::new(self.client.get_value());
        spawn_local(async move {
            if let RenameOutcome::Failed { error, .. } = service.send_rename(command).await {
                leptos::logging::warn!("{error}");
            }
            self.refresh().await;
        });
    }

    /// Send an actuator command without touching local state.
    pub fn toggle(self, device: DeviceId, actuator: Actuator, mode: ActuatorMode) {
        let service = CommandService::new(self.client.get_value());
        spawn_local(async move {
            service.toggle(device, actuator, mode).await;
        });
    }

    /// Whether the latest snapshot carries `device`.
    pub fn has_device(self, device: &DeviceId) -> bool {
        self.state.with_untracked(|s| s.device(device).is_some())
    }

    /// Open the chart for `device`.
    pub fn open_chart(self, device: DeviceId) {
        self.chart.update(|chart| {
            self.state.update(|s| {
                chart.open(device, s);
            });
        });
    }

    pub fn close_chart(self) {
        self.chart.update(|chart| self.state.update(|s| chart.close(s)));
    }

    /// Show or hide a chart series; an open chart is rebuilt.
    pub fn set_series_visible(self, field: SensorField, visible: bool) {
        self.chart.update(|chart| {
            self.state.update(|s| {
                chart.set_series_visible(field, visible, s);
            });
        });
    }
}

/// Access the dashboard from Leptos context.
///
/// Must be called within a component tree below [`crate::App`].
pub fn use_dashboard() -> Dashboard {
    use_context::<Dashboard>().expect("Dashboard not found in context")
}
