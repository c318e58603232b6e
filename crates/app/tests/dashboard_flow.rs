//! End-to-end flow across poller, renderers, and commands using in-memory ports.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use greenhub_app::config::DashboardConfig;
use greenhub_app::format::DASH;
use greenhub_app::orientation::{OrientationFrame, OrientationViewer};
use greenhub_app::poller::{PollOutcome, SnapshotPoller};
use greenhub_app::ports::{DeviceCommands, TelemetrySource};
use greenhub_app::render::{CardBoard, ChartSession, ChartUpdate, TableCell, TableView};
use greenhub_app::services::command_service::CommandService;
use greenhub_app::state::{Column, DashboardState};
use greenhub_domain::command::{ActuatorCommand, RenameCommand};
use greenhub_domain::error::TransportError;
use greenhub_domain::id::DeviceId;
use greenhub_domain::sensor::SensorField;
use greenhub_domain::snapshot::Snapshot;
use serde_json::json;

/// Fake server: serves queued documents and records commands.
#[derive(Default)]
struct FakeServer {
    documents: RefCell<VecDeque<serde_json::Value>>,
    renames: RefCell<Vec<RenameCommand>>,
}

impl FakeServer {
    fn push(&self, doc: serde_json::Value) {
        self.documents.borrow_mut().push_back(doc);
    }
}

impl TelemetrySource for &FakeServer {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, TransportError>> {
        let result = self
            .documents
            .borrow_mut()
            .pop_front()
            .map(|doc| Snapshot::from_json(&doc))
            .ok_or_else(|| TransportError::new("fetch snapshot", "connection refused"));
        async { result }
    }
}

impl DeviceCommands for &FakeServer {
    fn rename(&self, command: RenameCommand) -> impl Future<Output = Result<(), TransportError>> {
        self.renames.borrow_mut().push(command);
        async { Ok(()) }
    }

    fn set_actuator(
        &self,
        _command: ActuatorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> {
        async { Ok(()) }
    }
}

fn mac() -> DeviceId {
    "AA:BB".parse().unwrap()
}

fn at(seconds: i64) -> DateTime<Utc> {
    "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap() + TimeDelta::seconds(seconds)
}

fn device_doc(name: &str, temp: f64, last_seen_s: i64, history_len: usize) -> serde_json::Value {
    let history: Vec<_> = (0..history_len)
        .map(|i| json!({"ts": format!("p{i}"), "TEMP": i, "HUM": 40}))
        .collect();
    json!({
        "AA:BB": {
            "name": name,
            "TEMP": temp.to_string(),
            "HUM": "40",
            "x": 0.5,
            "PUMP": "OFF",
            "LIGHT": "ON",
            "last_seen": at(last_seen_s).to_rfc3339(),
            "history": history
        }
    })
}

#[tokio::test]
async fn should_keep_edit_and_refresh_everything_else_across_polls() {
    let server = FakeServer::default();
    let config = DashboardConfig::from_toml_str("[polling]\nhistory_window = 4").unwrap();
    let mut state = DashboardState::from_config(&config);
    let mut poller = SnapshotPoller::new();
    let mut cards = CardBoard::new();
    let mut chart = ChartSession::new();

    server.push(device_doc("Tomatoes", 21.0, 0, 2));
    assert!(poller.poll_once(&&server, &mut state).await.is_applied());
    cards.reconcile(&state, at(1));
    assert_eq!(chart.open(mac(), &mut state), ChartUpdate::Rebuilt);
    let mount_id = cards.get(&mac()).unwrap().mount_id;

    state.renames.edit(&mac(), "Cherry");
    for tick in 1..10_i64 {
        let len = usize::try_from(tick).unwrap() + 2;
        server.push(device_doc("Tomatoes", 21.0 + tick as f64, tick, len));
        assert!(poller.poll_once(&&server, &mut state).await.is_applied());
        cards.reconcile(&state, at(tick));
        assert_eq!(chart.on_snapshot(&state), ChartUpdate::Patched);
    }

    let card = cards.get(&mac()).unwrap();
    assert_eq!(card.mount_id, mount_id);
    assert_eq!(card.rename_input, "Cherry");
    assert_eq!(card.values[0].text, "30.00 °C");

    let model = chart.model().unwrap();
    assert!(model.series.iter().all(|s| s.points.len() == 4));

    let table = TableView::render(&state, at(9));
    assert_eq!(
        table.rows[0].cell(&table.columns, Column::Name),
        Some(&TableCell::NameInput {
            value: "Cherry".to_string()
        })
    );
}

#[tokio::test]
async fn should_rename_then_show_server_name_after_refetch() {
    let server = FakeServer::default();
    let mut state = DashboardState::default();
    let mut poller = SnapshotPoller::new();
    let commands = CommandService::new(&server);

    server.push(device_doc("Tomatoes", 21.0, 0, 0));
    poller.poll_once(&&server, &mut state).await;

    state.renames.edit(&mac(), "  Peppers ");
    commands.rename_device(&mac(), &mut state).await.unwrap();
    assert_eq!(server.renames.borrow().len(), 1);
    assert_eq!(state.display_name(&mac()), "Peppers");

    server.push(device_doc("Peppers", 21.0, 0, 0));
    poller.poll_once(&&server, &mut state).await;
    assert!(state.renames.override_name(&mac()).is_none());
    assert_eq!(state.display_name(&mac()), "Peppers");
}

#[tokio::test]
async fn should_degrade_to_dashes_when_device_goes_quiet() {
    let server = FakeServer::default();
    let mut state = DashboardState::default();
    let mut poller = SnapshotPoller::new();

    server.push(device_doc("Tomatoes", 21.0, 0, 0));
    poller.poll_once(&&server, &mut state).await;

    let outcome = poller.poll_once(&&server, &mut state).await;
    assert!(matches!(outcome, PollOutcome::Failed(_)));

    let table = TableView::render(&state, at(60));
    let row = &table.rows[0];
    assert!(row.offline);
    assert_eq!(
        row.cell(&table.columns, Column::Sensor(SensorField::Temperature)),
        Some(&TableCell::Text(DASH.to_string()))
    );
}

#[tokio::test]
async fn should_feed_orientation_viewer_through_frames() {
    let server = FakeServer::default();
    let mut state = DashboardState::default();
    let mut poller = SnapshotPoller::new();
    server.push(device_doc("Tomatoes", 21.0, 0, 0));
    poller.poll_once(&&server, &mut state).await;

    let mut viewer = OrientationViewer::new(mac());
    for frame in OrientationFrame::all_from_state(&state) {
        let wire = frame.to_json().unwrap();
        viewer.apply(&OrientationFrame::from_json(&wire).unwrap());
    }

    assert!((viewer.rotation().x - 0.5).abs() < f64::EPSILON);
    viewer.reset();
    assert!(viewer.rotation().x.abs() < f64::EPSILON);
}
