//! Data table view: one row per device, one cell per visible column.

use greenhub_domain::actuator::{Actuator, ActuatorMode};
use greenhub_domain::id::DeviceId;
use greenhub_domain::ping::PingQuality;
use greenhub_domain::sensor::SensorField;
use greenhub_domain::time::{Timestamp, format_clock};

use crate::format::{self, DASH};
use crate::state::{Column, DashboardState};

/// Content of one table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    /// Plain text.
    Text(String),
    /// Rename text box, pre-filled with `value`.
    NameInput { value: String },
    /// Latency with a quality colour.
    Ping { text: String, quality: PingQuality },
    /// Actuator mode selector.
    Mode {
        actuator: Actuator,
        mode: Option<ActuatorMode>,
    },
}

/// One device's row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub device: DeviceId,
    pub offline: bool,
    pub cells: Vec<TableCell>,
}

/// Rendered table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Render every device reported since the page loaded, sorted by id.
    ///
    /// A device missing from the latest snapshot keeps its row, drawn from
    /// its last report.
    ///
    /// Hidden columns produce no cell at all. Sensor cells of offline devices
    /// show the dash placeholder regardless of the values reported.
    #[must_use]
    pub fn render(state: &DashboardState, now: Timestamp) -> Self {
        let columns = state.columns.visible();
        let rows = state
            .known_ids()
            .map(|id| render_row(state, id, &columns, now))
            .collect();
        Self { columns, rows }
    }

    #[must_use]
    pub fn row(&self, device: &DeviceId) -> Option<&TableRow> {
        self.rows.iter().find(|row| &row.device == device)
    }
}

impl TableRow {
    /// Cell for a column, if that column is visible.
    #[must_use]
    pub fn cell<'a>(&'a self, columns: &[Column], column: Column) -> Option<&'a TableCell> {
        let index = columns.iter().position(|c| *c == column)?;
        self.cells.get(index)
    }
}

fn render_row(state: &DashboardState, id: &DeviceId, columns: &[Column], now: Timestamp) -> TableRow {
    let device = state.known_device(id);
    let offline = state.presence(id, now).is_offline();
    let reading = |field: SensorField| device.and_then(|d| d.readings.get(field));

    let cells = columns
        .iter()
        .map(|column| match *column {
            Column::Mac => TableCell::Text(id.to_string()),
            Column::Name => TableCell::NameInput {
                value: state.rename_input(id),
            },
            Column::Sensor(SensorField::Ping) => {
                let ping = reading(SensorField::Ping);
                TableCell::Ping {
                    text: if offline {
                        DASH.to_string()
                    } else {
                        format::ping(ping)
                    },
                    quality: PingQuality::classify(ping),
                }
            }
            Column::Sensor(field) => {
                let value = if offline { None } else { reading(field) };
                TableCell::Text(format::reading(value))
            }
            Column::LastSeen => {
                let text = match device.and_then(|d| d.last_seen) {
                    Some(ts) if !offline => format_clock(&ts),
                    _ => "Offline".to_string(),
                };
                TableCell::Text(text)
            }
            Column::PumpMode => TableCell::Mode {
                actuator: Actuator::Pump,
                mode: device.and_then(|d| d.pump),
            },
            Column::LightMode => TableCell::Mode {
                actuator: Actuator::Light,
                mode: device.and_then(|d| d.light),
            },
        })
        .collect();

    TableRow {
        device: id.clone(),
        offline,
        cells,
    }
}
