//! History points: timestamped readings used for charting.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::sensor::Readings;
use crate::time::{Timestamp, parse_timestamp};

/// One historical sample for a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    /// Label as sent by the server, shown on the chart's x axis.
    pub label: String,
    /// Parsed form of `label`, when it is a recognised timestamp.
    pub recorded_at: Option<Timestamp>,
    /// Sensor values captured at this instant.
    pub readings: Readings,
}

impl HistoryPoint {
    /// Create a point with a label and readings.
    #[must_use]
    pub fn new(label: impl Into<String>, readings: Readings) -> Self {
        let label = label.into();
        let recorded_at = parse_timestamp(&label);
        Self {
            label,
            recorded_at,
            readings,
        }
    }

    /// Build a point from a JSON object such as `{"ts": "...", "TEMP": 21.0}`.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let label = match object.get("ts") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Self::new(label, Readings::from_json_object(object))
    }
}

/// Return the most recent `cap` points, oldest first.
///
/// History arrives in chronological order, so the window is simply the tail.
#[must_use]
pub fn recent_window(history: &[HistoryPoint], cap: usize) -> &[HistoryPoint] {
    let start = history.len().saturating_sub(cap);
    &history[start..]
}
