//! Snapshots: the full device map returned by one poll of `GET /data`.
//!
//! Parsing is deliberately lenient: a malformed field degrades to "missing"
//! (rendered as a placeholder) instead of failing the whole snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::actuator::{Actuator, ActuatorMode};
use crate::history::HistoryPoint;
use crate::id::DeviceId;
use crate::sensor::Readings;
use crate::time::{Timestamp, from_epoch_millis, parse_timestamp};

/// Current state of one device as reported by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    /// Display name assigned server-side, if any.
    pub name: Option<String>,
    /// Latest sensor values.
    pub readings: Readings,
    /// Pump mode, if the device has a pump.
    pub pump: Option<ActuatorMode>,
    /// Light mode, if the device has a light.
    pub light: Option<ActuatorMode>,
    /// When the device last reported.
    pub last_seen: Option<Timestamp>,
    /// Server-side online flag. Presence is recomputed from `last_seen`; the
    /// flag only decides when `last_seen` is ahead of the local clock.
    pub online: Option<bool>,
    /// Recent samples, oldest first.
    pub history: Vec<HistoryPoint>,
}

impl DeviceSnapshot {
    /// Build a device snapshot from its JSON object.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let name = match object.get("name") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        };
        let last_seen = object
            .get("last_seen")
            .or_else(|| object.get("lastSeen"))
            .and_then(parse_last_seen);
        let history = match object.get("history") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(HistoryPoint::from_json_object)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            name,
            readings: Readings::from_json_object(object),
            pump: parse_mode(object, Actuator::Pump),
            light: parse_mode(object, Actuator::Light),
            last_seen,
            online: object.get("online").and_then(Value::as_bool),
            history,
        }
    }

    /// Mode of the given actuator.
    #[must_use]
    pub fn mode(&self, actuator: Actuator) -> Option<ActuatorMode> {
        match actuator {
            Actuator::Pump => self.pump,
            Actuator::Light => self.light,
        }
    }

    /// Name to show for this device, falling back to its address.
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a DeviceId) -> &'a str {
        self.name.as_deref().unwrap_or(id.as_str())
    }
}

fn parse_last_seen(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(from_epoch_millis),
        _ => None,
    }
}

fn parse_mode(object: &Map<String, Value>, actuator: Actuator) -> Option<ActuatorMode> {
    object
        .get(actuator.wire_key())
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}

/// All devices known at the time of one poll, ordered by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    devices: BTreeMap<DeviceId, DeviceSnapshot>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a decoded JSON document.
    ///
    /// Accepts both `{mac: {...}}` and `{"devices": {mac: {...}}}`.
    /// Entries whose key is blank or whose value is not an object are skipped.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::new();
        };
        let devices = match root.get("devices") {
            Some(Value::Object(inner)) => inner,
            _ => root,
        };

        let mut snapshot = Self::new();
        for (key, entry) in devices {
            let (Ok(id), Some(object)) = (DeviceId::new(key.as_str()), entry.as_object()) else {
                continue;
            };
            snapshot.insert(id, DeviceSnapshot::from_json_object(object));
        }
        snapshot
    }

    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error only when `text` is not valid JSON.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&value))
    }

    /// Insert or replace a device.
    pub fn insert(&mut self, id: DeviceId, device: DeviceSnapshot) {
        self.devices.insert(id, device);
    }

    /// Look up a device.
    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<&DeviceSnapshot> {
        self.devices.get(id)
    }

    /// Iterate devices in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceId, &DeviceSnapshot)> {
        self.devices.iter()
    }

    /// Iterate device ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.devices.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}
