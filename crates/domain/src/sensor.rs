//! Sensor fields and the readings a device reports for them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A measurable quantity reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    Temperature,
    TemperatureF,
    Humidity,
    SoilMoisture,
    SoilTemperature,
    LightLevel,
    Microphone,
    OrientationX,
    OrientationY,
    OrientationZ,
    Ping,
}

impl SensorField {
    /// Every field, in display order.
    pub const ALL: [Self; 11] = [
        Self::Temperature,
        Self::TemperatureF,
        Self::Humidity,
        Self::SoilMoisture,
        Self::SoilTemperature,
        Self::LightLevel,
        Self::Microphone,
        Self::OrientationX,
        Self::OrientationY,
        Self::OrientationZ,
        Self::Ping,
    ];

    /// Fields that can be plotted on the history chart.
    pub const CHARTED: [Self; 5] = [
        Self::Temperature,
        Self::Humidity,
        Self::SoilMoisture,
        Self::SoilTemperature,
        Self::LightLevel,
    ];

    /// Primary key used on the wire.
    #[must_use]
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Temperature => "TEMP",
            Self::TemperatureF => "tempF",
            Self::Humidity => "HUM",
            Self::SoilMoisture => "MOIST",
            Self::SoilTemperature => "SOILT",
            Self::LightLevel => "LIGHT_VAL",
            Self::Microphone => "mic",
            Self::OrientationX => "x",
            Self::OrientationY => "y",
            Self::OrientationZ => "z",
            Self::Ping => "ping",
        }
    }

    /// Alternative keys some firmware revisions send.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Temperature => &["tempC", "temp"],
            Self::Humidity => &["hum", "humidity"],
            Self::SoilMoisture => &["moist"],
            Self::SoilTemperature => &["soilT", "soilt"],
            Self::LightLevel => &["lightVal", "light_val"],
            _ => &[],
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temp (°C)",
            Self::TemperatureF => "Temp (°F)",
            Self::Humidity => "Humidity (%)",
            Self::SoilMoisture => "Soil Moisture",
            Self::SoilTemperature => "Soil Temp",
            Self::LightLevel => "Light",
            Self::Microphone => "Mic",
            Self::OrientationX => "X",
            Self::OrientationY => "Y",
            Self::OrientationZ => "Z",
            Self::Ping => "Ping",
        }
    }

    /// Unit suffix appended to formatted values, if any.
    #[must_use]
    pub fn unit(self) -> Option<&'static str> {
        match self {
            Self::Temperature => Some("°C"),
            Self::TemperatureF => Some("°F"),
            Self::Humidity => Some("%"),
            Self::Ping => Some("ms"),
            _ => None,
        }
    }

    /// Line colour on the history chart.
    #[must_use]
    pub fn chart_color(self) -> &'static str {
        match self {
            Self::Temperature => "red",
            Self::Humidity => "blue",
            Self::SoilMoisture => "green",
            Self::SoilTemperature => "orange",
            Self::LightLevel => "purple",
            _ => "gray",
        }
    }

    /// Whether the field appears on the history chart.
    #[must_use]
    pub fn is_charted(self) -> bool {
        Self::CHARTED.contains(&self)
    }

    /// Resolve a wire key (or alias) to its field.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.wire_key() == key || field.aliases().contains(&key))
    }
}

impl std::fmt::Display for SensorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Interpret a JSON value as a reading.
///
/// Devices send numbers either as JSON numbers or as numeric strings.
/// Anything that does not yield a finite number is treated as missing.
#[must_use]
pub fn parse_reading(value: &Value) -> Option<f64> {
    let num = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    num.is_finite().then_some(num)
}

/// The set of sensor values reported at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readings(BTreeMap<SensorField, f64>);

impl Readings {
    /// Create an empty set of readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every recognised field from a JSON object.
    ///
    /// The primary wire key wins over aliases when both are present.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut readings = Self::new();
        for field in SensorField::ALL {
            let value = std::iter::once(field.wire_key())
                .chain(field.aliases().iter().copied())
                .find_map(|key| object.get(key).and_then(parse_reading));
            if let Some(value) = value {
                readings.set(field, value);
            }
        }
        readings
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, field: SensorField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field's value.
    pub fn set(&mut self, field: SensorField, value: f64) {
        self.0.insert(field, value);
    }

    /// Look up a field's value.
    #[must_use]
    pub fn get(&self, field: SensorField) -> Option<f64> {
        self.0.get(&field).copied()
    }

    /// Whether no field was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_parse_numeric_string_reading() {
        assert_eq!(parse_reading(&json!("22.5")), Some(22.5));
        assert_eq!(parse_reading(&json!(" 40 ")), Some(40.0));
    }

    #[test]
    fn should_parse_json_number_reading() {
        assert_eq!(parse_reading(&json!(17)), Some(17.0));
    }

    #[test]
    fn should_treat_garbage_as_missing() {
        assert_eq!(parse_reading(&json!("n/a")), None);
        assert_eq!(parse_reading(&json!(null)), None);
        assert_eq!(parse_reading(&json!("NaN")), None);
        assert_eq!(parse_reading(&json!({"v": 1})), None);
    }

    #[test]
    fn should_resolve_aliases() {
        assert_eq!(SensorField::from_key("tempC"), Some(SensorField::Temperature));
        assert_eq!(SensorField::from_key("TEMP"), Some(SensorField::Temperature));
        assert_eq!(SensorField::from_key("bogus"), None);
    }

    #[test]
    fn should_extract_readings_from_object() {
        let value = json!({"TEMP": "22.5", "HUM": 40, "x": 0.5, "MOIST": "?"});
        let readings = Readings::from_json_object(value.as_object().unwrap());
        assert_eq!(readings.get(SensorField::Temperature), Some(22.5));
        assert_eq!(readings.get(SensorField::Humidity), Some(40.0));
        assert_eq!(readings.get(SensorField::OrientationX), Some(0.5));
        assert_eq!(readings.get(SensorField::SoilMoisture), None);
    }

    #[test]
    fn should_prefer_primary_key_over_alias() {
        let value = json!({"TEMP": 20, "tempC": 30});
        let readings = Readings::from_json_object(value.as_object().unwrap());
        assert_eq!(readings.get(SensorField::Temperature), Some(20.0));
    }

    #[test]
    fn should_only_chart_plant_sensors() {
        assert!(SensorField::Humidity.is_charted());
        assert!(!SensorField::Ping.is_charted());
        assert!(!SensorField::OrientationX.is_charted());
    }
}
