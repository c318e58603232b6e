//! Display formatting shared by the cards and the table.

use greenhub_domain::sensor::SensorField;

/// Placeholder shown for missing values and for offline devices.
pub const DASH: &str = "------";

/// Format a reading with two decimals, or the dash placeholder.
#[must_use]
pub fn reading(value: Option<f64>) -> String {
    value.map_or_else(|| DASH.to_string(), |v| format!("{v:.2}"))
}

/// Format a reading followed by the field's unit, if it has one.
#[must_use]
pub fn reading_with_unit(field: SensorField, value: Option<f64>) -> String {
    match (value, field.unit()) {
        (Some(v), Some(unit)) => format!("{v:.2} {unit}"),
        (Some(v), None) => format!("{v:.2}"),
        (None, _) => DASH.to_string(),
    }
}

/// Format a ping latency. Missing pings read `N/A` rather than a dash.
#[must_use]
pub fn ping(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |ms| format!("{ms} ms"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_format_two_decimals() {
        assert_eq!(reading(Some(22.5)), "22.50");
    }

    #[test]
    fn should_use_dash_for_missing() {
        assert_eq!(reading(None), DASH);
        assert_eq!(reading_with_unit(SensorField::Temperature, None), DASH);
    }

    #[test]
    fn should_append_unit() {
        assert_eq!(
            reading_with_unit(SensorField::Temperature, Some(21.0)),
            "21.00 °C"
        );
        assert_eq!(reading_with_unit(SensorField::SoilMoisture, Some(400.0)), "400.00");
    }

    #[test]
    fn should_format_ping() {
        assert_eq!(ping(Some(42.0)), "42 ms");
        assert_eq!(ping(None), "N/A");
    }
}
