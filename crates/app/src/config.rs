//! Configuration loading: TOML document with per-section defaults.
//!
//! The dashboard ships an optional `dashboard.toml`. Every field has a
//! sensible default so the document may be empty. An out-of-range refresh
//! interval is clamped to what its slider allows. The offline threshold is
//! taken as configured, which may exceed its slider's range.

use std::ops::RangeInclusive;

use greenhub_domain::sensor::SensorField;
use serde::Deserialize;

use crate::state::Column;

/// Refresh interval slider bounds, in milliseconds.
pub const REFRESH_RANGE_MS: RangeInclusive<u64> = 100..=5000;
/// Refresh interval slider step, in milliseconds.
pub const REFRESH_STEP_MS: u64 = 100;
/// Offline threshold slider bounds, in milliseconds.
pub const OFFLINE_RANGE_MS: RangeInclusive<u64> = 1..=5000;
/// Offline threshold slider step, in milliseconds.
pub const OFFLINE_STEP_MS: u64 = 10;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Polling and presence settings.
    pub polling: PollingConfig,
    /// Data table settings.
    pub table: TableConfig,
    /// History chart settings.
    pub chart: ChartConfig,
    /// Server endpoints.
    pub endpoints: EndpointsConfig,
}

/// Poll cadence and offline detection.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between two polls of the data endpoint.
    pub refresh_interval_ms: u64,
    /// Age after which a device is shown as offline.
    pub offline_threshold_ms: u64,
    /// Number of most recent history points kept for charting.
    pub history_window: usize,
}

/// Column visibility for the data table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Column keys hidden on first load (e.g. `"mic"`, `"last_seen"`).
    pub hidden_columns: Vec<String>,
}

/// Initial chart series.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Wire keys of the series shown when the chart opens.
    pub series: Vec<String>,
}

/// Paths of the server endpoints.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// `GET` endpoint returning the device map.
    pub data: String,
    /// `POST` endpoint assigning a display name.
    pub rename: String,
    /// `POST` endpoint changing an actuator mode.
    pub actuator: String,
}

impl DashboardConfig {
    /// Parse configuration from TOML text, then clamp and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for unknown keys, an empty history window,
    /// or a zero offline threshold.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.clamp();
        config.validate()?;
        Ok(config)
    }

    fn clamp(&mut self) {
        self.polling.refresh_interval_ms = self
            .polling
            .refresh_interval_ms
            .clamp(*REFRESH_RANGE_MS.start(), *REFRESH_RANGE_MS.end());
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.offline_threshold_ms == 0 {
            return Err(ConfigError::Validation(
                "offline_threshold_ms must be at least 1".to_string(),
            ));
        }
        if self.polling.history_window == 0 {
            return Err(ConfigError::Validation(
                "history_window must be at least 1".to_string(),
            ));
        }
        if let Some(key) = self
            .table
            .hidden_columns
            .iter()
            .find(|key| Column::from_key(key).is_none())
        {
            return Err(ConfigError::Validation(format!("unknown column {key:?}")));
        }
        if let Some(key) = self
            .chart
            .series
            .iter()
            .find(|key| !SensorField::from_key(key).is_some_and(SensorField::is_charted))
        {
            return Err(ConfigError::Validation(format!(
                "unknown chart series {key:?}"
            )));
        }
        Ok(())
    }

    /// Columns hidden on first load.
    #[must_use]
    pub fn hidden_columns(&self) -> Vec<Column> {
        self.table
            .hidden_columns
            .iter()
            .filter_map(|key| Column::from_key(key))
            .collect()
    }

    /// Series shown when the chart first opens.
    #[must_use]
    pub fn initial_series(&self) -> Vec<SensorField> {
        self.chart
            .series
            .iter()
            .filter_map(|key| SensorField::from_key(key))
            .filter(|field| field.is_charted())
            .collect()
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1000,
            offline_threshold_ms: 5000,
            history_window: 50,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            series: SensorField::CHARTED
                .iter()
                .map(|field| field.wire_key().to_string())
                .collect(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            data: "/data".to_string(),
            rename: "/rename".to_string(),
            actuator: "/actuator".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse dashboard config")]
    Parse(#[from] toml::de::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.polling.refresh_interval_ms, 1000);
        assert_eq!(config.polling.offline_threshold_ms, 5000);
        assert_eq!(config.polling.history_window, 50);
        assert_eq!(config.endpoints.data, "/data");
        assert_eq!(config.endpoints.actuator, "/actuator");
        assert_eq!(config.initial_series(), SensorField::CHARTED.to_vec());
        assert!(config.hidden_columns().is_empty());
    }

    #[test]
    fn should_parse_empty_toml() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config.polling.refresh_interval_ms, 1000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [polling]
            refresh_interval_ms = 2500
            offline_threshold_ms = 3000
            history_window = 20

            [table]
            hidden_columns = ['mic', 'last_seen']

            [chart]
            series = ['TEMP', 'HUM']

            [endpoints]
            data = '/api/data'
            rename = '/api/rename'
            actuator = '/api/actuator'
        ";
        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.polling.refresh_interval_ms, 2500);
        assert_eq!(config.polling.offline_threshold_ms, 3000);
        assert_eq!(config.polling.history_window, 20);
        assert_eq!(
            config.hidden_columns(),
            vec![Column::Sensor(SensorField::Microphone), Column::LastSeen]
        );
        assert_eq!(
            config.initial_series(),
            vec![SensorField::Temperature, SensorField::Humidity]
        );
        assert_eq!(config.endpoints.data, "/api/data");
    }

    #[test]
    fn should_clamp_refresh_interval_into_slider_range() {
        let toml = "
            [polling]
            refresh_interval_ms = 10
        ";
        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.polling.refresh_interval_ms, 100);
    }

    #[test]
    fn should_accept_offline_threshold_beyond_slider_range() {
        let toml = "
            [polling]
            offline_threshold_ms = 60000
        ";
        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.polling.offline_threshold_ms, 60_000);
        let settings = crate::state::Settings::from_config(&config);
        assert_eq!(
            settings.offline_threshold(),
            std::time::Duration::from_secs(60)
        );
    }

    #[test]
    fn should_reject_zero_offline_threshold() {
        let toml = "
            [polling]
            offline_threshold_ms = 0
        ";
        let result = DashboardConfig::from_toml_str(toml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_history_window() {
        let toml = "
            [polling]
            history_window = 0
        ";
        let result = DashboardConfig::from_toml_str(toml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_unknown_column() {
        let toml = "
            [table]
            hidden_columns = ['colour']
        ";
        assert!(matches!(
            DashboardConfig::from_toml_str(toml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn should_reject_uncharted_series() {
        let toml = "
            [chart]
            series = ['ping']
        ";
        assert!(DashboardConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result = DashboardConfig::from_toml_str("invalid {{{");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
