//! Dashboard state: everything the renderers read, in one explicit object.
//!
//! The state lives for the lifetime of the page and is only touched from the
//! event loop, so it is a plain struct passed by reference.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use greenhub_domain::id::DeviceId;
use greenhub_domain::presence::Presence;
use greenhub_domain::sensor::SensorField;
use greenhub_domain::snapshot::{DeviceSnapshot, Snapshot};
use greenhub_domain::time::Timestamp;

use crate::config::{DashboardConfig, REFRESH_RANGE_MS};

/// A column of the data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Mac,
    Name,
    Sensor(SensorField),
    LastSeen,
    PumpMode,
    LightMode,
}

impl Column {
    /// Every column, in display order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut columns = vec![Self::Mac, Self::Name];
        columns.extend(SensorField::ALL.into_iter().map(Self::Sensor));
        columns.extend([Self::LastSeen, Self::PumpMode, Self::LightMode]);
        columns
    }

    /// Key used in configuration and as the checkbox id.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Mac => "mac",
            Self::Name => "name",
            Self::Sensor(field) => field.wire_key(),
            Self::LastSeen => "last_seen",
            Self::PumpMode => "pump",
            Self::LightMode => "light",
        }
    }

    /// Header text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mac => "MAC",
            Self::Name => "Name",
            Self::Sensor(field) => field.label(),
            Self::LastSeen => "Last Seen",
            Self::PumpMode => "Pump",
            Self::LightMode => "Light",
        }
    }

    /// Resolve a configuration key (sensor aliases included).
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "mac" => Some(Self::Mac),
            "name" => Some(Self::Name),
            "last_seen" | "lastSeen" => Some(Self::LastSeen),
            "pump" => Some(Self::PumpMode),
            "light" => Some(Self::LightMode),
            other => SensorField::from_key(other).map(Self::Sensor),
        }
    }
}

/// Independent on/off toggles per table column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: BTreeSet<Column>,
}

impl ColumnVisibility {
    #[must_use]
    pub fn is_visible(&self, column: Column) -> bool {
        !self.hidden.contains(&column)
    }

    pub fn set_visible(&mut self, column: Column, visible: bool) {
        if visible {
            self.hidden.remove(&column);
        } else {
            self.hidden.insert(column);
        }
    }

    /// Visible columns, in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<Column> {
        Column::all()
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }
}

/// Which sensor series the chart shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesVisibility {
    shown: BTreeSet<SensorField>,
}

impl Default for SeriesVisibility {
    fn default() -> Self {
        Self {
            shown: SensorField::CHARTED.into_iter().collect(),
        }
    }
}

impl SeriesVisibility {
    /// Show exactly the given fields (uncharted fields are ignored).
    #[must_use]
    pub fn only(fields: impl IntoIterator<Item = SensorField>) -> Self {
        Self {
            shown: fields.into_iter().filter(|f| f.is_charted()).collect(),
        }
    }

    #[must_use]
    pub fn is_shown(&self, field: SensorField) -> bool {
        self.shown.contains(&field)
    }

    /// Toggle a series. Returns whether anything changed.
    pub fn set_shown(&mut self, field: SensorField, shown: bool) -> bool {
        if !field.is_charted() {
            return false;
        }
        if shown {
            self.shown.insert(field)
        } else {
            self.shown.remove(&field)
        }
    }

    /// Shown fields, in the chart's canonical order.
    pub fn iter(&self) -> impl Iterator<Item = SensorField> + '_ {
        SensorField::CHARTED
            .into_iter()
            .filter(|field| self.shown.contains(field))
    }
}

/// Rename text the user has typed but not submitted, plus names confirmed
/// locally that the server has not echoed back yet.
#[derive(Debug, Clone, Default)]
pub struct RenameDrafts {
    drafts: HashMap<DeviceId, String>,
    overrides: HashMap<DeviceId, String>,
}

impl RenameDrafts {
    /// Record in-progress input for a device.
    pub fn edit(&mut self, device: &DeviceId, text: impl Into<String>) {
        self.drafts.insert(device.clone(), text.into());
    }

    /// Unsubmitted text for a device, if the user is editing it.
    #[must_use]
    pub fn draft(&self, device: &DeviceId) -> Option<&str> {
        self.drafts.get(device).map(String::as_str)
    }

    #[must_use]
    pub fn is_pending(&self, device: &DeviceId) -> bool {
        self.drafts.contains_key(device)
    }

    /// Drop unsubmitted text without renaming.
    pub fn discard(&mut self, device: &DeviceId) {
        self.drafts.remove(device);
    }

    /// Accept a submitted name: clear the draft and show the name locally.
    pub fn confirm(&mut self, device: &DeviceId, name: impl Into<String>) {
        self.drafts.remove(device);
        self.overrides.insert(device.clone(), name.into());
    }

    /// Locally confirmed name awaiting the server round-trip.
    #[must_use]
    pub fn override_name(&self, device: &DeviceId) -> Option<&str> {
        self.overrides.get(device).map(String::as_str)
    }

    /// Forget overrides the server now reports itself.
    pub fn settle(&mut self, snapshot: &Snapshot) {
        self.overrides.retain(|device, name| {
            snapshot
                .get(device)
                .and_then(|d| d.name.as_deref())
                .is_none_or(|server| server != name)
        });
    }
}

/// User-adjustable timing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    refresh_interval: Duration,
    offline_threshold: Duration,
    history_window: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl Settings {
    /// Build settings from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        let mut settings = Self {
            refresh_interval: Duration::ZERO,
            offline_threshold: Duration::ZERO,
            history_window: config.polling.history_window.max(1),
        };
        settings.set_refresh_interval_ms(config.polling.refresh_interval_ms);
        settings.set_offline_threshold_ms(config.polling.offline_threshold_ms);
        settings
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    #[must_use]
    pub fn offline_threshold(&self) -> Duration {
        self.offline_threshold
    }

    #[must_use]
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    /// Set the poll interval, clamped to the slider range.
    pub fn set_refresh_interval_ms(&mut self, ms: u64) {
        let ms = ms.clamp(*REFRESH_RANGE_MS.start(), *REFRESH_RANGE_MS.end());
        self.refresh_interval = Duration::from_millis(ms);
    }

    /// Set the offline threshold (at least one millisecond).
    ///
    /// Only the slider is bounded; configured thresholds may be longer.
    pub fn set_offline_threshold_ms(&mut self, ms: u64) {
        self.offline_threshold = Duration::from_millis(ms.max(1));
    }

    /// Set the chart history window (at least one point).
    pub fn set_history_window(&mut self, points: usize) {
        self.history_window = points.max(1);
    }
}

/// The whole dashboard's state.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    snapshot: Snapshot,
    snapshot_seq: u64,
    /// Last report of every device seen since the page loaded.
    known: BTreeMap<DeviceId, DeviceSnapshot>,
    pub settings: Settings,
    pub columns: ColumnVisibility,
    pub series: SeriesVisibility,
    pub renames: RenameDrafts,
    pub chart_device: Option<DeviceId>,
}

impl DashboardState {
    /// Initial state derived from configuration.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        let mut columns = ColumnVisibility::default();
        for column in config.hidden_columns() {
            columns.set_visible(column, false);
        }
        Self {
            settings: Settings::from_config(config),
            columns,
            series: SeriesVisibility::only(config.initial_series()),
            ..Self::default()
        }
    }

    /// The snapshot currently on screen.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Sequence number of the snapshot on screen (0 before the first poll).
    #[must_use]
    pub fn snapshot_seq(&self) -> u64 {
        self.snapshot_seq
    }

    /// Replace the snapshot if `seq` is newer than the one on screen.
    ///
    /// Returns `false` (and leaves the state untouched) for stale snapshots.
    pub fn apply_snapshot(&mut self, seq: u64, snapshot: Snapshot) -> bool {
        if seq <= self.snapshot_seq {
            return false;
        }
        self.renames.settle(&snapshot);
        for (id, device) in snapshot.iter() {
            self.known.insert(id.clone(), device.clone());
        }
        self.snapshot = snapshot;
        self.snapshot_seq = seq;
        true
    }

    /// Look up a device in the current snapshot.
    #[must_use]
    pub fn device(&self, id: &DeviceId) -> Option<&DeviceSnapshot> {
        self.snapshot.get(id)
    }

    /// Every device reported since the page loaded, in id order.
    ///
    /// Devices missing from the latest snapshot stay listed with their last
    /// report, so they age out to offline instead of vanishing.
    pub fn known_ids(&self) -> impl Iterator<Item = &DeviceId> {
        self.known.keys()
    }

    /// Latest report of a device, even if the current snapshot dropped it.
    #[must_use]
    pub fn known_device(&self, id: &DeviceId) -> Option<&DeviceSnapshot> {
        self.snapshot.get(id).or_else(|| self.known.get(id))
    }

    /// Presence of a device at `now` under the current threshold.
    #[must_use]
    pub fn presence(&self, id: &DeviceId, now: Timestamp) -> Presence {
        let device = self.known_device(id);
        Presence::assess(
            device.and_then(|d| d.last_seen),
            device.and_then(|d| d.online),
            now,
            self.settings.offline_threshold(),
        )
    }

    /// Name to display: local override, then server name, then address.
    #[must_use]
    pub fn display_name(&self, id: &DeviceId) -> String {
        if let Some(name) = self.renames.override_name(id) {
            return name.to_string();
        }
        self.known_device(id)
            .and_then(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Text for a rename input: pending draft, override, or server name.
    #[must_use]
    pub fn rename_input(&self, id: &DeviceId) -> String {
        if let Some(draft) = self.renames.draft(id) {
            return draft.to_string();
        }
        if let Some(name) = self.renames.override_name(id) {
            return name.to_string();
        }
        self.known_device(id)
            .and_then(|d| d.name.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn id(raw: &str) -> DeviceId {
        raw.parse().unwrap()
    }

    fn named(name: &str) -> DeviceSnapshot {
        DeviceSnapshot {
            name: Some(name.to_string()),
            ..DeviceSnapshot::default()
        }
    }

    fn snapshot_with(device: &str, name: &str) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(id(device), named(name));
        snapshot
    }

    #[test]
    fn should_resolve_column_keys_and_aliases() {
        assert_eq!(Column::from_key("mac"), Some(Column::Mac));
        assert_eq!(
            Column::from_key("tempC"),
            Some(Column::Sensor(SensorField::Temperature))
        );
        assert_eq!(Column::from_key("lastSeen"), Some(Column::LastSeen));
        assert_eq!(Column::from_key("nope"), None);
    }

    #[test]
    fn should_hide_and_show_columns_independently() {
        let mut columns = ColumnVisibility::default();
        columns.set_visible(Column::Mac, false);
        assert!(!columns.is_visible(Column::Mac));
        assert!(columns.is_visible(Column::Name));
        columns.set_visible(Column::Mac, true);
        assert_eq!(columns.visible(), Column::all());
    }

    #[test]
    fn should_ignore_uncharted_series() {
        let mut series = SeriesVisibility::default();
        assert!(!series.set_shown(SensorField::Ping, true));
        assert!(!series.is_shown(SensorField::Ping));
    }

    #[test]
    fn should_keep_series_in_canonical_order() {
        let series =
            SeriesVisibility::only([SensorField::LightLevel, SensorField::Temperature]);
        let order: Vec<_> = series.iter().collect();
        assert_eq!(order, [SensorField::Temperature, SensorField::LightLevel]);
    }

    #[test]
    fn should_clamp_refresh_interval_and_history_window() {
        let mut settings = Settings::default();
        settings.set_refresh_interval_ms(0);
        settings.set_history_window(0);
        assert_eq!(settings.refresh_interval(), Duration::from_millis(100));
        assert_eq!(settings.history_window(), 1);
    }

    #[test]
    fn should_keep_long_offline_threshold_and_floor_zero() {
        let mut settings = Settings::default();
        settings.set_offline_threshold_ms(60_000);
        assert_eq!(settings.offline_threshold(), Duration::from_secs(60));
        settings.set_offline_threshold_ms(0);
        assert_eq!(settings.offline_threshold(), Duration::from_millis(1));
    }

    #[test]
    fn should_reject_stale_snapshot() {
        let mut state = DashboardState::default();
        assert!(state.apply_snapshot(2, snapshot_with("AA", "new")));
        assert!(!state.apply_snapshot(1, snapshot_with("AA", "old")));
        assert_eq!(state.display_name(&id("AA")), "new");
        assert_eq!(state.snapshot_seq(), 2);
    }

    #[test]
    fn should_prefer_override_until_server_echoes_it() {
        let mut state = DashboardState::default();
        state.apply_snapshot(1, snapshot_with("AA", "old"));
        state.renames.confirm(&id("AA"), "Basil");
        assert_eq!(state.display_name(&id("AA")), "Basil");

        state.apply_snapshot(2, snapshot_with("AA", "old"));
        assert_eq!(state.display_name(&id("AA")), "Basil");

        state.apply_snapshot(3, snapshot_with("AA", "Basil"));
        assert!(state.renames.override_name(&id("AA")).is_none());
        assert_eq!(state.display_name(&id("AA")), "Basil");
    }

    #[test]
    fn should_show_draft_in_rename_input() {
        let mut state = DashboardState::default();
        state.apply_snapshot(1, snapshot_with("AA", "old"));
        assert_eq!(state.rename_input(&id("AA")), "old");
        state.renames.edit(&id("AA"), "Bas");
        assert_eq!(state.rename_input(&id("AA")), "Bas");
    }

    #[test]
    fn should_fall_back_to_address_for_display_name() {
        let state = DashboardState::default();
        assert_eq!(state.display_name(&id("AA:BB")), "AA:BB");
    }

    #[test]
    fn should_use_configured_threshold_for_presence() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            id("AA"),
            DeviceSnapshot {
                last_seen: Some(base),
                ..DeviceSnapshot::default()
            },
        );
        let mut state = DashboardState::default();
        state.apply_snapshot(1, snapshot);
        state.settings.set_offline_threshold_ms(1000);

        let now = base + TimeDelta::milliseconds(2000);
        assert!(state.presence(&id("AA"), now).is_offline());
        state.settings.set_offline_threshold_ms(3000);
        assert!(!state.presence(&id("AA"), now).is_offline());
    }

    #[test]
    fn should_build_state_from_config() {
        let config = DashboardConfig::from_toml_str(
            "
            [table]
            hidden_columns = ['ping']

            [chart]
            series = ['HUM']
            ",
        )
        .unwrap();
        let state = DashboardState::from_config(&config);
        assert!(!state.columns.is_visible(Column::Sensor(SensorField::Ping)));
        assert!(state.series.is_shown(SensorField::Humidity));
        assert!(!state.series.is_shown(SensorField::Temperature));
    }

    #[test]
    fn should_honour_server_offline_flag_when_last_seen_is_ahead_of_clock() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            id("AA"),
            DeviceSnapshot {
                last_seen: Some(now + TimeDelta::hours(2)),
                online: Some(false),
                ..DeviceSnapshot::default()
            },
        );
        let mut state = DashboardState::default();
        state.apply_snapshot(1, snapshot);

        assert!(state.presence(&id("AA"), now).is_offline());
    }

    #[test]
    fn should_remember_devices_missing_from_latest_snapshot() {
        let mut state = DashboardState::default();
        state.apply_snapshot(1, snapshot_with("AA", "Basil"));
        state.apply_snapshot(2, snapshot_with("BB", "Mint"));

        let ids: Vec<_> = state.known_ids().map(DeviceId::as_str).collect();
        assert_eq!(ids, ["AA", "BB"]);
        assert!(state.device(&id("AA")).is_none());
        assert_eq!(state.display_name(&id("AA")), "Basil");
        assert_eq!(state.rename_input(&id("AA")), "Basil");
    }

    #[test]
    fn should_report_silent_device_offline_whatever_the_local_zone() {
        let doc = serde_json::json!({
            "AA": {"last_seen": "2024-01-01 02:00:00", "online": false}
        });
        let mut state = DashboardState::default();
        state.settings.set_offline_threshold_ms(5000);
        state.apply_snapshot(1, Snapshot::from_json(&doc));

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 10, 0).unwrap();
        assert!(state.presence(&id("AA"), now).is_offline());
    }
}
