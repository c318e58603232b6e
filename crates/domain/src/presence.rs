//! Presence: whether a device is still reporting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Reachability of a device as seen by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Offline,
}

impl Presence {
    /// Derive presence from the age of the last report.
    ///
    /// A device that never reported is offline. Otherwise it goes offline
    /// once `now - last_seen` strictly exceeds `threshold`.
    #[must_use]
    pub fn evaluate(last_seen: Option<Timestamp>, now: Timestamp, threshold: Duration) -> Self {
        let Some(last_seen) = last_seen else {
            return Self::Offline;
        };
        let age_ms = (now - last_seen).num_milliseconds();
        let threshold_ms = i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX);
        if age_ms > threshold_ms {
            Self::Offline
        } else {
            Self::Online
        }
    }

    /// Like [`Presence::evaluate`], but a `last_seen` ahead of `now` is not
    /// trusted: the clocks disagree, so the server's own `online` flag decides
    /// and an unreported flag counts as online.
    #[must_use]
    pub fn assess(
        last_seen: Option<Timestamp>,
        reported_online: Option<bool>,
        now: Timestamp,
        threshold: Duration,
    ) -> Self {
        match last_seen {
            Some(seen) if seen > now => {
                if reported_online == Some(false) {
                    Self::Offline
                } else {
                    Self::Online
                }
            }
            _ => Self::evaluate(last_seen, now, threshold),
        }
    }

    #[must_use]
    pub fn is_offline(self) -> bool {
        matches!(self, Self::Offline)
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline => f.write_str("offline"),
        }
    }
}
