//! Commands sent to the telemetry server.

use serde::{Deserialize, Serialize};

use crate::actuator::{Actuator, ActuatorMode};
use crate::error::ValidationError;
use crate::id::DeviceId;

/// A validated, trimmed, non-empty device name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceName(String);

impl DeviceName {
    /// Trim `raw` and reject it if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assign a new display name to a device (`POST /rename`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCommand {
    pub device: DeviceId,
    pub name: DeviceName,
}

impl RenameCommand {
    /// Form fields for the `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        [("mac", self.device.as_str()), ("name", self.name.as_str())]
    }
}

/// Change the mode of one actuator on a device (`POST /actuator`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub device: DeviceId,
    pub actuator: Actuator,
    pub mode: ActuatorMode,
}

impl ActuatorCommand {
    /// Form fields for the `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("mac", self.device.as_str()),
            ("actuator", self.actuator.as_str()),
            ("mode", self.mode.as_str()),
        ]
    }
}
