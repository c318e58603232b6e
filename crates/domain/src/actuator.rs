//! Actuators (pump, light) and the modes they can be driven in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating mode of an actuator.
///
/// `Auto` lets the device decide from its own sensors (soil moisture for the
/// pump, ambient light for the lamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActuatorMode {
    #[default]
    Off,
    On,
    Auto,
}

impl ActuatorMode {
    /// Every mode, in selector order.
    pub const ALL: [Self; 3] = [Self::Off, Self::On, Self::Auto];

    /// Wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
            Self::Auto => "AUTO",
        }
    }
}

impl fmt::Display for ActuatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown actuator mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown actuator mode {0:?}")]
pub struct UnknownModeError(pub String);

impl FromStr for ActuatorMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "ON" => Ok(Self::On),
            "AUTO" => Ok(Self::Auto),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}

/// A controllable output on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Pump,
    Light,
}

impl Actuator {
    /// Every actuator, in display order.
    pub const ALL: [Self; 2] = [Self::Pump, Self::Light];

    /// Name used in command payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Light => "light",
        }
    }

    /// Key under which the server reports this actuator's mode.
    #[must_use]
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Pump => "PUMP",
            Self::Light => "LIGHT",
        }
    }

    /// Label shown next to the mode selector.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pump => "Pump",
            Self::Light => "Light",
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_mode_case_insensitively() {
        assert_eq!("auto".parse::<ActuatorMode>(), Ok(ActuatorMode::Auto));
        assert_eq!(" ON ".parse::<ActuatorMode>(), Ok(ActuatorMode::On));
    }

    #[test]
    fn should_reject_unknown_mode() {
        assert!("BLINK".parse::<ActuatorMode>().is_err());
    }

    #[test]
    fn should_serialize_mode_uppercase() {
        let json = serde_json::to_string(&ActuatorMode::Auto).unwrap();
        assert_eq!(json, "\"AUTO\"");
    }

    #[test]
    fn should_default_to_off() {
        assert_eq!(ActuatorMode::default(), ActuatorMode::Off);
    }
}
