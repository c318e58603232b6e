//! # greenhub-app
//!
//! Application layer: dashboard state, renderers, use-cases, and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `TelemetrySource`: fetch the current device snapshot
//!   - `DeviceCommands`: rename devices and drive actuators
//! - Hold the explicit **dashboard state** (snapshot, settings, toggles,
//!   pending renames) that render functions read from
//! - Reconcile snapshots into **view models** for cards, the data table,
//!   and the history chart, independent of any DOM
//! - Sequence polls so late responses never overwrite newer data
//! - Build orientation frames for the 3D viewer channel
//!
//! ## Dependency rule
//! Depends on `greenhub-domain` only (plus serde/toml for configuration).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod config;
pub mod format;
pub mod orientation;
pub mod poller;
pub mod ports;
pub mod render;
pub mod services;
pub mod state;
