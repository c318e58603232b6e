//! # greenhub-domain
//!
//! Pure domain model for the greenhub sensor dashboard.
//!
//! ## Responsibilities
//! - Foundational types: device identifiers, error conventions, timestamps
//! - Define **readings** (sensor fields and their values) and **history points**
//! - Define **snapshots** (the device map returned by one poll)
//! - Define **presence** (online/offline derived from last-seen age)
//! - Define **commands** (rename, actuator mode changes)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.

pub mod error;
pub mod id;
pub mod time;

pub mod actuator;
pub mod command;
pub mod history;
pub mod ping;
pub mod presence;
pub mod sensor;
pub mod snapshot;
