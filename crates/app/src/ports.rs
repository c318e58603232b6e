//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! The dashboard runs on a single-threaded event loop, so the returned futures
//! are not required to be `Send`.

pub mod commands;
pub mod telemetry;

pub use commands::DeviceCommands;
pub use telemetry::TelemetrySource;
