//! Telemetry port: where snapshots come from.

use std::future::Future;

use greenhub_domain::error::TransportError;
use greenhub_domain::snapshot::Snapshot;

/// Source of device snapshots (`GET /data` in production).
pub trait TelemetrySource {
    /// Fetch the full device map as it is right now.
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, TransportError>>;
}
