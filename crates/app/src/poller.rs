//! Snapshot poller: sequences requests to the telemetry source.
//!
//! Every dispatched request gets a ticket. A response is applied only if its
//! ticket is newer than the snapshot on screen, so a slow response can never
//! overwrite data from a request dispatched after it.

use greenhub_domain::error::TransportError;
use greenhub_domain::snapshot::Snapshot;

use crate::ports::TelemetrySource;
use crate::state::DashboardState;

/// Sequence number handed out when a poll is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollTicket(u64);

impl PollTicket {
    #[must_use]
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// What happened to one poll's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The snapshot replaced the one on screen.
    Applied { devices: usize },
    /// A newer snapshot was already on screen; this one was dropped.
    Stale { ticket: u64, current: u64 },
    /// The request failed; the previous snapshot stays on screen.
    Failed(TransportError),
}

impl PollOutcome {
    /// Whether renderers need to run.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Issues poll tickets and applies responses in order.
#[derive(Debug, Default)]
pub struct SnapshotPoller {
    issued: u64,
}

impl SnapshotPoller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a ticket for a request about to be dispatched.
    pub fn begin(&mut self) -> PollTicket {
        self.issued += 1;
        PollTicket(self.issued)
    }

    /// Apply a response to the dashboard state.
    ///
    /// Failures are logged and leave the state untouched.
    pub fn complete(
        ticket: PollTicket,
        result: Result<Snapshot, TransportError>,
        state: &mut DashboardState,
    ) -> PollOutcome {
        match result {
            Ok(snapshot) => {
                let devices = snapshot.len();
                if state.apply_snapshot(ticket.seq(), snapshot) {
                    tracing::trace!(ticket = ticket.seq(), devices, "snapshot applied");
                    PollOutcome::Applied { devices }
                } else {
                    let current = state.snapshot_seq();
                    tracing::debug!(ticket = ticket.seq(), current, "discarding stale snapshot");
                    PollOutcome::Stale {
                        ticket: ticket.seq(),
                        current,
                    }
                }
            }
            Err(err) => {
                tracing::warn!(ticket = ticket.seq(), error = %err, "failed to fetch data");
                PollOutcome::Failed(err)
            }
        }
    }

    /// Fetch one snapshot and apply it.
    pub async fn poll_once<S: TelemetrySource>(
        &mut self,
        source: &S,
        state: &mut DashboardState,
    ) -> PollOutcome {
        let ticket = self.begin();
        let result = source.fetch_snapshot().await;
        Self::complete(ticket, result, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhub_domain::id::DeviceId;
    use greenhub_domain::snapshot::DeviceSnapshot;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::future::Future;

    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<Snapshot, TransportError>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Snapshot, TransportError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
            }
        }
    }

    impl TelemetrySource for ScriptedSource {
        fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, TransportError>> {
            let next = self
                .responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("fetch snapshot", "exhausted")));
            async { next }
        }
    }

    fn snapshot_named(name: &str) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            "AA:BB".parse::<DeviceId>().unwrap(),
            DeviceSnapshot {
                name: Some(name.to_string()),
                ..DeviceSnapshot::default()
            },
        );
        snapshot
    }

    #[test]
    fn should_issue_increasing_tickets() {
        let mut poller = SnapshotPoller::new();
        let a = poller.begin();
        let b = poller.begin();
        assert!(b > a);
    }

    #[tokio::test]
    async fn should_apply_successful_poll() {
        let source = ScriptedSource::new(vec![Ok(snapshot_named("one"))]);
        let mut poller = SnapshotPoller::new();
        let mut state = DashboardState::default();

        let outcome = poller.poll_once(&source, &mut state).await;

        assert_eq!(outcome, PollOutcome::Applied { devices: 1 });
        assert_eq!(state.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn should_keep_previous_snapshot_on_failure() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot_named("one")),
            Err(TransportError::new("fetch snapshot", "HTTP 500")),
        ]);
        let mut poller = SnapshotPoller::new();
        let mut state = DashboardState::default();

        poller.poll_once(&source, &mut state).await;
        let outcome = poller.poll_once(&source, &mut state).await;

        assert!(matches!(outcome, PollOutcome::Failed(_)));
        assert_eq!(state.snapshot(), &snapshot_named("one"));
        assert_eq!(state.snapshot_seq(), 1);
    }

    #[test]
    fn should_discard_response_that_arrives_after_newer_one() {
        let mut poller = SnapshotPoller::new();
        let mut state = DashboardState::default();

        let slow = poller.begin();
        let fast = poller.begin();

        let first = SnapshotPoller::complete(fast, Ok(snapshot_named("new")), &mut state);
        let second = SnapshotPoller::complete(slow, Ok(snapshot_named("old")), &mut state);

        assert!(first.is_applied());
        assert_eq!(
            second,
            PollOutcome::Stale {
                ticket: 1,
                current: 2
            }
        );
        assert_eq!(state.snapshot(), &snapshot_named("new"));
    }
}
