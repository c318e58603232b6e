//! Periodic refresh loop.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::Dashboard;

/// Start polling the data endpoint until the page is torn down.
///
/// Each tick finishes its fetch before sleeping, and the interval is re-read
/// every tick so the refresh slider applies from the next poll.
pub fn start(dashboard: Dashboard) {
    let alive = StoredValue::new(true);
    on_cleanup(move || alive.set_value(false));

    spawn_local(async move {
        while alive.try_get_value().unwrap_or(false) {
            dashboard.refresh().await;
            let Some(interval) = dashboard
                .state
                .try_with_untracked(|s| s.settings.refresh_interval())
            else {
                break;
            };
            let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
            TimeoutFuture::new(millis).await;
        }
    });
}
