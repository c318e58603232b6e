//! Settings menu: column toggles and the refresh/offline sliders.

use greenhub_app::config::{OFFLINE_RANGE_MS, OFFLINE_STEP_MS, REFRESH_RANGE_MS, REFRESH_STEP_MS};
use greenhub_app::state::Column;
use leptos::prelude::*;

use crate::context::use_dashboard;

/// Checkboxes for every table column plus the two timing sliders.
#[component]
pub fn SettingsMenu() -> impl IntoView {
    let dashboard = use_dashboard();
    let refresh_ms = move || {
        dashboard
            .state
            .with(|s| s.settings.refresh_interval().as_millis())
    };
    let offline_ms = move || {
        dashboard
            .state
            .with(|s| s.settings.offline_threshold().as_millis())
    };

    view! {
        <div id="menu" class="settings-menu">
            <div class="column-toggles">
                {Column::all()
                    .into_iter()
                    .map(|column| {
                        let checked = move || dashboard.state.with(|s| s.columns.is_visible(column));
                        view! {
                            <label class="column-toggle">
                                <input
                                    type="checkbox"
                                    id=format!("chk_{}", column.key())
                                    prop:checked=checked
                                    on:change=move |ev| {
                                        dashboard.set_column_visible(column, event_target_checked(&ev));
                                    }
                                />
                                " " {column.label()}
                            </label>
                        }
                    })
                    .collect_view()}
            </div>

            <label>"Refresh Rate (ms): " {refresh_ms}</label>
            <input
                type="range"
                min=*REFRESH_RANGE_MS.start()
                max=*REFRESH_RANGE_MS.end()
                step=REFRESH_STEP_MS
                prop:value=move || refresh_ms().to_string()
                on:input=move |ev| {
                    if let Ok(ms) = event_target_value(&ev).parse() {
                        dashboard.set_refresh_interval_ms(ms);
                    }
                }
            />

            <label>"Offline Threshold (ms): " {offline_ms}</label>
            <input
                type="range"
                min=*OFFLINE_RANGE_MS.start()
                max=*OFFLINE_RANGE_MS.end()
                step=OFFLINE_STEP_MS
                prop:value=move || offline_ms().to_string()
                on:input=move |ev| {
                    if let Ok(ms) = event_target_value(&ev).parse() {
                        dashboard.set_offline_threshold_ms(ms);
                    }
                }
            />
        </div>
    }
}
