//! Pump/light mode selector.

use greenhub_domain::actuator::{Actuator, ActuatorMode};
use greenhub_domain::id::DeviceId;
use leptos::prelude::*;

use crate::context::use_dashboard;

/// A `<select>` bound to an actuator's reported mode.
///
/// Changing it sends a command; the selector keeps showing the server's
/// mode until the next poll reports the new one.
#[component]
pub fn ModeSelect(
    device: DeviceId,
    actuator: Actuator,
    /// Mode as reported by the latest snapshot.
    #[prop(into)]
    mode: Signal<Option<ActuatorMode>>,
) -> impl IntoView {
    let dashboard = use_dashboard();
    let current = move || mode.get().unwrap_or_default().as_str();

    view! {
        <label class="mode-select">
            {actuator.label()} ":"
            <select
                class="form-select"
                prop:value=current
                on:change=move |ev| {
                    if let Ok(mode) = event_target_value(&ev).parse::<ActuatorMode>() {
                        dashboard.toggle(device.clone(), actuator, mode);
                    }
                }
            >
                {ActuatorMode::ALL
                    .into_iter()
                    .map(|m| view! { <option value=m.as_str()>{m.as_str()}</option> })
                    .collect_view()}
            </select>
        </label>
    }
}
