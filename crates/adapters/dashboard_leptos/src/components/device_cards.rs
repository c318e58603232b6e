//! Device cards, one per known device.
//!
//! Cards are keyed by device id, so a card's DOM (and in particular its
//! rename input) survives every poll. Each field reads its own memo and only
//! touches the DOM when its text actually changes.

use greenhub_app::render::DeviceCard;
use greenhub_domain::actuator::Actuator;
use greenhub_domain::id::DeviceId;
use leptos::prelude::*;

use super::{ModeSelect, open_viewer};
use crate::context::use_dashboard;

/// Grid of device cards.
#[component]
pub fn DeviceCards() -> impl IntoView {
    let dashboard = use_dashboard();
    let ids = move || {
        dashboard
            .cards
            .with(|board| board.iter().map(|(id, _)| id.clone()).collect::<Vec<_>>())
    };

    view! {
        <div id="device-container" class="device-grid">
            <For each=ids key=|id| id.clone() let(device)>
                <DeviceCardView device/>
            </For>
        </div>
    }
}

#[component]
fn DeviceCardView(device: DeviceId) -> impl IntoView {
    let dashboard = use_dashboard();
    let card = {
        let device = device.clone();
        Memo::new(move |_| dashboard.cards.with(|board| board.get(&device).cloned()))
    };
    let field = move |f: fn(&DeviceCard) -> String| {
        Memo::new(move |_| card.with(|c| c.as_ref().map(f).unwrap_or_default()))
    };

    let title = field(|c| c.title.clone());
    let last_seen = field(|c| c.last_seen.clone());
    let rename_input = field(|c| c.rename_input.clone());
    let offline = Memo::new(move |_| card.with(|c| c.as_ref().is_some_and(|c| c.offline)));
    let pump = Signal::derive(move || card.with(|c| c.as_ref().and_then(|c| c.pump)));
    let light = Signal::derive(move || card.with(|c| c.as_ref().and_then(|c| c.light)));
    let values = move || card.with(|c| c.as_ref().map(|c| c.values.clone()).unwrap_or_default());

    let on_input = {
        let device = device.clone();
        move |ev| dashboard.edit_name(&device, event_target_value(&ev))
    };
    let submit = {
        let device = device.clone();
        move || dashboard.submit_rename(device.clone())
    };
    let submit_on_enter = {
        let submit = submit.clone();
        move |ev: leptos::ev::KeyboardEvent| {
            if ev.key() == "Enter" {
                submit();
            }
        }
    };
    let open_chart = {
        let device = device.clone();
        move |_| dashboard.open_chart(device.clone())
    };
    let show_model = {
        let device = device.clone();
        move |_| open_viewer(dashboard, &device)
    };

    view! {
        <div class="device-card" class:offline=offline id=format!("card-{device}")>
            <div class="card-title">{title}</div>
            {move || {
                values()
                    .into_iter()
                    .map(|v| view! {
                        <div class="sensor-row">
                            <span class="sensor-label">{v.field.label()} ":"</span>
                            " "
                            <span>{v.text}</span>
                        </div>
                    })
                    .collect_view()
            }}
            <div class="sensor-row">
                <span class="sensor-label">"Last Seen:"</span>
                " "
                <span>{last_seen}</span>
            </div>

            <div class="mt-2">
                <ModeSelect device=device.clone() actuator=Actuator::Pump mode=pump/>
                <ModeSelect device=device.clone() actuator=Actuator::Light mode=light/>
            </div>

            <div class="form-rename mt-2">
                <input
                    type="text"
                    placeholder="Rename device"
                    prop:value=rename_input
                    on:input=on_input
                    on:keydown=submit_on_enter
                />
                <button class="btn btn-sm btn-secondary" on:click=move |_| submit()>
                    "Rename"
                </button>
            </div>

            <button class="btn btn-primary mt-3 w-100" on:click=open_chart>"View Charts"</button>
            <button class="btn btn-secondary mt-2 w-100" on:click=show_model>"Show Model"</button>
        </div>
    }
}
