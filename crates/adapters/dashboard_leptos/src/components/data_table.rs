//! Data table with user-selectable columns.

use greenhub_app::render::TableCell;
use greenhub_app::state::Column;
use greenhub_domain::actuator::Actuator;
use greenhub_domain::id::DeviceId;
use leptos::prelude::*;

use super::{ModeSelect, open_viewer};
use crate::context::use_dashboard;

/// Table of all devices. Changing the visible columns rebuilds the table;
/// otherwise rows are keyed by device and cells update in place.
#[component]
pub fn DataTable() -> impl IntoView {
    let dashboard = use_dashboard();
    let columns = Memo::new(move |_| dashboard.table.with(|t| t.columns.clone()));
    let ids = move || {
        dashboard
            .table
            .with(|t| t.rows.iter().map(|r| r.device.clone()).collect::<Vec<_>>())
    };

    view! {
        <table class="data-table">
            <thead>
                <tr>
                    {move || {
                        columns
                            .get()
                            .into_iter()
                            .map(|c| view! { <th>{c.label()}</th> })
                            .collect_view()
                    }}
                    <th>"Model"</th>
                </tr>
            </thead>
            <tbody id="data-table-body">
                {move || {
                    let columns = columns.get();
                    view! {
                        <For each=ids key=|id| id.clone() let(device)>
                            <DataRow device columns=columns.clone()/>
                        </For>
                    }
                }}
            </tbody>
        </table>
    }
}

#[component]
fn DataRow(device: DeviceId, columns: Vec<Column>) -> impl IntoView {
    let dashboard = use_dashboard();
    let offline = {
        let device = device.clone();
        Memo::new(move |_| {
            dashboard
                .table
                .with(|t| t.row(&device).is_some_and(|r| r.offline))
        })
    };

    let cells = columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| {
            let cell = {
                let device = device.clone();
                Memo::new(move |_| {
                    dashboard
                        .table
                        .with(|t| t.row(&device).and_then(|r| r.cells.get(index).cloned()))
                })
            };
            view! { <DataCell device=device.clone() column cell/> }
        })
        .collect_view();

    let show_model = move |_| open_viewer(dashboard, &device);

    view! {
        <tr class:offline=offline>
            {cells}
            <td>
                <button on:click=show_model>"Show Model"</button>
            </td>
        </tr>
    }
}

#[component]
fn DataCell(device: DeviceId, column: Column, cell: Memo<Option<TableCell>>) -> impl IntoView {
    let dashboard = use_dashboard();

    match column {
        Column::Name => {
            let value = Memo::new(move |_| match cell.get() {
                Some(TableCell::NameInput { value }) => value,
                _ => String::new(),
            });
            let edit_device = device.clone();
            view! {
                <td>
                    <input
                        type="text"
                        placeholder="Rename device..."
                        class="rename-input"
                        prop:value=value
                        on:input=move |ev| dashboard.edit_name(&edit_device, event_target_value(&ev))
                        on:change=move |_| dashboard.submit_rename(device.clone())
                    />
                </td>
            }
            .into_any()
        }
        Column::PumpMode | Column::LightMode => {
            let actuator = match cell.get_untracked() {
                Some(TableCell::Mode { actuator, .. }) => actuator,
                _ if column == Column::PumpMode => Actuator::Pump,
                _ => Actuator::Light,
            };
            let mode = Signal::derive(move || match cell.get() {
                Some(TableCell::Mode { mode, .. }) => mode,
                _ => None,
            });
            view! { <td><ModeSelect device actuator mode/></td> }.into_any()
        }
        _ => {
            let text = move || match cell.get() {
                Some(TableCell::Text(text) | TableCell::Ping { text, .. }) => text,
                _ => String::new(),
            };
            let color = move || match cell.get() {
                Some(TableCell::Ping { quality, .. }) => Some(format!("color: {}", quality.color())),
                _ => None,
            };
            view! { <td style=color>{text}</td> }.into_any()
        }
    }
}
