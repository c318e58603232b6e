use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::use_query_map,
    path,
};

pub mod api;
mod components;
mod context;
mod poll;

use components::{ChartModal, DataTable, DeviceCards, OrientationPage, SettingsMenu};
use context::Dashboard;
use greenhub_app::config::DashboardConfig;
use greenhub_domain::id::DeviceId;

/// Settings baked into the bundle at build time.
const CONFIG_TOML: &str = include_str!("../dashboard.toml");

fn load_config() -> DashboardConfig {
    DashboardConfig::from_toml_str(CONFIG_TOML).unwrap_or_else(|err| {
        leptos::logging::warn!("ignoring dashboard.toml: {err}");
        DashboardConfig::default()
    })
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main>
                <Routes fallback=|| view! { <Home/> }>
                    <Route path=path!("/") view=Home/>
                </Routes>
            </main>
        </Router>
    }
}

/// Either the dashboard, or the orientation viewer when opened as
/// `?viewer=<device>` in a popup window.
#[component]
fn Home() -> impl IntoView {
    let query = use_query_map();
    let viewer = query
        .read_untracked()
        .get("viewer")
        .and_then(|raw| raw.parse::<DeviceId>().ok());

    match viewer {
        Some(device) => view! { <OrientationPage device/> }.into_any(),
        None => view! { <DashboardPage/> }.into_any(),
    }
}

#[component]
fn DashboardPage() -> impl IntoView {
    let config = load_config();
    let dashboard = Dashboard::new(&config);
    provide_context(dashboard);
    poll::start(dashboard);

    view! {
        <h1>"Greenhouse Devices"</h1>
        <SettingsMenu/>
        <DeviceCards/>
        <DataTable/>
        <ChartModal/>
    }
}
