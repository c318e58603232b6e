//! Orientation viewer: a popup window drawing a device's wireframe model
//! from frames broadcast by the dashboard window.

use greenhub_app::orientation::{
    ORIENTATION_CHANNEL, OrientationFrame, OrientationViewer, project_model,
};
use greenhub_domain::id::DeviceId;
use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{BroadcastChannel, CanvasRenderingContext2d, MessageEvent};

use crate::context::Dashboard;

const VIEWER_SIZE: u32 = 400;
const STROKE: &str = "#2e7d32";

type Listener = Closure<dyn FnMut(MessageEvent)>;

/// Open the orientation viewer for `device` in a popup window.
pub fn open_viewer(dashboard: Dashboard, device: &DeviceId) {
    let window = window();
    if !dashboard.has_device(device) {
        let _ = window.alert_with_message("No data for this device.");
        return;
    }
    let url = format!("?viewer={device}");
    let target = format!("orientation-{device}");
    let features = format!("width={VIEWER_SIZE},height={VIEWER_SIZE}");
    match window.open_with_url_and_target_and_features(&url, &target, &features) {
        Ok(Some(_)) => {}
        _ => {
            let _ = window.alert_with_message("Popup blocked. Please allow popups for this site.");
        }
    }
}

/// Subscribe to orientation frames; every frame for this viewer's device
/// updates `viewer`.
fn subscribe(viewer: RwSignal<OrientationViewer>) -> Option<(BroadcastChannel, Listener)> {
    let channel = BroadcastChannel::new(ORIENTATION_CHANNEL).ok()?;
    let listener: Listener = Closure::new(move |ev: MessageEvent| {
        let Some(text) = ev.data().as_string() else {
            return;
        };
        if let Ok(frame) = OrientationFrame::from_json(&text) {
            viewer.update(|v| {
                v.apply(&frame);
            });
        }
    });
    channel.set_onmessage(Some(listener.as_ref().unchecked_ref()));
    Some((channel, listener))
}

fn draw(canvas: NodeRef<Canvas>, viewer: RwSignal<OrientationViewer>) -> Option<()> {
    let canvas = canvas.get_untracked()?;
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;
    let width = f64::from(canvas.width());
    let height = f64::from(canvas.height());
    let rotation = viewer.with_untracked(OrientationViewer::rotation);

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_stroke_style_str(STROKE);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for segment in project_model(rotation, width, height) {
        ctx.move_to(segment.from.0, segment.from.1);
        ctx.line_to(segment.to.0, segment.to.1);
    }
    ctx.stroke();
    Some(())
}

/// Draw one frame and schedule the next while the page is mounted.
fn animate(canvas: NodeRef<Canvas>, viewer: RwSignal<OrientationViewer>, alive: StoredValue<bool>) {
    request_animation_frame(move || {
        if !alive.try_get_value().unwrap_or(false) {
            return;
        }
        let _ = draw(canvas, viewer);
        animate(canvas, viewer, alive);
    });
}

/// Full-window viewer for one device.
#[component]
pub fn OrientationPage(device: DeviceId) -> impl IntoView {
    let title = format!("Orientation of {device}");
    let viewer = RwSignal::new(OrientationViewer::new(device));
    let canvas = NodeRef::<Canvas>::new();
    let alive = StoredValue::new(true);
    let subscription = StoredValue::new_local(subscribe(viewer));

    Effect::new(move |_| {
        if canvas.get().is_some() {
            animate(canvas, viewer, alive);
        }
    });

    on_cleanup(move || {
        alive.set_value(false);
        if let Some((channel, _listener)) = subscription.try_update_value(Option::take).flatten() {
            channel.set_onmessage(None);
            channel.close();
        }
    });

    view! {
        <div class="orientation-viewer">
            <h3>{title}</h3>
            <canvas node_ref=canvas width=VIEWER_SIZE height=VIEWER_SIZE></canvas>
            <button class="btn btn-secondary" on:click=move |_| viewer.update(OrientationViewer::reset)>
                "Reset Position"
            </button>
        </div>
    }
}
