//! History chart modal using `leptos-chartistry` with SVG rendering.

use chrono::{DateTime, Utc};
use greenhub_app::render::ChartModel;
use greenhub_domain::sensor::SensorField;
use leptos::prelude::*;
use leptos_chartistry::*;

use crate::context::use_dashboard;

/// One instant across all shown series.
#[derive(Debug, Clone, PartialEq)]
struct ChartRow {
    timestamp: DateTime<Utc>,
    values: Vec<f64>,
}

/// Transpose the model's series into chart rows. Gaps become `NaN`, which
/// the renderer skips. Points whose label is not a timestamp cannot be placed
/// on the time axis and are left out.
fn rows_from_model(model: &ChartModel) -> Vec<ChartRow> {
    model
        .times
        .iter()
        .enumerate()
        .filter_map(|(index, time)| {
            Some(ChartRow {
                timestamp: (*time)?,
                values: model
                    .series
                    .iter()
                    .map(|s| s.points.get(index).copied().flatten().unwrap_or(f64::NAN))
                    .collect(),
            })
        })
        .collect()
}

/// Build timestamp tick labels (extracted to avoid turbofish inside `view!` macro).
fn timestamp_ticks() -> TickLabels<DateTime<Utc>> {
    TickLabels::timestamps()
}

/// Build a line series for the given `(label, position)` pairs.
fn build_series(lines: &[(&'static str, usize)]) -> Series<ChartRow, DateTime<Utc>, f64> {
    lines.iter().fold(
        Series::new(|row: &ChartRow| row.timestamp),
        |series, &(label, position)| {
            series.line(
                Line::new(move |row: &ChartRow| row.values.get(position).copied().unwrap_or(f64::NAN))
                    .with_name(label),
            )
        },
    )
}

/// Modal with the open device's history chart and series toggles.
#[component]
pub fn ChartModal() -> impl IntoView {
    let dashboard = use_dashboard();
    let open = Memo::new(move |_| dashboard.chart.with(|c| c.is_open()));
    let title = move || {
        dashboard.chart.with(|c| {
            c.model()
                .map(|m| format!("History for {}", m.device))
                .unwrap_or_default()
        })
    };

    view! {
        <Show when=move || open.get()>
            <div id="chartModal" class="modal">
                <div class="modal-content">
                    <div class="modal-header">
                        <h3>{title}</h3>
                        <button class="close" on:click=move |_| dashboard.close_chart()>
                            "×"
                        </button>
                    </div>
                    <SeriesToggles/>
                    <HistoryChart/>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn SeriesToggles() -> impl IntoView {
    let dashboard = use_dashboard();

    view! {
        <div class="series-toggles">
            {SensorField::CHARTED
                .into_iter()
                .map(|field| {
                    let checked = move || dashboard.state.with(|s| s.series.is_shown(field));
                    let id = format!("toggle{}", field.wire_key());
                    view! {
                        <label style=format!("color: {}", field.chart_color())>
                            <input
                                type="checkbox"
                                id=id
                                prop:checked=checked
                                on:change=move |ev| {
                                    dashboard.set_series_visible(field, event_target_checked(&ev));
                                }
                            />
                            {field.label()}
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// The chart itself. A new generation remounts the chart with the new
/// series set; patches only replace its data.
#[component]
fn HistoryChart() -> impl IntoView {
    let dashboard = use_dashboard();
    let generation = Memo::new(move |_| {
        dashboard
            .chart
            .with(|c| c.model().map(|m| m.generation))
    });
    let rows = Memo::new(move |_| {
        dashboard
            .chart
            .with(|c| c.model().map(rows_from_model).unwrap_or_default())
    });
    let labels = Memo::new(move |_| {
        dashboard
            .chart
            .with(|c| c.model().map(|m| m.labels.clone()).unwrap_or_default())
    });

    let chart = move || {
        generation.get()?;
        let lines: Vec<(&'static str, usize)> = dashboard.chart.with_untracked(|c| {
            c.model()
                .map(|m| m.series.iter().enumerate().map(|(i, s)| (s.label, i)).collect())
                .unwrap_or_default()
        });
        if lines.is_empty() {
            return Some(view! { <p><em>"No series selected."</em></p> }.into_any());
        }
        let inner = vec![
            AxisMarker::left_edge().into_inner(),
            AxisMarker::bottom_edge().into_inner(),
            XGridLine::default().into_inner(),
            YGridLine::default().into_inner(),
            XGuideLine::over_data().into_inner(),
            YGuideLine::over_mouse().into_inner(),
        ];
        Some(
            view! {
                <Chart
                    aspect_ratio=AspectRatio::from_env_width_apply_ratio(2.0)
                    left=TickLabels::aligned_floats()
                    bottom=timestamp_ticks()
                    inner=inner
                    tooltip=Tooltip::left_cursor()
                    series=build_series(&lines)
                    data=Signal::derive(move || rows.get())
                />
            }
            .into_any(),
        )
    };

    let range = move || {
        labels.with(|l| match (l.first(), l.last()) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "No history yet.".to_string(),
        })
    };

    view! {
        <div class="history-chart">
            {chart}
            <p class="chart-range">{range}</p>
        </div>
    }
}
