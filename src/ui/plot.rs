use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{GridMark, Legend, MarkerShape, Plot, PlotPoint, Points};

use crate::color::{hex_color, ColorScale};
use crate::config::Dashboard;
use crate::data::project::{plot_to_date, ChartPayload, Series, SeriesKind};
use crate::state::AppState;

/// Number of legend entries a color series is split into.
const COLOR_BUCKETS: usize = 8;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the active dashboard's charts stacked in the central panel.
pub fn chart_panel(ui: &mut Ui, state: &AppState) {
    if let (Dashboard::Capability, Some(err)) = (state.dashboard, &state.vehicle_error) {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(err).color(Color32::RED).heading());
        });
        return;
    }

    let charts = &state.charts.charts;
    if charts.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nothing to show");
        });
        return;
    }

    let spacing = ui.spacing().item_spacing.y;
    let title_height = 24.0;
    let height = (ui.available_height() / charts.len() as f32 - spacing - title_height).max(120.0);

    for chart in charts {
        ui.strong(chart.title);
        scatter_chart(ui, chart, height);
    }
}

fn format_axis(kind: SeriesKind, value: f64) -> String {
    match kind {
        SeriesKind::Date => plot_to_date(value)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        SeriesKind::Value => format!("{value:.2}"),
    }
}

fn points_of(x: &Series, y: &Series, keep: impl Fn(usize) -> bool) -> Vec<[f64; 2]> {
    x.values
        .iter()
        .zip(&y.values)
        .enumerate()
        .filter(|(i, _)| keep(*i))
        .map(|(_, (&xi, &yi))| [xi, yi])
        .collect()
}

/// One scatter chart. A color series is drawn as one marker group per
/// color bucket so the legend doubles as a color bar.
fn scatter_chart(ui: &mut Ui, chart: &ChartPayload, height: f32) {
    let x_kind = chart.x.kind;
    let y_kind = chart.y.kind;
    let x_label = chart.x.label;
    let y_label = chart.y.label;

    Plot::new(chart.id)
        .height(height)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range| format_axis(x_kind, mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| format_axis(y_kind, mark.value))
        .label_formatter(move |name, value: &PlotPoint| {
            let point = format!(
                "{x_label}: {}\n{y_label}: {}",
                format_axis(x_kind, value.x),
                format_axis(y_kind, value.y)
            );
            if name.is_empty() {
                point
            } else {
                format!("{name}\n{point}")
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let scale = chart
                .color
                .as_ref()
                .and_then(|c| ColorScale::from_values(&c.values).map(|s| (c, s)));

            match scale {
                Some((color, scale)) => {
                    for (bucket, (lo, hi, c)) in scale.buckets(COLOR_BUCKETS).into_iter().enumerate() {
                        let pts = points_of(&chart.x, &chart.y, |i| {
                            scale.bucket_of(color.values[i], COLOR_BUCKETS) == bucket
                        });
                        if pts.is_empty() {
                            continue;
                        }
                        plot_ui.points(
                            Points::new(pts)
                                .name(format!("{} {lo:.1}–{hi:.1}", color.label))
                                .color(c)
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(3.0),
                        );
                    }
                }
                None => {
                    let accent = chart
                        .accent
                        .and_then(hex_color)
                        .unwrap_or(Color32::LIGHT_BLUE);
                    plot_ui.points(
                        Points::new(points_of(&chart.x, &chart.y, |_| true))
                            .name(chart.title)
                            .color(accent)
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(3.0),
                    );
                }
            }
        });
}
