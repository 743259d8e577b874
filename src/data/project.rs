use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeDelta};
use serde_json::{json, Value as JsonValue};

use super::filter::{filter_mask, filtered_indices, mass_column, CapabilitySelection, TrajectorySelection};
use super::interp::Interpolator;
use super::model::{TrajectoryDataset, TrajectoryRecord};

// ---------------------------------------------------------------------------
// Chart payloads handed to the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Days since 1970-01-01, see [`date_to_plot`].
    Date,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub kind: SeriesKind,
    pub values: Vec<f64>,
}

/// One scatter chart: x/y series, optional per-point color values and a title.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    pub id: &'static str,
    pub title: &'static str,
    pub x: Series,
    pub y: Series,
    pub color: Option<Series>,
    /// Marker color when there is no color series, as `#RRGGBB`.
    pub accent: Option<&'static str>,
}

/// Result of one recomputation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSet {
    pub matched: usize,
    pub charts: Vec<ChartPayload>,
}

pub fn date_to_plot(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

pub fn plot_to_date(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() {
        return None;
    }
    NaiveDate::default().checked_add_signed(TimeDelta::try_days(value.round() as i64)?)
}

fn series(label: &'static str, kind: SeriesKind, values: Vec<f64>) -> Series {
    Series { label, kind, values }
}

fn pick(rows: &[&TrajectoryRecord], f: impl Fn(&TrajectoryRecord) -> f64) -> Vec<f64> {
    rows.iter().map(|r| f(*r)).collect()
}

// ---------------------------------------------------------------------------
// Trajectory dashboard
// ---------------------------------------------------------------------------

/// "Launch C3" and "Arrival Vinf" against launch date.
pub fn trajectory_charts(dataset: &TrajectoryDataset, selection: &TrajectorySelection) -> ChartSet {
    let mask = filter_mask(dataset, &selection.row_filter(), None);
    let indices = filtered_indices(&mask);
    let rows: Vec<&TrajectoryRecord> = indices.iter().map(|&i| &dataset.records()[i]).collect();
    log::debug!("Trajectory view: {} of {} rows", rows.len(), dataset.len());

    let dates = pick(&rows, |r| date_to_plot(r.date));
    let charts = vec![
        ChartPayload {
            id: "c3-chart",
            title: "Launch C3",
            x: series("Launch date", SeriesKind::Date, dates.clone()),
            y: series("C3 (km²/s²)", SeriesKind::Value, pick(&rows, |r| r.launch_c3)),
            color: None,
            accent: Some("#17B897"),
        },
        ChartPayload {
            id: "avinf-chart",
            title: "Arrival Vinf",
            x: series("Launch date", SeriesKind::Date, dates),
            y: series("Arrival Vinf (km/s)", SeriesKind::Value, pick(&rows, |r| r.arrival_vinf)),
            color: None,
            accent: Some("#E12D39"),
        },
    ];

    ChartSet {
        matched: rows.len(),
        charts,
    }
}

// ---------------------------------------------------------------------------
// Launch capability dashboard
// ---------------------------------------------------------------------------

/// Deliverable mass for the selected vehicle, restricted to rows inside its
/// C3 envelope.
pub fn capability_charts(
    dataset: &TrajectoryDataset,
    selection: &CapabilitySelection,
    vehicle: &Interpolator,
) -> ChartSet {
    let mass = mass_column(dataset, vehicle);
    let mask = filter_mask(dataset, &selection.row_filter(), Some(mass.as_slice()));
    let indices = filtered_indices(&mask);
    let rows: Vec<&TrajectoryRecord> = indices.iter().map(|&i| &dataset.records()[i]).collect();
    let kept_mass: Vec<f64> = indices.iter().map(|&i| mass[i]).collect();
    log::debug!(
        "Capability view ({}): {} of {} rows",
        selection.vehicle.as_deref().unwrap_or("-"),
        rows.len(),
        dataset.len()
    );

    let tof = pick(&rows, |r| r.time_of_flight);
    let vinf = pick(&rows, |r| r.arrival_vinf);
    let charts = vec![
        ChartPayload {
            id: "launch-mass-chart",
            title: "Launch Capability vs. Launch Year",
            x: series("Launch date", SeriesKind::Date, pick(&rows, |r| date_to_plot(r.date))),
            y: series("Launch mass (kg)", SeriesKind::Value, kept_mass.clone()),
            color: None,
            accent: Some("#17B897"),
        },
        ChartPayload {
            id: "avinf-tof-chart",
            title: "Arrival Vinf vs TOF",
            x: series("TOF (years)", SeriesKind::Value, tof.clone()),
            y: series("Arrival Vinf (km/s)", SeriesKind::Value, vinf.clone()),
            color: Some(series("Launch mass", SeriesKind::Value, kept_mass.clone())),
            accent: None,
        },
        ChartPayload {
            id: "combined-chart",
            title: "Launch Capability vs. TOF",
            x: series("TOF (years)", SeriesKind::Value, tof),
            y: series("Launch mass (kg)", SeriesKind::Value, kept_mass),
            color: Some(series("Arrival Vinf", SeriesKind::Value, vinf)),
            accent: None,
        },
    ];

    ChartSet {
        matched: rows.len(),
        charts,
    }
}

// ---------------------------------------------------------------------------
// JSON figure export
// ---------------------------------------------------------------------------

fn series_json(series: &Series) -> JsonValue {
    match series.kind {
        SeriesKind::Value => json!(series.values),
        SeriesKind::Date => series
            .values
            .iter()
            .map(|&v| match plot_to_date(v) {
                Some(d) => json!(d.format("%Y-%m-%d").to_string()),
                None => JsonValue::Null,
            })
            .collect(),
    }
}

impl ChartPayload {
    /// Plotly-style figure: one marker trace plus a left-aligned title.
    pub fn to_figure(&self) -> JsonValue {
        let mut trace = json!({
            "x": series_json(&self.x),
            "y": series_json(&self.y),
            "type": "scatter",
            "mode": "markers",
        });
        if let Some(color) = &self.color {
            trace["marker"] = json!({
                "color": color.values,
                "colorscale": "Jet",
                "colorbar": { "thickness": 10, "title": color.label },
            });
        }

        let mut layout = json!({
            "title": { "text": self.title, "x": 0.05, "xanchor": "left" },
            "xaxis": { "fixedrange": false, "title": self.x.label },
            "yaxis": { "fixedrange": false, "title": self.y.label },
        });
        if let Some(accent) = self.accent {
            layout["colorway"] = json!([accent]);
        }

        json!({ "id": self.id, "data": [trace], "layout": layout })
    }
}

/// Write the given charts as a JSON array of figures.
pub fn export_figures(path: &Path, charts: &[ChartPayload]) -> Result<()> {
    let figures: Vec<JsonValue> = charts.iter().map(ChartPayload::to_figure).collect();
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &figures)
        .context("writing chart figures")?;
    log::info!("Exported {} charts to {}", charts.len(), path.display());
    Ok(())
}
