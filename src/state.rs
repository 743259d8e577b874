use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Dashboard;
use crate::data::filter::{CapabilitySelection, DateRange, TrajectorySelection};
use crate::data::model::TrajectoryDataset;
use crate::data::project::{capability_charts, trajectory_charts, ChartSet};
use crate::data::vehicles::VehicleCatalog;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded trajectory table, shared read-only.
    pub dataset: Arc<TrajectoryDataset>,

    /// Where `dataset` came from, shown on hover over the record counter.
    pub dataset_path: PathBuf,

    /// Vehicle performance curves, loaded on demand.
    pub vehicles: VehicleCatalog,

    /// Dashboard currently shown.
    pub dashboard: Dashboard,

    pub trajectory: TrajectorySelection,
    pub capability: CapabilitySelection,

    /// Charts for the active dashboard (recomputed on every selector change).
    pub charts: ChartSet,

    /// Why the capability charts are empty, if a vehicle curve failed to load.
    pub vehicle_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        dataset: TrajectoryDataset,
        dataset_path: PathBuf,
        vehicles: VehicleCatalog,
        dashboard: Dashboard,
    ) -> Self {
        let trajectory = TrajectorySelection::initial(&dataset);
        let capability = CapabilitySelection::initial(&dataset, vehicles.names());
        let mut state = Self {
            dataset: Arc::new(dataset),
            dataset_path,
            vehicles,
            dashboard,
            trajectory,
            capability,
            charts: ChartSet::default(),
            vehicle_error: None,
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Swap in a newly loaded table and reset the selectors to its defaults.
    pub fn set_dataset(&mut self, dataset: TrajectoryDataset, path: &Path) {
        self.trajectory = TrajectorySelection::initial(&dataset);
        let vehicle = self.capability.vehicle.take();
        self.capability = CapabilitySelection::initial(&dataset, self.vehicles.names());
        if vehicle.is_some() {
            self.capability.vehicle = vehicle;
        }
        self.dataset = Arc::new(dataset);
        self.dataset_path = path.to_path_buf();
        self.status_message = None;
        self.refilter();
    }

    pub fn set_dashboard(&mut self, dashboard: Dashboard) {
        if self.dashboard != dashboard {
            self.dashboard = dashboard;
            self.refilter();
        }
    }

    /// Keep a picked date window inside the table's date span.
    pub fn clamp_dates(&self, range: DateRange) -> DateRange {
        match self.dataset.date_bounds() {
            Some((lo, hi)) => range.clamped(lo, hi),
            None => range,
        }
    }

    /// Recompute the active dashboard's charts from scratch.
    pub fn refilter(&mut self) {
        self.charts = match self.dashboard {
            Dashboard::Trajectory => trajectory_charts(&self.dataset, &self.trajectory),
            Dashboard::Capability => self.capability_view(),
        };
    }

    fn capability_view(&mut self) -> ChartSet {
        self.vehicle_error = None;
        let Some(name) = self.capability.vehicle.clone() else {
            return ChartSet::default();
        };
        match self.vehicles.get_or_load(&name) {
            Ok(vehicle) => capability_charts(&self.dataset, &self.capability, &vehicle),
            Err(e) => {
                log::error!("{e}");
                self.vehicle_error = Some(e.to_string());
                ChartSet::default()
            }
        }
    }

    /// Rows in the table / rows in the current charts.
    pub fn counts(&self) -> (usize, usize) {
        (self.dataset.len(), self.charts.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn state(dir: &Path) -> AppState {
        std::fs::write(dir.join("good.csv"), "10,0\n15,500\n20,0\n").unwrap();
        std::fs::write(dir.join("broken.csv"), "10,0\n10,5\n").unwrap();
        let dataset = TrajectoryDataset::from_records(vec![
            record("2031-01-05", "Uranus", "EJU", 17.0),
            record("2031-02-05", "Uranus", "EJU", 25.0),
            record("2032-03-05", "Uranus", "EEJU", 12.0),
        ]);
        let vehicles = VehicleCatalog::new(dir, vec!["good".into(), "broken".into()]);
        AppState::new(dataset, dir.join("t.csv"), vehicles, Dashboard::Trajectory)
    }

    #[test]
    fn starts_with_defaults_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path());
        assert_eq!(state.trajectory.path.as_deref(), Some("EEJU"));
        assert_eq!(state.capability.vehicle.as_deref(), Some("good"));
        assert_eq!(state.counts(), (3, 1));
        assert_eq!(state.charts.charts.len(), 2);
    }

    #[test]
    fn selector_change_recomputes() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(dir.path());
        state.trajectory.path = Some("EJU".into());
        state.refilter();
        assert_eq!(state.counts().1, 2);

        state.trajectory.dates = state.clamp_dates(DateRange::new(date("2031-02-01"), date("2040-01-01")));
        assert_eq!(state.trajectory.dates.end, date("2032-03-05"));
        state.refilter();
        assert_eq!(state.counts().1, 1);
    }

    #[test]
    fn capability_dashboard_and_broken_vehicle() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(dir.path());
        state.capability.path = Some("EJU".into());
        state.set_dashboard(Dashboard::Capability);
        assert_eq!(state.charts.charts.len(), 3);
        assert_eq!(state.counts().1, 1);
        assert!(state.vehicle_error.is_none());

        state.capability.vehicle = Some("broken".into());
        state.refilter();
        assert!(state.charts.charts.is_empty());
        let message = state.vehicle_error.clone().unwrap();
        assert!(message.contains("broken"), "{message}");
        assert!(message.contains("strictly increasing"), "{message}");
    }

    #[test]
    fn new_dataset_resets_selection_but_keeps_vehicle() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(dir.path());
        state.capability.vehicle = Some("broken".into());
        state.status_message = Some("old".into());

        let replacement = TrajectoryDataset::from_records(vec![record("2040-01-01", "Neptune", "EN", 5.0)]);
        state.set_dataset(replacement, Path::new("other.csv"));

        assert_eq!(state.trajectory.target.as_deref(), Some("Neptune"));
        assert_eq!(state.capability.vehicle.as_deref(), Some("broken"));
        assert_eq!(state.counts(), (1, 1));
        assert!(state.status_message.is_none());
    }
}
