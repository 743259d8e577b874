use chrono::NaiveDate;

use super::interp::Interpolator;
use super::model::{TrajectoryDataset, TrajectoryRecord};

// ---------------------------------------------------------------------------
// Selection state: what the dropdowns and date pickers currently show
// ---------------------------------------------------------------------------

/// Inclusive launch date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// An inverted range (start after end) contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Pull both ends inside `[lo, hi]`.
    pub fn clamped(self, lo: NaiveDate, hi: NaiveDate) -> Self {
        Self {
            start: self.start.clamp(lo, hi),
            end: self.end.clamp(lo, hi),
        }
    }
}

/// Selectors of the trajectory dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySelection {
    pub target: Option<String>,
    pub path: Option<String>,
    pub dates: DateRange,
}

/// Selectors of the launch capability dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySelection {
    pub vehicle: Option<String>,
    pub path: Option<String>,
    pub dates: DateRange,
}

impl TrajectorySelection {
    /// Initial selection: first target, first path in sorted order, full date span.
    pub fn initial(dataset: &TrajectoryDataset) -> Self {
        Self {
            target: dataset.targets().first().cloned(),
            path: dataset.default_path().map(str::to_string),
            dates: full_range(dataset),
        }
    }

    pub fn row_filter(&self) -> RowFilter<'_> {
        RowFilter {
            target: self.target.as_deref(),
            path: self.path.as_deref(),
            dates: self.dates,
        }
    }
}

impl CapabilitySelection {
    pub fn initial(dataset: &TrajectoryDataset, vehicles: &[String]) -> Self {
        Self {
            vehicle: vehicles.first().cloned(),
            path: dataset.default_path().map(str::to_string),
            dates: full_range(dataset),
        }
    }

    /// The capability dashboard does not filter on target.
    pub fn row_filter(&self) -> RowFilter<'_> {
        RowFilter {
            target: None,
            path: self.path.as_deref(),
            dates: self.dates,
        }
    }
}

fn full_range(dataset: &TrajectoryDataset) -> DateRange {
    match dataset.date_bounds() {
        Some((lo, hi)) => DateRange::new(lo, hi),
        None => {
            let today = chrono::Local::now().date_naive();
            DateRange::new(today, today)
        }
    }
}

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// Equality and date-window predicates; `None` means "no constraint".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFilter<'a> {
    pub target: Option<&'a str>,
    pub path: Option<&'a str>,
    pub dates: DateRange,
}

impl RowFilter<'_> {
    pub fn matches(&self, record: &TrajectoryRecord) -> bool {
        let target_ok = self.target.map_or(true, |t| record.target == t);
        let path_ok = self.path.map_or(true, |p| record.path == p);
        let date_ok = self.dates.contains(record.date);
        target_ok && path_ok && date_ok
    }
}

/// Deliverable mass for every row, `0` where the C3 is outside the vehicle's envelope.
pub fn mass_column(dataset: &TrajectoryDataset, vehicle: &Interpolator) -> Vec<f64> {
    dataset
        .records()
        .iter()
        .map(|r| vehicle.eval(r.launch_c3))
        .collect()
}

/// Row-wise mask of the records passing `filter` and, when given, the
/// capability test `mass > 0` on the precomputed mass column.
///
/// The capability test is its own boolean column, ANDed with the others.
/// `mass` must hold one value per record, as produced by [`mass_column`].
pub fn filter_mask(dataset: &TrajectoryDataset, filter: &RowFilter<'_>, mass: Option<&[f64]>) -> Vec<bool> {
    let records = dataset.records();
    let capable: Vec<bool> = match mass {
        Some(mass) => {
            debug_assert_eq!(mass.len(), records.len(), "mass column length differs from row count");
            mass.iter().map(|&m| m > 0.0).collect()
        }
        None => vec![true; records.len()],
    };

    records
        .iter()
        .zip(capable)
        .map(|(r, capable)| filter.matches(r) && capable)
        .collect()
}

/// Indices of the records where the mask is set.
pub fn filtered_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter(|(_, &keep)| keep)
        .map(|(i, _)| i)
        .collect()
}
