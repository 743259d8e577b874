use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// TrajectoryRecord – one row of the trajectory table
// ---------------------------------------------------------------------------

/// A single precomputed trajectory (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRecord {
    /// Launch date.
    pub date: NaiveDate,
    /// Destination body.
    pub target: String,
    /// Trajectory family / route, e.g. `"EJU"`.
    pub path: String,
    /// Launch characteristic energy, km²/s².
    pub launch_c3: f64,
    /// Arrival hyperbolic excess velocity, km/s.
    pub arrival_vinf: f64,
    /// Time of flight, years.
    pub time_of_flight: f64,
}

// ---------------------------------------------------------------------------
// TrajectoryDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with its selector views pre-computed.
///
/// Built once and never mutated afterwards; the UI shares it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryDataset {
    records: Vec<TrajectoryRecord>,
    /// Sorted distinct targets.
    targets: Vec<String>,
    /// Distinct paths in the order they first appear in the file.
    paths: Vec<String>,
    date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl TrajectoryDataset {
    /// Build the derived views from the loaded records.
    pub fn from_records(records: Vec<TrajectoryRecord>) -> Self {
        let targets = records
            .iter()
            .map(|r| r.target.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let paths = {
            let mut seen = HashSet::new();
            records
                .iter()
                .filter(|r| seen.insert(r.path.as_str()))
                .map(|r| r.path.clone())
                .collect()
        };

        let date_bounds = records.iter().fold(None, |acc, r| match acc {
            None => Some((r.date, r.date)),
            Some((lo, hi)) => Some((r.date.min(lo), r.date.max(hi))),
        });

        TrajectoryDataset {
            records,
            targets,
            paths,
            date_bounds,
        }
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    /// Distinct `Target` values, sorted.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Distinct `Path` values in first-encountered order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Earliest and latest launch date, `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_bounds
    }

    /// The path selected by default: the first one in sorted order.
    pub fn default_path(&self) -> Option<&str> {
        self.paths.iter().map(String::as_str).min()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(date: &str, target: &str, path: &str, c3: f64) -> TrajectoryRecord {
        TrajectoryRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            target: target.to_string(),
            path: path.to_string(),
            launch_c3: c3,
            arrival_vinf: 10.0 + c3 / 10.0,
            time_of_flight: 8.0 + c3 / 100.0,
        }
    }

    #[test]
    fn derived_views() {
        let ds = TrajectoryDataset::from_records(vec![
            record("2031-03-01", "Uranus", "EJU", 20.0),
            record("2030-01-15", "Neptune", "EEJU", 30.0),
            record("2032-07-09", "Uranus", "EJU", 25.0),
            record("2031-11-30", "Uranus", "EESU", 40.0),
        ]);

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.targets(), ["Neptune", "Uranus"]);
        assert_eq!(ds.paths(), ["EJU", "EEJU", "EESU"]);
        assert_eq!(ds.default_path(), Some("EEJU"));
        let (lo, hi) = ds.date_bounds().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2030, 1, 15).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2032, 7, 9).unwrap());
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = TrajectoryDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_bounds().is_none());
        assert!(ds.targets().is_empty());
        assert_eq!(ds.default_path(), None);
    }
}
