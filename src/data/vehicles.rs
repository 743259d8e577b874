use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::error::VehicleError;
use super::interp::{read_lookup_points, Interpolator, LookupTable};

/// Launch vehicles offered by default, in dropdown order.
pub const DEFAULT_VEHICLES: [&str; 9] = [
    "falcon-heavy-expendable",
    "falcon-heavy-reusable",
    "delta-IVH",
    "atlas-v551-w-star-48",
    "vulcan-centaur-w-6-solids",
    "vulcan-centaur-w-6-solids-w-star-48",
    "sls-block-1",
    "sls-block-1B",
    "sls-block-1B-with-kick",
];

/// Launch vehicle performance curves, loaded on first use from
/// `<dir>/<vehicle>.csv` and kept for the rest of the session.
#[derive(Debug)]
pub struct VehicleCatalog {
    dir: PathBuf,
    names: Vec<String>,
    loaded: HashMap<String, Arc<Interpolator>>,
}

impl VehicleCatalog {
    pub fn new(dir: impl Into<PathBuf>, names: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            names,
            loaded: HashMap::new(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The vehicle's interpolator, reading its table on the first call.
    ///
    /// Failures are not remembered; the next call retries the file.
    pub fn get_or_load(&mut self, name: &str) -> Result<Arc<Interpolator>, VehicleError> {
        if let Some(interp) = self.loaded.get(name) {
            return Ok(Arc::clone(interp));
        }
        if !self.names.iter().any(|n| n == name) {
            return Err(VehicleError::Unknown(name.to_string()));
        }

        let path = self.dir.join(format!("{name}.csv"));
        let points = read_lookup_points(&path).map_err(|source| VehicleError::Load {
            vehicle: name.to_string(),
            source,
        })?;
        let table = LookupTable::new(points).map_err(|source| VehicleError::Table {
            vehicle: name.to_string(),
            source,
        })?;

        let (lo, hi) = table.domain();
        log::info!(
            "Loaded performance curve for {name}: {} points, C3 {lo}..{hi}",
            table.points().len()
        );
        let interp = Arc::new(Interpolator::new(table));
        self.loaded.insert(name.to_string(), Arc::clone(&interp));
        Ok(interp)
    }

    /// Load every vehicle up front; returns how many loaded successfully.
    pub fn preload_all(&mut self) -> usize {
        let names = self.names.clone();
        names
            .iter()
            .filter(|name| match self.get_or_load(name) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Skipping vehicle preload: {e}");
                    false
                }
            })
            .count()
    }
}
