use std::path::Path;

use super::error::{InterpolationTableError, LoadError};

// ---------------------------------------------------------------------------
// LookupTable – launch energy → deliverable mass
// ---------------------------------------------------------------------------

/// Validated `(x, y)` points with strictly increasing, finite x.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    points: Vec<(f64, f64)>,
}

impl LookupTable {
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, InterpolationTableError> {
        match points.len() {
            0 => return Err(InterpolationTableError::Empty),
            1 => return Err(InterpolationTableError::Degenerate),
            _ => {}
        }
        if let Some(index) = points
            .iter()
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(InterpolationTableError::NonFinite { index });
        }
        if let Some(i) = points.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(InterpolationTableError::NotIncreasing {
                index: i + 1,
                prev: points[i].0,
                next: points[i + 1].0,
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Domain covered by the table: (first x, last x).
    pub fn domain(&self) -> (f64, f64) {
        (self.points[0].0, self.points[self.points.len() - 1].0)
    }
}

/// Read a headerless two-column numeric CSV (`C3,mass` per line).
///
/// Lines starting with `#` are skipped and fields may be padded with spaces.
pub fn read_lookup_points(path: &Path) -> Result<Vec<(f64, f64)>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut points = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let field = |idx: usize, column: &str| -> Result<f64, LoadError> {
            let value = record.get(idx).ok_or_else(|| LoadError::MissingValue {
                row,
                column: column.to_string(),
            })?;
            value.parse::<f64>().map_err(|_| LoadError::InvalidValue {
                row,
                column: column.to_string(),
                value: value.to_string(),
            })
        };
        points.push((field(0, "C3")?, field(1, "mass")?));
    }
    Ok(points)
}

// ---------------------------------------------------------------------------
// Interpolator
// ---------------------------------------------------------------------------

/// Piecewise-linear interpolation over a [`LookupTable`], zero outside its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    table: LookupTable,
}

impl Interpolator {
    pub fn new(table: LookupTable) -> Self {
        Self { table }
    }

    /// Interpolated y at `x`; `0.0` when `x` is outside the table or NaN.
    ///
    /// Table points are reproduced exactly.
    pub fn eval(&self, x: f64) -> f64 {
        let points = &self.table.points;
        let (lo, hi) = self.table.domain();
        if !(lo..=hi).contains(&x) {
            return 0.0;
        }

        // First point strictly above x, so an exact hit is the lower bracket.
        let idx = points.partition_point(|&(px, _)| px <= x) - 1;
        let (x0, y0) = points[idx];
        if x == x0 || idx + 1 == points.len() {
            return y0;
        }

        let (x1, y1) = points[idx + 1];
        let frac = (x - x0) / (x1 - x0);
        y0 + frac * (y1 - y0)
    }
}
