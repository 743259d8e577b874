use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Vehicle name, payload at C3 = 0 (kg), C3 where the payload reaches zero.
const VEHICLES: [(&str, f64, f64); 9] = [
    ("falcon-heavy-expendable", 15_000.0, 90.0),
    ("falcon-heavy-reusable", 6_500.0, 45.0),
    ("delta-IVH", 10_000.0, 80.0),
    ("atlas-v551-w-star-48", 6_000.0, 110.0),
    ("vulcan-centaur-w-6-solids", 12_000.0, 85.0),
    ("vulcan-centaur-w-6-solids-w-star-48", 7_500.0, 130.0),
    ("sls-block-1", 26_000.0, 100.0),
    ("sls-block-1B", 37_000.0, 110.0),
    ("sls-block-1B-with-kick", 20_000.0, 160.0),
];

/// (target, path, C3 base, Vinf base, TOF base)
const FAMILIES: [(&str, &str, f64, f64, f64); 5] = [
    ("Uranus", "EJU", 80.0, 11.0, 9.0),
    ("Uranus", "EEJU", 25.0, 10.0, 11.5),
    ("Uranus", "EVEEJU", 12.0, 9.5, 13.0),
    ("Uranus", "ESU", 60.0, 12.5, 10.0),
    ("Neptune", "EJN", 95.0, 14.0, 12.0),
];

struct Row {
    date: String,
    target: &'static str,
    path: &'static str,
    c3: f64,
    vinf: f64,
    tof: f64,
}

fn trajectories(rng: &mut SimpleRng) -> Result<Vec<Row>> {
    let start = NaiveDate::from_ymd_opt(2028, 1, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2038, 12, 31).context("end date")?;

    let mut rows = Vec::new();
    let mut date = start;
    while date <= end {
        for &(target, path, c3, vinf, tof) in &FAMILIES {
            // Launch windows: skip most dates for each family.
            if rng.next_f64() > 0.35 {
                continue;
            }
            rows.push(Row {
                date: date.format("%m/%d/%Y").to_string(),
                target,
                path,
                c3: (c3 * rng.uniform(0.6, 1.6)).max(1.0),
                vinf: vinf * rng.uniform(0.8, 1.3),
                tof: tof * rng.uniform(0.85, 1.2),
            });
        }
        date += Duration::days(10);
    }
    Ok(rows)
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["Date", "Target", "Path", "LC3", "Avinf", "TOF"])?;
    for row in rows {
        writer.write_record([
            row.date.clone(),
            row.target.to_string(),
            row.path.to_string(),
            format!("{:.3}", row.c3),
            format!("{:.3}", row.vinf),
            format!("{:.3}", row.tof),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Utf8, false),
        Field::new("Target", DataType::Utf8, false),
        Field::new("Path", DataType::Utf8, false),
        Field::new("LC3", DataType::Float64, false),
        Field::new("Avinf", DataType::Float64, false),
        Field::new("TOF", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.date.as_str()).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.target).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.path).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.c3).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.vinf).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.tof).collect::<Vec<_>>())),
        ],
    )?;

    println!("{}", pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])?);

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Payload falls off linearly-ish with C3 and reaches zero at `max_c3`.
fn write_vehicle(dir: &Path, name: &str, m0: f64, max_c3: f64) -> Result<()> {
    let path = dir.join(format!("{name}.csv"));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    let steps = 20;
    for i in 0..=steps {
        let c3 = max_c3 * i as f64 / steps as f64;
        let frac = 1.0 - c3 / max_c3;
        let mass = m0 * frac * (0.4 + 0.6 * frac);
        writer.write_record([format!("{c3:.2}"), format!("{mass:.1}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = trajectories(&mut rng)?;

    write_csv(&out_dir.join("uranus-temp.csv"), &rows)?;
    write_parquet(&out_dir.join("uranus-temp.parquet"), &rows)?;
    for (name, m0, max_c3) in VEHICLES {
        write_vehicle(&out_dir, name, m0, max_c3)?;
    }

    println!(
        "Wrote {} trajectories and {} vehicle curves to {}",
        rows.len(),
        VEHICLES.len(),
        out_dir.display()
    );
    Ok(())
}
