/// Data layer: trajectory table, vehicle curves, filtering and projection.
///
/// Architecture:
/// ```text
///  uranus-temp.csv / .json / .parquet      <vehicle>.csv
///        │                                       │
///        ▼                                       ▼
///   ┌──────────┐                         ┌──────────────┐
///   │  loader   │  → TrajectoryDataset   │   vehicles    │  lazy cache of
///   └──────────┘                         └──────────────┘  Interpolators
///        │                                       │
///        └──────────────────┬────────────────────┘
///                           ▼
///                     ┌──────────┐
///                     │  filter   │  selection → row mask
///                     └──────────┘
///                           │
///                           ▼
///                     ┌──────────┐
///                     │  project  │  mask → ChartPayloads
///                     └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod interp;
pub mod loader;
pub mod model;
pub mod project;
pub mod vehicles;
