/// Data layer: core types, loading, schema checks and partitioning.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset (types inferred per column)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema  │  expected columns checked once, typed accessors
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ partition │  group row indices by a categorical key
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod partition;
pub mod schema;
