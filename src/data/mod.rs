/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ schema + coerce   │  required columns, numeric cells → Dataset
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  region / category / total predicates → FilteredTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────┐
///   │ aggregate + report   │  per-view derived tables
///   └─────────────────────┘
/// ```

pub mod aggregate;
pub mod coerce;
pub mod filter;
pub mod loader;
pub mod model;
pub mod report;
pub mod schema;
