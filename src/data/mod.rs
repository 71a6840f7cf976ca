/// Data layer: results table types, metric list, and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ResultsTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ ResultsTable  │  ordered columns, ordered rows
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  fixed five-metric list → figure panels
///   └──────────┘
/// ```

pub mod loader;
pub mod metrics;
pub mod model;
