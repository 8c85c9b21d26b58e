/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OrderDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ OrderDataset  │  Vec<OrderRecord>, state/category index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐      ┌───────────┐
///   │  filter   │ ───▶ │ analysis  │  date range → grouped aggregates
///   └──────────┘      └───────────┘
/// ```
pub mod analysis;
pub mod filter;
pub mod loader;
pub mod model;
