/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PortfolioDataset (all-or-nothing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ PortfolioDataset  │  Vec<PolicyRecord>, calendar metadata
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  typed selections → matching rows
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ aggregate   │  sums, loss ratios, histograms → chart specs
///   └────────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
