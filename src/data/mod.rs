/// Data layer: core types, loading, normalization, and summaries.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (raw survey columns)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ normalize   │  rename columns, decode codes, derive age
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ codebook    │  join job names onto job codes (best effort)
///   └────────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ filter + summary    │  restrictions → per-group mean incomes
///   └────────────────────┘
/// ```
///
/// `cache` sits in front of the whole pipeline and hands out `Arc<Table>`
/// snapshots keyed by resolved path.

pub mod cache;
pub mod codebook;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod summary;
