/// Data layer: schema, loading, normalization, filtering and option lists.
///
/// Architecture:
/// ```text
///  .csv / .json / spreadsheet values
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  TableSource → RawRows (header + ragged rows)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  lowercase header, pad rows, coerce numbers → Table
///   └───────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter   │   │ options   │  sorted option lists, cascades
///   └──────────┘   └──────────┘
/// ```
///
/// `writer` is a separate append path for new destinations.

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod options;
pub mod schema;
pub mod source;
pub mod writer;
