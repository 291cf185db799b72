/// Data layer: core types and the caching resource loader.
///
/// Architecture:
/// ```text
///  IPRESS.csv / *.parquet / *.shp     outputs/*.html, *.png
///        │                                   │
///        ▼                                   ▼
///   ┌────────────────┐              ┌────────────────┐
///   │ ResourceLoader │─────────────▶│  asset cache   │
///   └────────────────┘              └────────────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │    Dataset     │  TableFrame | GeoFrame
///   └────────────────┘
/// ```
///
/// Every load goes through the cache: one parse per (path, kind) for the
/// process lifetime, failures included. Parsing faults become `LoadError`
/// values; the UI decides how to show them.
pub mod loader;
pub mod model;
