//! Library exports for reuse in benchmarks and tests.
/// Server configuration loading.
pub mod config;
/// Request record validation and encoding.
pub mod features;
/// Tracing subscriber setup.
pub mod logging;
/// Static offline evaluation statistics.
pub mod metrics;
/// Trained classifier artifact and scoring.
pub mod model;
/// Feature schema and label encoding tables.
pub mod schema;
/// HTTP routes and error translation.
pub mod server;
