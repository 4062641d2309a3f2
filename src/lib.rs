// Aggregation and reporting for player performance data: GPS load,
// recovery, physical capability, priority areas, injury risk, external
// factors and squad biography.
//
// The analysis layer is pure and never fails; I/O lives in `loader`,
// `output` and `server`.

pub mod aggregate;
pub mod analysis;
pub mod classify;
pub mod config;
pub mod errors;
pub mod loader;
pub mod logging;
pub mod mock;
pub mod output;
pub mod reports;
pub mod scale;
pub mod server;
pub mod stats;
pub mod trend;
pub mod types;
pub mod util;

pub use errors::{InsightsError, Result};
