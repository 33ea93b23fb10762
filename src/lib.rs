//! DmnMeter - DMN evaluation metrics demo
//!
//! Drives a decision-model evaluation engine in a loop with randomized
//! inputs and exposes per-event-kind evaluation counters on two parallel
//! Prometheus scrape endpoints, one per metrics backend.

pub mod config;
pub mod driver;
pub mod engine;
pub mod metrics;
pub mod model;
pub mod util;

pub use config::Config;
pub use engine::DecisionRuntime;
pub use model::DecisionModel;

/// Version for display
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
