//! Metrics and observability
//!
//! Two deliberately independent Prometheus backends observe the same
//! evaluation events: one through the direct `prometheus` client crate,
//! one through the `metrics` facade. Each serves its own scrape endpoint.

mod client;
mod facade;
mod scrape;

pub use client::PrometheusClientListener;
pub use facade::{install_facade_recorder, MetricsError, MetricsFacadeListener};
pub use scrape::{start_scrape_server, RenderFn};
