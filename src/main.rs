//! DmnMeter - Entry Point
//!
//! Wires the decision runtime, both metrics listeners and both scrape
//! endpoints, then runs the evaluation loop until the process is killed.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use dmnmeter::config::Config;
use dmnmeter::driver::Driver;
use dmnmeter::engine::DecisionRuntime;
use dmnmeter::metrics::{
    install_facade_recorder, start_scrape_server, MetricsFacadeListener,
    PrometheusClientListener, RenderFn,
};
use dmnmeter::model::DecisionModel;
use dmnmeter::VERSION;

/// Application entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    // Load configuration (missing file means defaults)
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Initialize tracing/logging
    dmnmeter::util::init_tracing(&config.logging)?;

    info!(
        version = VERSION,
        config_path = ?config_path,
        "Starting DmnMeter"
    );

    // Load the decision model once; it is never mutated at runtime
    let model = match &config.model.path {
        Some(path) => DecisionModel::from_file(path)
            .with_context(|| format!("Failed to load decision model from {}", path))?,
        None => DecisionModel::bundled().context("Failed to load bundled decision model")?,
    };
    info!(
        model = %model.name,
        decisions = model.decisions.len(),
        "Decision model loaded"
    );

    let mut runtime = DecisionRuntime::new(model);

    // Direct prometheus-client backend
    let client = Arc::new(
        PrometheusClientListener::new().context("Failed to set up prometheus client backend")?,
    );
    runtime.add_listener(client.clone());

    // Metrics-facade backend; the recorder must be installed before the
    // listener resolves its counter handles
    let facade_handle =
        install_facade_recorder().context("Failed to set up metrics facade backend")?;
    runtime.add_listener(Arc::new(MetricsFacadeListener::new()));

    // One scrape endpoint per backend, each on its own port and thread
    let client_render: RenderFn = {
        let client = client.clone();
        Arc::new(move || match client.render() {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to encode client metrics");
                String::new()
            }
        })
    };
    start_scrape_server(
        SocketAddr::from(([0, 0, 0, 0], config.exporter.client_port)),
        "client",
        client_render,
    )
    .context("Failed to bind client scrape endpoint")?;

    let facade_render: RenderFn = Arc::new(move || facade_handle.render());
    start_scrape_server(
        SocketAddr::from(([0, 0, 0, 0], config.exporter.facade_port)),
        "facade",
        facade_render,
    )
    .context("Failed to bind facade scrape endpoint")?;

    // Run forever; any evaluation error is fatal
    let driver = Driver::new(Arc::new(runtime), config.driver.clone());
    driver.run().await?;

    Ok(())
}
