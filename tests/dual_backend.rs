//! Both metrics backends and their scrape endpoints

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;

use dmnmeter::engine::{DecisionRuntime, EvalContext, EventKind};
use dmnmeter::metrics::{
    start_scrape_server, MetricsFacadeListener, PrometheusClientListener, RenderFn,
};
use dmnmeter::model::DecisionModel;

/// A model whose single evaluation triggers exactly one decision, one
/// context entry and one decision table
const SCENARIO_MODEL: &str = r#"{
    "name": "scenario",
    "inputs": [{"name": "x"}],
    "decisions": [{
        "name": "Band",
        "expression": {
            "kind": "context",
            "entries": [{
                "name": "band",
                "expression": {
                    "kind": "decision_table",
                    "inputs": [{"kind": "variable", "name": "x"}],
                    "rules": [
                        {"when": [{"below": 10}], "then": "small"},
                        {"when": ["any"], "then": "big"}
                    ]
                }
            }]
        }
    }]
}"#;

fn scenario_context() -> EvalContext {
    let mut ctx = EvalContext::new();
    ctx.set("x", 5);
    ctx
}

#[test]
fn test_scenario_counts_on_client_backend() {
    let mut runtime = DecisionRuntime::new(DecisionModel::from_json(SCENARIO_MODEL).unwrap());
    let listener = Arc::new(PrometheusClientListener::new().unwrap());
    runtime.add_listener(listener.clone());

    runtime.evaluate_all(&scenario_context()).unwrap();

    // Untouched kinds stay absent from the exposition until first use
    let rendered = listener.render().unwrap();
    assert!(rendered.contains(r#"dmn_evaluation_client_total{type="decision"} 1"#));
    assert!(rendered.contains(r#"dmn_evaluation_client_total{type="context_entry"} 1"#));
    assert!(rendered.contains(r#"dmn_evaluation_client_total{type="decision_table"} 1"#));
    assert!(!rendered.contains(r#"type="bkm""#));
    assert!(!rendered.contains(r#"type="decision_service""#));

    assert_eq!(listener.count(EventKind::Decision), 1);
    assert_eq!(listener.count(EventKind::ContextEntry), 1);
    assert_eq!(listener.count(EventKind::DecisionTable), 1);
    assert_eq!(listener.count(EventKind::Bkm), 0);
    assert_eq!(listener.count(EventKind::DecisionService), 0);
}

#[test]
fn test_scenario_counts_on_facade_backend() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        let mut runtime = DecisionRuntime::new(DecisionModel::from_json(SCENARIO_MODEL).unwrap());
        runtime.add_listener(Arc::new(MetricsFacadeListener::new()));
        runtime.evaluate_all(&scenario_context()).unwrap();
    });

    let rendered = handle.render();
    assert!(rendered.contains(r#"dmn_evaluation_facade_total{type="decision"} 1"#));
    assert!(rendered.contains(r#"dmn_evaluation_facade_total{type="context_entry"} 1"#));
    assert!(rendered.contains(r#"dmn_evaluation_facade_total{type="decision_table"} 1"#));
    // Pre-registered handles render untouched kinds as zero
    assert!(rendered.contains(r#"dmn_evaluation_facade_total{type="bkm"} 0"#));
    assert!(rendered.contains(r#"dmn_evaluation_facade_total{type="decision_service"} 0"#));
}

#[test]
fn test_n_evaluations_accumulate_on_both_backends() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    let client = Arc::new(PrometheusClientListener::new().unwrap());
    let n = 17;

    metrics::with_local_recorder(&recorder, || {
        let mut runtime = DecisionRuntime::new(DecisionModel::from_json(SCENARIO_MODEL).unwrap());
        runtime.add_listener(client.clone());
        runtime.add_listener(Arc::new(MetricsFacadeListener::new()));
        for _ in 0..n {
            runtime.evaluate_all(&scenario_context()).unwrap();
        }
    });

    assert_eq!(client.count(EventKind::Decision), n);
    assert_eq!(client.count(EventKind::DecisionTable), n);

    let rendered = handle.render();
    assert!(rendered.contains(&format!(
        r#"dmn_evaluation_facade_total{{type="decision"}} {}"#,
        n
    )));
}

fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    write!(stream, "GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

#[test]
fn test_scrape_endpoint_serves_client_counters() {
    let mut runtime = DecisionRuntime::new(DecisionModel::from_json(SCENARIO_MODEL).unwrap());
    let listener = Arc::new(PrometheusClientListener::new().unwrap());
    runtime.add_listener(listener.clone());
    runtime.evaluate_all(&scenario_context()).unwrap();

    let render: RenderFn = {
        let listener = listener.clone();
        Arc::new(move || listener.render().unwrap_or_default())
    };
    let addr = start_scrape_server("127.0.0.1:0".parse().unwrap(), "client", render).unwrap();

    let response = http_get(addr, "/metrics");
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains(r#"dmn_evaluation_client_total{type="decision"} 1"#));
}

#[test]
fn test_scrape_endpoint_unknown_path_is_404() {
    let render: RenderFn = Arc::new(String::new);
    let addr = start_scrape_server("127.0.0.1:0".parse().unwrap(), "test", render).unwrap();

    let response = http_get(addr, "/nope");
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));
}
