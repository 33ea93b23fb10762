//! Scrape endpoint
//!
//! A minimal blocking HTTP server on a dedicated thread. `GET /metrics`
//! answers with whatever the backend's render closure produces. One of
//! these runs per metrics backend, each on its own port.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, warn};

/// Produces the text exposition body for one backend
pub type RenderFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Bind the scrape listener and serve it from a background thread
///
/// Returns the bound address, so callers (and tests) can use port 0.
pub fn start_scrape_server(
    addr: SocketAddr,
    backend: &'static str,
    render: RenderFn,
) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(addr)?;
    let local_addr = listener.local_addr()?;

    thread::spawn(move || {
        if let Err(e) = run_scrape_server(listener, render) {
            error!(backend, error = %e, "Scrape server error");
        }
    });

    info!(addr = %local_addr, backend, "Scrape endpoint started");
    Ok(local_addr)
}

fn run_scrape_server(listener: TcpListener, render: RenderFn) -> std::io::Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let render = render.clone();
                thread::spawn(move || {
                    if let Err(e) = handle_request(stream, render.as_ref()) {
                        debug!(error = %e, "Scrape request handling error");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to accept scrape connection");
            }
        }
    }

    Ok(())
}

fn handle_request(
    mut stream: TcpStream,
    render: &(dyn Fn() -> String + Send + Sync),
) -> std::io::Result<()> {
    let mut buffer = [0u8; 1024];
    let n = stream.read(&mut buffer)?;

    if n == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..n]);
    let first_line = request.lines().next().unwrap_or("");

    let path = first_line.split_whitespace().nth(1).unwrap_or("/");

    let (status, content_type, body) = match path {
        "/metrics" => ("200 OK", "text/plain; version=0.0.4", render()),
        "/" => (
            "200 OK",
            "text/plain",
            "metrics are served at /metrics\n".to_string(),
        ),
        _ => ("404 Not Found", "text/plain", "not found\n".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        status,
        content_type,
        body.len(),
        body
    );

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok(())
}
