//! Markshelf RPC server: JSON-RPC over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"bookmarks.create", "params":{"url":"...","title":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr so they never interleave with responses.

use std::io::{self, Write};
use std::time::Instant;

use markshelf::app::{build_backend, App};
use markshelf::rpc_handler::handle_method;
use markshelf::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Fixed-window limiter: at most `max_per_second` requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
    }

    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(response: Value) {
    let mut stdout = io::stdout().lock();
    if writeln!(stdout, "{}", response).and_then(|_| stdout.flush()).is_err() {
        error!("stdout closed, dropping response");
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut settings_engine = SettingsEngine::new(std::env::var("MARKSHELF_SETTINGS").ok());
    let settings = match settings_engine.load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("markshelf: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&settings.logging.filter);

    let backend = match build_backend(&settings.backend) {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "failed to open backend");
            std::process::exit(1);
        }
    };
    let mut app = App::with_backend(settings_engine, backend);

    info!(version = env!("CARGO_PKG_VERSION"), "markshelf rpc ready");
    respond(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };
        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            warn!("rate limit exceeded");
            respond(json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&mut app, method, &params).await {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(response);
    }

    info!("stdin closed, shutting down");
}
