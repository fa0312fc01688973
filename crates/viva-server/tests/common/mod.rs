//! Shared setup for the server integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use viva_providers::{GladiaConfig, HeyGenConfig, WorkflowConfig};
use viva_server::config::Config;
use viva_server::relay::ConnectionRelay;
use viva_server::{app, AppState};
use wiremock::{MockServer, Request};

/// Configuration pointing every provider at `upstream`, with the workflow
/// start webhook at `/webhook/starts-interview`.
pub fn config_for(upstream: &MockServer) -> Config {
    let mut config = Config::default();
    config.workflow = WorkflowConfig::new(format!("{}/webhook/starts-interview", upstream.uri()));
    config.workflow.forward_timeout_secs = 2;
    config.gladia = GladiaConfig::new(upstream.uri(), "gladia-test-key");
    config.heygen = HeyGenConfig::new(upstream.uri(), "heygen-test-key");
    config.server.static_dir = "does-not-exist".to_string();
    config
}

pub fn state_for(upstream: &MockServer) -> AppState {
    AppState::new(&config_for(upstream)).unwrap()
}

/// Serves the app on an ephemeral port and returns its address.
pub async fn spawn_app(state: AppState) -> SocketAddr {
    let app = app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

/// Waits up to two seconds for the session's binding to reach `bound`.
pub async fn wait_for_binding(relay: &ConnectionRelay, session_id: &str, bound: bool) -> bool {
    for _ in 0..200 {
        if relay.is_connected(session_id).await == bound {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Waits up to two seconds for at least `count` requests to `path`.
pub async fn wait_for_requests(upstream: &MockServer, path: &str, count: usize) -> Vec<Request> {
    for _ in 0..200 {
        let seen = requests_to(upstream, path).await;
        if seen.len() >= count {
            return seen;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    requests_to(upstream, path).await
}

/// Requests the mock server has seen for `path`.
pub async fn requests_to(upstream: &MockServer, path: &str) -> Vec<Request> {
    upstream
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

/// A tracing event recorded by [`capture_logs`].
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Events from this crate at exactly `level`.
    pub fn server_events(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level && e.target.starts_with("viva_server"))
            .cloned()
            .collect()
    }
}

struct CaptureLayer {
    logs: CapturedLogs,
}

struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{value:?}");
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor {
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut visitor);

        self.logs.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Captures tracing events on the current thread until the guard drops.
///
/// Only sound with the default current-thread `#[tokio::test]` runtime, where
/// every task runs on the test's own thread.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer { logs: logs.clone() });
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
