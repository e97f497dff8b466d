//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use deploy_gate::config::{GateConfig, SyncType};
use deploy_gate::descriptor::Descriptor;

/// A request as seen by a mock service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: String,
}

type Handler = Arc<dyn Fn(RecordedRequest) -> BoxFuture<'static, (u16, String)> + Send + Sync>;

#[derive(Clone)]
struct MockState {
    handler: Handler,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A running mock service.
pub struct MockService {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    /// URL for `path` on this service.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable mock service on an ephemeral port.
pub async fn start_programmable_service<F, Fut>(f: F) -> MockService
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let handler: Handler = Arc::new(move |req| Box::pin(f(req)));
    let state = MockState {
        handler,
        requests: requests.clone(),
    };
    let app = Router::new().fallback(handle).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockService { addr, requests }
}

/// Start a mock service that always answers `status` with `body`.
pub async fn start_fixed_service(status: u16, body: &'static str) -> MockService {
    start_programmable_service(move |_| async move { (status, body.to_string()) }).await
}

/// Start a mock service that answers after `delay`.
pub async fn start_slow_service(delay: Duration, status: u16, body: &'static str) -> MockService {
    start_programmable_service(move |_| async move {
        tokio::time::sleep(delay).await;
        (status, body.to_string())
    })
    .await
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let query = url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
        .into_owned()
        .collect();
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    state.requests.lock().unwrap().push(request.clone());

    let (status, body) = (state.handler)(request).await;
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// A closed local port: connections are refused.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/check", addr)
}

/// Descriptor for artifact `n`.
pub fn descriptor(n: usize) -> Descriptor {
    Descriptor {
        jet_id: format!("JET-{}", n),
        organization_name: "retail".into(),
        project_name: "payments".into(),
        artifact_name: format!("payments-api-{}", n),
        artifact_tag: "1.4.2".into(),
        artifact_id: format!("sha256:{:04}", n),
        artifact_create_date: "2024-03-01T10:00:00Z".into(),
        artifact_location: format!("registry.local/retail/payments-api-{}:1.4.2", n),
        target_environment: String::new(),
        seal_id: "09959".into(),
        deployment_id: "114041".into(),
    }
}

/// JSON payload for artifact `n`, as the hook passes it.
pub fn payload(n: usize) -> String {
    serde_json::to_string(&descriptor(n)).unwrap()
}

/// Baseline config with a token, a short deadline and no endpoints.
pub fn base_config(sync_type: SyncType, descriptors: usize) -> GateConfig {
    let mut config = GateConfig::default();
    config.sync_type = Some(sync_type);
    config.auth.token = "test-token".into();
    config.payloads = (0..descriptors).map(payload).collect();
    config.git.branch = "main".into();
    config.git.repo_url = "https://github.com/retail/payments".into();
    config.git.last_commit_id = "4f2a9c1".into();
    config.git.last_commit_message = "CHG0030001".into();
    config.identity.seal_id = Some("09959".into());
    config.identity.deployment_id = Some("114041".into());
    config.report.target_environment = "prod".into();
    config.execution.timeout_secs = 5;
    config
}
