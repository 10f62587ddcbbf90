//! In-memory mock of the Vigil monitoring API, used by integration tests.
//!
//! DTOs here are defined independently from the SDK crate on purpose:
//! integration tests exercise both sides over real JSON, so any schema
//! drift between the two shows up as a test failure rather than silently
//! compiling.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_LIMIT: u32 = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Server {
    pub id: Uuid,
    pub hostname: String,
    pub os: String,
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct RegisterServer {
    pub hostname: String,
    pub os: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub server_id: Uuid,
    pub severity: String,
    pub message: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub hostname: String,
    pub reported_at: DateTime<Utc>,
    pub services: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiskIoSample {
    pub device: String,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_ops: u64,
    pub write_ops: u64,
    pub busy_time_ns: u64,
}

/// The `{status, message, data, meta}` wrapper every endpoint responds with.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            data: Some(data),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl Envelope<()> {
    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.to_string()),
            data: None,
            meta: None,
        }
    }

    pub fn ok_message(message: &str) -> Self {
        Self {
            status: "success".to_string(),
            message: Some(message.to_string()),
            data: None,
            meta: None,
        }
    }
}

type ErrorResponse = (StatusCode, Json<Envelope<()>>);

fn not_found(message: &str) -> ErrorResponse {
    (StatusCode::NOT_FOUND, Json(Envelope::error(message)))
}

#[derive(Default)]
pub struct AppState {
    pub servers: HashMap<Uuid, Server>,
    pub alerts: HashMap<Uuid, Alert>,
    pub health_reports: Vec<HealthReport>,
    pub disk_samples: Vec<DiskIoSample>,
}

pub type Db = Arc<RwLock<AppState>>;

pub fn app() -> Router {
    app_with_state(AppState::default())
}

/// Build the router over pre-seeded state; tests use this to start with
/// existing servers or alerts.
pub fn app_with_state(state: AppState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    Router::new()
        .route("/api/v1/servers", get(list_servers).post(register_server))
        .route(
            "/api/v1/servers/{id}",
            get(get_server).delete(delete_server),
        )
        .route("/api/v1/alerts", get(list_alerts))
        .route("/api/v1/alerts/{id}/ack", put(ack_alert))
        .route("/api/v1/health", post(submit_health))
        .route("/api/v1/metrics/disk-io", post(submit_disk_io))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve over pre-seeded state.
pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

#[derive(Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Slice a full collection down to the requested page and describe it.
fn paginate<T>(mut items: Vec<T>, params: &PageParams) -> (Vec<T>, Meta) {
    let total_items = items.len() as u64;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let page = params.page.unwrap_or(1).max(1);
    let total_pages = (total_items.div_ceil(limit as u64)) as u32;

    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let page_items = if start >= items.len() {
        Vec::new()
    } else {
        items.drain(start..(start + limit as usize).min(items.len())).collect()
    };

    (
        page_items,
        Meta {
            page,
            limit,
            total_items,
            total_pages,
        },
    )
}

async fn list_servers(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Json<Envelope<Vec<Server>>> {
    let state = db.read().await;
    let mut servers: Vec<Server> = state.servers.values().cloned().collect();
    servers.sort_by(|a, b| a.hostname.cmp(&b.hostname));
    let (page_items, meta) = paginate(servers, &params);
    Json(Envelope::ok(page_items).with_meta(meta))
}

async fn register_server(
    State(db): State<Db>,
    Json(input): Json<RegisterServer>,
) -> (StatusCode, Json<Envelope<Server>>) {
    let server = Server {
        id: Uuid::new_v4(),
        hostname: input.hostname,
        os: input.os,
        last_seen: Some(Utc::now()),
        tags: input.tags,
    };
    db.write().await.servers.insert(server.id, server.clone());
    (StatusCode::CREATED, Json(Envelope::ok(server)))
}

async fn get_server(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Server>>, ErrorResponse> {
    let state = db.read().await;
    state
        .servers
        .get(&id)
        .cloned()
        .map(|server| Json(Envelope::ok(server)))
        .ok_or_else(|| not_found("server not found"))
}

async fn delete_server(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ErrorResponse> {
    let mut state = db.write().await;
    state
        .servers
        .remove(&id)
        .map(|_| Json(Envelope::ok_message("server deleted")))
        .ok_or_else(|| not_found("server not found"))
}

async fn list_alerts(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Json<Envelope<Vec<Alert>>> {
    let state = db.read().await;
    let mut alerts: Vec<Alert> = state.alerts.values().cloned().collect();
    alerts.sort_by_key(|a| a.created_at);
    let (page_items, meta) = paginate(alerts, &params);
    Json(Envelope::ok(page_items).with_meta(meta))
}

async fn ack_alert(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Alert>>, ErrorResponse> {
    let mut state = db.write().await;
    let alert = state
        .alerts
        .get_mut(&id)
        .ok_or_else(|| not_found("alert not found"))?;
    alert.acknowledged = true;
    Ok(Json(Envelope::ok(alert.clone())))
}

async fn submit_health(
    State(db): State<Db>,
    Json(report): Json<HealthReport>,
) -> (StatusCode, Json<Envelope<HealthReport>>) {
    db.write().await.health_reports.push(report.clone());
    (StatusCode::CREATED, Json(Envelope::ok(report)))
}

async fn submit_disk_io(
    State(db): State<Db>,
    Json(sample): Json<DiskIoSample>,
) -> (StatusCode, Json<Envelope<DiskIoSample>>) {
    db.write().await.disk_samples.push(sample.clone());
    (StatusCode::CREATED, Json(Envelope::ok(sample)))
}
