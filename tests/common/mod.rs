#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use analyses_panel::analyses::AnalysesApi;
use analyses_panel::api::ApiClient;
use analyses_panel::auth::{AuthSession, MemoryStore, Navigator};
use analyses_panel::config::PanelConfig;

pub const TOKEN: &str = "tok-123";
pub const TOTAL_ROWS: u64 = 240;

/// One request as seen by the stub server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Stub {
    fn record(&self, method: Method, path: &str, query: HashMap<String, String>, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests
            .lock()
            .unwrap()
            .push(Recorded { method, path: path.to_string(), query, authorization, body });
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<Recorded> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn config(&self) -> PanelConfig {
        PanelConfig::for_server(self.base_url.clone())
    }
}

/// Start the stub panel API on an ephemeral port
pub async fn start_stub() -> Result<StubServer> {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/additional-analyses", get(list).post(create))
        .route("/api/v1/additional-analyses/types", get(types))
        .route("/api/v1/additional-analyses/template", get(template))
        .route("/api/v1/additional-analyses/import", post(import))
        .route("/api/v1/additional-analyses/export", post(export))
        .route("/api/v1/additional-analyses/account/:code", get(by_account))
        .route("/api/v1/additional-analyses/:id", get(show).put(update).delete(remove))
        .route("/api/v1/additional-analyses/:id/hard", axum::routing::delete(hard_remove))
        .route("/health", get(health))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind stub server")?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(StubServer { base_url: format!("http://{}", addr), requests: stub.requests })
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().unwrap().push(path.to_string());
    }
}

/// Session on `path`, signed in with [`TOKEN`] when `signed_in`
pub fn session(
    config: &PanelConfig,
    signed_in: bool,
    path: &str,
) -> Result<(Arc<AuthSession>, Arc<RecordingNavigator>)> {
    let navigator = Arc::new(RecordingNavigator::default());
    let session = AuthSession::open(
        Arc::new(MemoryStore::new()),
        navigator.clone(),
        config.session.clone(),
        config.api.prefix.clone(),
        if signed_in { "/login" } else { path },
    )?;
    if signed_in {
        session.login(TOKEN, analyses_panel::auth::Identity::new("admin", "Administrator"))?;
    }
    Ok((Arc::new(session), navigator))
}

pub fn analyses_api(config: &PanelConfig, session: Arc<AuthSession>) -> Result<AnalysesApi> {
    Ok(AnalysesApi::new(ApiClient::new(&config.api, session)?))
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", TOKEN);
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"success": false, "message": "Invalid or expired token"}))).into_response()
}

fn ok(message: &str, data: Value) -> Response {
    Json(json!({"success": true, "message": message, "data": data})).into_response()
}

pub fn row(id: u64) -> Value {
    let analysis_type = if id % 2 == 0 { "tax_treatment" } else { "revenue_recognition" };
    let status = if id % 3 == 0 { "inactive" } else { "active" };
    json!({
        "id": id,
        "account_code": format!("1206{:04}", id),
        "account_name": "Piutang Usaha",
        "analysis_type": analysis_type,
        "analysis_title": format!("Analysis {}", id),
        "status": status,
        "notes": null,
        "created_by": 1,
        "created_at": "2024-03-01T08:00:00Z",
        "updated_at": "2024-03-02T09:30:00Z"
    })
}

async fn health(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record(Method::GET, "/health", HashMap::new(), &headers, None);
    Json(json!({"success": true, "data": {"status": "ok"}}))
}

async fn login(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    stub.record(Method::POST, "/api/v1/auth/login", HashMap::new(), &headers, Some(body.clone()));
    if body["password"] != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"success": false, "message": "Invalid username or password"})))
            .into_response();
    }
    ok(
        "Login successful",
        json!({
            "access_token": TOKEN,
            "refresh_token": "refresh-1",
            "user": {"id": 1, "name": "Administrator", "username": body["username"], "email": "admin@example.com", "role": "admin", "is_active": true}
        }),
    )
}

async fn logout(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.record(Method::POST, "/api/v1/auth/logout", HashMap::new(), &headers, None);
    ok("Logout successful", Value::Null)
}

async fn me(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.record(Method::GET, "/api/v1/auth/me", HashMap::new(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    ok(
        "User retrieved",
        json!({"id": 1, "name": "Administrator", "username": "admin", "email": "admin@example.com", "role": "admin", "is_active": true}),
    )
}

/// Offset pages by `page`; cursor pages by `cursor=c{page}`
async fn list(State(stub): State<Stub>, headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    stub.record(Method::GET, "/api/v1/additional-analyses", query.clone(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    if query.get("search").map(String::as_str) == Some("boom") {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"success": false, "message": "Database unavailable"})))
            .into_response();
    }

    let limit: u64 = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(25);
    let last = TOTAL_ROWS.div_ceil(limit);
    let page: u64 = match query.get("cursor") {
        Some(cursor) => cursor.trim_start_matches('c').parse().unwrap_or(1),
        None => query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1),
    };
    let page = page.max(1);
    let first = (page - 1) * limit + 1;
    let rows: Vec<Value> = (first..=(page * limit).min(TOTAL_ROWS)).take(5).map(row).collect();
    let cursor_mode = query.get("mode").map(String::as_str) == Some("cursor");
    let next_cursor = if cursor_mode && page < last { json!(format!("c{}", page + 1)) } else { Value::Null };
    let prev_cursor = if cursor_mode && page > 1 { json!(format!("c{}", page - 1)) } else { Value::Null };
    let mode = if cursor_mode { "cursor" } else { "offset" };

    ok(
        "Additional analyses retrieved successfully",
        json!({
            "data": rows,
            "pagination": {
                "current_page": page,
                "last_page": last,
                "per_page": limit,
                "total": TOTAL_ROWS,
                "has_more": page < last,
                "next_cursor": next_cursor,
                "prev_cursor": prev_cursor,
                "mode": mode
            }
        }),
    )
}

async fn show(State(stub): State<Stub>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    stub.record(Method::GET, &format!("/api/v1/additional-analyses/{}", id), HashMap::new(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == 404 {
        return (StatusCode::NOT_FOUND, Json(json!({"success": false, "message": "Additional analysis not found"})))
            .into_response();
    }
    ok("Additional analysis retrieved successfully", row(id))
}

async fn create(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    stub.record(Method::POST, "/api/v1/additional-analyses", HashMap::new(), &headers, Some(body.clone()));
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut created = row(500);
    for key in ["account_code", "analysis_type", "analysis_title", "status"] {
        created[key] = body[key].clone();
    }
    ok("Additional analysis created successfully", created)
}

async fn update(State(stub): State<Stub>, headers: HeaderMap, Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    stub.record(Method::PUT, &format!("/api/v1/additional-analyses/{}", id), HashMap::new(), &headers, Some(body.clone()));
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut updated = row(id);
    for key in ["account_code", "analysis_type", "analysis_title", "status", "notes"] {
        updated[key] = body[key].clone();
    }
    ok("Additional analysis updated successfully", updated)
}

async fn remove(State(stub): State<Stub>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    stub.record(Method::DELETE, &format!("/api/v1/additional-analyses/{}", id), HashMap::new(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    ok("Additional analysis deleted successfully", Value::Null)
}

async fn hard_remove(State(stub): State<Stub>, headers: HeaderMap, Path(id): Path<u64>) -> Response {
    stub.record(Method::DELETE, &format!("/api/v1/additional-analyses/{}/hard", id), HashMap::new(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    ok("Additional analysis hard deleted successfully", Value::Null)
}

/// Rows 1 and 2 belong to `12060001`; every other account has none
async fn by_account(State(stub): State<Stub>, headers: HeaderMap, Path(code): Path<String>) -> Response {
    stub.record(Method::GET, &format!("/api/v1/additional-analyses/account/{}", code), HashMap::new(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    let rows: Vec<Value> = if code == "12060001" { vec![row(1), row(2)] } else { Vec::new() };
    ok("Additional analyses retrieved successfully", json!(rows))
}

async fn types(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.record(Method::GET, "/api/v1/additional-analyses/types", HashMap::new(), &headers, None);
    if !authorized(&headers) {
        return unauthorized();
    }
    ok("Analysis types retrieved successfully", json!(["revenue_recognition", "tax_treatment"]))
}

async fn template(State(stub): State<Stub>, headers: HeaderMap) -> Response {
    stub.record(Method::GET, "/api/v1/additional-analyses/template", HashMap::new(), &headers, None);
    (
        [("content-type", "text/csv")],
        "Account Code,Analysis Type,Analysis Title,Status,Notes\n12060700,revenue_recognition,Sample Analysis Title,active,Sample notes here\n",
    )
        .into_response()
}

async fn import(State(stub): State<Stub>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    let mut received = json!({});
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        received[name] = json!({"file_name": file_name, "size": size});
    }
    stub.record(Method::POST, "/api/v1/additional-analyses/import", HashMap::new(), &headers, Some(received));
    if !authorized(&headers) {
        return unauthorized();
    }
    ok("Additional analyses imported successfully", json!({"success": 3, "failed": 1, "total": 4, "errors": [
        {"row": 4, "field": "account_code", "value": "", "message": "Account code is required"}
    ]}))
}

async fn export(State(stub): State<Stub>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    stub.record(Method::POST, "/api/v1/additional-analyses/export", HashMap::new(), &headers, Some(body));
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        [("content-type", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")],
        b"PK\x03\x04fake-xlsx".to_vec(),
    )
        .into_response()
}
