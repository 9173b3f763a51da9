//! Fake gym backend used by the integration tests: the auth and enquiry
//! endpoints, a rotating valid token, and call counters for asserting on
//! refresh behavior.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post, put};
use serde_json::{Value, json};
use tokio::sync::Mutex;

pub struct MockGym {
    /// The only bearer token the protected endpoints accept.
    pub valid_token: Mutex<String>,
    /// Token granted by the refresh endpoint; `None` makes refresh fail.
    pub refresh_grant: Mutex<Option<String>>,
    /// When false the granted token does not become valid, so a retried
    /// request keeps getting 401.
    pub refresh_updates_valid: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub enquiries: Mutex<Vec<Value>>,
    pub creates: Mutex<Vec<Value>>,
    pub status_updates: Mutex<Vec<Value>>,
    seq: AtomicUsize,
}

impl MockGym {
    pub fn new(valid_token: &str) -> Arc<Self> {
        Arc::new(Self {
            valid_token: Mutex::new(valid_token.to_string()),
            refresh_grant: Mutex::new(Some(valid_token.to_string())),
            refresh_updates_valid: AtomicBool::new(true),
            refresh_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            enquiries: Mutex::new(Vec::new()),
            creates: Mutex::new(Vec::new()),
            status_updates: Mutex::new(Vec::new()),
            seq: AtomicUsize::new(0),
        })
    }

    pub async fn seed_enquiry(&self, enquiry_id: &str, name: &str, contact: &str, status: &str) {
        self.enquiries.lock().await.push(json!({
            "enquiry_id": enquiry_id,
            "name": name,
            "contact": contact,
            "email": null,
            "message": null,
            "date": chrono::Utc::now().to_rfc3339(),
            "status": status,
            "statusReason": "",
        }));
    }
}

async fn authorized(state: &MockGym, headers: &HeaderMap) -> bool {
    let valid = state.valid_token.lock().await;
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == valid.as_str())
}

async fn login(State(state): State<Arc<MockGym>>) -> Json<Value> {
    let token = state.valid_token.lock().await.clone();
    Json(json!({
        "status": "ok",
        "data": {
            "access_token": token,
            "refresh_token": "refresh-1",
            "owner_id": "owner-1",
            "gym_id": "gym-1",
        }
    }))
}

async fn refresh(State(state): State<Arc<MockGym>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body.get("id").and_then(Value::as_str).is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"status": "error", "message": "missing id"})));
    }
    let grant = state.refresh_grant.lock().await.clone();
    match grant {
        Some(token) => {
            if state.refresh_updates_valid.load(Ordering::SeqCst) {
                *state.valid_token.lock().await = token.clone();
            }
            (StatusCode::OK, Json(json!({"status": "ok", "access_token": token})))
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "message": "invalid session"})),
        ),
    }
}

async fn profile(State(state): State<Arc<MockGym>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.profile_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers).await {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"})));
    }
    (StatusCode::OK, Json(json!({"result": "ok"})))
}

async fn list_enquiries(
    State(state): State<Arc<MockGym>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&state, &headers).await {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"})));
    }
    if !params.contains_key("gym_id") {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "missing gym_id"})));
    }
    let enquiries = state.enquiries.lock().await;
    let (completed, incomplete): (Vec<Value>, Vec<Value>) = enquiries
        .iter()
        .cloned()
        .partition(|e| matches!(e["status"].as_str(), Some("Joined" | "Rejected")));
    (
        StatusCode::OK,
        Json(json!({
            "incomplete_enquiries": incomplete,
            "completed_enquiries": completed,
        })),
    )
}

async fn create_enquiry(
    State(state): State<Arc<MockGym>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&state, &headers).await {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"})));
    }
    state.creates.lock().await.push(body.clone());

    let n = state.seq.fetch_add(1, Ordering::SeqCst) + 1;
    let mut record = body["data"].clone();
    record["enquiry_id"] = json!(format!("enq-{n}"));
    record["date"] = json!(chrono::Utc::now().to_rfc3339());
    state.enquiries.lock().await.push(record);

    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn update_enquiry_status(
    State(state): State<Arc<MockGym>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&state, &headers).await {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "unauthorized"})));
    }
    state.status_updates.lock().await.push(body.clone());

    let mut enquiries = state.enquiries.lock().await;
    if let Some(record) = enquiries.iter_mut().find(|e| e["enquiry_id"] == body["enquiry_id"]) {
        record["status"] = body["status"].clone();
        record["statusReason"] = body["statusReason"].clone();
    }
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

pub fn router(state: Arc<MockGym>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/owner/profile", get(profile))
        .route("/owner/gym-enquiries", get(list_enquiries).post(create_enquiry))
        .route("/owner/update-enquiry-status", put(update_enquiry_status))
        .with_state(state)
}

/// Serves the mock backend on an ephemeral port and returns its base URL.
pub async fn spawn(state: Arc<MockGym>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

/// Builds a credential store on an in-memory database plus an API client
/// pointed at `base_url`.
pub async fn client(base_url: &str) -> (gymadmin::db::Credentials, gymadmin::api::ApiClient) {
    let db_settings = gymadmin::cfg::DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let pool = gymadmin::db::init_pool(&db_settings).await.unwrap();
    let credentials = gymadmin::db::Credentials::new(pool);

    let api_settings = gymadmin::cfg::ApiSettings {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
        role: "owner".to_string(),
    };
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    let api = gymadmin::api::ApiClient::new(http, &api_settings, credentials.clone()).unwrap();
    (credentials, api)
}

/// Stores a full credential set with the given access token.
pub async fn seed_session(credentials: &gymadmin::db::Credentials, access_token: &str) {
    use gymadmin::db::keys;
    credentials.save(keys::ACCESS_TOKEN, access_token).await.unwrap();
    credentials.save(keys::REFRESH_TOKEN, "refresh-1").await.unwrap();
    credentials.save(keys::OWNER_ID, "owner-1").await.unwrap();
    credentials.save(keys::ROLE, "owner").await.unwrap();
    credentials.save(keys::GYM_ID, "gym-1").await.unwrap();
}
