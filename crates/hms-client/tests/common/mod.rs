#![allow(dead_code)]
// A local stand-in for the hostel REST API, serving the envelope shapes
// the real server produces. Each test binary spawns its own instance on
// an ephemeral port.
use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use hms_client::ClientConfig;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

pub const STUDENT_TOKEN: &str = "tok-student";
pub const ADMIN_TOKEN: &str = "tok-admin";

#[derive(Default)]
pub struct MockState {
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub dashboard_calls: AtomicUsize,
    pub registration_list_calls: AtomicUsize,
    pub approved: Mutex<HashSet<i64>>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockApi {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: format!("http://{}", self.addr),
            request_timeout: Duration::from_secs(2),
            session_file: None,
        }
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub async fn spawn_mock_api() -> MockApi {
    init_tracing();
    let state = Arc::new(MockState::default());
    let app = axum::Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/students/register", post(register))
        .route("/api/students/dashboard", get(dashboard))
        .route("/api/admin/form-numbers", post(add_form_numbers))
        .route("/api/admin/registration-requests", get(registration_requests))
        .route(
            "/api/admin/registration-requests/:id/approve",
            put(approve_registration),
        )
        .with_state(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    wait_for_listen(addr).await.expect("server ready");
    MockApi {
        addr,
        state,
        shutdown: Some(shutdown_tx),
    }
}

async fn wait_for_listen(addr: SocketAddr) -> Result<(), String> {
    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(format!("server never became ready at {addr}"));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn ok(data: Value) -> Response {
    Json(json!({
        "success": true,
        "message": "OK",
        "data": data,
        "timestamp": "2025-01-01T00:00:00Z"
    }))
    .into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "message": message,
            "timestamp": "2025-01-01T00:00:00Z"
        })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn login(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Response {
    state
        .login_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password) {
        ("s@hostel.edu", "secret1") => ok(json!({
            "token": STUDENT_TOKEN,
            "email": "s@hostel.edu",
            "role": "STUDENT",
            "isMonitor": true,
            "fullName": "Asha Kumar"
        })),
        ("admin@hostel.edu", "admin1") => ok(json!({
            "token": ADMIN_TOKEN,
            "email": "admin@hostel.edu",
            "role": "ADMIN",
            "isMonitor": false
        })),
        _ => fail(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

async fn register(
    State(state): State<Arc<MockState>>,
    mut multipart: Multipart,
) -> Response {
    state
        .register_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let mut text_fields = 0usize;
    let mut photo_bytes = 0usize;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("photo") {
            photo_bytes = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        } else {
            let _ = field.text().await;
            text_fields += 1;
        }
    }
    if photo_bytes == 0 {
        return fail(StatusCode::BAD_REQUEST, "Photo is required");
    }
    if text_fields != 12 {
        return fail(StatusCode::BAD_REQUEST, "Registration form is incomplete");
    }
    ok(Value::Null)
}

async fn dashboard(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(STUDENT_TOKEN) {
        return fail(StatusCode::UNAUTHORIZED, "Invalid or expired token");
    }
    // Small delay so concurrent queries overlap in the coalescing tests.
    tokio::time::sleep(Duration::from_millis(30)).await;
    state
        .dashboard_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    ok(json!({
        "currentBalance": 1200.0,
        "pendingBillAmount": 300.0,
        "netBalance": 900.0,
        "monthlyExpenses": 2100.0,
        "presentDaysThisMonth": 18,
        "totalDaysThisMonth": 20,
        "isMonitor": true,
        "fullName": "Asha Kumar"
    }))
}

// Reports duplicates as a 200 whose envelope says success:false, the way
// some of the real server's handlers do.
async fn add_form_numbers(
    State(_state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return fail(StatusCode::FORBIDDEN, "Admin access required");
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": false,
            "message": "Form numbers already exist",
            "timestamp": "2025-01-01T00:00:00Z"
        })),
    )
        .into_response()
}

fn registration_request_json(id: i64, approved: bool) -> Value {
    json!({
        "requestId": id,
        "formNumber": format!("FRM-{id:03}"),
        "email": format!("student{id}@hostel.edu"),
        "enrollmentNo": format!("EN-{id}"),
        "fullName": "Pending Student",
        "phone": "9876543210",
        "department": "Physics",
        "batch": "2024",
        "pincode": "110001",
        "district": "Jaipur",
        "tehsil": "Sanganer",
        "guardianPhone": "9876543211",
        "photoUrl": format!("photo-{id}.jpg"),
        "status": if approved { "APPROVED" } else { "PENDING" },
        "createdAt": "2025-01-01T00:00:00Z"
    })
}

async fn registration_requests(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return fail(StatusCode::FORBIDDEN, "Admin access required");
    }
    state
        .registration_list_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let approved = state.approved.lock().expect("approved lock");
    ok(json!([
        registration_request_json(1, approved.contains(&1)),
        registration_request_json(2, approved.contains(&2)),
    ]))
}

async fn approve_registration(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Query(_params): Query<HashMap<String, String>>,
) -> Response {
    if bearer(&headers) != Some(ADMIN_TOKEN) {
        return fail(StatusCode::FORBIDDEN, "Admin access required");
    }
    if !(1..=2).contains(&id) {
        return fail(StatusCode::NOT_FOUND, "Registration request not found");
    }
    state.approved.lock().expect("approved lock").insert(id);
    ok(Value::Null)
}
