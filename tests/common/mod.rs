// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-process fake backends for the HTTP tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request as the fake saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: &'static str,
    pub path: String,
    pub query: HashMap<String, String>,
    pub auth: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct Backend {
    pub transactions: Vec<Value>,
    pub next_id: i64,
    pub seen: Vec<Seen>,
}

pub type Shared = Arc<Mutex<Backend>>;

/// Serves `app` on an ephemeral port from a background runtime and returns
/// its base URL.
pub fn spawn(app: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", addr)
}

fn record(
    s: &Shared,
    method: &'static str,
    path: &str,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
    body: Value,
) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    s.lock().unwrap().seen.push(Seen {
        method,
        path: path.to_string(),
        query: query.clone(),
        auth,
        body,
    });
}

fn categories() -> Vec<Value> {
    vec![
        json!({"id": 1, "nome": "Salário", "icone": "💼", "tipo": "Receita", "cor": "#F59E0B"}),
        json!({"id": 2, "nome": "Mercado", "icone": "🛒", "tipo": "Despesa", "cor": "#EF4444"}),
        json!({"id": 3, "nome": "Aluguel", "icone": "🏠", "tipo": "Despesa", "cor": "#6366F1"}),
    ]
}

async fn list_accounts(State(s): State<Shared>, headers: HeaderMap) -> Json<Value> {
    record(&s, "GET", "/contas", &HashMap::new(), &headers, Value::Null);
    Json(json!([
        {"id": 1, "nome": "Nubank", "cor": "#8A05BE", "logo_url": null, "saldo": 1500.25},
        {"id": 2, "nome": "Itaú", "cor": "#EC7000", "saldo": "320.00"}
    ]))
}

async fn list_categories(
    State(s): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    record(&s, "GET", "/categorias", &q, &headers, Value::Null);
    let wanted = match q.get("tipo").map(String::as_str) {
        Some("entrada") => Some("Receita"),
        Some("saida") => Some("Despesa"),
        _ => None,
    };
    let rows: Vec<Value> = categories()
        .into_iter()
        .filter(|c| wanted.is_none_or(|w| c["tipo"] == w))
        .collect();
    Json(Value::Array(rows))
}

fn resource(uri: &Uri) -> String {
    uri.path().trim_start_matches("/api/").to_string()
}

async fn create_named(
    State(s): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let resource = resource(&uri);
    record(&s, "POST", &format!("/{}", resource), &HashMap::new(), &headers, body.clone());
    if body["nome"] == "boom" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "database unavailable"})),
        )
            .into_response();
    }
    let mut created = body;
    created["id"] = json!(40);
    if resource == "contas" {
        created["saldo"] = json!(0);
    }
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn list_named(State(s): State<Shared>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    let resource = resource(&uri);
    record(&s, "GET", &format!("/{}", resource), &HashMap::new(), &headers, Value::Null);
    let rows = match resource.as_str() {
        "formas-pagamento" => json!([{"id": 1, "nome": "Pix", "icone": "📱"}, {"id": 2, "nome": "Crédito", "icone": "💳"}]),
        "tipos-gasto" => json!([{"id": 1, "nome": "Fixo", "cor": "#111111"}, {"id": 2, "nome": "Variável"}]),
        "periodicidades" => json!([{"id": 1, "nome": "Mensal"}, {"id": 2, "nome": "Única"}]),
        _ => json!([]),
    };
    Json(rows)
}

async fn list_transactions(
    State(s): State<Shared>,
    Query(q): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    record(&s, "GET", "/transacoes", &q, &headers, Value::Null);
    let month = q.get("mes").and_then(|m| m.parse::<u32>().ok());
    let year = q.get("ano").cloned();
    let b = s.lock().unwrap();
    let rows: Vec<Value> = b
        .transactions
        .iter()
        .filter(|t| {
            let date = t["data_transacao"].as_str().unwrap_or_default();
            let y_ok = year.as_deref().is_none_or(|y| date.starts_with(y));
            let m_ok = month.is_none_or(|m| date.get(5..7) == Some(format!("{:02}", m).as_str()));
            y_ok && m_ok
        })
        .cloned()
        .collect();
    Json(Value::Array(rows))
}

async fn create_transaction(
    State(s): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record(&s, "POST", "/transacoes", &HashMap::new(), &headers, body.clone());
    let mut b = s.lock().unwrap();
    b.next_id += 1;
    let mut row = body;
    row["id"] = json!(b.next_id);
    // stored rows come back with a timestamp, like the real backend
    if let Some(d) = row["data_transacao"].as_str().map(str::to_string) {
        row["data_transacao"] = json!(format!("{}T00:00:00", d));
    }
    b.transactions.push(row.clone());
    (StatusCode::CREATED, Json(row))
}

async fn update_transaction(
    State(s): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&s, "PUT", &format!("/transacoes/{}", id), &HashMap::new(), &headers, body.clone());
    let mut b = s.lock().unwrap();
    let Some(row) = b.transactions.iter_mut().find(|t| t["id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Transação não encontrada"}))).into_response();
    };
    let mut updated = body;
    updated["id"] = json!(id);
    *row = updated.clone();
    Json(updated).into_response()
}

async fn delete_transaction(State(s): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    record(&s, "DELETE", &format!("/transacoes/{}", id), &HashMap::new(), &headers, Value::Null);
    let mut b = s.lock().unwrap();
    let before = b.transactions.len();
    b.transactions.retain(|t| t["id"] != id);
    if b.transactions.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Transação não encontrada"}))).into_response();
    }
    Json(json!({"message": "Transação excluída com sucesso"})).into_response()
}

async fn monthly_balance(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap) -> Json<Value> {
    record(&s, "GET", "/balanco-mensal", &q, &headers, Value::Null);
    Json(json!({
        "2": {"mes": 2, "mes_nome": "Fevereiro", "entradas": 100.0, "saidas": 40.0, "resultado": 60.0},
        "1": {"mes": 1, "mes_nome": "Janeiro", "entradas": 50.0, "saidas": 80.0, "resultado": -30.0}
    }))
}

async fn category_summary(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap) -> Json<Value> {
    record(&s, "GET", "/categorias-resumo", &q, &headers, Value::Null);
    Json(json!([{"categoria": "Mercado", "total": 230.4}, {"categoria": null, "valor": 12}]))
}

async fn dashboard(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap) -> Json<Value> {
    record(&s, "GET", "/dashboard", &q, &headers, Value::Null);
    Json(json!({
        "saldo_acumulado": 1820.25,
        "entradas_mes": 3000,
        "saidas_mes": 1179.75,
        "resultado_mensal": 1820.25,
        "transacoes_recentes": [],
        "total_transacoes": 0
    }))
}

async fn seed(State(s): State<Shared>, headers: HeaderMap) -> Json<Value> {
    record(&s, "POST", "/seed-data", &HashMap::new(), &headers, Value::Null);
    Json(json!({"message": "Dados iniciais criados com sucesso"}))
}

/// The finance API under `/api`, backed by `state`.
pub fn finance_backend(state: Shared) -> Router {
    Router::new()
        .route("/api/contas", get(list_accounts).post(create_named))
        .route("/api/categorias", get(list_categories).post(create_named))
        .route("/api/transacoes", get(list_transactions).post(create_transaction))
        .route("/api/transacoes/:id", put(update_transaction).delete(delete_transaction))
        .route("/api/balanco-mensal", get(monthly_balance))
        .route("/api/categorias-resumo", get(category_summary))
        .route("/api/dashboard", get(dashboard))
        .route("/api/seed-data", post(seed))
        .route("/api/:resource", get(list_named).post(create_named))
        .with_state(state)
}

/// Every endpoint fails: 404 with a JSON error, or 502 with an HTML page.
pub fn failing_backend() -> Router {
    Router::new()
        .route(
            "/api/contas",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))) }),
        )
        .route(
            "/api/metas",
            get(|| async { (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") }),
        )
        .route(
            "/api/parcelamentos",
            get(|| async { (StatusCode::OK, "not json") }),
        )
}

pub const ANON_KEY: &str = "anon-key";
pub const PASSWORD: &str = "correct horse";

fn check_key(headers: &HeaderMap) -> Option<Response> {
    if headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY) {
        return None;
    }
    Some((StatusCode::UNAUTHORIZED, Json(json!({"message": "No API key found in request"}))).into_response())
}

fn session(email: &str) -> Value {
    json!({
        "access_token": "tok-123",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1767225600,
        "refresh_token": "refresh-456",
        "user": {"id": "user-1", "email": email, "aud": "authenticated"}
    })
}

async fn token(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&s, "POST", "/auth/v1/token", &q, &headers, body.clone());
    if let Some(r) = check_key(&headers) {
        return r;
    }
    if body["password"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
        )
            .into_response();
    }
    Json(session(body["email"].as_str().unwrap_or_default())).into_response()
}

async fn signup(State(s): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&s, "POST", "/auth/v1/signup", &HashMap::new(), &headers, body.clone());
    if let Some(r) = check_key(&headers) {
        return r;
    }
    if body["password"].as_str().unwrap_or_default().len() < 6 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"code": 422, "msg": "Password should be at least 6 characters"})),
        )
            .into_response();
    }
    // confirmation pending: only the user comes back
    Json(json!({"id": "user-2", "email": body["email"], "aud": "authenticated"})).into_response()
}

async fn logout(State(s): State<Shared>, headers: HeaderMap) -> Response {
    record(&s, "POST", "/auth/v1/logout", &HashMap::new(), &headers, Value::Null);
    if let Some(r) = check_key(&headers) {
        return r;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn user(State(s): State<Shared>, headers: HeaderMap) -> Response {
    record(&s, "GET", "/auth/v1/user", &HashMap::new(), &headers, Value::Null);
    if let Some(r) = check_key(&headers) {
        return r;
    }
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer tok-123") => Json(json!({"id": "user-1", "email": "ana@example.com"})).into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"msg": "invalid JWT"}))).into_response(),
    }
}

/// A GoTrue-shaped identity service under `/auth/v1`.
pub fn identity_backend(state: Shared) -> Router {
    Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/user", get(user))
        .with_state(state)
}

pub fn shared() -> Shared {
    Arc::new(Mutex::new(Backend::default()))
}

pub fn seen(s: &Shared) -> Vec<Seen> {
    s.lock().unwrap().seen.clone()
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber and returns what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (out, logs)
}
