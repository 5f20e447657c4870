//! Shared helpers for the HTTP-level integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so the
//! tests exercise the same middleware stack production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use sqlx::PgPool;
use tower::ServiceExt;

use ru_api::auth::jwt::{generate_token, JwtConfig};
use ru_api::auth::password::hash_password;
use ru_api::config::ServerConfig;
use ru_api::router::build_app;
use ru_api::state::AppState;
use ru_core::cpf;
use ru_core::crypto::CpfCipher;
use ru_core::types::DbId;
use ru_db::models::client::NewClient;
use ru_db::models::employee::{Employee, NewEmployee};
use ru_db::repositories::{ClientRepo, EmployeeRepo};

/// Structurally valid CPFs for seeding distinct people.
pub const CPF_ADMIN: &str = "19896507406";
pub const CPF_STAFF: &str = "79920205451";
pub const CPF_EXTRA: &str = "89159073454";
pub const CPF_CLIENT: &str = "11144477735";
pub const CPF_OTHER: &str = "52998224725";

/// Plaintext password shared by all seeded employees.
pub const TEST_PASSWORD: &str = "senha-secreta-123";

/// Fixed AES key so seeded rows and the app under test agree.
const TEST_CPF_KEY: [u8; 32] = [7u8; 32];

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 30,
        },
        cpf_key: String::new(),
    }
}

/// Cipher matching the one `build_test_app` installs.
pub fn test_cipher() -> CpfCipher {
    CpfCipher::new(&TEST_CPF_KEY)
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        cipher: Arc::new(test_cipher()),
    };
    build_app(state)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert an employee directly in the database, bypassing the API (and
/// therefore the audit trail), so tests control their fixtures.
pub async fn seed_employee(pool: &PgPool, raw_cpf: &str, tipo: &str) -> Employee {
    let normalized = cpf::normalize(raw_cpf).expect("seed CPF must be valid");
    let cipher = test_cipher();

    let mut conn = pool.acquire().await.expect("pool acquire should succeed");
    EmployeeRepo::create(
        &mut conn,
        &NewEmployee {
            nome: format!("Pessoa {}", &normalized[..3]),
            cpf_hash: cpf::lookup_hash(&normalized),
            cpf_cript: cipher.encrypt(&normalized).expect("encrypt should succeed"),
            senha_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            email: format!("{normalized}@test.com"),
            tipo: tipo.to_string(),
            data_entrada: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        },
    )
    .await
    .expect("employee seed should succeed")
}

/// Insert a client directly in the database.
pub async fn seed_client(pool: &PgPool, raw_cpf: &str) -> DbId {
    let normalized = cpf::normalize(raw_cpf).expect("seed CPF must be valid");
    let cipher = test_cipher();

    let mut conn = pool.acquire().await.expect("pool acquire should succeed");
    let client = ClientRepo::create(
        &mut conn,
        &NewClient {
            nome: format!("Cliente {}", &normalized[..3]),
            cpf_hash: cpf::lookup_hash(&normalized),
            cpf_cript: cipher.encrypt(&normalized).expect("encrypt should succeed"),
            matricula: "20240001".to_string(),
            tipo: "aluno".to_string(),
            graduando: true,
            pos_graduando: false,
            bolsista: false,
        },
    )
    .await
    .expect("client seed should succeed");
    client.id
}

/// Forge a token directly (no login round-trip). Useful both for normal
/// auth and for tokens whose CPF matches no employee.
pub fn make_token(raw_cpf: &str, tipo: &str, user_id: DbId) -> String {
    let normalized = cpf::normalize(raw_cpf).expect("token CPF must be valid");
    generate_token(&normalized, tipo, user_id, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Seed an employee and return a valid token for them.
pub async fn seed_and_login(pool: &PgPool, raw_cpf: &str, tipo: &str) -> String {
    let employee = seed_employee(pool, raw_cpf, tipo).await;
    make_token(raw_cpf, tipo, employee.id)
}

/// Count history rows with the given action kind.
pub async fn count_audit_rows(pool: &PgPool, acao: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM historico_acoes WHERE acao = $1")
        .bind(acao)
        .fetch_one(pool)
        .await
        .expect("audit count should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json_auth(app, "POST", uri, token, body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json_auth(app, "PUT", uri, token, body).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    request_json_auth(app, "PATCH", uri, token, body).await
}

async fn request_json_auth(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST with an empty body (the action endpoints take no payload).
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a multipart upload carrying one file field.
pub async fn post_csv_auth(
    app: Router,
    uri: &str,
    token: &str,
    filename: &str,
    content: &str,
) -> Response<Body> {
    let boundary = "test-boundary-7MA4YWxkTrZu0gW";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a response status and return the parsed body.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
