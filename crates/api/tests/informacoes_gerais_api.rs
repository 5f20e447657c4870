//! Integration tests for the singleton `/informacoes-gerais` resource.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    count_audit_rows, expect_status, get_auth, post_json_auth, put_json_auth, seed_and_login,
    CPF_ADMIN, CPF_STAFF,
};
use sqlx::PgPool;

fn info_body(nome_empresa: &str) -> serde_json::Value {
    json!({
        "nome_empresa": nome_empresa,
        "preco_almoco": 1300,
        "preco_meia_almoco": 650,
        "preco_jantar": 1300,
        "preco_meia_jantar": 650,
        "inicio_almoco": "11:00:00",
        "fim_almoco": "14:00:00",
        "inicio_jantar": "17:30:00",
        "fim_jantar": "19:30:00",
    })
}

/// Before anything is configured, the read answers 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn get_before_configuration_is_not_found(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/informacoes-gerais/", &token).await;

    let body = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["detail"], "Informações gerais não encontradas.");
}

/// POST creates the singleton row, audited; any staff member can then
/// read it.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_then_read(pool: PgPool) {
    let admin_token = seed_and_login(&pool, CPF_ADMIN, "admin").await;
    let staff_token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/informacoes-gerais/",
        &admin_token,
        info_body("RU Central"),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["nome_empresa"], "RU Central");
    assert_eq!(count_audit_rows(&pool, "update_general_info").await, 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/informacoes-gerais/", &staff_token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["nome_empresa"], "RU Central");
    assert_eq!(body["preco_almoco"], 1300);
    assert_eq!(body["inicio_almoco"], "11:00:00");
}

/// A second POST replaces the row in place; there is never more than
/// one.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_replaces_existing_row(pool: PgPool) {
    let admin_token = seed_and_login(&pool, CPF_ADMIN, "admin").await;

    for nome in ["RU Central", "RU Norte"] {
        let app = common::build_test_app(pool.clone());
        let response =
            post_json_auth(app, "/informacoes-gerais/", &admin_token, info_body(nome)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/informacoes-gerais/", &admin_token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["nome_empresa"], "RU Norte");
    assert_eq!(count_audit_rows(&pool, "update_general_info").await, 2);
}

/// PUT requires the row to exist already.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_before_creation_is_not_found(pool: PgPool) {
    let admin_token = seed_and_login(&pool, CPF_ADMIN, "admin").await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        "/informacoes-gerais/",
        &admin_token,
        info_body("RU Central"),
    )
    .await;

    let body = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["detail"], "Informações gerais não encontradas.");
}

/// PUT updates the existing row.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_existing_row(pool: PgPool) {
    let admin_token = seed_and_login(&pool, CPF_ADMIN, "admin").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/informacoes-gerais/",
        &admin_token,
        info_body("RU Central"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = info_body("RU Central");
    body["preco_almoco"] = json!(1500);
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, "/informacoes-gerais/", &admin_token, body).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["preco_almoco"], 1500);
}

/// An inverted meal window is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_inverted_window(pool: PgPool) {
    let admin_token = seed_and_login(&pool, CPF_ADMIN, "admin").await;
    let app = common::build_test_app(pool);

    let mut body = info_body("RU Central");
    body["inicio_almoco"] = json!("14:00:00");
    body["fim_almoco"] = json!("11:00:00");
    let response = post_json_auth(app, "/informacoes-gerais/", &admin_token, body).await;

    let body = expect_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["detail"], "Período de refeição inválido");
}

/// Writes are admin-only.
#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_non_admin(pool: PgPool) {
    let staff_token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/informacoes-gerais/",
        &staff_token,
        info_body("RU Central"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
