//! Integration tests for the `/cliente` resource.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    count_audit_rows, delete_auth, expect_status, get_auth, patch_json_auth, post_auth,
    post_csv_auth, post_json_auth, seed_and_login, seed_client, CPF_ADMIN, CPF_CLIENT,
    CPF_EXTRA, CPF_OTHER, CPF_STAFF,
};
use sqlx::PgPool;

fn register_body(cpf: &str) -> serde_json::Value {
    json!({
        "cpf": cpf,
        "nome": "Ana Pereira",
        "matricula": "20250042",
        "tipo": "aluno",
        "graduando": true,
        "bolsista": true,
    })
}

/// Registration answers 201 with the created body, CPF decrypted.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_returns_created_client(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    let app = common::build_test_app(pool.clone());

    let response = post_json_auth(app, "/cliente/", &token, register_body(CPF_CLIENT)).await;

    let body = expect_status(response, StatusCode::CREATED).await;
    assert_eq!(body["nome"], "Ana Pereira");
    assert_eq!(body["cpf"], CPF_CLIENT);
    assert_eq!(body["matricula"], "20250042");
    assert_eq!(body["graduando"], true);
    // Omitted flag defaults to false.
    assert_eq!(body["pos_graduando"], false);
    assert_eq!(count_audit_rows(&pool, "register_client").await, 1);
}

/// The same CPF cannot be registered twice.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_duplicate_cpf(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    seed_client(&pool, CPF_CLIENT).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/cliente/", &token, register_body(CPF_CLIENT)).await;

    let body = expect_status(response, StatusCode::CONFLICT).await;
    assert_eq!(body["detail"], "CPF já cadastrado no sistema");
}

/// A category outside the closed set is unprocessable.
#[sqlx::test(migrations = "../db/migrations")]
async fn register_rejects_unknown_category(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    let app = common::build_test_app(pool);

    let mut body = register_body(CPF_CLIENT);
    body["tipo"] = json!("visitante");
    let response = post_json_auth(app, "/cliente/", &token, body).await;

    let body = expect_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["detail"], "Tipo de cliente inválido");
}

/// Lookup by CPF returns the client; an unknown CPF answers 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn get_by_cpf_finds_client(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    seed_client(&pool, CPF_CLIENT).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/cliente/{CPF_CLIENT}"), &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["cpf"], CPF_CLIENT);
    assert_eq!(body["tipo"], "aluno");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/cliente/{CPF_OTHER}"), &token).await;
    let body = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["detail"], "Cliente não encontrado");
}

/// The listing filters by name substring, case-insensitively.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_name(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    seed_client(&pool, CPF_CLIENT).await;
    seed_client(&pool, CPF_OTHER).await;

    // Seeded names are "Cliente <first three digits>".
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/cliente/?nome=cliente%20111", &token).await;

    let body = expect_status(response, StatusCode::OK).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["cpf"], CPF_CLIENT);
}

/// Partial update keeps the absent fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_only_given_fields(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    seed_client(&pool, CPF_CLIENT).await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/cliente/{CPF_CLIENT}"),
        &token,
        json!({ "tipo": "professor", "graduando": false }),
    )
    .await;

    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["tipo"], "professor");
    assert_eq!(body["graduando"], false);
    // Untouched fields survive.
    assert_eq!(body["matricula"], "20240001");
    assert_eq!(count_audit_rows(&pool, "update_client").await, 1);
}

/// Matrícula is capped at nine characters.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_rejects_long_matricula(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    seed_client(&pool, CPF_CLIENT).await;

    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        &format!("/cliente/{CPF_CLIENT}"),
        &token,
        json!({ "matricula": "1234567890" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Hard delete answers 204 and is audited with a snapshot.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_client_without_purchases(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    seed_client(&pool, CPF_CLIENT).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/cliente/{CPF_CLIENT}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(count_audit_rows(&pool, "delete_client").await, 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/cliente/{CPF_CLIENT}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A client with purchases cannot be hard-deleted.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_is_blocked_by_purchases(pool: PgPool) {
    let admin_token = seed_and_login(&pool, CPF_ADMIN, "admin").await;
    let client_id = seed_client(&pool, CPF_CLIENT).await;

    // Configure meal windows, then register one purchase.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/informacoes-gerais/",
        &admin_token,
        json!({
            "nome_empresa": "RU Central",
            "preco_almoco": 1300,
            "preco_meia_almoco": 650,
            "preco_jantar": 1300,
            "preco_meia_jantar": 650,
            "inicio_almoco": "11:00:00",
            "fim_almoco": "14:00:00",
            "inicio_jantar": "17:30:00",
            "fim_jantar": "19:30:00",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/compra/cadastra-compra",
        &admin_token,
        json!({
            "usuario_id": client_id,
            "horario": "2025-03-10T12:00:00Z",
            "local": "RU Central",
            "forma_pagamento": "pix",
            "preco": 1300,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/cliente/{CPF_CLIENT}"), &admin_token).await;

    let body = expect_status(response, StatusCode::CONFLICT).await;
    assert_eq!(
        body["detail"],
        "Cliente possui registros vinculados e não pode ser excluído; anonimize"
    );
}

/// Anonymization keeps the row but nulls the identity, terminally.
#[sqlx::test(migrations = "../db/migrations")]
async fn anonymize_is_terminal(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    let client_id = seed_client(&pool, CPF_CLIENT).await;

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/cliente/{CPF_CLIENT}/anonimizar"), &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["message"], "Cliente anonimizado com sucesso");
    assert_eq!(count_audit_rows(&pool, "anonymize_client").await, 1);

    // The row survives without its identity.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/cliente/", &token).await;
    let body = expect_status(response, StatusCode::OK).await;
    let item = body
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["id"] == client_id)
        .expect("anonymized client should still be listed")
        .clone();
    assert!(item["nome"].is_null());
    assert!(item["cpf"].is_null());

    // The CPF no longer resolves, so repeating answers 404.
    let app = common::build_test_app(pool);
    let response = post_auth(app, &format!("/cliente/{CPF_CLIENT}/anonimizar"), &token).await;
    let body = expect_status(response, StatusCode::NOT_FOUND).await;
    assert_eq!(body["detail"], "Cliente não encontrado ou já anonimizado");
}

/// CSV import registers each valid row with its own audit entry.
#[sqlx::test(migrations = "../db/migrations")]
async fn csv_import_registers_rows(pool: PgPool) {
    let token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;

    let csv = format!(
        "cpf,nome,matricula,tipo,graduando,pos_graduando,bolsista\n\
         {CPF_CLIENT},Ana Pereira,20250042,aluno,true,false,true\n\
         {CPF_OTHER},Paulo Dias,,professor,false,false,false\n\
         nao-e-cpf,Linha Ruim,1,aluno,false,false,false\n"
    );

    let app = common::build_test_app(pool.clone());
    let response = post_csv_auth(app, "/cliente/upload-csv/", &token, "clientes.csv", &csv).await;

    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["message"], "2 cliente(s) cadastrado(s) com sucesso.");
    assert_eq!(count_audit_rows(&pool, "register_client").await, 2);
}

/// Failed creation leaves nothing behind: a token whose CPF matches no
/// employee cannot produce an audit entry, so the whole registration
/// rolls back.
#[sqlx::test(migrations = "../db/migrations")]
async fn creation_rolls_back_when_actor_cannot_be_audited(pool: PgPool) {
    // Forged but well-signed token; CPF_EXTRA was never registered.
    let token = common::make_token(CPF_EXTRA, "funcionario", 999);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/cliente/", &token, register_body(CPF_CLIENT)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // No client row and no audit row survived.
    let staff_token = seed_and_login(&pool, CPF_STAFF, "funcionario").await;
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/cliente/{CPF_CLIENT}"), &staff_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(count_audit_rows(&pool, "register_client").await, 0);
}
