//! Handlers for the `/cliente` resource (any staff member may mutate).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ru_core::audit::ActionKind;
use ru_core::cpf;
use ru_core::crypto::CpfCipher;
use ru_core::error::CoreError;
use ru_core::types::DbId;
use ru_db::models::client::{Client, ClientFilter, NewClient, UpdateClient};
use ru_db::repositories::{AuditRepo, ClientRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::csv_import;
use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::handlers::funcionario::read_csv_upload;
use crate::middleware::rbac::RequireStaff;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Columns the bulk-import CSV must carry.
const CSV_COLUMNS: &[&str] = &[
    "cpf",
    "nome",
    "matricula",
    "tipo",
    "graduando",
    "pos_graduando",
    "bolsista",
];

/// The closed set of client categories.
const CLIENT_TIPOS: &[&str] = &["externo", "professor", "tecnico", "aluno"];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /cliente/`, also the CSV row shape.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCliente {
    pub cpf: String,
    pub nome: String,
    #[validate(length(max = 9, message = "Matrícula deve ter no máximo 9 caracteres"))]
    pub matricula: String,
    pub tipo: String,
    #[serde(default)]
    pub graduando: bool,
    #[serde(default)]
    pub pos_graduando: bool,
    #[serde(default)]
    pub bolsista: bool,
}

/// Request body for `PATCH /cliente/{cpf}`. All fields optional; cpf
/// and id are immutable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClienteBody {
    pub nome: Option<String>,
    #[validate(length(max = 9, message = "Matrícula deve ter no máximo 9 caracteres"))]
    pub matricula: Option<String>,
    pub tipo: Option<String>,
    pub graduando: Option<bool>,
    pub pos_graduando: Option<bool>,
    pub bolsista: Option<bool>,
}

/// External client representation with the CPF decrypted for display.
#[derive(Debug, Serialize)]
pub struct ClienteOut {
    pub id: DbId,
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub matricula: String,
    pub tipo: String,
    pub graduando: bool,
    pub pos_graduando: bool,
    pub bolsista: bool,
}

impl ClienteOut {
    fn from_row(row: Client, cipher: &CpfCipher) -> Self {
        Self {
            id: row.id,
            nome: row.nome,
            cpf: cipher.decrypt_opt(row.cpf_cript.as_deref()),
            matricula: row.matricula,
            tipo: row.tipo,
            graduando: row.graduando,
            pos_graduando: row.pos_graduando,
            bolsista: row.bolsista,
        }
    }
}

/// Reject category strings outside the closed set.
fn validate_tipo(tipo: &str) -> Result<(), AppError> {
    if !CLIENT_TIPOS.contains(&tipo) {
        return Err(AppError::Core(CoreError::Validation(
            "Tipo de cliente inválido".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /cliente/
///
/// Register a new client; returns 201 with the created body.
pub async fn register(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Json(input): Json<RegisterCliente>,
) -> AppResult<(StatusCode, Json<ClienteOut>)> {
    let created = create_client(&state, &user.cpf, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ClienteOut::from_row(created, &state.cipher)),
    ))
}

/// Shared creation path for the JSON endpoint and each CSV row.
async fn create_client(
    state: &AppState,
    actor_cpf: &str,
    input: &RegisterCliente,
) -> Result<Client, AppError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_tipo(&input.tipo)?;

    let cpf = cpf::normalize(&input.cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    if ClientRepo::find_by_cpf_hash(&mut *tx, &hash).await?.is_some() {
        return Err(AppError::Core(CoreError::Duplicate(
            "CPF já cadastrado no sistema".into(),
        )));
    }

    let cpf_cript = state.cipher.encrypt(&cpf)?;

    let created = ClientRepo::create(
        &mut tx,
        &NewClient {
            nome: input.nome.clone(),
            cpf_hash: hash,
            cpf_cript,
            matricula: input.matricula.clone(),
            tipo: input.tipo.clone(),
            graduando: input.graduando,
            pos_graduando: input.pos_graduando,
            bolsista: input.bolsista,
        },
    )
    .await?;

    AuditRepo::record(
        &mut tx,
        actor_cpf,
        ActionKind::RegisterClient,
        Some(created.id),
        Some(json!({
            "nome": input.nome,
            "matricula": input.matricula,
            "tipo": input.tipo,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// GET /cliente/
///
/// Filtered listing (`nome` substring, `tipo`, `matricula`).
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Query(filter): Query<ClientFilter>,
) -> AppResult<Json<Vec<ClienteOut>>> {
    let rows = ClientRepo::list(&state.pool, &filter).await?;
    let items = rows
        .into_iter()
        .map(|row| ClienteOut::from_row(row, &state.cipher))
        .collect();
    Ok(Json(items))
}

/// GET /cliente/{cpf}
pub async fn get_by_cpf(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(raw_cpf): Path<String>,
) -> AppResult<Json<ClienteOut>> {
    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let client = ClientRepo::find_by_cpf_hash(&state.pool, &hash)
        .await?
        .ok_or_else(|| CoreError::NotFound("Cliente não encontrado".into()))?;

    Ok(Json(ClienteOut::from_row(client, &state.cipher)))
}

/// PATCH /cliente/{cpf}
///
/// Partial update; absent fields keep their values.
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(raw_cpf): Path<String>,
    Json(input): Json<UpdateClienteBody>,
) -> AppResult<Json<ClienteOut>> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    if let Some(ref tipo) = input.tipo {
        validate_tipo(tipo)?;
    }

    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    let client = ClientRepo::find_by_cpf_hash(&mut *tx, &hash)
        .await?
        .ok_or_else(|| CoreError::NotFound("Cliente não encontrado".into()))?;

    let updated = ClientRepo::update(
        &mut tx,
        client.id,
        &UpdateClient {
            nome: input.nome.clone(),
            matricula: input.matricula.clone(),
            tipo: input.tipo.clone(),
            graduando: input.graduando,
            pos_graduando: input.pos_graduando,
            bolsista: input.bolsista,
        },
    )
    .await?
    .ok_or_else(|| CoreError::NotFound("Cliente não encontrado".into()))?;

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::UpdateClient,
        Some(updated.id),
        Some(json!({
            "nome": input.nome,
            "matricula": input.matricula,
            "tipo": input.tipo,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(Json(ClienteOut::from_row(updated, &state.cipher)))
}

/// DELETE /cliente/{cpf}
///
/// Hard delete; a client with purchases cannot be removed (409 with
/// guidance). Success is 204.
pub async fn delete(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(raw_cpf): Path<String>,
) -> AppResult<StatusCode> {
    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    let client = ClientRepo::find_by_cpf_hash(&mut *tx, &hash)
        .await?
        .ok_or_else(|| CoreError::NotFound("Cliente não encontrado".into()))?;

    match ClientRepo::delete(&mut tx, client.id).await {
        Ok(_) => {}
        Err(e) if is_foreign_key_violation(&e) => {
            return Err(AppError::Core(CoreError::Duplicate(
                "Cliente possui registros vinculados e não pode ser excluído; anonimize".into(),
            )));
        }
        Err(e) => return Err(e.into()),
    }

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::DeleteClient,
        None,
        Some(json!({
            "id": client.id,
            "nome": client.nome,
            "matricula": client.matricula,
            "tipo": client.tipo,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /cliente/{cpf}/anonimizar
///
/// Terminal anonymization; repeating it answers 404. The client row
/// survives so purchases and history keep their anchor.
pub async fn anonymize(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    Path(raw_cpf): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    let client = ClientRepo::find_by_cpf_hash(&mut *tx, &hash)
        .await?
        .ok_or_else(|| CoreError::NotFound("Cliente não encontrado ou já anonimizado".into()))?;

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::AnonymizeClient,
        Some(client.id),
        Some(json!({ "nome": client.nome })),
    )
    .await?;

    let anonymized = ClientRepo::anonymize(&mut tx, client.id).await?;
    if !anonymized {
        return Err(AppError::Core(CoreError::NotFound(
            "Cliente não encontrado ou já anonimizado".into(),
        )));
    }

    tx.commit().await?;
    Ok(Json(MessageResponse::new("Cliente anonimizado com sucesso")))
}

/// POST /cliente/upload-csv/
///
/// Bulk import; each row runs in its own transaction with its own
/// audit entry, failures are skipped and only successes counted.
pub async fn upload_csv(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let bytes = read_csv_upload(&mut multipart).await?;

    let rows = csv_import::parse_rows::<RegisterCliente>(&bytes, CSV_COLUMNS)
        .map_err(|_| AppError::BadRequest("O CSV não contém as colunas necessárias.".into()))?;

    let mut imported = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Ok(input) => match create_client(&state, &user.cpf, &input).await {
                Ok(_) => imported += 1,
                Err(e) => tracing::warn!(row = index + 1, error = %e, "Skipping CSV row"),
            },
            Err(e) => tracing::warn!(row = index + 1, error = %e, "Unparseable CSV row"),
        }
    }

    Ok(Json(MessageResponse::new(format!(
        "{imported} cliente(s) cadastrado(s) com sucesso."
    ))))
}
