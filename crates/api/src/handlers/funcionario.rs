//! Handlers for the `/funcionario` resource (admin-gated mutations).

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use ru_core::audit::ActionKind;
use ru_core::cpf;
use ru_core::crypto::CpfCipher;
use ru_core::error::CoreError;
use ru_core::pagination;
use ru_core::roles::{ROLE_ADMIN, ROLE_FUNCIONARIO};
use ru_core::types::DbId;
use ru_db::models::employee::{Employee, EmployeeFilter, NewEmployee, UpdateEmployee};
use ru_db::repositories::{AuditRepo, EmployeeRepo};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::csv_import;
use crate::error::{is_foreign_key_violation, AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::response::{MessageResponse, Paginated};
use crate::state::AppState;

/// Columns the bulk-import CSV must carry.
const CSV_COLUMNS: &[&str] = &["cpf", "nome", "senha", "email", "tipo", "data_entrada"];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /funcionario/`, also the CSV row shape.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterFuncionario {
    pub cpf: String,
    pub nome: String,
    pub senha: String,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    pub tipo: String,
    pub data_entrada: NaiveDate,
}

/// Request body for `PUT /funcionario/{id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFuncionarioBody {
    pub nome: Option<String>,
    pub senha: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    pub tipo: Option<String>,
}

/// Filter + pagination parameters for the listings.
#[derive(Debug, Default, Deserialize)]
pub struct FuncionarioListQuery {
    pub id: Option<DbId>,
    pub cpf: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub data_entrada: Option<NaiveDate>,
    pub data_saida: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameter for deactivation; defaults to today.
#[derive(Debug, Deserialize)]
pub struct DesativarQuery {
    pub data_saida: Option<NaiveDate>,
}

/// External employee representation: CPF decrypted for display, never
/// the password hash.
#[derive(Debug, Serialize)]
pub struct FuncionarioOut {
    pub id: DbId,
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub tipo: String,
    pub data_entrada: NaiveDate,
    pub data_saida: Option<NaiveDate>,
}

impl FuncionarioOut {
    fn from_row(row: Employee, cipher: &CpfCipher) -> Self {
        Self {
            id: row.id,
            nome: row.nome,
            cpf: cipher.decrypt_opt(row.cpf_cript.as_deref()),
            email: row.email,
            tipo: row.tipo,
            data_entrada: row.data_entrada,
            data_saida: row.data_saida,
        }
    }
}

/// Reject role strings outside the closed set.
fn validate_tipo(tipo: &str) -> Result<(), AppError> {
    if tipo != ROLE_ADMIN && tipo != ROLE_FUNCIONARIO {
        return Err(AppError::Core(CoreError::Validation(
            "Tipo de funcionário inválido".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /funcionario/
///
/// Register a new employee (admin only). The CPF is validated, hashed
/// for lookup, and encrypted for display; registration and its audit
/// entry commit atomically.
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<RegisterFuncionario>,
) -> AppResult<Json<MessageResponse>> {
    create_employee(&state, &user.cpf, &input).await?;
    Ok(Json(MessageResponse::new(
        "Funcionário cadastrado com sucesso",
    )))
}

/// Shared creation path for the JSON endpoint and each CSV row.
async fn create_employee(
    state: &AppState,
    actor_cpf: &str,
    input: &RegisterFuncionario,
) -> Result<DbId, AppError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_tipo(&input.tipo)?;

    let cpf = cpf::normalize(&input.cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    // Fast-path duplicate checks; the partial unique indexes remain the
    // authoritative guard and surface as the same 409 at commit.
    if EmployeeRepo::find_by_cpf_hash(&mut *tx, &hash).await?.is_some() {
        return Err(AppError::Core(CoreError::Duplicate(
            "CPF já cadastrado no sistema".into(),
        )));
    }
    if EmployeeRepo::email_exists(&mut *tx, &input.email).await? {
        return Err(AppError::Core(CoreError::Duplicate(
            "Email já cadastrado no sistema".into(),
        )));
    }

    let senha_hash = hash_password(&input.senha)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let cpf_cript = state.cipher.encrypt(&cpf)?;

    let created = EmployeeRepo::create(
        &mut tx,
        &NewEmployee {
            nome: input.nome.clone(),
            cpf_hash: hash,
            cpf_cript,
            senha_hash,
            email: input.email.clone(),
            tipo: input.tipo.clone(),
            data_entrada: input.data_entrada,
        },
    )
    .await?;

    AuditRepo::record(
        &mut tx,
        actor_cpf,
        ActionKind::RegisterEmployee,
        Some(created.id),
        Some(json!({
            "nome": input.nome,
            "email": input.email,
            "tipo": input.tipo,
            "data_entrada": input.data_entrada,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(created.id)
}

/// GET /funcionario/
///
/// Filtered, paginated listing for any staff member.
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Query(query): Query<FuncionarioListQuery>,
) -> AppResult<Json<Paginated<FuncionarioOut>>> {
    list_filtered(&state, query, None).await
}

/// GET /funcionario/admin/
///
/// Same listing restricted to `admin` rows (admin only).
pub async fn list_admins(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(query): Query<FuncionarioListQuery>,
) -> AppResult<Json<Paginated<FuncionarioOut>>> {
    list_filtered(&state, query, Some(ROLE_ADMIN.to_string())).await
}

async fn list_filtered(
    state: &AppState,
    query: FuncionarioListQuery,
    tipo: Option<String>,
) -> AppResult<Json<Paginated<FuncionarioOut>>> {
    let cpf_hash = match &query.cpf {
        Some(raw) => Some(cpf::lookup_hash(&cpf::normalize(raw)?)),
        None => None,
    };

    let filter = EmployeeFilter {
        id: query.id,
        cpf_hash,
        nome: query.nome,
        email: query.email,
        data_entrada: query.data_entrada,
        data_saida: query.data_saida,
        tipo,
    };

    let page = pagination::clamp_page(query.page);
    let page_size = pagination::clamp_page_size(query.page_size);
    let offset = pagination::offset(page, page_size);

    let total = EmployeeRepo::count(&state.pool, &filter).await?;
    let rows = EmployeeRepo::list(&state.pool, &filter, page_size, offset).await?;

    let items = rows
        .into_iter()
        .map(|row| FuncionarioOut::from_row(row, &state.cipher))
        .collect();

    Ok(Json(Paginated::new(items, page, page_size, total)))
}

/// PUT /funcionario/{id}
///
/// Partial update (admin only); absent fields keep their values.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFuncionarioBody>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    if let Some(ref tipo) = input.tipo {
        validate_tipo(tipo)?;
    }

    let senha_hash = match &input.senha {
        Some(senha) => Some(
            hash_password(senha)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        ),
        None => None,
    };

    let mut tx = state.pool.begin().await?;

    let updated = EmployeeRepo::update(
        &mut tx,
        id,
        &UpdateEmployee {
            nome: input.nome.clone(),
            senha_hash,
            email: input.email.clone(),
            tipo: input.tipo.clone(),
        },
    )
    .await?
    .ok_or_else(|| CoreError::NotFound("Funcionário não encontrado".into()))?;

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::UpdateEmployee,
        Some(updated.id),
        Some(json!({
            "nome": input.nome,
            "email": input.email,
            "tipo": input.tipo,
            "senha_alterada": input.senha.is_some(),
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(Json(MessageResponse::new(
        "Funcionário atualizado com sucesso",
    )))
}

/// DELETE /funcionario/{cpf}
///
/// Hard delete (admin only). An employee referenced by history rows as
/// actor cannot be removed; the answer is 409 with guidance.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(raw_cpf): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    let employee = EmployeeRepo::find_by_cpf_hash(&mut *tx, &hash)
        .await?
        .ok_or_else(|| CoreError::NotFound("Funcionário não encontrado".into()))?;

    match EmployeeRepo::delete(&mut tx, employee.id).await {
        Ok(_) => {}
        Err(e) if is_foreign_key_violation(&e) => {
            return Err(AppError::Core(CoreError::Duplicate(
                "Funcionário possui registros vinculados e não pode ser excluído; \
                 desative ou anonimize"
                    .into(),
            )));
        }
        Err(e) => return Err(e.into()),
    }

    // The snapshot is the only surviving reference; the history row's
    // target stays NULL because the person row is gone.
    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::DeleteEmployee,
        None,
        Some(json!({
            "id": employee.id,
            "nome": employee.nome,
            "email": employee.email,
            "tipo": employee.tipo,
        })),
    )
    .await?;

    tx.commit().await?;
    Ok(Json(MessageResponse::new("Funcionário removido com sucesso")))
}

/// POST /funcionario/{cpf}/desativar
///
/// Terminal deactivation (admin only): sets `data_saida`, clears the
/// email. Repeating it answers 404.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(raw_cpf): Path<String>,
    Query(query): Query<DesativarQuery>,
) -> AppResult<Json<MessageResponse>> {
    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);
    let data_saida = query
        .data_saida
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let mut tx = state.pool.begin().await?;

    let employee = EmployeeRepo::find_by_cpf_hash(&mut *tx, &hash)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound("Funcionário não encontrado ou já desativado".into())
        })?;

    let deactivated = EmployeeRepo::deactivate(&mut tx, employee.id, data_saida).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound(
            "Funcionário não encontrado ou já desativado".into(),
        )));
    }

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::DeactivateEmployee,
        Some(employee.id),
        Some(json!({ "data_saida": data_saida })),
    )
    .await?;

    tx.commit().await?;
    Ok(Json(MessageResponse::new(
        "Funcionário desativado com sucesso",
    )))
}

/// POST /funcionario/{cpf}/anonimizar
///
/// Terminal anonymization (admin only): nulls name, CPF fields, and
/// email. Repeating it answers 404.
///
/// The audit entry is staged before the mutation so an admin
/// anonymizing their own account still resolves as actor; any later
/// failure rolls the whole transaction back.
pub async fn anonymize(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(raw_cpf): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let cpf = cpf::normalize(&raw_cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let mut tx = state.pool.begin().await?;

    let employee = EmployeeRepo::find_by_cpf_hash(&mut *tx, &hash)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound("Funcionário não encontrado ou já anonimizado".into())
        })?;

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::AnonymizeEmployee,
        Some(employee.id),
        Some(json!({ "nome": employee.nome })),
    )
    .await?;

    let anonymized = EmployeeRepo::anonymize(&mut tx, employee.id).await?;
    if !anonymized {
        return Err(AppError::Core(CoreError::NotFound(
            "Funcionário não encontrado ou já anonimizado".into(),
        )));
    }

    tx.commit().await?;
    Ok(Json(MessageResponse::new(
        "Funcionário anonimizado com sucesso",
    )))
}

/// POST /funcionario/upload-csv/
///
/// Bulk import (admin only). Each row runs in its own transaction with
/// its own audit entry; failed rows are skipped and only the successes
/// are counted.
pub async fn upload_csv(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let bytes = read_csv_upload(&mut multipart).await?;

    let rows = csv_import::parse_rows::<RegisterFuncionario>(&bytes, CSV_COLUMNS)
        .map_err(|_| AppError::BadRequest("O CSV não contém as colunas necessárias.".into()))?;

    let mut imported = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        match row {
            Ok(input) => match create_employee(&state, &user.cpf, &input).await {
                Ok(_) => imported += 1,
                Err(e) => tracing::warn!(row = index + 1, error = %e, "Skipping CSV row"),
            },
            Err(e) => tracing::warn!(row = index + 1, error = %e, "Unparseable CSV row"),
        }
    }

    Ok(Json(MessageResponse::new(format!(
        "{imported} funcionário(s) cadastrado(s) com sucesso."
    ))))
}

/// Pull the first file field out of a multipart upload, enforcing the
/// `.csv` filename check.
pub(crate) async fn read_csv_upload(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Arquivo inválido".into()))?
    {
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if !csv_import::is_csv_filename(&filename) {
            return Err(AppError::BadRequest("O arquivo deveria ser CSV.".into()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|_| AppError::BadRequest("Arquivo inválido".into()))?;
        return Ok(bytes.to_vec());
    }
    Err(AppError::BadRequest("O arquivo deveria ser CSV.".into()))
}
