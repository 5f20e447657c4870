//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use ru_core::cpf;
use ru_db::repositories::EmployeeRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub cpf: String,
    pub senha: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub tipo: String,
}

/// Single failure answer for unknown CPF, wrong password, and
/// deactivated account alike. Disclosing which one applied would leak
/// whether a CPF is registered.
fn credentials_error() -> AppError {
    AppError::BadRequest("Usuário ou senha incorretos".into())
}

/// POST /auth/login
///
/// Authenticate with CPF + password. Returns a 30-minute HS256 token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // Structurally invalid CPFs get their own 400; they can never be
    // registered, so nothing is disclosed.
    let cpf = cpf::normalize(&input.cpf)?;
    let hash = cpf::lookup_hash(&cpf);

    let employee = EmployeeRepo::find_by_cpf_hash(&state.pool, &hash)
        .await?
        .ok_or_else(credentials_error)?;

    if employee.data_saida.is_some() {
        return Err(credentials_error());
    }

    let password_valid = verify_password(&input.senha, &employee.senha_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(credentials_error());
    }

    let token = generate_token(&cpf, &employee.tipo, employee.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        tipo: employee.tipo,
    }))
}
