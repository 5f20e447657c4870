//! Handlers for the singleton `/informacoes-gerais` resource.

use axum::extract::State;
use axum::Json;
use ru_core::audit::ActionKind;
use ru_core::error::CoreError;
use ru_db::models::general_info::{GeneralInfo, GeneralInfoInput};
use ru_db::repositories::{AuditRepo, GeneralInfoRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Both meal windows must be well-formed intervals.
fn validate_windows(input: &GeneralInfoInput) -> Result<(), AppError> {
    if input.inicio_almoco >= input.fim_almoco || input.inicio_jantar >= input.fim_jantar {
        return Err(AppError::Core(CoreError::Validation(
            "Período de refeição inválido".into(),
        )));
    }
    Ok(())
}

/// GET /informacoes-gerais/
///
/// Readable by any authenticated employee.
pub async fn get(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<GeneralInfo>> {
    let info = GeneralInfoRepo::get(&state.pool)
        .await?
        .ok_or_else(|| CoreError::NotFound("Informações gerais não encontradas.".into()))?;
    Ok(Json(info))
}

/// POST /informacoes-gerais/
///
/// Create-or-replace the singleton row (admin only).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<GeneralInfoInput>,
) -> AppResult<Json<GeneralInfo>> {
    validate_windows(&input)?;

    let mut tx = state.pool.begin().await?;

    let info = GeneralInfoRepo::upsert(&mut tx, &input).await?;

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::UpdateGeneralInfo,
        None,
        serde_json::to_value(&info).ok(),
    )
    .await?;

    tx.commit().await?;
    Ok(Json(info))
}

/// PUT /informacoes-gerais/
///
/// Update the singleton row; 404 if it was never created (admin only).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<GeneralInfoInput>,
) -> AppResult<Json<GeneralInfo>> {
    validate_windows(&input)?;

    let mut tx = state.pool.begin().await?;

    let info = GeneralInfoRepo::update(&mut tx, &input)
        .await?
        .ok_or_else(|| CoreError::NotFound("Informações gerais não encontradas.".into()))?;

    AuditRepo::record(
        &mut tx,
        &user.cpf,
        ActionKind::UpdateGeneralInfo,
        None,
        serde_json::to_value(&info).ok(),
    )
    .await?;

    tx.commit().await?;
    Ok(Json(info))
}
