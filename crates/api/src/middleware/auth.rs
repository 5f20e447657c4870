//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ru_core::error::CoreError;
use ru_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Single message for every authentication failure: missing header,
/// malformed header, bad signature, or expired token. Callers cannot
/// distinguish the cases.
const UNAUTHENTICATED: &str = "Token inválido ou expirado";

/// Authenticated employee extracted from a Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, tipo = %user.tipo, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The employee's normalized CPF (from `claims.sub`).
    pub cpf: String,
    /// The employee's role (`"admin"` or `"funcionario"`).
    pub tipo: String,
    /// The employee's internal database id.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(UNAUTHENTICATED.into())))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(UNAUTHENTICATED.into())))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::Unauthorized(UNAUTHENTICATED.into())))?;

        Ok(AuthUser {
            cpf: claims.sub,
            tipo: claims.tipo,
            user_id: claims.id,
        })
    }
}
