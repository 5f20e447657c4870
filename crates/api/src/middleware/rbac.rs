//! Role-gating extractors.
//!
//! Each extractor wraps [`AuthUser`] and checks exact membership in an
//! allow-list. There is no role hierarchy: an extractor that accepts
//! more than one role names each of them explicitly. A failed check is
//! 403 Forbidden, distinct from the 401 an invalid token produces.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ru_core::error::CoreError;
use ru_core::roles::{ROLE_ADMIN, ROLE_FUNCIONARIO};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.tipo != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Acesso restrito a administradores".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `admin` or `funcionario` role.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.tipo != ROLE_ADMIN && user.tipo != ROLE_FUNCIONARIO {
            return Err(AppError::Core(CoreError::Forbidden("Acesso negado".into())));
        }
        Ok(RequireStaff(user))
    }
}
