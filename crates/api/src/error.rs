use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ru_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] so every error becomes a JSON body of the
/// form `{"detail": "<mensagem>"}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ru_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Generic body for internal failures; specifics go to the log only.
const INTERNAL_DETAIL: &str = "Erro interno do servidor";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Core(core) => match core {
                CoreError::InvalidCpf(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CoreError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
                CoreError::AuditWriteFailed(msg) => {
                    tracing::error!(error = %msg, "Audit write failed, rolling back");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.into())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.into())
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.into())
            }
        };

        let body = json!({ "detail": detail });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status and Portuguese detail.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (PG 23505) on the `uq_*` indexes map to the same
///   409 messages the pre-checks use, so the constraint fallback is
///   indistinguishable from the fast path.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "Recurso não encontrado".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let detail = match db_err.constraint() {
                    Some("uq_funcionario_cpf_hash") | Some("uq_cliente_cpf_hash") => {
                        "CPF já cadastrado no sistema"
                    }
                    Some("uq_funcionario_email") => "Email já cadastrado no sistema",
                    _ => "Registro duplicado",
                };
                return (StatusCode::CONFLICT, detail.to_string());
            }
            tracing::error!(error = %db_err, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.into())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.into())
        }
    }
}

/// Whether a sqlx error is a PostgreSQL foreign-key violation (23503).
///
/// Hard deletes use this to answer 409 with guidance instead of a 500
/// when history or purchase rows still reference the person.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503")
    )
}
