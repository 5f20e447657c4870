//! Route definitions for the `/funcionario` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::funcionario;
use crate::state::AppState;

/// Routes mounted at `/funcionario`.
///
/// ```text
/// GET  /                   -> list (staff)
/// POST /                   -> register (admin)
/// GET  /admin/             -> list_admins (admin)
/// PUT  /{id}               -> update (admin)
/// DELETE /{cpf}            -> delete (admin)
/// POST /{cpf}/desativar    -> deactivate (admin)
/// POST /{cpf}/anonimizar   -> anonymize (admin)
/// POST /upload-csv/        -> upload_csv (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(funcionario::list).post(funcionario::register))
        .route("/admin/", get(funcionario::list_admins))
        .route("/upload-csv/", post(funcionario::upload_csv))
        .route("/{id}", put(funcionario::update).delete(funcionario::delete))
        .route("/{cpf}/desativar", post(funcionario::deactivate))
        .route("/{cpf}/anonimizar", post(funcionario::anonymize))
}
