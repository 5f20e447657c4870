//! Route definitions for the `/cliente` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cliente;
use crate::state::AppState;

/// Routes mounted at `/cliente`.
///
/// ```text
/// GET    /                  -> list (staff)
/// POST   /                  -> register (staff, 201)
/// GET    /{cpf}             -> get_by_cpf (staff)
/// PATCH  /{cpf}             -> update (staff)
/// DELETE /{cpf}             -> delete (staff, 204)
/// POST   /{cpf}/anonimizar  -> anonymize (staff)
/// POST   /upload-csv/       -> upload_csv (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cliente::list).post(cliente::register))
        .route("/upload-csv/", post(cliente::upload_csv))
        .route(
            "/{cpf}",
            get(cliente::get_by_cpf)
                .patch(cliente::update)
                .delete(cliente::delete),
        )
        .route("/{cpf}/anonimizar", post(cliente::anonymize))
}
