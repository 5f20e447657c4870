//! Route definitions for the `/compra` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::compra;
use crate::state::AppState;

/// Routes mounted at `/compra`.
///
/// ```text
/// POST /cadastra-compra      -> register (staff)
/// GET  /retorna-compras      -> list (staff)
/// POST /cadastra-compra-csv  -> upload_csv (staff)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cadastra-compra", post(compra::register))
        .route("/retorna-compras", get(compra::list))
        .route("/cadastra-compra-csv", post(compra::upload_csv))
}
