//! Route definitions for the `/informacoes-gerais` singleton resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::informacoes_gerais;
use crate::state::AppState;

/// Routes mounted at `/informacoes-gerais`.
///
/// ```text
/// GET  /  -> get (any authenticated)
/// POST /  -> create-or-replace (admin)
/// PUT  /  -> update (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(informacoes_gerais::get)
            .post(informacoes_gerais::create)
            .put(informacoes_gerais::update),
    )
}
