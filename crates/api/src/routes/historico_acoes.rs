//! Route definition for the `/historico_acoes` read path.

use axum::routing::get;
use axum::Router;

use crate::handlers::historico_acoes;
use crate::state::AppState;

/// Routes mounted at `/historico_acoes`.
///
/// ```text
/// GET /  -> filtered, paginated listing (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(historico_acoes::list))
}
