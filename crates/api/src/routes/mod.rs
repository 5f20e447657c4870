pub mod auth;
pub mod cliente;
pub mod compra;
pub mod funcionario;
pub mod health;
pub mod historico_acoes;
pub mod informacoes_gerais;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                              liveness (public)
///
/// /auth/login                          login (public)
///
/// /funcionario/                        list (staff), register (admin)
/// /funcionario/admin/                  list admins (admin)
/// /funcionario/{id}                    update (admin, PUT)
/// /funcionario/{cpf}                   delete (admin, DELETE)
/// /funcionario/{cpf}/desativar         deactivate (admin, POST)
/// /funcionario/{cpf}/anonimizar        anonymize (admin, POST)
/// /funcionario/upload-csv/             bulk import (admin, POST)
///
/// /cliente/                            list, register (staff)
/// /cliente/{cpf}                       get, patch, delete (staff)
/// /cliente/{cpf}/anonimizar            anonymize (staff, POST)
/// /cliente/upload-csv/                 bulk import (staff, POST)
///
/// /compra/cadastra-compra              register (staff, POST)
/// /compra/retorna-compras              list (staff, GET)
/// /compra/cadastra-compra-csv          bulk import (staff, POST)
///
/// /informacoes-gerais/                 get (auth), create (admin, POST),
///                                      update (admin, PUT)
///
/// /historico_acoes/                    filtered listing (admin, GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/funcionario/", funcionario::router())
        .nest("/cliente/", cliente::router())
        .nest("/compra", compra::router())
        .nest("/informacoes-gerais/", informacoes_gerais::router())
        .nest("/historico_acoes/", historico_acoes::router())
}
