//! HTTP handlers, one module per resource.

pub mod auth;
pub mod cliente;
pub mod compra;
pub mod funcionario;
pub mod health;
pub mod historico_acoes;
pub mod informacoes_gerais;
