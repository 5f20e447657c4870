//! Client entity model and DTOs.

use ru_core::types::DbId;
use serde::Deserialize;
use sqlx::FromRow;

/// Client row joined across `usuario` and `cliente`.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: DbId,
    /// `None` once the client was anonymized.
    pub nome: Option<String>,
    pub cpf_hash: Option<String>,
    pub cpf_cript: Option<Vec<u8>>,
    pub matricula: String,
    pub tipo: String,
    pub graduando: bool,
    pub pos_graduando: bool,
    pub bolsista: bool,
}

/// DTO for inserting a new client. CPF fields arrive pre-encoded.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub nome: String,
    pub cpf_hash: String,
    pub cpf_cript: Vec<u8>,
    pub matricula: String,
    pub tipo: String,
    pub graduando: bool,
    pub pos_graduando: bool,
    pub bolsista: bool,
}

/// DTO for partially updating a client (cpf and id are immutable).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub nome: Option<String>,
    pub matricula: Option<String>,
    pub tipo: Option<String>,
    pub graduando: Option<bool>,
    pub pos_graduando: Option<bool>,
    pub bolsista: Option<bool>,
}

/// Filter parameters for listing clients. All conditions are ANDed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub nome: Option<String>,
    pub tipo: Option<String>,
    pub matricula: Option<String>,
}
