//! Action history entity models and query DTOs.
//!
//! History rows are append-only and have no update DTO by design.

use ru_core::audit::ActionKind;
use ru_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One action history row, joined with actor and target person rows.
///
/// CPFs come back as encrypted blobs; the handler decrypts them for
/// display. Target columns are `None` when the entry has no target or the
/// target person was anonymized.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEntry {
    pub id: DbId,
    pub ator_id: DbId,
    pub ator_nome: Option<String>,
    pub ator_cpf_cript: Option<Vec<u8>>,
    pub acao: String,
    pub alvo_id: Option<DbId>,
    pub alvo_nome: Option<String>,
    pub alvo_cpf_cript: Option<Vec<u8>>,
    pub data: Timestamp,
    pub info_adicional: Option<serde_json::Value>,
}

/// Filter parameters for querying the action history. All conditions are
/// ANDed; name filters are substring matches, CPF filters go through the
/// lookup hash.
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub tipo_acao: Option<ActionKind>,
    pub id_ator: Option<DbId>,
    pub nome_ator: Option<String>,
    pub cpf_ator_hash: Option<String>,
    pub id_alvo: Option<DbId>,
    pub nome_alvo: Option<String>,
    pub cpf_alvo_hash: Option<String>,
    pub data_inicio: Option<Timestamp>,
    pub data_fim: Option<Timestamp>,
    pub ano: Option<i32>,
    pub mes: Option<i32>,
}
