//! Handler for the `/historico_acoes` read path (admin only, since the
//! items carry decrypted CPFs).

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::Json;
use ru_core::audit::ActionKind;
use ru_core::cpf;
use ru_core::pagination;
use ru_core::types::{DbId, Timestamp};
use ru_db::models::audit::AuditQuery;
use ru_db::repositories::AuditRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::Paginated;
use crate::state::AppState;

/// Filter + pagination parameters for the history listing.
#[derive(Debug, Default, Deserialize)]
pub struct HistoricoQuery {
    pub tipo_acao: Option<String>,
    pub id_ator: Option<DbId>,
    pub nome_ator: Option<String>,
    pub cpf_ator: Option<String>,
    pub id_alvo: Option<DbId>,
    pub nome_alvo: Option<String>,
    pub cpf_alvo: Option<String>,
    pub data_inicio: Option<Timestamp>,
    pub data_fim: Option<Timestamp>,
    pub ano: Option<i32>,
    pub mes: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One history item as displayed to an administrator.
#[derive(Debug, Serialize)]
pub struct HistoricoItem {
    pub id: DbId,
    pub ator_id: DbId,
    pub ator_nome: Option<String>,
    pub ator_cpf: Option<String>,
    pub acao: String,
    pub alvo_id: Option<DbId>,
    pub alvo_nome: Option<String>,
    pub alvo_cpf: Option<String>,
    pub data: Timestamp,
    pub info_adicional: serde_json::Value,
}

/// GET /historico_acoes/
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(query): Query<HistoricoQuery>,
) -> AppResult<Json<Paginated<HistoricoItem>>> {
    // A month without a year would silently mix every year's data.
    if query.mes.is_some() && query.ano.is_none() {
        return Err(AppError::BadRequest(
            "Se 'mes' for informado, 'ano' também deve ser fornecido".into(),
        ));
    }
    if let Some(mes) = query.mes {
        if !(1..=12).contains(&mes) {
            return Err(AppError::BadRequest("Mês inválido".into()));
        }
    }

    let tipo_acao = match &query.tipo_acao {
        Some(raw) => Some(ActionKind::from_str(raw)?),
        None => None,
    };
    let cpf_ator_hash = match &query.cpf_ator {
        Some(raw) => Some(cpf::lookup_hash(&cpf::normalize(raw)?)),
        None => None,
    };
    let cpf_alvo_hash = match &query.cpf_alvo {
        Some(raw) => Some(cpf::lookup_hash(&cpf::normalize(raw)?)),
        None => None,
    };

    let filter = AuditQuery {
        tipo_acao,
        id_ator: query.id_ator,
        nome_ator: query.nome_ator.clone(),
        cpf_ator_hash,
        id_alvo: query.id_alvo,
        nome_alvo: query.nome_alvo.clone(),
        cpf_alvo_hash,
        data_inicio: query.data_inicio,
        data_fim: query.data_fim,
        ano: query.ano,
        mes: query.mes,
    };

    let page = pagination::clamp_page(query.page);
    let page_size = pagination::clamp_page_size(query.page_size);
    let offset = pagination::offset(page, page_size);

    let total = AuditRepo::count(&state.pool, &filter).await?;
    let entries = AuditRepo::query(&state.pool, &filter, page_size, offset).await?;

    let items = entries
        .into_iter()
        .map(|entry| HistoricoItem {
            id: entry.id,
            ator_id: entry.ator_id,
            ator_nome: entry.ator_nome,
            // Decrypt failure or an anonymized party renders as null,
            // never as an error for the whole page.
            ator_cpf: state.cipher.decrypt_opt(entry.ator_cpf_cript.as_deref()),
            acao: entry.acao,
            alvo_id: entry.alvo_id,
            alvo_nome: entry.alvo_nome,
            alvo_cpf: state.cipher.decrypt_opt(entry.alvo_cpf_cript.as_deref()),
            data: entry.data,
            info_adicional: entry.info_adicional.unwrap_or_else(|| json!({})),
        })
        .collect();

    Ok(Json(Paginated::new(items, page, page_size, total)))
}
