//! Repository for the append-only `historico_acoes` table.
//!
//! The write path stages an insert on the caller's transaction and never
//! commits; the read path joins actor and target person rows for display.

use ru_core::audit::ActionKind;
use ru_core::cpf;
use ru_core::error::CoreError;
use ru_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::audit::{AuditEntry, AuditQuery};

/// Joined column list for history SELECTs. Actor join is inner (the
/// accountability anchor always exists); target joins are left, with the
/// encrypted CPF coming from whichever detail table holds the target.
const COLUMNS: &str = "\
    h.id, h.ator_id, ua.nome AS ator_nome, fa.cpf_cript AS ator_cpf_cript, \
    h.acao, h.alvo_id, ut.nome AS alvo_nome, \
    COALESCE(ft.cpf_cript, ct.cpf_cript) AS alvo_cpf_cript, \
    h.data, h.info_adicional";

const TABLES: &str = "\
    historico_acoes h \
    JOIN usuario ua ON ua.id = h.ator_id \
    JOIN funcionario fa ON fa.usuario_id = h.ator_id \
    LEFT JOIN usuario ut ON ut.id = h.alvo_id \
    LEFT JOIN funcionario ft ON ft.usuario_id = h.alvo_id \
    LEFT JOIN cliente ct ON ct.usuario_id = h.alvo_id";

/// Provides the transactional write path and the filtered read path for
/// the action history.
pub struct AuditRepo;

impl AuditRepo {
    /// Stage one history entry on the caller's transaction.
    ///
    /// `actor_cpf` is the acting employee's normalized CPF (from the
    /// JWT); resolution to the internal id happens here via the lookup
    /// hash, so call sites never pass surrogate keys. An unresolvable
    /// actor is an error, never a silent drop or a NULL actor: the caller
    /// propagates it, the transaction rolls back, and the business
    /// mutation does not survive unaudited.
    pub async fn record(
        conn: &mut PgConnection,
        actor_cpf: &str,
        kind: ActionKind,
        target_id: Option<DbId>,
        payload: Option<serde_json::Value>,
    ) -> Result<DbId, CoreError> {
        let hash = cpf::lookup_hash(actor_cpf);

        let actor_id: Option<DbId> =
            sqlx::query_scalar("SELECT usuario_id FROM funcionario WHERE cpf_hash = $1")
                .bind(&hash)
                .fetch_optional(&mut *conn)
                .await
                .map_err(|e| CoreError::AuditWriteFailed(e.to_string()))?;

        let Some(actor_id) = actor_id else {
            return Err(CoreError::AuditWriteFailed(
                "ator não encontrado para o CPF autenticado".into(),
            ));
        };

        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO historico_acoes (ator_id, acao, alvo_id, info_adicional) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(actor_id)
        .bind(kind.as_str())
        .bind(target_id)
        .bind(payload)
        .fetch_one(conn)
        .await
        .map_err(|e| CoreError::AuditWriteFailed(e.to_string()))
    }

    /// Query history entries with filtering and pagination, newest first
    /// (ties broken by descending id).
    pub async fn query(
        pool: &PgPool,
        params: &AuditQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditEntry>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM {TABLES} {where_clause} \
             ORDER BY h.data DESC, h.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values_as(sqlx::query_as::<_, AuditEntry>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count history entries matching the filter (for pagination
    /// metadata).
    pub async fn count(pool: &PgPool, params: &AuditQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM {TABLES} {where_clause}");

        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

/// Typed bind value for dynamically-built history queries.
enum BindValue {
    BigInt(i64),
    Int(i32),
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from the filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_filter(params: &AuditQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(kind) = params.tipo_acao {
        conditions.push(format!("h.acao = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(kind.as_str().to_owned()));
    }

    if let Some(id_ator) = params.id_ator {
        conditions.push(format!("h.ator_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(id_ator));
    }

    if let Some(ref nome_ator) = params.nome_ator {
        conditions.push(format!("ua.nome ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{nome_ator}%")));
    }

    if let Some(ref hash) = params.cpf_ator_hash {
        conditions.push(format!("fa.cpf_hash = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(hash.clone()));
    }

    if let Some(id_alvo) = params.id_alvo {
        conditions.push(format!("h.alvo_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(id_alvo));
    }

    if let Some(ref nome_alvo) = params.nome_alvo {
        conditions.push(format!("ut.nome ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{nome_alvo}%")));
    }

    if let Some(ref hash) = params.cpf_alvo_hash {
        // One bind serves both detail tables.
        conditions.push(format!(
            "(ft.cpf_hash = ${bind_idx} OR ct.cpf_hash = ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(hash.clone()));
    }

    if let Some(data_inicio) = params.data_inicio {
        conditions.push(format!("h.data >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(data_inicio));
    }

    if let Some(data_fim) = params.data_fim {
        conditions.push(format!("h.data <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(data_fim));
    }

    if let Some(ano) = params.ano {
        conditions.push(format!("EXTRACT(YEAR FROM h.data)::INT = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(ano));
    }

    if let Some(mes) = params.mes {
        conditions.push(format!("EXTRACT(MONTH FROM h.data)::INT = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Int(mes));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values_as<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Int(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
