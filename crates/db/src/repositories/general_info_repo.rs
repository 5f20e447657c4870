//! Repository for the singleton `informacoes_gerais` row.

use sqlx::{PgConnection, PgExecutor};

use crate::models::general_info::{GeneralInfo, GeneralInfoInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, nome_empresa, preco_almoco, preco_meia_almoco, \
                       preco_jantar, preco_meia_jantar, inicio_almoco, \
                       fim_almoco, inicio_jantar, fim_jantar";

/// Provides access to the singleton configuration row.
pub struct GeneralInfoRepo;

impl GeneralInfoRepo {
    /// Fetch the configuration row, if one was ever created.
    pub async fn get(exec: impl PgExecutor<'_>) -> Result<Option<GeneralInfo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM informacoes_gerais WHERE id = 1");
        sqlx::query_as::<_, GeneralInfo>(&query)
            .fetch_optional(exec)
            .await
    }

    /// Create or fully replace the singleton row.
    pub async fn upsert(
        conn: &mut PgConnection,
        input: &GeneralInfoInput,
    ) -> Result<GeneralInfo, sqlx::Error> {
        let query = format!(
            "INSERT INTO informacoes_gerais \
                 (id, nome_empresa, preco_almoco, preco_meia_almoco, preco_jantar, \
                  preco_meia_jantar, inicio_almoco, fim_almoco, inicio_jantar, fim_jantar) \
             VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
                 nome_empresa = EXCLUDED.nome_empresa, \
                 preco_almoco = EXCLUDED.preco_almoco, \
                 preco_meia_almoco = EXCLUDED.preco_meia_almoco, \
                 preco_jantar = EXCLUDED.preco_jantar, \
                 preco_meia_jantar = EXCLUDED.preco_meia_jantar, \
                 inicio_almoco = EXCLUDED.inicio_almoco, \
                 fim_almoco = EXCLUDED.fim_almoco, \
                 inicio_jantar = EXCLUDED.inicio_jantar, \
                 fim_jantar = EXCLUDED.fim_jantar \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneralInfo>(&query)
            .bind(&input.nome_empresa)
            .bind(input.preco_almoco)
            .bind(input.preco_meia_almoco)
            .bind(input.preco_jantar)
            .bind(input.preco_meia_jantar)
            .bind(input.inicio_almoco)
            .bind(input.fim_almoco)
            .bind(input.inicio_jantar)
            .bind(input.fim_jantar)
            .fetch_one(conn)
            .await
    }

    /// Update the singleton row. Returns `None` if it was never created.
    pub async fn update(
        conn: &mut PgConnection,
        input: &GeneralInfoInput,
    ) -> Result<Option<GeneralInfo>, sqlx::Error> {
        let query = format!(
            "UPDATE informacoes_gerais SET \
                 nome_empresa = $1, preco_almoco = $2, preco_meia_almoco = $3, \
                 preco_jantar = $4, preco_meia_jantar = $5, inicio_almoco = $6, \
                 fim_almoco = $7, inicio_jantar = $8, fim_jantar = $9 \
             WHERE id = 1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneralInfo>(&query)
            .bind(&input.nome_empresa)
            .bind(input.preco_almoco)
            .bind(input.preco_meia_almoco)
            .bind(input.preco_jantar)
            .bind(input.preco_meia_jantar)
            .bind(input.inicio_almoco)
            .bind(input.fim_almoco)
            .bind(input.inicio_jantar)
            .bind(input.fim_jantar)
            .fetch_optional(conn)
            .await
    }
}
