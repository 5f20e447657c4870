//! Repository for the `compra` table.

use sqlx::{PgConnection, PgPool};

use crate::models::purchase::{NewPurchase, Purchase};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, usuario_id, horario, local, forma_pagamento, preco";

/// Provides insert and listing operations for purchases.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Insert a new purchase, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewPurchase,
    ) -> Result<Purchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO compra (usuario_id, horario, local, forma_pagamento, preco) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(input.usuario_id)
            .bind(input.horario)
            .bind(&input.local)
            .bind(&input.forma_pagamento)
            .bind(input.preco)
            .fetch_one(conn)
            .await
    }

    /// List all purchases, most recent first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM compra ORDER BY horario DESC, id DESC");
        sqlx::query_as::<_, Purchase>(&query).fetch_all(pool).await
    }
}
