//! Repository for the `usuario` + `cliente` table pair.

use ru_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::client::{Client, ClientFilter, NewClient, UpdateClient};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "u.id, u.nome, c.cpf_hash, c.cpf_cript, c.matricula, \
                       c.tipo, c.graduando, c.pos_graduando, c.bolsista";

/// Joined source for all client SELECTs.
const TABLES: &str = "usuario u JOIN cliente c ON c.usuario_id = u.id";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client (base row plus detail row), returning the
    /// created entity.
    pub async fn create(conn: &mut PgConnection, input: &NewClient) -> Result<Client, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO usuario (nome, subtipo) VALUES ($1, 'cliente') RETURNING id",
        )
        .bind(&input.nome)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            "INSERT INTO cliente \
                 (usuario_id, cpf_hash, cpf_cript, matricula, tipo, graduando, pos_graduando, bolsista) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(&input.cpf_hash)
        .bind(&input.cpf_cript)
        .bind(&input.matricula)
        .bind(&input.tipo)
        .bind(input.graduando)
        .bind(input.pos_graduando)
        .bind(input.bolsista)
        .execute(&mut *conn)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM {TABLES} WHERE u.id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {TABLES} WHERE u.id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find a client by CPF lookup hash.
    pub async fn find_by_cpf_hash(
        exec: impl PgExecutor<'_>,
        cpf_hash: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {TABLES} WHERE c.cpf_hash = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(cpf_hash)
            .fetch_optional(exec)
            .await
    }

    /// List clients matching the filter, oldest id first.
    pub async fn list(pool: &PgPool, filter: &ClientFilter) -> Result<Vec<Client>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx = 1u32;
        let mut bind_values: Vec<String> = Vec::new();

        if let Some(ref nome) = filter.nome {
            conditions.push(format!("u.nome ILIKE ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(format!("%{nome}%"));
        }

        if let Some(ref tipo) = filter.tipo {
            conditions.push(format!("c.tipo = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(tipo.clone());
        }

        if let Some(ref matricula) = filter.matricula {
            conditions.push(format!("c.matricula = ${bind_idx}"));
            let _ = bind_idx;
            bind_values.push(matricula.clone());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT {COLUMNS} FROM {TABLES} {where_clause} ORDER BY u.id ASC");

        let mut q = sqlx::query_as::<_, Client>(&query);
        for val in &bind_values {
            q = q.bind(val.as_str());
        }
        q.fetch_all(pool).await
    }

    /// Update a client. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateClient,
    ) -> Result<Option<Client>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cliente SET
                matricula = COALESCE($2, matricula),
                tipo = COALESCE($3, tipo),
                graduando = COALESCE($4, graduando),
                pos_graduando = COALESCE($5, pos_graduando),
                bolsista = COALESCE($6, bolsista)
             WHERE usuario_id = $1",
        )
        .bind(id)
        .bind(&input.matricula)
        .bind(&input.tipo)
        .bind(input.graduando)
        .bind(input.pos_graduando)
        .bind(input.bolsista)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("UPDATE usuario SET nome = COALESCE($2, nome) WHERE id = $1")
            .bind(id)
            .bind(&input.nome)
            .execute(&mut *conn)
            .await?;

        Self::find_by_id(conn, id).await
    }

    /// Terminal anonymization: null out name and CPF fields. The row
    /// itself survives for purchase and history integrity.
    ///
    /// Returns `false` when the row is already anonymized.
    pub async fn anonymize(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE usuario SET nome = NULL \
             WHERE id = $1 AND subtipo = 'cliente' AND nome IS NOT NULL",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE cliente SET cpf_hash = NULL, cpf_cript = NULL WHERE usuario_id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(true)
    }

    /// Hard-delete a client (detail row first, then the base row).
    ///
    /// A foreign-key violation from `compra.usuario_id` propagates as a
    /// database error; the caller translates it.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cliente WHERE usuario_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM usuario WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;

        Ok(true)
    }
}
