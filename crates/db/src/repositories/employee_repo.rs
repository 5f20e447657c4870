//! Repository for the `usuario` + `funcionario` table pair.

use chrono::NaiveDate;
use ru_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::employee::{Employee, EmployeeFilter, NewEmployee, UpdateEmployee};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "u.id, u.nome, f.cpf_hash, f.cpf_cript, f.senha_hash, \
                       f.email, f.tipo, f.data_entrada, f.data_saida";

/// Joined source for all employee SELECTs.
const TABLES: &str = "usuario u JOIN funcionario f ON f.usuario_id = u.id";

/// Provides CRUD operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee (base row plus detail row), returning the
    /// created entity.
    pub async fn create(conn: &mut PgConnection, input: &NewEmployee) -> Result<Employee, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO usuario (nome, subtipo) VALUES ($1, 'funcionario') RETURNING id",
        )
        .bind(&input.nome)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            "INSERT INTO funcionario \
                 (usuario_id, cpf_hash, cpf_cript, senha_hash, email, tipo, data_entrada) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(&input.cpf_hash)
        .bind(&input.cpf_cript)
        .bind(&input.senha_hash)
        .bind(&input.email)
        .bind(&input.tipo)
        .bind(input.data_entrada)
        .execute(&mut *conn)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM {TABLES} WHERE u.id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_one(conn)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {TABLES} WHERE u.id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find an employee by CPF lookup hash. Anonymized rows carry a NULL
    /// hash and can never match.
    pub async fn find_by_cpf_hash(
        exec: impl PgExecutor<'_>,
        cpf_hash: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {TABLES} WHERE f.cpf_hash = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(cpf_hash)
            .fetch_optional(exec)
            .await
    }

    /// Whether any employee already uses the given email.
    pub async fn email_exists(exec: impl PgExecutor<'_>, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM funcionario WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(exec)
        .await
    }

    /// List employees matching the filter, oldest id first.
    pub async fn list(
        pool: &PgPool,
        filter: &EmployeeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Employee>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM {TABLES} {where_clause} \
             ORDER BY u.id ASC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_values_as(sqlx::query_as::<_, Employee>(&query), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count employees matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &EmployeeFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT FROM {TABLES} {where_clause}");

        let q = bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Update an employee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE funcionario SET
                senha_hash = COALESCE($2, senha_hash),
                email = COALESCE($3, email),
                tipo = COALESCE($4, tipo)
             WHERE usuario_id = $1",
        )
        .bind(id)
        .bind(&input.senha_hash)
        .bind(&input.email)
        .bind(&input.tipo)
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

    /// Terminal deactivation: set `data_saida` and clear the email.
    ///
    /// Returns `false` when the employee does not exist or is already
    /// deactivated (the two cases are indistinguishable on purpose).
    pub async fn deactivate(
        conn: &mut PgConnection,
        id: DbId,
        data_saida: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE funcionario SET data_saida = $2, email = NULL \
             WHERE usuario_id = $1 AND data_saida IS NULL",
        )
        .bind(id)
        .bind(data_saida)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Terminal anonymization: null out name, CPF fields, and email.
    ///
    /// Guarded by `nome IS NOT NULL`; returns `false` when the row is
    /// already anonymized.
    pub async fn anonymize(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE usuario SET nome = NULL \
             WHERE id = $1 AND subtipo = 'funcionario' AND nome IS NOT NULL",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE funcionario SET cpf_hash = NULL, cpf_cript = NULL, email = NULL \
             WHERE usuario_id = $1",
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(true)
    }

    /// Hard-delete an employee (detail row first, then the base row).
    ///
    /// A foreign-key violation from `historico_acoes.ator_id` propagates
    /// as a database error; the caller translates it.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM funcionario WHERE usuario_id = $1")
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

/// Typed bind value for dynamically-built employee queries.
enum BindValue {
    BigInt(i64),
    Text(String),
    Date(NaiveDate),
}

/// Build a WHERE clause and bind values from the filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_filter(filter: &EmployeeFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(id) = filter.id {
        conditions.push(format!("u.id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(id));
    }

    if let Some(ref cpf_hash) = filter.cpf_hash {
        conditions.push(format!("f.cpf_hash = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(cpf_hash.clone()));
    }

    if let Some(ref nome) = filter.nome {
        conditions.push(format!("u.nome ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{nome}%")));
    }

    if let Some(ref email) = filter.email {
        conditions.push(format!("f.email = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(email.clone()));
    }

    if let Some(data_entrada) = filter.data_entrada {
        conditions.push(format!("f.data_entrada = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(data_entrada));
    }

    if let Some(data_saida) = filter.data_saida {
        conditions.push(format!("f.data_saida = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(data_saida));
    }

    if let Some(ref tipo) = filter.tipo {
        conditions.push(format!("f.tipo = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(tipo.clone()));
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
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
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
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
