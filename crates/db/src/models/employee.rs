//! Employee entity model and DTOs.

use chrono::NaiveDate;
use ru_core::types::DbId;
use serde::Deserialize;
use sqlx::FromRow;

/// Employee row joined across `usuario` and `funcionario`.
///
/// Contains the password hash and the encrypted CPF blob -- NEVER
/// serialize this to API responses directly; the handler builds its own
/// response shape with the CPF decrypted.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: DbId,
    /// `None` once the employee was anonymized.
    pub nome: Option<String>,
    pub cpf_hash: Option<String>,
    pub cpf_cript: Option<Vec<u8>>,
    pub senha_hash: String,
    pub email: Option<String>,
    pub tipo: String,
    pub data_entrada: NaiveDate,
    /// Non-`None` means the employee is deactivated (terminal).
    pub data_saida: Option<NaiveDate>,
}

/// DTO for inserting a new employee. CPF fields arrive pre-encoded.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub nome: String,
    pub cpf_hash: String,
    pub cpf_cript: Vec<u8>,
    pub senha_hash: String,
    pub email: String,
    pub tipo: String,
    pub data_entrada: NaiveDate,
}

/// DTO for updating an employee. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub nome: Option<String>,
    pub senha_hash: Option<String>,
    pub email: Option<String>,
    pub tipo: Option<String>,
}

/// Filter parameters for listing employees. All conditions are ANDed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeFilter {
    pub id: Option<DbId>,
    #[serde(skip)]
    pub cpf_hash: Option<String>,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub data_entrada: Option<NaiveDate>,
    pub data_saida: Option<NaiveDate>,
    /// Exact role match, used by the admin-only listing.
    #[serde(skip)]
    pub tipo: Option<String>,
}
