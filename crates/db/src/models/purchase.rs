//! Purchase entity model and DTOs.

use ru_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A registered cafeteria purchase.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub usuario_id: DbId,
    pub horario: Timestamp,
    pub local: String,
    pub forma_pagamento: String,
    /// Price in centavos.
    pub preco: i32,
}

/// DTO for inserting a new purchase.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub usuario_id: DbId,
    pub horario: Timestamp,
    pub local: String,
    pub forma_pagamento: String,
    pub preco: i32,
}
