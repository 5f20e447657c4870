//! General cafeteria configuration (singleton row).

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single `informacoes_gerais` row: company name, meal prices in
/// centavos, and the daily lunch/dinner service windows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GeneralInfo {
    pub id: i16,
    pub nome_empresa: String,
    pub preco_almoco: i32,
    pub preco_meia_almoco: i32,
    pub preco_jantar: i32,
    pub preco_meia_jantar: i32,
    pub inicio_almoco: NaiveTime,
    pub fim_almoco: NaiveTime,
    pub inicio_jantar: NaiveTime,
    pub fim_jantar: NaiveTime,
}

/// DTO for creating or replacing the singleton row.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralInfoInput {
    pub nome_empresa: String,
    pub preco_almoco: i32,
    pub preco_meia_almoco: i32,
    pub preco_jantar: i32,
    pub preco_meia_jantar: i32,
    pub inicio_almoco: NaiveTime,
    pub fim_almoco: NaiveTime,
    pub inicio_jantar: NaiveTime,
    pub fim_jantar: NaiveTime,
}

impl GeneralInfo {
    /// Whether a timestamp's local time-of-day falls inside the lunch or
    /// dinner window (boundaries inclusive).
    pub fn within_meal_window(&self, time: NaiveTime) -> bool {
        (time >= self.inicio_almoco && time <= self.fim_almoco)
            || (time >= self.inicio_jantar && time <= self.fim_jantar)
    }
}
