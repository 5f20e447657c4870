use std::sync::Arc;

use ru_core::crypto::CpfCipher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ru_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// AES-256-GCM cipher for reversible CPF storage.
    pub cipher: Arc<CpfCipher>,
}
