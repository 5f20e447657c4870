/// Domain-level error taxonomy.
///
/// Messages are user-facing (Portuguese) and surfaced verbatim in the
/// API's `{"detail": ...}` body; the HTTP mapping lives in the API crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed national ID (fails the CPF checksum).
    #[error("{0}")]
    InvalidCpf(String),

    /// CPF hash or email already registered.
    #[error("{0}")]
    Duplicate(String),

    /// Referenced entity does not exist (also covers the terminal-state
    /// guards: already-deactivated / already-anonymized map here).
    #[error("{0}")]
    NotFound(String),

    /// Missing, invalid, or expired credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the role is not in the endpoint's allow-list.
    #[error("{0}")]
    Forbidden(String),

    /// Malformed request payload (wrong type, bad enum value, etc.).
    #[error("{0}")]
    Validation(String),

    /// The audit actor could not be resolved while recording an action.
    /// Fatal to the enclosing transaction: a mutation must never commit
    /// without its audit entry.
    #[error("Falha ao registrar ação no histórico: {0}")]
    AuditWriteFailed(String),

    #[error("Erro interno: {0}")]
    Internal(String),
}
