//! Domain layer for the RU administrative backend.
//!
//! This crate has no internal dependencies so it can be used by the
//! persistence layer, the API server, and any future CLI tooling alike.

pub mod audit;
pub mod cpf;
pub mod crypto;
pub mod error;
pub mod hashing;
pub mod pagination;
pub mod roles;
pub mod types;
