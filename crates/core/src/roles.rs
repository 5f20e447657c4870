//! Well-known employee role names.
//!
//! These must match the `tipo` CHECK constraint on the `funcionario`
//! table. There is no role hierarchy: every endpoint lists each role it
//! accepts explicitly.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FUNCIONARIO: &str = "funcionario";
