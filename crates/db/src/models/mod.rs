//! Entity models and DTOs, one submodule per table family.

pub mod audit;
pub mod client;
pub mod employee;
pub mod general_info;
pub mod purchase;
