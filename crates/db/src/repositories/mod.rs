//! Repository layer: zero-sized structs with async query methods.
//!
//! Read paths take a pool (or any executor); mutating paths take a
//! `&mut PgConnection` so the handler can stage every write of a request
//! on one transaction and commit or roll back as a unit.

pub mod audit_repo;
pub mod client_repo;
pub mod employee_repo;
pub mod general_info_repo;
pub mod purchase_repo;

pub use audit_repo::AuditRepo;
pub use client_repo::ClientRepo;
pub use employee_repo::EmployeeRepo;
pub use general_info_repo::GeneralInfoRepo;
pub use purchase_repo::PurchaseRepo;
