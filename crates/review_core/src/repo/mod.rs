//! Persistence for reviews and the employee directory they depend on.
//!
//! # Responsibility
//! - Keep SQL inside the core persistence boundary.
//! - Reconcile stored rows with shared in-memory instances.
//!
//! # Invariants
//! - Write paths validate attributes before any SQL mutation.
//! - Storage failures are returned as `RepoError::Db`, never swallowed.

pub mod employee_repo;
pub mod review_repo;
