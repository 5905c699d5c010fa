//! Domain model for performance reviews and the employees they reference.
//!
//! # Responsibility
//! - Define the in-memory records mapped to `reviews` and `employee` rows.
//! - Own attribute validation that needs no storage access.
//!
//! # Invariants
//! - Constructors and setters validate before mutating; a failed call leaves
//!   the record unchanged.

pub mod employee;
pub mod review;
