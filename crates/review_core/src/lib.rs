//! Performance-review records over SQLite with an identity map.
//! This crate owns attribute validation and row/instance reconciliation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::employee::{Employee, EmployeeId, EmployeeValidationError};
pub use model::review::{Review, ReviewId, ReviewValidationError, MIN_REVIEW_YEAR};
pub use repo::employee_repo::{EmployeeDirectory, SqliteEmployeeDirectory};
pub use repo::review_repo::{RepoError, RepoResult, ReviewHandle, ReviewRow, ReviewSession};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
