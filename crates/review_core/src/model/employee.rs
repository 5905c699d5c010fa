//! Employee model used for review foreign-key checks.
//!
//! # Invariants
//! - `name` and `job_title` are never empty.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary key of an `employee` row.
pub type EmployeeId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyName,
    EmptyJobTitle,
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "invalid attribute `name`: must not be empty"),
            Self::EmptyJobTitle => {
                write!(f, "invalid attribute `job_title`: must not be empty")
            }
        }
    }
}

impl Error for EmployeeValidationError {}

/// Employee record as seen by the review layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: EmployeeId,
    name: String,
    job_title: String,
}

impl Employee {
    /// Builds an employee with a known id.
    ///
    /// Public so that non-SQLite directories can produce records too.
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Result<Self, EmployeeValidationError> {
        let name = name.into();
        let job_title = job_title.into();
        validate_attributes(&name, &job_title)?;
        Ok(Self {
            id,
            name,
            job_title,
        })
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }
}

/// Checks `name` and `job_title` without building a record.
pub fn validate_attributes(name: &str, job_title: &str) -> Result<(), EmployeeValidationError> {
    if name.is_empty() {
        return Err(EmployeeValidationError::EmptyName);
    }
    if job_title.is_empty() {
        return Err(EmployeeValidationError::EmptyJobTitle);
    }
    Ok(())
}
