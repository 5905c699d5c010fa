//! Review domain model.
//!
//! # Responsibility
//! - Define the performance-review record persisted in `reviews`.
//! - Enforce structural attribute rules (`year`, `summary`) at every write.
//!
//! # Invariants
//! - `year` is never earlier than [`MIN_REVIEW_YEAR`].
//! - `summary` is never empty.
//! - `id` is `None` until the row exists in storage.
//! - `employee_id` existence is checked by the session, which is the only
//!   place allowed to assign it.

use super::employee::EmployeeId;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary key of a persisted review row.
pub type ReviewId = i64;

/// Earliest accepted review year.
pub const MIN_REVIEW_YEAR: i32 = 2000;

/// Invalid attribute rejected by a review constructor or setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    YearTooEarly(i32),
    EmptySummary,
    UnknownEmployee(EmployeeId),
}

impl Display for ReviewValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearTooEarly(year) => write!(
                f,
                "invalid attribute `year`: {year} is earlier than {MIN_REVIEW_YEAR}"
            ),
            Self::EmptySummary => write!(f, "invalid attribute `summary`: must not be empty"),
            Self::UnknownEmployee(id) => write!(
                f,
                "invalid attribute `employee_id`: employee {id} does not exist"
            ),
        }
    }
}

impl Error for ReviewValidationError {}

/// One performance-review record.
///
/// Instances are shared through [`crate::ReviewHandle`] once a session hands
/// them out, so field access goes through getters and validating setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    id: Option<ReviewId>,
    year: i32,
    summary: String,
    employee_id: EmployeeId,
}

impl Review {
    /// Builds an unsaved review after checking `year` and `summary`.
    ///
    /// Crate-private: callers go through `ReviewSession::new_review`, which
    /// also resolves `employee_id`.
    pub(crate) fn new(
        year: i32,
        summary: impl Into<String>,
        employee_id: EmployeeId,
    ) -> Result<Self, ReviewValidationError> {
        let summary = summary.into();
        validate_year(year)?;
        validate_summary(&summary)?;
        Ok(Self {
            id: None,
            year,
            summary,
            employee_id,
        })
    }

    pub fn id(&self) -> Option<ReviewId> {
        self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns whether this review currently maps to a stored row.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Sets `year`; rejects years earlier than [`MIN_REVIEW_YEAR`].
    pub fn set_year(&mut self, year: i32) -> Result<(), ReviewValidationError> {
        validate_year(year)?;
        self.year = year;
        Ok(())
    }

    /// Sets `summary`; rejects empty text.
    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ReviewValidationError> {
        let summary = summary.into();
        validate_summary(&summary)?;
        self.summary = summary;
        Ok(())
    }

    pub(crate) fn assign_employee_id(&mut self, employee_id: EmployeeId) {
        self.employee_id = employee_id;
    }

    pub(crate) fn assign_id(&mut self, id: Option<ReviewId>) {
        self.id = id;
    }
}

impl Display for Review {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Review {id}: ")?,
            None => write!(f, "<Review None: ")?,
        }
        write!(
            f,
            "{}, {}, Employee: {}>",
            self.year, self.summary, self.employee_id
        )
    }
}

fn validate_year(year: i32) -> Result<(), ReviewValidationError> {
    if year < MIN_REVIEW_YEAR {
        return Err(ReviewValidationError::YearTooEarly(year));
    }
    Ok(())
}

fn validate_summary(summary: &str) -> Result<(), ReviewValidationError> {
    if summary.is_empty() {
        return Err(ReviewValidationError::EmptySummary);
    }
    Ok(())
}
