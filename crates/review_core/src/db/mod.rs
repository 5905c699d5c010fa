//! SQLite connection bootstrap.
//!
//! # Responsibility
//! - Open and configure the SQLite connection injected into review sessions.
//! - Normalize driver failures into one storage error type.
//!
//! # Invariants
//! - Returned connections enforce foreign keys, so `reviews.employee_id`
//!   is checked by SQLite as well as by the session.
//! - Schema is not touched here; tables are owned by their repositories.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure surfaced from the SQLite driver.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
