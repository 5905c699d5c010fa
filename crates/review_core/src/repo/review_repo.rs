//! Review persistence session with an identity map.
//!
//! # Responsibility
//! - Own the `reviews` table lifecycle (create/drop).
//! - Map review rows to shared in-memory instances and back.
//! - Keep exactly one live instance per persisted id for the session lifetime.
//!
//! # Invariants
//! - Every cached handle has `id == Some(key)`.
//! - `employee_id` is resolved through the [`EmployeeDirectory`] before it is
//!   accepted, whether it comes from a caller or from a stored row.
//! - Hydration refreshes cached instances in place; it never swaps the `Rc`.
//! - Dropping the table detaches every cached instance (`id = None`), so a
//!   reused id never has two live instances.
//!
//! Handles are `Rc<RefCell<_>>`. A session call that needs a review the
//! caller is still borrowing fails with `RepoError::InstanceBorrowed`.

use crate::db::DbError;
use crate::model::employee::{EmployeeId, EmployeeValidationError};
use crate::model::review::{Review, ReviewId, ReviewValidationError};
use crate::repo::employee_repo::EmployeeDirectory;
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

const CREATE_REVIEWS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY,
    year INT,
    summary TEXT,
    employee_id INTEGER,
    FOREIGN KEY (employee_id) REFERENCES employee(id)
);";

const REVIEW_SELECT_SQL: &str = "SELECT
    id,
    year,
    summary,
    employee_id
FROM reviews";

/// Shared, mutable review instance handed out by a [`ReviewSession`].
pub type ReviewHandle = Rc<RefCell<Review>>;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for review/employee persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ReviewValidationError),
    EmployeeValidation(EmployeeValidationError),
    Db(DbError),
    /// `update` matched no row.
    NotFound(ReviewId),
    /// `delete` on an id this session does not track for the given handle.
    NotTracked(ReviewId),
    /// Operation needs a persisted review but `id` is `None`.
    NotPersisted,
    /// `save` on a review that already has a row.
    AlreadyPersisted(ReviewId),
    /// The review is borrowed by the caller while the session needs it.
    InstanceBorrowed(Option<ReviewId>),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmployeeValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "review not found: {id}"),
            Self::NotTracked(id) => write!(f, "review {id} is not tracked by this session"),
            Self::NotPersisted => write!(f, "review has not been saved"),
            Self::AlreadyPersisted(id) => write!(f, "review already saved with id {id}"),
            Self::InstanceBorrowed(Some(id)) => write!(f, "review {id} is currently borrowed"),
            Self::InstanceBorrowed(None) => write!(f, "review is currently borrowed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::EmployeeValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::NotTracked(_)
            | Self::NotPersisted
            | Self::AlreadyPersisted(_)
            | Self::InstanceBorrowed(_) => None,
        }
    }
}

impl From<ReviewValidationError> for RepoError {
    fn from(value: ReviewValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::EmployeeValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw `reviews` row, before reconciliation with the identity map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub id: ReviewId,
    pub year: i32,
    pub summary: String,
    pub employee_id: EmployeeId,
}

impl From<(ReviewId, i32, String, EmployeeId)> for ReviewRow {
    fn from((id, year, summary, employee_id): (ReviewId, i32, String, EmployeeId)) -> Self {
        Self {
            id,
            year,
            summary,
            employee_id,
        }
    }
}

impl ReviewRow {
    fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            year: row.get("year")?,
            summary: row.get("summary")?,
            employee_id: row.get("employee_id")?,
        })
    }
}

/// Unit of identity for reviews loaded from one connection.
///
/// The connection is borrowed, never owned; the cache lives exactly as long
/// as the session.
pub struct ReviewSession<'conn, D: EmployeeDirectory> {
    conn: &'conn Connection,
    employees: D,
    identity_map: HashMap<ReviewId, ReviewHandle>,
}

impl<'conn, D: EmployeeDirectory> ReviewSession<'conn, D> {
    pub fn new(conn: &'conn Connection, employees: D) -> Self {
        Self {
            conn,
            employees,
            identity_map: HashMap::new(),
        }
    }

    /// Returns the directory used for `employee_id` checks.
    pub fn employees(&self) -> &D {
        &self.employees
    }

    /// Creates `reviews` if it does not exist yet.
    pub fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_REVIEWS_TABLE_SQL)?;
        info!("event=review_table_create module=repo status=ok");
        Ok(())
    }

    /// Drops `reviews` if present and detaches every cached instance.
    ///
    /// Handles still held by callers end up unsaved (`id = None`). Nothing is
    /// dropped while any cached review is borrowed.
    pub fn drop_table(&mut self) -> RepoResult<()> {
        let mut detached = Vec::with_capacity(self.identity_map.len());
        for (&id, handle) in &self.identity_map {
            let record = handle
                .try_borrow_mut()
                .map_err(|_| RepoError::InstanceBorrowed(Some(id)))?;
            detached.push(record);
        }

        self.conn.execute_batch("DROP TABLE IF EXISTS reviews;")?;
        for mut record in detached {
            record.assign_id(None);
        }
        let evicted = self.identity_map.len();
        self.identity_map.clear();
        info!("event=review_table_drop module=repo status=ok evicted={evicted}");
        Ok(())
    }

    /// Builds an unsaved review after validating every attribute.
    ///
    /// # Errors
    /// - `RepoError::Validation` for a bad year, empty summary or unknown
    ///   employee.
    /// - `RepoError::Db` when the employee lookup itself fails.
    pub fn new_review(
        &self,
        year: i32,
        summary: impl Into<String>,
        employee_id: EmployeeId,
    ) -> RepoResult<ReviewHandle> {
        let review = Review::new(year, summary, employee_id)?;
        self.ensure_employee_exists(employee_id)?;
        Ok(Rc::new(RefCell::new(review)))
    }

    /// Reassigns `employee_id` once the directory confirms the employee.
    pub fn set_employee_id(
        &self,
        review: &ReviewHandle,
        employee_id: EmployeeId,
    ) -> RepoResult<()> {
        self.ensure_employee_exists(employee_id)?;
        write_handle(review)?.assign_employee_id(employee_id);
        Ok(())
    }

    /// Inserts a new row for `review`, assigns its id and starts tracking it.
    pub fn save(&mut self, review: &ReviewHandle) -> RepoResult<ReviewId> {
        let mut record = write_handle(review)?;
        if let Some(id) = record.id() {
            return Err(RepoError::AlreadyPersisted(id));
        }

        self.conn.execute(
            "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3);",
            params![record.year(), record.summary(), record.employee_id()],
        )?;
        let id = self.conn.last_insert_rowid();
        record.assign_id(Some(id));
        drop(record);

        self.identity_map.insert(id, Rc::clone(review));
        debug!("event=review_save module=repo status=ok review_id={id}");
        Ok(id)
    }

    /// Validates, inserts and returns a tracked review.
    pub fn create(
        &mut self,
        year: i32,
        summary: impl Into<String>,
        employee_id: EmployeeId,
    ) -> RepoResult<ReviewHandle> {
        let review = self.new_review(year, summary, employee_id)?;
        self.save(&review)?;
        Ok(review)
    }

    /// Writes the current field values of `review` to its row.
    pub fn update(&self, review: &ReviewHandle) -> RepoResult<()> {
        let record = read_handle(review)?;
        let id = record.id().ok_or(RepoError::NotPersisted)?;

        let changed = self.conn.execute(
            "UPDATE reviews
             SET
                year = ?1,
                summary = ?2,
                employee_id = ?3
             WHERE id = ?4;",
            params![record.year(), record.summary(), record.employee_id(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=review_update module=repo status=ok review_id={id}");
        Ok(())
    }

    /// Deletes the row of `review`, stops tracking it and clears its id.
    ///
    /// The cache is checked before storage is touched, so an untracked
    /// review leaves the table unchanged.
    pub fn delete(&mut self, review: &ReviewHandle) -> RepoResult<()> {
        let mut record = write_handle(review)?;
        let id = record.id().ok_or(RepoError::NotPersisted)?;
        match self.identity_map.get(&id) {
            Some(tracked) if Rc::ptr_eq(tracked, review) => {}
            _ => return Err(RepoError::NotTracked(id)),
        }

        let changed = self.conn.execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
        if changed == 0 {
            warn!("event=review_delete module=repo status=row_missing review_id={id}");
        }

        self.identity_map.remove(&id);
        record.assign_id(None);
        debug!("event=review_delete module=repo status=ok review_id={id}");
        Ok(())
    }

    /// Returns the canonical instance for `row`.
    ///
    /// A cached instance is overwritten with the row values and returned;
    /// otherwise a new instance is created and cached. Row values are
    /// validated first, so a rejected row leaves the cache untouched.
    pub fn instance_from_db(&mut self, row: impl Into<ReviewRow>) -> RepoResult<ReviewHandle> {
        let ReviewRow {
            id,
            year,
            summary,
            employee_id,
        } = row.into();

        let mut fresh = Review::new(year, summary, employee_id)?;
        self.ensure_employee_exists(employee_id)?;
        fresh.assign_id(Some(id));

        if let Some(cached) = self.identity_map.get(&id) {
            *cached
                .try_borrow_mut()
                .map_err(|_| RepoError::InstanceBorrowed(Some(id)))? = fresh;
            debug!("event=review_hydrate module=repo status=ok review_id={id} source=cache");
            return Ok(Rc::clone(cached));
        }

        let handle = Rc::new(RefCell::new(fresh));
        self.identity_map.insert(id, Rc::clone(&handle));
        debug!("event=review_hydrate module=repo status=ok review_id={id} source=row");
        Ok(handle)
    }

    /// Loads one review by primary key.
    pub fn find_by_id(&mut self, id: ReviewId) -> RepoResult<Option<ReviewHandle>> {
        let row = self
            .conn
            .query_row(
                &format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"),
                [id],
                ReviewRow::from_sql_row,
            )
            .optional()?;

        match row {
            Some(row) => self.instance_from_db(row).map(Some),
            None => Ok(None),
        }
    }

    /// Loads every review, one canonical instance per row, ordered by id.
    pub fn get_all(&mut self) -> RepoResult<Vec<ReviewHandle>> {
        let rows = self.load_rows()?;
        let reviews = rows
            .into_iter()
            .map(|row| self.instance_from_db(row))
            .collect::<RepoResult<Vec<_>>>()?;
        debug!(
            "event=review_list module=repo status=ok count={}",
            reviews.len()
        );
        Ok(reviews)
    }

    /// Returns whether `id` currently has a cached instance.
    pub fn is_tracked(&self, id: ReviewId) -> bool {
        self.identity_map.contains_key(&id)
    }

    /// Number of cached instances.
    pub fn tracked_len(&self) -> usize {
        self.identity_map.len()
    }

    fn load_rows(&self) -> RepoResult<Vec<ReviewRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut loaded = Vec::new();

        while let Some(row) = rows.next()? {
            loaded.push(ReviewRow::from_sql_row(row)?);
        }

        Ok(loaded)
    }

    fn ensure_employee_exists(&self, employee_id: EmployeeId) -> RepoResult<()> {
        if self.employees.find_by_id(employee_id)?.is_none() {
            return Err(ReviewValidationError::UnknownEmployee(employee_id).into());
        }
        Ok(())
    }
}

fn read_handle(review: &ReviewHandle) -> RepoResult<Ref<'_, Review>> {
    review
        .try_borrow()
        .map_err(|_| RepoError::InstanceBorrowed(None))
}

fn write_handle(review: &ReviewHandle) -> RepoResult<RefMut<'_, Review>> {
    review
        .try_borrow_mut()
        .map_err(|_| RepoError::InstanceBorrowed(None))
}
