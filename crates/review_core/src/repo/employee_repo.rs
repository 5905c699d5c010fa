//! Employee directory contract and SQLite implementation.
//!
//! # Responsibility
//! - Answer "does employee `id` exist" for review foreign-key checks.
//! - Own the `employee` table referenced by `reviews.employee_id`.

use crate::model::employee::{validate_attributes, Employee, EmployeeId};
use crate::repo::review_repo::RepoResult;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

const CREATE_EMPLOYEE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY,
    name TEXT,
    job_title TEXT
);";

/// Lookup used by review sessions to validate `employee_id`.
pub trait EmployeeDirectory {
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
}

impl<T: EmployeeDirectory + ?Sized> EmployeeDirectory for &T {
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        (**self).find_by_id(id)
    }
}

/// SQLite-backed employee directory over the `employee` table.
pub struct SqliteEmployeeDirectory<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeDirectory<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_EMPLOYEE_TABLE_SQL)?;
        info!("event=employee_table_create module=repo status=ok");
        Ok(())
    }

    pub fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS employee;")?;
        info!("event=employee_table_drop module=repo status=ok");
        Ok(())
    }

    /// Validates and inserts one employee, returning it with its new id.
    pub fn create(
        &self,
        name: impl Into<String>,
        job_title: impl Into<String>,
    ) -> RepoResult<Employee> {
        let name = name.into();
        let job_title = job_title.into();
        validate_attributes(&name, &job_title)?;

        self.conn.execute(
            "INSERT INTO employee (name, job_title) VALUES (?1, ?2);",
            params![name, job_title],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=employee_create module=repo status=ok employee_id={id}");

        Ok(Employee::new(id, name, job_title)?)
    }
}

impl EmployeeDirectory for SqliteEmployeeDirectory<'_> {
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, job_title FROM employee WHERE id = ?1;",
                [id],
                |row| {
                    Ok((
                        row.get::<_, EmployeeId>("id")?,
                        row.get::<_, String>("name")?,
                        row.get::<_, String>("job_title")?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, name, job_title)) => Ok(Some(Employee::new(id, name, job_title)?)),
            None => Ok(None),
        }
    }
}
