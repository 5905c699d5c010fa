use review_core::db::open_db_in_memory;
use review_core::{
    Employee, EmployeeDirectory, EmployeeId, EmployeeValidationError, RepoError, RepoResult,
    ReviewSession, ReviewValidationError, SqliteEmployeeDirectory,
};
use rusqlite::Connection;
use std::collections::HashMap;

#[test]
fn create_and_find_employee() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeDirectory::new(&conn);
    employees.create_table().unwrap();

    let created = employees.create("Lee Park", "Manager").unwrap();
    let found = employees.find_by_id(created.id()).unwrap().unwrap();

    assert_eq!(found, created);
    assert_eq!(found.name(), "Lee Park");
    assert_eq!(found.job_title(), "Manager");
    assert!(employees.find_by_id(created.id() + 1).unwrap().is_none());
}

#[test]
fn create_rejects_empty_name_and_job_title() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeDirectory::new(&conn);
    employees.create_table().unwrap();

    let err = employees.create("", "Manager").unwrap_err();
    assert!(matches!(
        err,
        RepoError::EmployeeValidation(EmployeeValidationError::EmptyName)
    ));

    let err = employees.create("Lee Park", "").unwrap_err();
    assert!(matches!(
        err,
        RepoError::EmployeeValidation(EmployeeValidationError::EmptyJobTitle)
    ));

    let stored: i64 = conn
        .query_row("SELECT COUNT(*) FROM employee;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(stored, 0);
}

#[test]
fn created_employee_carries_generated_id() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeDirectory::new(&conn);
    employees.create_table().unwrap();

    let first = employees.create("Lee Park", "Manager").unwrap();
    let second = employees.create("Ana Ruiz", "Engineer").unwrap();

    assert!(first.id() > 0);
    assert_ne!(first.id(), second.id());
    assert_eq!(employees.find_by_id(second.id()).unwrap().unwrap(), second);
}

#[test]
fn employee_tables_can_be_dropped_and_recreated() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeDirectory::new(&conn);

    employees.create_table().unwrap();
    employees.create("Lee Park", "Manager").unwrap();
    employees.drop_table().unwrap();
    employees.drop_table().unwrap();
    employees.create_table().unwrap();

    assert!(employees.find_by_id(1).unwrap().is_none());
}

struct FixedDirectory {
    employees: HashMap<EmployeeId, Employee>,
}

impl EmployeeDirectory for FixedDirectory {
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        Ok(self.employees.get(&id).cloned())
    }
}

#[test]
fn session_accepts_any_directory_implementation() {
    // Plain connection: foreign keys stay off, so no `employee` table is needed.
    let conn = Connection::open_in_memory().unwrap();
    let directory = FixedDirectory {
        employees: HashMap::from([(7, Employee::new(7, "Kim Lee", "Analyst").unwrap())]),
    };
    let mut session = ReviewSession::new(&conn, directory);
    session.create_table().unwrap();

    let review = session.create(2025, "Directory swap", 7).unwrap();
    assert_eq!(review.borrow().employee_id(), 7);

    let err = session.create(2025, "Missing", 8).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ReviewValidationError::UnknownEmployee(8))
    ));
    assert!(session.employees().find_by_id(7).unwrap().is_some());
}
