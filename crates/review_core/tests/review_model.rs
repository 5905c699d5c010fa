use review_core::db::open_db_in_memory;
use review_core::{
    EmployeeId, RepoError, ReviewSession, ReviewValidationError, SqliteEmployeeDirectory,
    MIN_REVIEW_YEAR,
};
use rusqlite::Connection;

#[test]
fn year_boundary_is_2000() {
    let conn = open_db_in_memory().unwrap();
    let employee_id = seed_employee(&conn);
    let session = ReviewSession::new(&conn, SqliteEmployeeDirectory::new(&conn));

    for year in [i32::MIN, 0, 1900, MIN_REVIEW_YEAR - 1] {
        let err = session.new_review(year, "text", employee_id).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ReviewValidationError::YearTooEarly(rejected)) if rejected == year
        ));
    }

    for year in [MIN_REVIEW_YEAR, 2021, 2100, i32::MAX] {
        let review = session.new_review(year, "text", employee_id).unwrap();
        assert_eq!(review.borrow().year(), year);
    }
}

#[test]
fn year_assignment_is_validated_on_shared_instances() {
    let conn = open_db_in_memory().unwrap();
    let employee_id = seed_employee(&conn);
    let session = ReviewSession::new(&conn, SqliteEmployeeDirectory::new(&conn));
    let review = session.new_review(2010, "text", employee_id).unwrap();

    let err = review.borrow_mut().set_year(1999).unwrap_err();
    assert_eq!(err, ReviewValidationError::YearTooEarly(1999));
    assert_eq!(review.borrow().year(), 2010);

    review.borrow_mut().set_year(2000).unwrap();
    assert_eq!(review.borrow().year(), 2000);
}

#[test]
fn summary_must_not_be_empty() {
    let conn = open_db_in_memory().unwrap();
    let employee_id = seed_employee(&conn);
    let session = ReviewSession::new(&conn, SqliteEmployeeDirectory::new(&conn));

    let err = session.new_review(2020, "", employee_id).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ReviewValidationError::EmptySummary)
    ));

    let review = session.new_review(2020, "x", employee_id).unwrap();
    let err = review.borrow_mut().set_summary(String::new()).unwrap_err();
    assert_eq!(err, ReviewValidationError::EmptySummary);
    assert_eq!(review.borrow().summary(), "x");

    review.borrow_mut().set_summary("Exceeds expectations").unwrap();
    assert_eq!(review.borrow().summary(), "Exceeds expectations");
}

#[test]
fn unknown_employee_is_rejected_on_construction() {
    let conn = open_db_in_memory().unwrap();
    let employee_id = seed_employee(&conn);
    let session = ReviewSession::new(&conn, SqliteEmployeeDirectory::new(&conn));

    let err = session.new_review(2020, "text", employee_id + 1).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ReviewValidationError::UnknownEmployee(id)) if id == employee_id + 1
    ));
    assert!(err.to_string().contains("employee_id"));
}

#[test]
fn display_uses_record_layout() {
    let conn = open_db_in_memory().unwrap();
    let employee_id = seed_employee(&conn);
    let mut session = ReviewSession::new(&conn, SqliteEmployeeDirectory::new(&conn));
    session.create_table().unwrap();

    let review = session.new_review(2021, "Good work", employee_id).unwrap();
    assert_eq!(
        review.borrow().to_string(),
        format!("<Review None: 2021, Good work, Employee: {employee_id}>")
    );

    let id = session.save(&review).unwrap();
    assert_eq!(
        review.borrow().to_string(),
        format!("<Review {id}: 2021, Good work, Employee: {employee_id}>")
    );
}

#[test]
fn review_serializes_with_expected_fields() {
    let conn = open_db_in_memory().unwrap();
    let employee_id = seed_employee(&conn);
    let mut session = ReviewSession::new(&conn, SqliteEmployeeDirectory::new(&conn));
    session.create_table().unwrap();

    let review = session.create(2022, "Ships on time", employee_id).unwrap();
    let id = review.borrow().id().unwrap();

    let json = serde_json::to_value(&*review.borrow()).unwrap();
    assert_eq!(json["id"], id);
    assert_eq!(json["year"], 2022);
    assert_eq!(json["summary"], "Ships on time");
    assert_eq!(json["employee_id"], employee_id);
}

fn seed_employee(conn: &Connection) -> EmployeeId {
    let employees = SqliteEmployeeDirectory::new(conn);
    employees.create_table().unwrap();
    employees.create("Lee Park", "Manager").unwrap().id()
}
