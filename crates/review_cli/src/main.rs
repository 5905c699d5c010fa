//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `review_core` linkage.
//! - Seed one employee and one review, then print every stored review.
//!
//! Usage: `review_cli [db-path] [log-dir]`. The database is in-memory when
//! `db-path` is omitted or `-`; file logging starts only when `log-dir` is
//! given (absolute path, default level for the build mode).

use review_core::db::{open_db, open_db_in_memory};
use review_core::{init_logging, LoggingConfig, ReviewSession, SqliteEmployeeDirectory};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    db_path: Option<PathBuf>,
    logging: Option<LoggingConfig>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("review_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(std::env::args().skip(1))?;
    if let Some(config) = &args.logging {
        init_logging(config)?;
        println!(
            "logging level={} dir={}",
            config.level(),
            config.log_dir().display()
        );
    }
    println!("review_core version={}", review_core::core_version());

    let conn = match &args.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let employees = SqliteEmployeeDirectory::new(&conn);
    employees.create_table()?;
    let employee = employees.create("Smoke Tester", "Tester")?;

    let mut session = ReviewSession::new(&conn, &employees);
    session.create_table()?;
    session.create(2024, "Smoke review", employee.id())?;

    for review in session.get_all()? {
        println!("{}", review.borrow());
    }
    Ok(())
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<CliArgs, Box<dyn std::error::Error>> {
    let db_path = args
        .next()
        .filter(|path| path != "-")
        .map(PathBuf::from);
    let logging = args
        .next()
        .map(LoggingConfig::with_default_level)
        .transpose()?;

    if let Some(extra) = args.next() {
        return Err(format!("unexpected argument `{extra}`").into());
    }

    Ok(CliArgs { db_path, logging })
}
