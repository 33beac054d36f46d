//! Test utilities for building throwaway directory databases.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// A directory database file living in a temporary directory.
pub struct TestDatabase {
    /// Keeps the directory alive for the duration of the test
    _dir: TempDir,
    /// Path of the SQLite file
    pub path: PathBuf,
}

impl TestDatabase {
    /// Creates an empty database file and runs `setup_sql` against it.
    pub fn new(setup_sql: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("data.db");
        let mut conn = SqliteConnection::establish(&path.to_string_lossy())
            .expect("Failed to create test database");
        conn.batch_execute(setup_sql)
            .expect("Failed to run setup SQL");
        Self { _dir: dir, path }
    }

    /// Runs more SQL against the file with a writable connection.
    pub fn execute(&self, sql: &str) {
        let mut conn = SqliteConnection::establish(&self.path.to_string_lossy())
            .expect("Failed to open test database");
        conn.batch_execute(sql).expect("Failed to run SQL");
    }
}

/// A normalized-schema table with `rows` generated businesses.
///
/// Names repeat every 7 rows so ordering has to rely on the tiebreaker.
pub fn normalized_directory(rows: usize) -> TestDatabase {
    let db = TestDatabase::new(
        "CREATE TABLE records_norm (
            name TEXT,
            name_std TEXT,
            phone TEXT,
            full_address TEXT,
            city TEXT,
            state_std TEXT,
            postal_code_std TEXT,
            country TEXT,
            location_link TEXT,
            site TEXT,
            lat REAL,
            lng REAL
        );",
    );

    let mut sql = String::from("BEGIN;");
    for i in 0..rows {
        let city = ["Oakland", "Reno", "Austin"][i % 3];
        let state = ["CA", "NV", "TX"][i % 3];
        sql.push_str(&format!(
            "INSERT INTO records_norm VALUES \
             ('raw {n}', 'Business {n:02}', '555-{i:04}', '{i} Main St', '{city}', '{state}', \
             '9{zip:04}', 'US', 'https://maps.test/{i}', 'https://biz{i}.test', 0.0, 0.0);",
            n = i % 7,
            i = i,
            city = city,
            state = state,
            zip = i,
        ));
    }
    sql.push_str("COMMIT;");
    db.execute(&sql);
    db
}
