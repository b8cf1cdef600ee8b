//! SQL DDL for the credential and employee tables.

/// `users` keyed by `username`.
///
/// The hash column is named `password` so databases written by earlier
/// versions of the tool open unchanged. It only ever holds a digest or a
/// PHC string, never plaintext.
pub const USERS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT NOT NULL
)
"#;

/// `employees` with a monotonically increasing id.
///
/// AUTOINCREMENT keeps ids from being reused after a bulk delete.
pub const EMPLOYEES_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    iban TEXT NOT NULL,
    employee_number TEXT NOT NULL
)
"#;
