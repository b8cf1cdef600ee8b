//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for the `users` and `employees` tables
//! - `sqlite.rs`: the credential store and employee repository

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbUser, Employee, RecordId};
pub use sqlite::{CredentialStore, EmployeeRepository, SqlitePool, connect, memory_pool};
