use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Auto-assigned identifier of an employee row.
pub type RecordId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Employee {
    pub id: RecordId,
    pub name: String,
    pub iban: String,
    pub employee_number: String,
}

/// A row of the `users` table. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DbUser {
    pub username: String,
    pub password_hash: String,
}
