use crate::db::models::{DbUser, Employee, RecordId};
use crate::db::schema::{EMPLOYEES_INIT, USERS_INIT};
use crate::error::DeskError;
use crate::service::password::PasswordHasher;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

/// Open the database at `database_url`, creating the file if missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, DeskError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

/// Single-connection in-memory database. The connection is never recycled,
/// since closing it drops the data.
pub async fn memory_pool() -> Result<SqlitePool, DeskError> {
    let connect_opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    hasher: Arc<PasswordHasher>,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool, hasher: PasswordHasher) -> Self {
        Self {
            pool,
            hasher: Arc::new(hasher),
        }
    }

    /// Create the `users` table if it does not exist.
    pub async fn initialize(&self) -> Result<(), DeskError> {
        sqlx::query(USERS_INIT).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a new user. Returns `false` without touching the table when
    /// the username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<bool, DeskError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password) VALUES (?, ?)
            ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;
        if created {
            info!(username, "user registered");
        } else {
            debug!(username, "registration rejected: username exists");
        }
        Ok(created)
    }

    /// True only when the user exists and the password matches.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, DeskError> {
        let stored = self.find(username).await?.map(|user| user.password_hash);

        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&password, stored.as_deref()))
            .await?;
        Ok(ok)
    }

    pub async fn find(&self, username: &str) -> Result<Option<DbUser>, DeskError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT username, password AS password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn count(&self) -> Result<i64, DeskError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `employees` table if it does not exist.
    pub async fn initialize(&self) -> Result<(), DeskError> {
        sqlx::query(EMPLOYEES_INIT).execute(&self.pool).await?;
        Ok(())
    }

    /// Append one row. Field contents are stored as given.
    pub async fn insert(
        &self,
        name: &str,
        iban: &str,
        employee_number: &str,
    ) -> Result<RecordId, DeskError> {
        let result =
            sqlx::query("INSERT INTO employees (name, iban, employee_number) VALUES (?, ?, ?)")
                .bind(name)
                .bind(iban)
                .bind(employee_number)
                .execute(&self.pool)
                .await?;
        Ok(result.last_insert_rowid())
    }

    /// Every row in id order.
    pub async fn list_all(&self) -> Result<Vec<Employee>, DeskError> {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT id, name, iban, employee_number FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Remove every row. Returns how many were deleted.
    pub async fn delete_all(&self) -> Result<u64, DeskError> {
        let result = sqlx::query("DELETE FROM employees")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn count(&self) -> Result<i64, DeskError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::password::legacy_digest;

    async fn credential_store() -> CredentialStore {
        let pool = memory_pool().await.unwrap();
        let store = CredentialStore::new(pool, PasswordHasher::new(64, 1, 1).unwrap());
        store.initialize().await.unwrap();
        store
    }

    async fn employee_repo() -> EmployeeRepository {
        let repo = EmployeeRepository::new(memory_pool().await.unwrap());
        repo.initialize().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let store = credential_store().await;
        store.initialize().await.unwrap();
        let repo = employee_repo().await;
        repo.initialize().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_original_hash() {
        let store = credential_store().await;
        assert!(store.register("alice", "secret1").await.unwrap());
        let before = store.find("alice").await.unwrap().unwrap();

        assert!(!store.register("alice", "other").await.unwrap());
        let after = store.find("alice").await.unwrap().unwrap();

        assert_eq!(before, after);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.verify("alice", "secret1").await.unwrap());
        assert!(!store.verify("alice", "other").await.unwrap());
    }

    #[tokio::test]
    async fn verify_does_not_distinguish_unknown_user() {
        let store = credential_store().await;
        assert!(store.register("alice", "secret1").await.unwrap());
        assert!(store.verify("alice", "secret1").await.unwrap());
        assert!(!store.verify("alice", "wrong").await.unwrap());
        assert!(!store.verify("bob", "secret1").await.unwrap());
    }

    #[tokio::test]
    async fn stored_hash_is_not_plaintext() {
        let store = credential_store().await;
        store.register("alice", "secret1").await.unwrap();
        let user = store.find("alice").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert_ne!(user.password_hash, legacy_digest("secret1"));
    }

    #[tokio::test]
    async fn legacy_rows_verify() {
        let store = credential_store().await;
        sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind("carol")
            .bind(legacy_digest("hunter2"))
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.verify("carol", "hunter2").await.unwrap());
        assert!(!store.verify("carol", "hunter3").await.unwrap());
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_in_order() {
        let repo = employee_repo().await;
        let mut ids = Vec::new();
        for i in 0..5 {
            let id = repo
                .insert(&format!("emp{i}"), &format!("IBAN{i}"), &format!("E{i}"))
                .await
                .unwrap();
            ids.push(id);
        }

        let rows = repo.list_all().await.unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(rows[3].name, "emp3");
        assert_eq!(rows[3].iban, "IBAN3");
        assert_eq!(rows[3].employee_number, "E3");
    }

    #[tokio::test]
    async fn duplicates_and_empty_strings_are_stored() {
        let repo = employee_repo().await;
        let a = repo.insert("Bob", "IBAN001", "E100").await.unwrap();
        let b = repo.insert("Bob", "IBAN001", "E100").await.unwrap();
        let c = repo.insert("", "", "").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
        assert!(c > b);
    }

    #[tokio::test]
    async fn delete_all_empties_table_and_ids_are_not_reused() {
        let repo = employee_repo().await;
        repo.insert("Bob", "IBAN001", "E100").await.unwrap();
        let last = repo.insert("Carol", "IBAN002", "E101").await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.list_all().await.unwrap().is_empty());
        assert_eq!(repo.delete_all().await.unwrap(), 0);

        let next = repo.insert("Dan", "IBAN003", "E102").await.unwrap();
        assert!(next > last);
    }
}
