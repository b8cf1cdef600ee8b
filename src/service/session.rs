//! The handle the presentation layer talks to.
//!
//! `Desk` owns both stores and the admin policy. The caller's identity is a
//! [`SessionUser`] returned by [`Desk::login`] and passed back explicitly on
//! every call that needs it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::models::Employee;
use crate::db::sqlite::{CredentialStore, EmployeeRepository, SqlitePool};
use crate::error::DeskError;
use crate::service::password::PasswordHasher;
use crate::service::validation::{NewEmployee, validate_credentials};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub is_admin: bool,
}

/// Who may list and bulk-delete employee records.
///
/// An empty admin list keeps the flat model: every authenticated user is
/// treated as admin.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    admins: HashSet<String>,
}

impl AdminPolicy {
    pub fn new(admins: impl IntoIterator<Item = String>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.admins.is_empty()
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.is_flat() || self.admins.contains(username)
    }
}

#[derive(Clone)]
pub struct Desk {
    credentials: CredentialStore,
    employees: EmployeeRepository,
    policy: AdminPolicy,
}

impl Desk {
    /// Wrap `pool` in both stores and make sure their tables exist.
    pub async fn open(
        pool: SqlitePool,
        hasher: PasswordHasher,
        policy: AdminPolicy,
    ) -> Result<Self, DeskError> {
        let credentials = CredentialStore::new(pool.clone(), hasher);
        let employees = EmployeeRepository::new(pool);
        credentials.initialize().await?;
        employees.initialize().await?;

        Ok(Self {
            credentials,
            employees,
            policy,
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn employees(&self) -> &EmployeeRepository {
        &self.employees
    }

    /// Returns the username as stored, with surrounding whitespace removed.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, DeskError> {
        let username = validate_credentials(username, password)?;
        if self.credentials.register(username, password).await? {
            Ok(username.to_string())
        } else {
            Err(DeskError::DuplicateUser)
        }
    }

    /// Blank input and bad credentials fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionUser, DeskError> {
        let Ok(username) = validate_credentials(username, password) else {
            warn!(username, "login failed");
            return Err(DeskError::InvalidCredentials);
        };
        if !self.credentials.verify(username, password).await? {
            warn!(username, "login failed");
            return Err(DeskError::InvalidCredentials);
        }

        let session = SessionUser {
            username: username.to_string(),
            is_admin: self.policy.is_admin(username),
        };
        info!(username, is_admin = session.is_admin, "login succeeded");
        Ok(session)
    }

    pub async fn add_employee(
        &self,
        session: &SessionUser,
        name: &str,
        iban: &str,
        employee_number: &str,
    ) -> Result<Employee, DeskError> {
        let NewEmployee {
            name,
            iban,
            employee_number,
        } = NewEmployee::validate(name, iban, employee_number)?;

        let id = self.employees.insert(&name, &iban, &employee_number).await?;
        info!(by = %session.username, id, "employee added");

        Ok(Employee {
            id,
            name,
            iban,
            employee_number,
        })
    }

    pub async fn list_employees(&self, session: &SessionUser) -> Result<Vec<Employee>, DeskError> {
        self.require_admin(session)?;
        self.employees.list_all().await
    }

    pub async fn delete_all_employees(&self, session: &SessionUser) -> Result<u64, DeskError> {
        self.require_admin(session)?;
        let deleted = self.employees.delete_all().await?;
        warn!(by = %session.username, deleted, "all employee records deleted");
        Ok(deleted)
    }

    // Checked against the live policy, not the flag captured at login.
    fn require_admin(&self, session: &SessionUser) -> Result<(), DeskError> {
        if self.policy.is_admin(&session.username) {
            Ok(())
        } else {
            warn!(username = %session.username, "admin action refused");
            Err(DeskError::Forbidden)
        }
    }
}
