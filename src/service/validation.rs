//! Input preconditions shared by the session layer and the HTTP handlers.
//!
//! The repositories store whatever they are given; these checks run before
//! any call that writes.

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// An employee form that passed validation. Fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub iban: String,
    pub employee_number: String,
}

impl NewEmployee {
    /// Every field is required. Format of IBAN and employee number is not checked.
    pub fn validate(
        name: &str,
        iban: &str,
        employee_number: &str,
    ) -> Result<Self, ValidationError> {
        let fields = [
            ("name", name.trim()),
            ("iban", iban.trim()),
            ("employee_number", employee_number.trim()),
        ];
        missing(&fields)?;

        Ok(Self {
            name: fields[0].1.to_string(),
            iban: fields[1].1.to_string(),
            employee_number: fields[2].1.to_string(),
        })
    }
}

/// Username must not be blank and password must not be empty.
/// Returns the trimmed username; the password is taken as given.
pub fn validate_credentials<'a>(
    username: &'a str,
    password: &str,
) -> Result<&'a str, ValidationError> {
    let username = username.trim();
    missing(&[("username", username), ("password", password)])?;
    Ok(username)
}

fn missing(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
    let empty: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| *field)
        .collect();
    if empty.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_populated_form_and_trims() {
        let emp = NewEmployee::validate(" Bob ", "IBAN001", "E100\n").unwrap();
        assert_eq!(emp.name, "Bob");
        assert_eq!(emp.iban, "IBAN001");
        assert_eq!(emp.employee_number, "E100");
    }

    #[test]
    fn reports_every_missing_field() {
        let err = NewEmployee::validate("", "  ", "E100").unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec!["name", "iban"]));
        assert_eq!(err.to_string(), "missing required fields: name, iban");
    }

    #[test]
    fn format_is_not_checked() {
        assert!(NewEmployee::validate("x", "not-an-iban", "???").is_ok());
    }

    #[test]
    fn credentials_require_both_parts() {
        assert_eq!(validate_credentials("alice", "secret1"), Ok("alice"));
        assert_eq!(validate_credentials(" alice\t", "secret1"), Ok("alice"));
        assert_eq!(
            validate_credentials(" ", ""),
            Err(ValidationError::MissingFields(vec!["username", "password"]))
        );
        // whitespace is a legal password
        assert!(validate_credentials("alice", " ").is_ok());
    }
}
