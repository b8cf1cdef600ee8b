//! Password hashing for the credential store.
//!
//! New hashes are Argon2id PHC strings with a per-user random salt. Rows
//! written by the first version of the tool hold a bare, unsalted SHA-256
//! hex digest; those still verify but are never produced again.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::DeskError;

const LEGACY_DIGEST_LEN: usize = 64;
const DUMMY_PASSWORD: &str = "staffdesk-unknown-user";

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
    /// Verified against when the username is unknown, so a miss costs about
    /// as much as a wrong password.
    dummy_hash: String,
}

impl PasswordHasher {
    /// Build an Argon2id hasher. `memory_kib` is the memory cost in KiB.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, DeskError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)?;
        let mut hasher = Self {
            params,
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, DeskError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Check `password` against a stored hash. `None` means the user does not
    /// exist; the answer is then always `false`.
    pub fn verify(&self, password: &str, stored: Option<&str>) -> bool {
        match stored {
            None => {
                let _ = self.verify_phc(password, &self.dummy_hash);
                false
            }
            Some(stored) if is_legacy_digest(stored) => verify_legacy(password, stored),
            Some(stored) => self.verify_phc(password, stored),
        }
    }

    fn verify_phc(&self, password: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "stored password hash is not a valid PHC string");
                return false;
            }
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hex SHA-256 digest as produced by the first version of the tool.
pub fn legacy_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == LEGACY_DIGEST_LEN && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

fn verify_legacy(password: &str, stored: &str) -> bool {
    let computed = legacy_digest(password);
    let stored = stored.to_ascii_lowercase();
    bool::from(stored.as_bytes().ct_eq(computed.as_bytes()))
}
