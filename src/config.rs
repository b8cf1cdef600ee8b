use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::service::password::PasswordHasher;
use crate::service::session::AdminPolicy;

pub const ENV_PREFIX: &str = "STAFFDESK_";

/// Runtime configuration. Defaults, then `STAFFDESK_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Usernames allowed on the admin page. Empty means everyone.
    pub admin_users: Vec<String>,
    /// Private cookie key, at least 64 bytes. A random key is used when unset.
    pub cookie_key: Option<String>,
    pub insecure_cookie: bool,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:employees.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            admin_users: Vec::new(),
            cookie_key: None,
            insecure_cookie: false,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
            hash_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, DeskError> {
        Ok(Self::figment().extract()?)
    }

    pub fn cookie_key(&self) -> Result<Key, DeskError> {
        match self.cookie_key.as_deref() {
            Some(secret) => {
                Key::try_from(secret.as_bytes()).map_err(|e| DeskError::CookieKey(e.to_string()))
            }
            None => Ok(Key::generate()),
        }
    }

    pub fn password_hasher(&self) -> Result<PasswordHasher, DeskError> {
        PasswordHasher::new(
            self.hash_memory_kib,
            self.hash_iterations,
            self.hash_parallelism,
        )
    }

    pub fn admin_policy(&self) -> AdminPolicy {
        AdminPolicy::new(self.admin_users.iter().cloned())
    }
}
