//! HTTP Basic login for the dashboard.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::collections::HashMap;
use tracing::{debug, error, warn};

pub use bcrypt::BcryptError;

/// Hash a password into the bcrypt form stored under `AUTH__USERS__<NAME>`.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Configured dashboard users and their bcrypt hashes.
#[derive(Debug, Clone, Default)]
pub struct DashboardAuth {
    users: HashMap<String, String>,
}

impl DashboardAuth {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// Add or replace one user.
    pub fn with_user(mut self, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        self.users.insert(username.into(), password_hash.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check a username/password pair.
    ///
    /// Errors only when the stored hash for the user is malformed.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, BcryptError> {
        let Some(stored) = self.users.get(username) else {
            warn!(username = %username, "Login failed: unknown user");
            return Ok(false);
        };

        let valid = bcrypt::verify(password, stored).map_err(|e| {
            error!(username = %username, error = %e, "Stored password hash is invalid");
            e
        })?;

        if valid {
            debug!(username = %username, "Login succeeded");
        } else {
            warn!(username = %username, "Login failed: invalid password");
        }
        Ok(valid)
    }

    /// Check the value of an `Authorization` header.
    pub fn verify_header(&self, header: &str) -> Result<bool, BcryptError> {
        match parse_basic(header) {
            Some((username, password)) => self.verify(&username, &password),
            None => {
                debug!("Malformed Authorization header");
                Ok(false)
            }
        }
    }
}

/// Split a `Basic <base64(user:pass)>` header into its parts.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}
