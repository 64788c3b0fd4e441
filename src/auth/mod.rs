//! Auth Module
//!
//! Credentials, sessions and the login control.

pub mod email;
pub mod login;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;

/// Email and password for one sign-in attempt. Dropping it wipes the password.
#[derive(Debug)]
pub struct Credential {
    pub email: String,
    password: SecretString,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session handed back by a successful sign-in
#[derive(Debug)]
pub struct Session {
    pub access_token: SecretString,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

// Re-exports
pub use login::LoginControl;
