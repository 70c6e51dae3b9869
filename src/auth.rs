//! Session management for the web API.
//!
//! A single-profile, mock credential check: the profile's password is stored
//! as a bcrypt hash and a successful login issues a random session token valid
//! for 24 hours. The manager is passed explicitly to whatever needs it; there
//! is no ambient global auth state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Session lifetime in hours.
const SESSION_TTL_HOURS: i64 = 24;

/// The single profile's login credentials.
pub struct Credentials {
    username: String,
    password_hash: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> AppResult<Self> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Custom(format!("Password hashing failed: {e}")))?;
        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Issues, verifies and revokes session tokens.
pub struct SessionManager {
    credentials: Credentials,
    sessions: HashMap<String, Session>,
}

impl SessionManager {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            sessions: HashMap::new(),
        }
    }

    /// Checks the credentials and opens a new session.
    pub fn login(&mut self, username: &str, password: &str) -> AppResult<Session> {
        if !self.credentials.verify(username, password) {
            return Err(AppError::Validation("invalid username or password".to_string()));
        }
        let session = Session {
            token: generate_token(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.sessions.insert(session.token.clone(), session.clone());
        log::info!("Session opened for {}", username);
        Ok(session)
    }

    /// Returns the session for a token, unless missing or expired.
    pub fn verify(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?;
        let age = Utc::now().signed_duration_since(session.created_at);
        if age.num_hours() >= SESSION_TTL_HOURS {
            return None;
        }
        Some(session.clone())
    }

    pub fn logout(&mut self, token: &str) {
        if self.sessions.remove(token).is_some() {
            log::info!("Session closed");
        }
    }
}

fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| {
            let idx = rng.gen_range(0..36);
            if idx < 10 {
                (b'0' + idx) as char
            } else {
                (b'a' + idx - 10) as char
            }
        })
        .collect()
}
