//! Login Sessions
//!
//! Sessions live in memory and are referenced by a signed cookie of the form
//! `<session id>.<hex hmac-sha256 of the id>`. A cookie whose signature does
//! not verify is treated as absent. Sessions expire after a fixed lifetime;
//! expired entries are dropped whenever a new session is created.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "bank_session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid session secret")]
    InvalidSecret,

    #[error("session lifetime out of range")]
    InvalidLifetime,

    #[error("session store lock poisoned")]
    Poisoned,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>, lifetime: TimeDelta) -> bool {
        now - self.created_at >= lifetime
    }
}

/// In-memory session table with cookie signing
pub struct SessionStore {
    mac: HmacSha256,
    lifetime: TimeDelta,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, SessionError> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| SessionError::InvalidSecret)?;
        let lifetime = TimeDelta::from_std(lifetime).map_err(|_| SessionError::InvalidLifetime)?;
        Ok(Self {
            mac,
            lifetime,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    fn sign(&self, id: &Uuid) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a cookie value and return the session id it names
    fn verify(&self, value: &str) -> Option<Uuid> {
        let (id, signature) = value.split_once('.')?;
        let id = Uuid::parse_str(id).ok()?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(id)
    }

    /// Start a session and return the signed cookie value
    pub fn create(&self, username: &str) -> Result<String, SessionError> {
        self.create_at(username, Utc::now())
    }

    fn create_at(&self, username: &str, now: DateTime<Utc>) -> Result<String, SessionError> {
        let id = Uuid::new_v4();
        let session = Session {
            username: username.to_string(),
            created_at: now,
        };

        let mut sessions = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        sessions.retain(|_, s| !s.is_expired(now, self.lifetime));
        sessions.insert(id, session);

        Ok(format!("{}.{}", id, self.sign(&id)))
    }

    /// Resolve a cookie value to its live session
    pub fn get(&self, value: &str) -> Option<Session> {
        self.get_at(value, Utc::now())
    }

    fn get_at(&self, value: &str, now: DateTime<Utc>) -> Option<Session> {
        let id = self.verify(value)?;
        self.sessions
            .read()
            .ok()?
            .get(&id)
            .filter(|s| !s.is_expired(now, self.lifetime))
            .cloned()
    }

    /// End the session named by a cookie value; returns whether one existed
    pub fn remove(&self, value: &str) -> bool {
        let Some(id) = self.verify(value) else {
            return false;
        };
        self.sessions
            .write()
            .is_ok_and(|mut sessions| sessions.remove(&id).is_some())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `Set-Cookie` value that installs a session
pub fn session_cookie(value: &str) -> String {
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that clears the session cookie
pub fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extract the session cookie from a `Cookie` header value
pub fn cookie_value(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
