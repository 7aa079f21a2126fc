//! Authentication capability and server-side session tokens.

pub mod sqlite;

use crate::errors::AppResult;
use crate::models::user::User;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

pub trait AuthProvider: Send + Sync {
    /// Verify credentials. The failure reason never distinguishes an
    /// unknown username from a wrong password.
    fn login(&self, username: &str, password: &str) -> AppResult<User>;

    fn register(&self, username: &str, password: &str, fullname: &str) -> AppResult<()>;
}

/// Opaque token → user map, server-side only. Tokens are random v4 UUIDs
/// and live until logout or process exit.
#[derive(Default)]
pub struct TokenRegistry {
    active: Mutex<HashMap<String, User>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, user: User) -> String {
        let token = Uuid::new_v4().to_string();
        self.active.lock().unwrap().insert(token.clone(), user);
        token
    }

    pub fn resolve(&self, token: &str) -> Option<User> {
        self.active.lock().unwrap().get(token).cloned()
    }

    pub fn revoke(&self, token: &str) -> Option<User> {
        self.active.lock().unwrap().remove(token)
    }
}
