//! Server-side session slots.
//!
//! The core only depends on this narrow capability: get/set/clear one JSON
//! value per (user, slot). The in-memory implementation is enough for a
//! single-process deployment; slots live exactly as long as the process.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

pub type UserId = i64;

pub trait SessionStore: Send + Sync {
    fn get(&self, user: UserId, key: &str) -> Option<Value>;
    fn set(&self, user: UserId, key: &str, value: Value);
    fn clear(&self, user: UserId, key: &str);
}

#[derive(Default)]
pub struct MemorySessionStore {
    slots: Mutex<HashMap<(UserId, String), Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, user: UserId, key: &str) -> Option<Value> {
        self.slots
            .lock()
            .unwrap()
            .get(&(user, key.to_string()))
            .cloned()
    }

    fn set(&self, user: UserId, key: &str, value: Value) {
        self.slots
            .lock()
            .unwrap()
            .insert((user, key.to_string()), value);
    }

    fn clear(&self, user: UserId, key: &str) {
        self.slots.lock().unwrap().remove(&(user, key.to_string()));
    }
}
