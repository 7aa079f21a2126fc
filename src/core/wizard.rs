//! Two-step wizard state over the session capability.

use crate::models::wizard::{Step1Data, Step2Data};
use crate::session::{SessionStore, UserId};
use std::sync::Arc;

pub const STEP1_KEY: &str = "timesheet_step1";
pub const STEP2_KEY: &str = "timesheet_step2";

pub struct WizardService {
    sessions: Arc<dyn SessionStore>,
}

impl WizardService {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    pub fn save_step1(&self, user: UserId, data: Step1Data) {
        let value = serde_json::to_value(&data).unwrap_or_default();
        self.sessions.set(user, STEP1_KEY, value);
    }

    /// None when the slot was never written (or was cleared).
    pub fn load_step1(&self, user: UserId) -> Option<Step1Data> {
        self.sessions
            .get(user, STEP1_KEY)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn save_step2(&self, user: UserId, mut data: Step2Data) {
        // history is recomputed client-side, never persisted
        data.history.clear();
        let value = serde_json::to_value(&data).unwrap_or_default();
        self.sessions.set(user, STEP2_KEY, value);
    }

    pub fn load_step2(&self, user: UserId) -> Option<Step2Data> {
        self.sessions
            .get(user, STEP2_KEY)
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Drop both steps; subsequent reads return the empty default.
    pub fn clear(&self, user: UserId) {
        self.sessions.clear(user, STEP1_KEY);
        self.sessions.clear(user, STEP2_KEY);
    }
}
