//! Wizard selection state, one slot per step, stored server-side per user.

use crate::models::trip::TripRecord;
use serde::{Deserialize, Serialize};

/// Step 1: date, shift codes and unit type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Step1Data {
    pub selected_date: String,
    pub selected_shifts: Vec<String>,
    pub unit_type: String,
}

impl Default for Step1Data {
    fn default() -> Self {
        Self {
            selected_date: String::new(),
            selected_shifts: Vec::new(),
            unit_type: "3 Shift".to_string(),
        }
    }
}

/// Step 2: equipment/operator selection plus the trip working buffer.
///
/// `history` is never persisted across requests; it is forced empty on save
/// and rebuilt client-side.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Step2Data {
    pub equipment_number: String,
    pub operator_id: String,
    pub trips: Vec<TripRecord>,
    pub history: Vec<serde_json::Value>,
}
