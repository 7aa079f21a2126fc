//! Shift domains.
//!
//! Retrieval uses the site shift codes (`S01`..`S09`); shift reassignment
//! uses the numeric roster values. The two sets are distinct enumerations
//! and must never be mixed.

use serde::Serialize;

/// Shift codes accepted by the trip retrieval procedures.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ShiftCode {
    S01,
    S02,
    S03,
    S08,
    S09,
}

impl ShiftCode {
    /// Convert a user-supplied code → enum. Leading/trailing whitespace and
    /// case are normalized; anything outside the closed set is None.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "S01" => Some(ShiftCode::S01),
            "S02" => Some(ShiftCode::S02),
            "S03" => Some(ShiftCode::S03),
            "S08" => Some(ShiftCode::S08),
            "S09" => Some(ShiftCode::S09),
            _ => None,
        }
    }

    /// Convert enum → retrieval parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCode::S01 => "S01",
            ShiftCode::S02 => "S02",
            ShiftCode::S03 => "S03",
            ShiftCode::S08 => "S08",
            ShiftCode::S09 => "S09",
        }
    }
}

/// Roster values accepted by shift reassignment.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ShiftValue {
    One,
    Two,
    Three,
    Six,
    Seven,
}

impl ShiftValue {
    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(ShiftValue::One),
            "2" => Some(ShiftValue::Two),
            "3" => Some(ShiftValue::Three),
            "6" => Some(ShiftValue::Six),
            "7" => Some(ShiftValue::Seven),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftValue::One => "1",
            ShiftValue::Two => "2",
            ShiftValue::Three => "3",
            ShiftValue::Six => "6",
            ShiftValue::Seven => "7",
        }
    }
}
