//! Hour-meter correction protocol types.

use crate::models::shift::ShiftValue;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Which record in the chronological chain a correction targets. The audit
/// RPC is the same for all four; only the remark tag differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionKind {
    /// Correct the hour meter on the record itself.
    HmUpdate,
    /// Mark the record's current hour meter as verified.
    Valid,
    /// Correct the hour meter on the next record in time.
    NextHmUpdate,
    /// Correct the hour meter on the previous record in time.
    PrevHmUpdate,
}

impl CorrectionKind {
    pub fn remark(&self) -> &'static str {
        match self {
            CorrectionKind::HmUpdate => "hm_update",
            CorrectionKind::Valid => "valid",
            CorrectionKind::NextHmUpdate => "next_hm_update",
            CorrectionKind::PrevHmUpdate => "prev_hm_update",
        }
    }
}

/// Audit entry handed to the store. Append-only; the store never mutates it.
///
/// Operator and shift are carried through unchanged on both sides; the four
/// HM operations only ever change the hour-meter value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HmCorrection {
    pub target_id: String,
    pub before_nrp: String,
    pub after_nrp: String,
    pub before_hm: Option<f64>,
    pub after_hm: f64,
    pub before_shift: Option<String>,
    pub after_shift: Option<String>,
    pub remark: String,
    pub actor: String,
}

/// Shift reassignment across an adjacent record pair, submitted as one
/// atomic store call so a boundary spanning two records stays consistent.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShiftReassignment {
    pub id: String,
    pub next_id: Option<String>,
    pub report_time: Option<NaiveDateTime>,
    pub next_report_time: Option<NaiveDateTime>,
    pub equipment_no: Option<String>,
    pub operator_id: Option<String>,
    pub hm: Option<f64>,
    pub next_hm: Option<f64>,
    pub opr_shift: Option<String>,
    pub new_shift: ShiftValue,
}
