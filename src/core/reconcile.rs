//! Hour-meter and shift reconciliation.
//!
//! The four HM operations funnel into one audit call with a different
//! remark tag; which record of the chronological chain is being corrected
//! (current, next-in-time, previous-in-time) is decided by the caller, who
//! supplies the matching record id and current value. Shift reassignment
//! goes through its own store call and moves an adjacent pair atomically.

use crate::errors::{AppError, AppResult};
use crate::models::correction::{CorrectionKind, HmCorrection, ShiftReassignment};
use crate::models::shift::ShiftValue;
use crate::store::{HmValidationSet, TripStore};
use crate::utils::time::parse_report_time_lenient;
use std::sync::Arc;

/// One HM correction as the client sends it: the target record, its
/// operator, the value on record and the proposed value (raw, unparsed).
#[derive(Debug, Clone, Default)]
pub struct HmCorrectionInput {
    pub target_id: String,
    pub operator_id: String,
    pub current_hm: Option<f64>,
    pub new_hm: String,
    pub opr_shift: String,
}

/// Shift reassignment input. Timestamps arrive as ISO strings and parse
/// leniently: an unparsable value degrades to absent instead of failing
/// the operation.
#[derive(Debug, Clone, Default)]
pub struct ShiftChangeInput {
    pub id: String,
    pub next_id: String,
    pub report_time: String,
    pub next_report_time: String,
    pub equipment_no: String,
    pub operator_id: String,
    pub hm: Option<f64>,
    pub next_hm: Option<f64>,
    pub opr_shift: String,
    pub new_shift: String,
}

pub struct HmReconciliationEngine {
    store: Arc<dyn TripStore>,
}

fn none_if_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl HmReconciliationEngine {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Validate and append one audit-logged HM correction.
    ///
    /// Operator and shift ride along unchanged on both sides of the audit
    /// entry; only the hour meter moves.
    pub fn apply_correction(
        &self,
        kind: CorrectionKind,
        input: &HmCorrectionInput,
        actor: &str,
    ) -> AppResult<()> {
        if input.target_id.trim().is_empty() || input.operator_id.trim().is_empty() {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }
        let after_hm: f64 = input
            .new_hm
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("Invalid HM value: {}", input.new_hm)))?;

        let operator = input.operator_id.trim().to_string();
        let shift = none_if_empty(&input.opr_shift);
        let correction = HmCorrection {
            target_id: input.target_id.trim().to_string(),
            before_nrp: operator.clone(),
            after_nrp: operator,
            before_hm: input.current_hm,
            after_hm,
            before_shift: shift.clone(),
            after_shift: shift,
            remark: kind.remark().to_string(),
            actor: actor.to_string(),
        };
        self.store.insert_login_update(&correction)
    }

    /// Realtime HM validation working set, served to the client as-is.
    pub fn validation_rows(&self) -> AppResult<HmValidationSet> {
        self.store.hm_validation_rows()
    }

    /// Login/logout history for one equipment number.
    pub fn historical_logins(&self, equipment: &str) -> AppResult<Vec<serde_json::Value>> {
        let equipment = equipment.trim();
        if equipment.is_empty() {
            return Err(AppError::Validation(
                "Missing equipment number".to_string(),
            ));
        }
        self.store.historical_logins(equipment)
    }

    /// Reassign the shift across a login/logout record pair.
    pub fn update_shift(&self, input: &ShiftChangeInput) -> AppResult<()> {
        if input.id.trim().is_empty() {
            return Err(AppError::Validation("Missing record ID".to_string()));
        }
        let new_shift = ShiftValue::from_code(&input.new_shift)
            .ok_or_else(|| AppError::InvalidShift(input.new_shift.clone()))?;

        let change = ShiftReassignment {
            id: input.id.trim().to_string(),
            next_id: none_if_empty(&input.next_id),
            report_time: parse_report_time_lenient(&input.report_time),
            next_report_time: parse_report_time_lenient(&input.next_report_time),
            equipment_no: none_if_empty(&input.equipment_no),
            operator_id: none_if_empty(&input.operator_id),
            hm: input.hm,
            next_hm: input.next_hm,
            opr_shift: none_if_empty(&input.opr_shift),
            new_shift,
        };
        self.store.update_shift(&change)
    }
}
