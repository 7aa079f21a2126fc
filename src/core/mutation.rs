//! Create / update / delete / restore for single trip records.

use crate::errors::{AppError, AppResult};
use crate::store::{NewTrip, TripPatch, TripStore};
use crate::utils::time::parse_report_time;
use std::sync::Arc;

/// Client payload for a new trip. Only the first three fields are required.
#[derive(Debug, Clone, Default)]
pub struct AddTrip {
    pub report_time: String,
    pub equipment_no: String,
    pub operator_id: String,
    pub opr_shift: String,
    pub loader_id: String,
    pub pos_name: String,
    pub distance: String,
}

/// Client payload for a field edit. Empty optional fields mean "no change".
#[derive(Debug, Clone, Default)]
pub struct UpdateTrip {
    pub id: String,
    pub report_time: String,
    pub loader_id: String,
    pub pos_name: String,
    pub distance: String,
}

pub struct TripMutationService {
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

impl TripMutationService {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Insert a trip and recover its generated id.
    ///
    /// The insert call returns nothing, so the id comes from a follow-up
    /// lookup by `(report_time, equipment_no, operator_id)` taking the
    /// newest match. Under concurrent inserts with an identical key the
    /// lookup can pick a sibling row; known limitation, kept as-is.
    pub fn add_trip(&self, req: &AddTrip) -> AppResult<Option<String>> {
        if req.report_time.trim().is_empty()
            || req.equipment_no.trim().is_empty()
            || req.operator_id.trim().is_empty()
        {
            return Err(AppError::Validation("Missing required fields".to_string()));
        }

        let report_time = parse_report_time(&req.report_time)?;
        let trip = NewTrip {
            report_time,
            equipment_no: req.equipment_no.trim().to_string(),
            operator_id: req.operator_id.trim().to_string(),
            opr_shift: none_if_empty(&req.opr_shift),
            loader_id: none_if_empty(&req.loader_id),
            pos_name: none_if_empty(&req.pos_name),
            distance: none_if_empty(&req.distance),
        };

        self.store.insert_trip(&trip)?;
        let id = self
            .store
            .find_trip_id(&report_time, &trip.equipment_no, &trip.operator_id)?;
        Ok(id)
    }

    /// Soft-delete. Idempotent from the caller's perspective: deleting an
    /// already-deleted record reports success.
    pub fn delete_trip(&self, id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Err(AppError::Validation("Missing trip ID".to_string()));
        }
        self.store.delete_trip(id.trim())
    }

    pub fn restore_trip(&self, id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Err(AppError::Validation("Missing trip ID".to_string()));
        }
        self.store.restore_trip(id.trim())
    }

    pub fn update_trip(&self, req: &UpdateTrip) -> AppResult<()> {
        if req.id.trim().is_empty() {
            return Err(AppError::Validation("Missing trip ID".to_string()));
        }

        let report_time = match none_if_empty(&req.report_time) {
            Some(raw) => Some(parse_report_time(&raw)?),
            None => None,
        };

        let patch = TripPatch {
            id: req.id.trim().to_string(),
            report_time,
            loader_id: none_if_empty(&req.loader_id),
            pos_name: none_if_empty(&req.pos_name),
            distance: none_if_empty(&req.distance),
        };
        self.store.modify_trip(&patch)
    }
}
