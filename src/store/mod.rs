//! Store capability. Every persistence call the core makes goes through the
//! `TripStore` trait so the services can run against SQLite in production
//! and the in-memory fake in tests.

pub mod fake;
pub mod sqlite;

use crate::errors::AppResult;
use crate::models::correction::{HmCorrection, ShiftReassignment};
use crate::models::shift::ShiftCode;
use chrono::NaiveDateTime;
use serde_json::Value;

/// Raw result row from the trip lookup procedures, in column-position order:
/// `[id, reporttime, mobileid, opr_nrp, opr_username, opr_shift,
///   act_loaderid, pos_name, act_hauldistance, is_deleted, record_type]`.
/// Store variants differ in width, so trailing columns may be absent.
pub type TripRow = Vec<Option<String>>;

/// Insert parameters for a new trip. The insert call returns no generated
/// id; callers recover it with `find_trip_id` afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub report_time: NaiveDateTime,
    pub equipment_no: String,
    pub operator_id: String,
    pub opr_shift: Option<String>,
    pub loader_id: Option<String>,
    pub pos_name: Option<String>,
    pub distance: Option<String>,
}

/// Field changes for one record. `None` means "no change", never an
/// empty-string overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPatch {
    pub id: String,
    pub report_time: Option<NaiveDateTime>,
    pub loader_id: Option<String>,
    pub pos_name: Option<String>,
    pub distance: Option<String>,
}

/// The realtime HM validation working set: column names plus one JSON
/// object per login/logout pairing, served to the client as-is.
#[derive(Debug, Clone, Default)]
pub struct HmValidationSet {
    pub columns: Vec<String>,
    pub rows: Vec<Value>,
}

pub trait TripStore: Send + Sync {
    /// One retrieval per shift code; the operator variant is used when an
    /// operator id is given.
    fn trips_by_unit(
        &self,
        date: &str,
        shift: ShiftCode,
        equipment: &str,
        operator: Option<&str>,
    ) -> AppResult<Vec<TripRow>>;

    fn insert_trip(&self, trip: &NewTrip) -> AppResult<()>;

    /// Recover the id of the newest row matching the insert key. Heuristic:
    /// under concurrent inserts with an identical key this can return a
    /// different row than the one just inserted.
    fn find_trip_id(
        &self,
        report_time: &NaiveDateTime,
        equipment: &str,
        operator: &str,
    ) -> AppResult<Option<String>>;

    fn delete_trip(&self, id: &str) -> AppResult<()>;
    fn restore_trip(&self, id: &str) -> AppResult<()>;
    fn modify_trip(&self, patch: &TripPatch) -> AppResult<()>;

    /// Reassign the shift across an adjacent record pair in one call.
    fn update_shift(&self, change: &ShiftReassignment) -> AppResult<()>;

    /// Append one audit-logged hour-meter correction.
    fn insert_login_update(&self, correction: &HmCorrection) -> AppResult<()>;

    /// Realtime HM validation rows for the reconciliation screen.
    fn hm_validation_rows(&self) -> AppResult<HmValidationSet>;

    /// Login/logout history for one equipment number.
    fn historical_logins(&self, equipment: &str) -> AppResult<Vec<Value>>;
}
