//! Canonical representation of one telemetry trip row.

use crate::utils::time::parse_report_time_lenient;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One trip record as served to the client and held in the wizard buffer.
///
/// `report_time` is a naive timestamp with second precision and is carried
/// through round-trips exactly, never reinterpreted in a timezone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: Option<String>,
    pub report_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub equipment_no: String,
    #[serde(default)]
    pub operator_id: String,
    #[serde(default)]
    pub operator_name: String,
    #[serde(default)]
    pub opr_shift: String,
    #[serde(default)]
    pub loader_id: String,
    #[serde(default)]
    pub pos_name: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub note: String,
    #[serde(default = "default_record_type")]
    pub record_type: String,
}

fn default_record_type() -> String {
    "trip".to_string()
}

impl Default for TripRecord {
    fn default() -> Self {
        Self {
            id: None,
            report_time: None,
            equipment_no: String::new(),
            operator_id: String::new(),
            operator_name: String::new(),
            opr_shift: String::new(),
            loader_id: String::new(),
            pos_name: String::new(),
            distance: String::new(),
            note: String::new(),
            record_type: default_record_type(),
        }
    }
}

impl TripRecord {
    /// Map a raw store row onto a record.
    ///
    /// Expected column order:
    /// `[id, reporttime, mobileid, opr_nrp, opr_username, opr_shift,
    ///   act_loaderid, pos_name, act_hauldistance, is_deleted, record_type]`
    ///
    /// Store variants differ in width; any column beyond the row's length,
    /// or a NULL value, degrades to the field's default instead of erroring.
    pub fn from_row(row: &[Option<String>]) -> Self {
        let text = |idx: usize| -> String {
            row.get(idx)
                .and_then(|v| v.clone())
                .unwrap_or_default()
        };

        let id = row
            .first()
            .and_then(|v| v.clone())
            .filter(|s| !s.is_empty());

        let report_time = row
            .get(1)
            .and_then(|v| v.as_deref())
            .and_then(parse_report_time_lenient);

        let record_type = match row.get(10).and_then(|v| v.clone()) {
            Some(t) if !t.is_empty() => t,
            _ => default_record_type(),
        };

        let deleted = row
            .get(9)
            .and_then(|v| v.as_deref())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .is_some_and(|flag| flag != 0);

        let note = if deleted && record_type == "trip" {
            "deleted".to_string()
        } else {
            String::new()
        };

        Self {
            id,
            report_time,
            equipment_no: text(2),
            operator_id: text(3),
            operator_name: text(4),
            opr_shift: text(5),
            loader_id: text(6),
            pos_name: text(7),
            distance: text(8),
            note,
            record_type,
        }
    }

    /// Sort key for chronological ordering: records with no report time
    /// sort first (the empty string stands in for a null timestamp).
    pub fn sort_key(&self) -> String {
        self.report_time
            .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}
