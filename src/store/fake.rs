//! In-memory trip store for tests: canned result rows, call recording and
//! failure injection.

use crate::errors::{AppError, AppResult};
use crate::models::correction::{HmCorrection, ShiftReassignment};
use crate::models::shift::ShiftCode;
use crate::store::{HmValidationSet, NewTrip, TripPatch, TripRow, TripStore};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeStore {
    /// Result rows per shift code, returned by `trips_by_unit`.
    pub trips: Mutex<HashMap<&'static str, Vec<TripRow>>>,
    /// Every `trips_by_unit` call as `(shift, operator)`.
    pub unit_queries: Mutex<Vec<(String, Option<String>)>>,
    /// Id handed back by `find_trip_id`.
    pub next_id: Mutex<Option<String>>,
    pub validation_set: Mutex<HmValidationSet>,
    pub history: Mutex<Vec<Value>>,

    pub inserted: Mutex<Vec<NewTrip>>,
    pub patched: Mutex<Vec<TripPatch>>,
    pub deleted: Mutex<Vec<String>>,
    pub restored: Mutex<Vec<String>>,
    pub shift_changes: Mutex<Vec<ShiftReassignment>>,
    pub corrections: Mutex<Vec<HmCorrection>>,

    /// Every store call in order, by method name.
    pub calls: Mutex<Vec<String>>,
    /// Method name that should fail with a store error.
    pub fail_on: Mutex<Option<&'static str>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trips(rows: Vec<(&'static str, Vec<TripRow>)>) -> Self {
        let store = Self::new();
        *store.trips.lock().unwrap() = rows.into_iter().collect();
        store
    }

    pub fn failing_on(method: &'static str) -> Self {
        let store = Self::new();
        *store.fail_on.lock().unwrap() = Some(method);
        store
    }

    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str) -> AppResult<()> {
        self.calls.lock().unwrap().push(method.to_string());
        if *self.fail_on.lock().unwrap() == Some(method) {
            return Err(AppError::StoreMessage(format!("{method}: injected failure")));
        }
        Ok(())
    }
}

impl TripStore for FakeStore {
    fn trips_by_unit(
        &self,
        _date: &str,
        shift: ShiftCode,
        _equipment: &str,
        operator: Option<&str>,
    ) -> AppResult<Vec<TripRow>> {
        self.record("trips_by_unit")?;
        self.unit_queries
            .lock()
            .unwrap()
            .push((shift.as_str().to_string(), operator.map(String::from)));
        Ok(self
            .trips
            .lock()
            .unwrap()
            .get(shift.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn insert_trip(&self, trip: &NewTrip) -> AppResult<()> {
        self.record("insert_trip")?;
        self.inserted.lock().unwrap().push(trip.clone());
        Ok(())
    }

    fn find_trip_id(
        &self,
        _report_time: &NaiveDateTime,
        _equipment: &str,
        _operator: &str,
    ) -> AppResult<Option<String>> {
        self.record("find_trip_id")?;
        Ok(self.next_id.lock().unwrap().clone())
    }

    fn delete_trip(&self, id: &str) -> AppResult<()> {
        self.record("delete_trip")?;
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    fn restore_trip(&self, id: &str) -> AppResult<()> {
        self.record("restore_trip")?;
        self.restored.lock().unwrap().push(id.to_string());
        Ok(())
    }

    fn modify_trip(&self, patch: &TripPatch) -> AppResult<()> {
        self.record("modify_trip")?;
        self.patched.lock().unwrap().push(patch.clone());
        Ok(())
    }

    fn update_shift(&self, change: &ShiftReassignment) -> AppResult<()> {
        self.record("update_shift")?;
        self.shift_changes.lock().unwrap().push(change.clone());
        Ok(())
    }

    fn insert_login_update(&self, correction: &HmCorrection) -> AppResult<()> {
        self.record("insert_login_update")?;
        self.corrections.lock().unwrap().push(correction.clone());
        Ok(())
    }

    fn hm_validation_rows(&self) -> AppResult<HmValidationSet> {
        self.record("hm_validation_rows")?;
        Ok(self.validation_set.lock().unwrap().clone())
    }

    fn historical_logins(&self, _equipment: &str) -> AppResult<Vec<Value>> {
        self.record("historical_logins")?;
        Ok(self.history.lock().unwrap().clone())
    }
}
