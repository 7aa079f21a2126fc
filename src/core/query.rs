//! Trip retrieval across shifts: validate the selection, issue one store
//! call per valid shift code, normalize the rows, dedupe and sort.

use crate::errors::{AppError, AppResult};
use crate::models::shift::ShiftCode;
use crate::models::trip::TripRecord;
use crate::store::TripStore;
use std::collections::HashSet;
use std::sync::Arc;

pub struct TripQueryPlanner {
    store: Arc<dyn TripStore>,
}

impl TripQueryPlanner {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Fetch the working set for one equipment / date / shift selection.
    ///
    /// Codes outside the valid enumeration are silently dropped; if nothing
    /// valid remains the request is rejected. Any store failure aborts the
    /// whole fetch, no partial results.
    pub fn fetch_trips(
        &self,
        equipment: &str,
        operator: Option<&str>,
        date: &str,
        shift_codes: &[String],
    ) -> AppResult<Vec<TripRecord>> {
        let equipment = equipment.trim();
        let date = date.trim();
        if equipment.is_empty() || date.is_empty() {
            return Err(AppError::Validation(
                "Missing required parameters".to_string(),
            ));
        }
        if shift_codes.is_empty() {
            return Err(AppError::Validation(
                "At least one shift required".to_string(),
            ));
        }

        let codes: Vec<ShiftCode> = shift_codes
            .iter()
            .filter_map(|c| ShiftCode::from_code(c))
            .collect();
        if codes.is_empty() {
            return Err(AppError::Validation(
                "At least one valid shift required".to_string(),
            ));
        }

        let operator = operator.map(str::trim).filter(|o| !o.is_empty());

        let mut seen: HashSet<String> = HashSet::new();
        let mut all = Vec::new();
        for code in codes {
            let rows = self.store.trips_by_unit(date, code, equipment, operator)?;
            for row in rows {
                let record = TripRecord::from_row(&row);
                if let Some(id) = &record.id {
                    // retrieval overlaps across shift calls; first one wins
                    if !seen.insert(id.clone()) {
                        continue;
                    }
                }
                all.push(record);
            }
        }

        // stable: equal timestamps keep discovery order, null times first
        all.sort_by_key(|r| r.sort_key());
        Ok(all)
    }

    /// Server-side sort of a client-posted trip list, same ordering rule
    /// as the fetch path.
    pub fn sort_trips(&self, mut trips: Vec<TripRecord>) -> Vec<TripRecord> {
        trips.sort_by_key(|r| r.sort_key());
        trips
    }
}
