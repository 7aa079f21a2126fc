#![allow(dead_code)]

use std::sync::Arc;

use tripsheet::auth::AuthProvider;
use tripsheet::auth::sqlite::SqliteAuthProvider;
use tripsheet::http::AppState;
use tripsheet::session::MemorySessionStore;
use tripsheet::store::TripRow;
use tripsheet::store::fake::FakeStore;

/// Build a positional trip row. Pass `None` for NULL columns; truncate the
/// vec afterwards to simulate a short legacy row.
pub fn row(
    id: &str,
    report_time: &str,
    equipment: &str,
    operator: &str,
) -> TripRow {
    vec![
        Some(id.to_string()),
        Some(report_time.to_string()),
        Some(equipment.to_string()),
        Some(operator.to_string()),
        Some("OPERATOR NAME".to_string()),
        Some("1".to_string()),
        Some("EX201".to_string()),
        Some("PIT-A".to_string()),
        Some("1.8".to_string()),
        Some("0".to_string()),
        Some("trip".to_string()),
    ]
}

/// App state over the given fake store, with an in-memory credential store
/// holding one registered dispatcher (`dsp01` / `s3cret`).
pub fn state_with(store: Arc<FakeStore>) -> AppState {
    let auth = SqliteAuthProvider::open_in_memory().expect("auth db");
    auth.register("dsp01", "s3cret", "Ayu Lestari")
        .expect("register");
    AppState::new(Arc::new(auth), store, Arc::new(MemorySessionStore::new()))
}
