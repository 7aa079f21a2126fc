//! Timesheet endpoints: wizard state, trip retrieval, record mutations and
//! the HM reconciliation family.

use crate::core::mutation::{AddTrip, UpdateTrip};
use crate::core::reconcile::{HmCorrectionInput, ShiftChangeInput};
use crate::errors::AppError;
use crate::http::response::{failure, success, success_with};
use crate::http::{AppState, require_user};
use crate::models::correction::CorrectionKind;
use crate::models::trip::TripRecord;
use crate::models::user::User;
use crate::models::wizard::{Step1Data, Step2Data};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;
use serde_json::{Value, json};

/// Convert failures, logging anything that isn't the caller's fault.
fn fail(context: &str, e: AppError) -> Response {
    if !(e.is_validation() || e.is_auth()) {
        tracing::error!("{context}: {e}");
    }
    failure(&e)
}

fn guard(state: &AppState, headers: &HeaderMap) -> Result<User, Response> {
    require_user(state, headers).map_err(|e| failure(&e))
}

/// JSON value → display string. Clients send ids and meter values as either
/// numbers or strings depending on where the row came from.
fn text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

pub async fn step1_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match guard(&state, &headers) {
        Ok(u) => u,
        Err(r) => return r,
    };
    let data = match state.wizard.load_step1(user.id) {
        Some(step) => json!(step),
        None => json!({}),
    };
    success_with(json!({"data": data}))
}

pub async fn step1_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Step1Data>,
) -> Response {
    let user = match guard(&state, &headers) {
        Ok(u) => u,
        Err(r) => return r,
    };
    state.wizard.save_step1(user.id, body);
    success("Step 1 data saved")
}

pub async fn step2_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match guard(&state, &headers) {
        Ok(u) => u,
        Err(r) => return r,
    };
    let data = match state.wizard.load_step2(user.id) {
        Some(step) => json!(step),
        None => json!({}),
    };
    success_with(json!({"data": data}))
}

pub async fn step2_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Step2Data>,
) -> Response {
    let user = match guard(&state, &headers) {
        Ok(u) => u,
        Err(r) => return r,
    };
    state.wizard.save_step2(user.id, body);
    success("Step 2 data saved")
}

pub async fn clear(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match guard(&state, &headers) {
        Ok(u) => u,
        Err(r) => return r,
    };
    state.wizard.clear(user.id);
    success("Session cleared")
}

// ---------------------------------------------------------------------------
// Trip retrieval
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct TripsQuery {
    pub equipment: String,
    pub operator: String,
    pub date: String,
    /// Comma-separated shift codes, e.g. `S01,S02`.
    pub shifts: String,
}

pub async fn fetch_trips(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TripsQuery>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }

    let shifts: Vec<String> = query
        .shifts
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let operator = if query.operator.trim().is_empty() {
        None
    } else {
        Some(query.operator.as_str())
    };

    match state
        .planner
        .fetch_trips(&query.equipment, operator, &query.date, &shifts)
    {
        Ok(trips) => success_with(json!({"trips": trips})),
        Err(e) => fail("Error fetching trips", e),
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SortBody {
    pub trips: Vec<TripRecord>,
}

pub async fn sort_trips(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SortBody>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    let trips = state.planner.sort_trips(body.trips);
    success_with(json!({"trips": trips}))
}

// ---------------------------------------------------------------------------
// Record mutations
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AddTripBody {
    pub report_time: String,
    pub equipment_no: String,
    pub operator_id: String,
    pub opr_shift: String,
    pub loader_id: String,
    pub pos_name: String,
    pub distance: String,
}

pub async fn add_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddTripBody>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    let req = AddTrip {
        report_time: body.report_time,
        equipment_no: body.equipment_no,
        operator_id: body.operator_id,
        opr_shift: body.opr_shift,
        loader_id: body.loader_id,
        pos_name: body.pos_name,
        distance: body.distance,
    };
    match state.mutations.add_trip(&req) {
        Ok(id) => success_with(json!({"message": "Trip added successfully", "id": id})),
        Err(e) => fail("Error adding trip", e),
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct IdBody {
    pub id: Value,
}

pub async fn delete_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<IdBody>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    match state.mutations.delete_trip(&text(&body.id)) {
        Ok(()) => success("Trip deleted successfully"),
        Err(e) => fail("Error deleting trip", e),
    }
}

pub async fn restore_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<IdBody>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    match state.mutations.restore_trip(&text(&body.id)) {
        Ok(()) => success("Trip restored successfully"),
        Err(e) => fail("Error restoring trip", e),
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTripBody {
    pub id: Value,
    pub report_time: String,
    pub loader_id: String,
    pub pos_name: String,
    pub distance: String,
}

pub async fn update_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateTripBody>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    let req = UpdateTrip {
        id: text(&body.id),
        report_time: body.report_time,
        loader_id: body.loader_id,
        pos_name: body.pos_name,
        distance: body.distance,
    };
    match state.mutations.update_trip(&req) {
        Ok(()) => success("Trip updated successfully"),
        Err(e) => fail("Error updating trip", e),
    }
}

// ---------------------------------------------------------------------------
// HM reconciliation
// ---------------------------------------------------------------------------

pub async fn step3_get(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    match state.reconcile.validation_rows() {
        Ok(set) => success_with(json!({"columns": set.columns, "rows": set.rows})),
        Err(e) => fail("Error loading HM validation data", e),
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct HistoricalQuery {
    pub mobileid: String,
}

pub async fn historical_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoricalQuery>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    match state.reconcile.historical_logins(&query.mobileid) {
        Ok(rows) => success_with(json!({"rows": rows})),
        Err(e) => fail("Error loading historical logins", e),
    }
}

/// Shared payload for the four HM correction endpoints. Which id/value pair
/// applies depends on the endpoint: current record, next-in-time or
/// previous-in-time.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct HmBody {
    pub id: Value,
    pub next_id: Value,
    pub prev_id: Value,
    pub opr_nrp: Value,
    pub hm: Value,
    pub next_hm: Value,
    pub prev_hm: Value,
    pub new_hm: Value,
    pub opr_shift: Value,
}

fn hm_input(target_id: &Value, current_hm: &Value, body: &HmBody) -> HmCorrectionInput {
    HmCorrectionInput {
        target_id: text(target_id),
        operator_id: text(&body.opr_nrp),
        current_hm: number(current_hm),
        new_hm: text(&body.new_hm),
        opr_shift: text(&body.opr_shift),
    }
}

async fn apply_hm(
    state: AppState,
    headers: HeaderMap,
    body: HmBody,
    kind: CorrectionKind,
    target_id: Value,
    current_hm: Value,
    done: &str,
    context: &str,
) -> Response {
    let user = match guard(&state, &headers) {
        Ok(u) => u,
        Err(r) => return r,
    };
    let input = hm_input(&target_id, &current_hm, &body);
    match state.reconcile.apply_correction(kind, &input, &user.username) {
        Ok(()) => success(done),
        Err(e) => fail(context, e),
    }
}

pub async fn update_hm(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HmBody>,
) -> Response {
    let (target, current) = (body.id.clone(), body.hm.clone());
    apply_hm(
        state,
        headers,
        body,
        CorrectionKind::HmUpdate,
        target,
        current,
        "HM updated successfully",
        "Error updating HM",
    )
    .await
}

pub async fn update_next_hm(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HmBody>,
) -> Response {
    let (target, current) = (body.next_id.clone(), body.next_hm.clone());
    apply_hm(
        state,
        headers,
        body,
        CorrectionKind::NextHmUpdate,
        target,
        current,
        "HM logout updated successfully",
        "Error updating next HM",
    )
    .await
}

pub async fn update_prev_hm(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HmBody>,
) -> Response {
    let (target, current) = (body.prev_id.clone(), body.prev_hm.clone());
    apply_hm(
        state,
        headers,
        body,
        CorrectionKind::PrevHmUpdate,
        target,
        current,
        "Previous HM logout updated successfully",
        "Error updating previous HM",
    )
    .await
}

pub async fn validate_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<HmBody>,
) -> Response {
    let (target, current) = (body.id.clone(), body.hm.clone());
    apply_hm(
        state,
        headers,
        body,
        CorrectionKind::Valid,
        target,
        current,
        "Data validated successfully",
        "Error validating data",
    )
    .await
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ShiftBody {
    pub id: Value,
    pub next_id: Value,
    pub reporttime: Value,
    pub next_reporttime: Value,
    pub mobileid: Value,
    pub opr_nrp: Value,
    pub hm: Value,
    pub next_hm: Value,
    pub opr_shift: Value,
    pub new_shift: Value,
}

pub async fn update_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ShiftBody>,
) -> Response {
    if guard(&state, &headers).is_err() {
        return failure(&AppError::Unauthenticated);
    }
    let input = ShiftChangeInput {
        id: text(&body.id),
        next_id: text(&body.next_id),
        report_time: text(&body.reporttime),
        next_report_time: text(&body.next_reporttime),
        equipment_no: text(&body.mobileid),
        operator_id: text(&body.opr_nrp),
        hm: number(&body.hm),
        next_hm: number(&body.next_hm),
        opr_shift: text(&body.opr_shift),
        new_shift: text(&body.new_shift),
    };
    match state.reconcile.update_shift(&input) {
        Ok(()) => success("Shift updated successfully"),
        Err(e) => fail("Error updating shift", e),
    }
}
