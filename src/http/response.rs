//! Uniform JSON response shape: `{success, message?, ...}` with the status
//! class decided by the error taxonomy. Nothing propagates to the transport
//! as an unhandled fault.

use crate::errors::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

pub fn success(message: &str) -> Response {
    Json(json!({"success": true, "message": message})).into_response()
}

/// `{"success": true}` merged with the given object fields.
pub fn success_with(extra: Value) -> Response {
    let mut body = json!({"success": true});
    if let (Some(obj), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    Json(body).into_response()
}

pub fn failure(err: &AppError) -> Response {
    let status = if err.is_auth() {
        StatusCode::UNAUTHORIZED
    } else if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(json!({"success": false, "message": err.to_string()})),
    )
        .into_response()
}
