//! Login, registration and logout endpoints.

use crate::http::response::{failure, success, success_with};
use crate::http::{AppState, session_token};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub fullname: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Response {
    if body.password != body.confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Passwords do not match"})),
        )
            .into_response();
    }
    match state
        .auth
        .register(&body.username, &body.password, &body.fullname)
    {
        Ok(()) => success("Registration successful! You can now login."),
        Err(e) => failure(&e),
    }
}

pub async fn login(State(state): State<AppState>, Json(body): Json<LoginBody>) -> Response {
    match state.auth.login(&body.username, &body.password) {
        Ok(user) => {
            let fullname = user.fullname.clone();
            let token = state.tokens.issue(user);
            let cookie = format!("sid={token}; Path=/; HttpOnly; SameSite=Lax");
            let mut response = success_with(json!({
                "message": "Login successful",
                "token": token,
                "fullname": fullname,
            }));
            if let Ok(cookie) = cookie.parse() {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            response
        }
        Err(e) => failure(&e),
    }
}

/// Logout drops the token and both wizard slots. Succeeds whether or not a
/// live session was presented.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers)
        && let Some(user) = state.tokens.revoke(&token)
    {
        state.wizard.clear(user.id);
    }
    success("You have been logged out")
}
