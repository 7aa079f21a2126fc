//! HTTP surface: routing, shared state and the session-token helpers used
//! by every authenticated endpoint.

pub mod auth;
pub mod handlers;
pub mod response;

use crate::auth::{AuthProvider, TokenRegistry};
use crate::core::mutation::TripMutationService;
use crate::core::query::TripQueryPlanner;
use crate::core::reconcile::HmReconciliationEngine;
use crate::core::wizard::WizardService;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use crate::session::SessionStore;
use crate::store::TripStore;
use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub tokens: Arc<TokenRegistry>,
    pub wizard: Arc<WizardService>,
    pub planner: Arc<TripQueryPlanner>,
    pub mutations: Arc<TripMutationService>,
    pub reconcile: Arc<HmReconciliationEngine>,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn TripStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            auth,
            tokens: Arc::new(TokenRegistry::new()),
            wizard: Arc::new(WizardService::new(sessions)),
            planner: Arc::new(TripQueryPlanner::new(store.clone())),
            mutations: Arc::new(TripMutationService::new(store.clone())),
            reconcile: Arc::new(HmReconciliationEngine::new(store)),
        }
    }
}

/// Session token from `Authorization: Bearer …` or the `sid` cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("authorization")
        && let Ok(text) = value.to_str()
        && let Some(token) = text.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    let cookies = headers.get("cookie")?.to_str().ok()?;
    cookies.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name == "sid" {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Resolve the calling dispatcher or fail with the 401-class error.
pub fn require_user(state: &AppState, headers: &HeaderMap) -> AppResult<User> {
    session_token(headers)
        .and_then(|token| state.tokens.resolve(&token))
        .ok_or(AppError::Unauthenticated)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/timesheet/step1",
            get(handlers::step1_get).post(handlers::step1_post),
        )
        .route(
            "/api/timesheet/step2",
            get(handlers::step2_get).post(handlers::step2_post),
        )
        .route("/api/trips", get(handlers::fetch_trips))
        .route("/api/timesheet/sort", post(handlers::sort_trips))
        .route("/api/timesheet/add-trip", post(handlers::add_trip))
        .route("/api/timesheet/delete-trip", post(handlers::delete_trip))
        .route("/api/timesheet/restore-trip", post(handlers::restore_trip))
        .route("/api/timesheet/update-trip", post(handlers::update_trip))
        .route("/api/timesheet/step3", get(handlers::step3_get))
        .route(
            "/api/timesheet/historical-login",
            get(handlers::historical_login),
        )
        .route("/api/timesheet/update-hm", post(handlers::update_hm))
        .route("/api/timesheet/update-next-hm", post(handlers::update_next_hm))
        .route("/api/timesheet/update-prev-hm", post(handlers::update_prev_hm))
        .route("/api/timesheet/validate-data", post(handlers::validate_data))
        .route("/api/timesheet/update-shift", post(handlers::update_shift))
        .route("/api/timesheet/clear", post(handlers::clear))
        .with_state(state)
}
