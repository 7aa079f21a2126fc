//! Unified application error type.
//! All modules (store, core, auth, http) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Store-related
    // ---------------------------
    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    StoreMessage(String),

    // ---------------------------
    // Request validation
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid shift value: {0}")]
    InvalidShift(String),

    // ---------------------------
    // Authentication
    // ---------------------------
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid username or password")]
    InvalidCredentials,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True for errors that surface as a 400-class validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::InvalidDate(_) | AppError::InvalidShift(_)
        )
    }

    /// True for errors that surface as a 401-class auth failure.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            AppError::Unauthenticated | AppError::InvalidCredentials
        )
    }
}
