//! SQLite-backed credential store.
//!
//! Passwords are stored as bcrypt hashes (salted, adaptive cost). The
//! predecessor system kept unsalted SHA-256 digests; those are not
//! accepted or migrated here.

use crate::auth::AuthProvider;
use crate::errors::{AppError, AppResult};
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteAuthProvider {
    conn: Mutex<Connection>,
}

impl SqliteAuthProvider {
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        let provider = Self {
            conn: Mutex::new(conn),
        };
        provider.bootstrap()?;
        Ok(provider)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        let provider = Self {
            conn: Mutex::new(conn),
        };
        provider.bootstrap()?;
        Ok(provider)
    }

    fn conn(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Other("auth connection lock poisoned".to_string()))
    }

    fn bootstrap(&self) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                fullname TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl AuthProvider for SqliteAuthProvider {
    fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both username and password".to_string(),
            ));
        }

        let conn = self.conn()?;
        let row: Option<(i64, String, String, String)> = conn
            .query_row(
                "SELECT id, username, fullname, password FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                    ))
                },
            )
            .optional()?;

        let (id, username, fullname, hash) = row.ok_or(AppError::InvalidCredentials)?;
        let ok = bcrypt::verify(password, &hash)
            .map_err(|e| AppError::Other(format!("password verify failed: {e}")))?;
        if !ok {
            return Err(AppError::InvalidCredentials);
        }

        Ok(User {
            id,
            username,
            fullname,
        })
    }

    fn register(&self, username: &str, password: &str, fullname: &str) -> AppResult<()> {
        let username = username.trim();
        let password = password.trim();
        let fullname = fullname.trim();

        if username.is_empty() || password.is_empty() || fullname.is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        if password.len() < 4 {
            return Err(AppError::Validation(
                "Password must be at least 4 characters long".to_string(),
            ));
        }
        if username.len() < 3 {
            return Err(AppError::Validation(
                "Username must be at least 3 characters long".to_string(),
            ));
        }

        let conn = self.conn()?;
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE username = ?1",
                [username],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(AppError::Validation(
                "Username already exists. Please choose a different username.".to_string(),
            ));
        }

        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Other(format!("password hash failed: {e}")))?;
        conn.execute(
            "INSERT INTO users (username, password, fullname) VALUES (?1, ?2, ?3)",
            params![username, hash, fullname.to_uppercase()],
        )?;
        Ok(())
    }
}
