use serde::Serialize;

/// Authenticated dispatcher.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub fullname: String,
}
