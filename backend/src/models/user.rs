//! User data model.

use serde::{Deserialize, Serialize};

/// Flat user record returned by the envelope routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// Numeric identifier
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact address
    pub email: String,
}

impl UserData {
    /// Build a user record.
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}
