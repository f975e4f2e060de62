//! Resource-owner accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resource-owning user account.
///
/// Created by registration machinery outside this crate; the core reads
/// users for login, the password grant, and bearer validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Immutable identifier.
    pub id: Uuid,
    /// Unique login name.
    pub login: String,
    /// Contact email.
    pub email: String,
    /// PHC-formatted password hash.
    pub password_hash: String,
    /// Disabled users cannot log in, and tokens minted for them stop
    /// validating.
    pub enabled: bool,
    /// Role names.
    pub roles: Vec<String>,
    /// Permission names.
    pub permissions: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
