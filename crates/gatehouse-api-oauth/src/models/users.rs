//! Protected resource models.

use serde::{Deserialize, Serialize};

/// Body of `GET /users/me`: the principal behind the presented bearer
/// token. `login` is `null` for client-credentials tokens, which have no
/// user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoResponse {
    /// Login name of the owning user, or `null`.
    pub login: Option<String>,
    /// Email of the owning user, or `null`.
    pub email: Option<String>,
    /// Roles of the owning user.
    pub roles: Vec<String>,
    /// Permissions of the owning user.
    pub permissions: Vec<String>,
    /// Scope granted to the token, absent when empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_serializes_as_null_for_client_tokens() {
        let json = serde_json::to_string(&UserInfoResponse {
            login: None,
            email: None,
            roles: vec![],
            permissions: vec![],
            scope: None,
        })
        .unwrap();
        assert!(json.contains("\"login\":null"));
    }
}
