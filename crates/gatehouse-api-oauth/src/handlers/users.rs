//! Bearer-protected resource: `GET /users/me`.

use crate::middleware::bearer::AuthContext;
use crate::models::UserInfoResponse;
use axum::{Extension, Json};

/// Echo the principal behind the presented bearer token. Tokens from the
/// client-credentials grant have no user and answer `login: null`.
pub async fn me_handler(Extension(ctx): Extension<AuthContext>) -> Json<UserInfoResponse> {
    let scope = (!ctx.scope.is_empty()).then(|| ctx.scope.clone());
    let response = match ctx.user {
        Some(user) => UserInfoResponse {
            login: Some(user.login),
            email: Some(user.email),
            roles: user.roles,
            permissions: user.permissions,
            scope,
        },
        None => UserInfoResponse {
            login: None,
            email: None,
            roles: vec![],
            permissions: vec![],
            scope,
        },
    };
    Json(response)
}
