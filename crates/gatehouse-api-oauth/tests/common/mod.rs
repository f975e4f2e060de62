//! Common test harness: an in-memory server driven through
//! `tower::ServiceExt::oneshot`, plus seed and request helpers.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use gatehouse_api_oauth::{oauth_router, OAuthState, ServerConfig};
use gatehouse_auth::PasswordHasher;
use gatehouse_store::{
    Client, ClientStore, Clock, InMemoryAccessTokenStore, InMemoryAuthCodeStore,
    InMemoryClientStore, InMemoryRefreshTokenStore, InMemorySessionStore, InMemoryUserStore, User,
    UserStore,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// A server over fresh in-memory stores with a pinned clock.
pub struct TestContext {
    pub app: Router,
    pub clock: Clock,
    pub users: Arc<InMemoryUserStore>,
    pub clients: Arc<InMemoryClientStore>,
    pub hasher: PasswordHasher,
}

impl TestContext {
    pub fn new() -> Self {
        let clock = Clock::fixed(Utc::now());
        let users = Arc::new(InMemoryUserStore::new());
        let clients = Arc::new(InMemoryClientStore::new());

        let state = OAuthState::new(
            ServerConfig::default(),
            clock.clone(),
            Arc::clone(&users) as Arc<dyn gatehouse_store::UserStore>,
            Arc::clone(&clients) as Arc<dyn gatehouse_store::ClientStore>,
            Arc::new(InMemoryAuthCodeStore::new(clock.clone())),
            Arc::new(InMemoryAccessTokenStore::new(clock.clone())),
            Arc::new(InMemoryRefreshTokenStore::new()),
            Arc::new(InMemorySessionStore::new()),
        );

        Self {
            app: oauth_router(state),
            clock,
            users,
            clients,
            // Small Argon2 parameters keep the suite fast.
            hasher: PasswordHasher::with_argon2_params(4096, 1, 1).unwrap(),
        }
    }

    pub async fn seed_client(
        &self,
        id: &str,
        secret: Option<&str>,
        approved: bool,
        scopes: &[&str],
        grants: &[&str],
        redirects: &[&str],
    ) -> Client {
        let client = Client {
            id: id.to_string(),
            secret: secret.map(str::to_string),
            info: "Test client".to_string(),
            homepage: "https://client.example".to_string(),
            approved,
            scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
            grants: grants.iter().map(|s| (*s).to_string()).collect(),
            redirects: redirects.iter().map(|s| (*s).to_string()).collect(),
            enabled: true,
        };
        ClientStore::put(self.clients.as_ref(), client).await.unwrap()
    }

    pub async fn seed_user(&self, login: &str, password: &str, enabled: bool) -> User {
        let user = User {
            id: Uuid::new_v4(),
            login: login.to_string(),
            email: format!("{login}@example.com"),
            password_hash: self.hasher.hash(password).unwrap(),
            enabled,
            roles: vec!["user".to_string()],
            permissions: vec![],
            created_at: self.clock.now(),
        };
        UserStore::put(self.users.as_ref(), user).await.unwrap()
    }

    pub async fn set_user_enabled(&self, user: &User, enabled: bool) {
        let mut updated = user.clone();
        updated.enabled = enabled;
        UserStore::put(self.users.as_ref(), updated).await.unwrap();
    }

    pub async fn set_client_enabled(&self, client: &Client, enabled: bool) {
        let mut updated = client.clone();
        updated.enabled = enabled;
        ClientStore::put(self.clients.as_ref(), updated)
            .await
            .unwrap();
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).to_string(),
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn get_bearer(&self, uri: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        form: &[(&str, &str)],
        cookie: Option<&str>,
        basic: Option<(&str, &str)>,
    ) -> TestResponse {
        let body = form
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some((id, secret)) = basic {
            let encoded = STANDARD.encode(format!("{id}:{secret}"));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Drive login for an already-started authorize flow: fetch the login
    /// form, post credentials with its CSRF token, and return the cookie.
    pub async fn login(&self, cookie: &str, username: &str, password: &str) {
        let form = self.get("/login", Some(cookie)).await;
        assert_eq!(form.status, StatusCode::OK, "login form: {}", form.body);
        let csrf = extract_csrf(&form.body);

        let response = self
            .post_form(
                "/login",
                &[
                    ("username", username),
                    ("password", password),
                    ("csrf_token", &csrf),
                ],
                Some(cookie),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::FOUND, "login: {}", response.body);
    }

    /// Run an authorize request through login, returning the session
    /// cookie and the response of the post-login re-entry.
    pub async fn authorize_with_login(
        &self,
        query: &str,
        username: &str,
        password: &str,
    ) -> (String, TestResponse) {
        let start = self.get(&format!("/authorize?{query}"), None).await;
        assert_eq!(start.status, StatusCode::FOUND, "authorize: {}", start.body);
        assert_eq!(start.location(), "/login");
        let cookie = start.session_cookie().expect("session cookie");

        self.login(&cookie, username, password).await;
        let resumed = self.get("/authorize", Some(&cookie)).await;
        (cookie, resumed)
    }

    /// Approve the pending request parked in `cookie`'s session, given the
    /// consent page HTML.
    pub async fn approve(&self, cookie: &str, consent_html: &str) -> TestResponse {
        let csrf = extract_csrf(consent_html);
        self.post_form("/approve", &[("csrf_token", &csrf)], Some(cookie), None)
            .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or_else(|err| {
            panic!("response is not JSON ({err}): {}", self.body);
        })
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// The session cookie pair from `Set-Cookie`, ready to send back.
    pub fn session_cookie(&self) -> Option<String> {
        let set_cookie = self.headers.get(header::SET_COOKIE)?.to_str().ok()?;
        set_cookie.split(';').next().map(str::to_string)
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Pull the CSRF token out of a rendered form.
pub fn extract_csrf(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html
        .find(marker)
        .unwrap_or_else(|| panic!("no csrf token in page: {html}"))
        + marker.len();
    let end = start + html[start..].find('"').expect("unterminated csrf value");
    html[start..end].to_string()
}

/// Pull a query or fragment parameter out of a redirect Location.
pub fn extract_param(location: &str, name: &str) -> Option<String> {
    let params = location.split_once(['?', '#'])?.1;
    params.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| {
            urlencoding::decode(value)
                .map(|v| v.to_string())
                .unwrap_or_else(|_| value.to_string())
        })
    })
}

fn urlencode(value: &str) -> String {
    urlencoding::encode(value).to_string()
}
