//! Request middleware: session cookies and bearer authorization.

pub mod bearer;
pub mod session;

pub use bearer::{bearer_auth_middleware, AuthContext};
pub use session::{
    clear_session_cookie, create_session_cookie, extract_session_cookie, SESSION_COOKIE_MAX_AGE,
    SESSION_COOKIE_NAME,
};
