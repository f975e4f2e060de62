//! Domain entities persisted by the stores.

pub mod client;
pub mod session;
pub mod token;
pub mod user;

pub use client::Client;
pub use session::{PendingAuthorize, Session};
pub use token::{AccessToken, AuthCode, RefreshToken};
pub use user::User;
