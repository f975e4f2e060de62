//! Request and response models for the OAuth endpoints.

pub mod authorize;
pub mod login;
pub mod token;
pub mod users;

pub use authorize::{ApproveRequest, AuthorizeRequest, ResponseType};
pub use login::{LoginRequest, LoginSuccess};
pub use token::{TokenRequest, TokenResponse};
pub use users::UserInfoResponse;
