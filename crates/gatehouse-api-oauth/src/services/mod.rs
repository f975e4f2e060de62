//! Domain services behind the OAuth endpoints.

pub mod authorization;
pub mod client;
pub mod credentials;
pub mod token;

pub use authorization::AuthorizationService;
pub use client::ClientService;
pub use credentials::CredentialService;
pub use token::TokenService;
