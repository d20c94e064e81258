#![deny(clippy::unwrap_used, clippy::expect_used)]

mod admin;
mod auth;
mod client;
mod contacts;
mod credentials;
mod error;
mod feedback;
mod request;
mod routes;
mod sos;
pub mod types;
pub mod validation;

pub use client::Client;
pub use client::DEFAULT_API_BASE_URL;
pub use client::normalize_base_url;
pub use credentials::CredentialStore;
pub use credentials::InMemoryCredentials;
pub use error::ApiError;
pub use error::Result;
pub use request::Attempt;
pub use request::PendingRequest;
pub use validation::ValidationError;
