mod auth;
pub mod auth_store;
mod recovery;
pub mod token_data;

pub use auth::AccessError;
pub use auth::AuthManager;
pub use auth::AuthOutcome;
pub use auth::AuthState;
pub use auth::LOGIN_FAILED;
pub use auth::REGISTRATION_FAILED;
pub use auth_store::AuthStore;
pub use recovery::RESET_FAILED;
pub use recovery::SEND_OTP_FAILED;
pub use token_data::Session;
pub use token_data::parse_access_token;
