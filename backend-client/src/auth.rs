use serde_json::json;

use crate::client::Client;
use crate::error::Result;
use crate::request::PendingRequest;
use crate::types::AuthResponse;
use crate::types::LoginRequest;
use crate::types::PasswordReset;
use crate::types::RegisterFields;
use crate::types::User;
use crate::validation::Validate;
use crate::validation::require;

impl Client {
    pub async fn register(&self, fields: &RegisterFields) -> Result<AuthResponse> {
        fields.validate()?;
        self.send_json(PendingRequest::post("/auth/register").with_json(fields)?)
            .await
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse> {
        credentials.validate()?;
        self.send_json(PendingRequest::post("/auth/login").with_json(credentials)?)
            .await
    }

    pub async fn current_user(&self) -> Result<User> {
        self.send_json(PendingRequest::get("/auth/me")).await
    }

    /// Ask the backend to drop its copy of the session.
    pub async fn logout(&self) -> Result<()> {
        self.execute(PendingRequest::post("/auth/logout")).await?;
        Ok(())
    }

    /// Send a one-time password to `email`. Returns the backend's message.
    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>> {
        require("Email", email)?;
        self.send_for_message(
            PendingRequest::post("/auth/forgot-password").with_json(&json!({ "email": email }))?,
        )
        .await
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Option<String>> {
        require("Email", email)?;
        require("OTP", otp)?;
        self.send_for_message(
            PendingRequest::post("/auth/verify-otp")
                .with_json(&json!({ "email": email, "otp": otp }))?,
        )
        .await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<Option<String>> {
        require("Email", &reset.email)?;
        require("New password", &reset.new_password)?;
        self.send_for_message(PendingRequest::post("/auth/reset-password").with_json(reset)?)
            .await
    }
}
