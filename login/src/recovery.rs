//! Password recovery by emailed one-time password.

use saferoute_backend_client::types::PasswordReset;
use tracing::debug;

use crate::auth::AuthManager;
use crate::auth::AuthOutcome;

pub const SEND_OTP_FAILED: &str = "Error sending OTP";
pub const RESET_FAILED: &str = "Reset failed";

impl AuthManager {
    pub async fn forgot_password(&self, email: &str) -> AuthOutcome {
        match self.client().forgot_password(email).await {
            Ok(message) => AuthOutcome::succeeded(message),
            Err(err) => {
                debug!("forgot-password failed: {err}");
                AuthOutcome::failed(&err, SEND_OTP_FAILED)
            }
        }
    }

    /// Verify `otp` and, only if the backend accepts it, set the new password.
    pub async fn reset_password(&self, email: &str, otp: &str, new_password: &str) -> AuthOutcome {
        if let Err(err) = self.client().verify_otp(email, otp).await {
            debug!("OTP verification failed: {err}");
            return AuthOutcome::failed(&err, RESET_FAILED);
        }
        let reset = PasswordReset {
            email: email.to_string(),
            new_password: new_password.to_string(),
        };
        match self.client().reset_password(&reset).await {
            Ok(message) => AuthOutcome::succeeded(message),
            Err(err) => {
                debug!("password reset failed: {err}");
                AuthOutcome::failed(&err, RESET_FAILED)
            }
        }
    }
}
