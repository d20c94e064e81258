use base64::Engine;
use chrono::DateTime;
use chrono::Utc;
use saferoute_backend_client::types::AuthResponse;
use saferoute_backend_client::types::User;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Credentials and user returned by a successful login or registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// This is a JWT.
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            user: response.user,
        }
    }
}

/// Flat subset of the claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessTokenInfo {
    pub subject: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessTokenInfo {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[derive(Debug, Error)]
pub enum AccessTokenInfoError {
    #[error("invalid access token format")]
    InvalidFormat,
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Default, Deserialize)]
struct AccessClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode the payload of a JWT access token without verifying it.
///
/// The backend owns validation; this is only used to show the user when
/// their session expires.
pub fn parse_access_token(access_token: &str) -> Result<AccessTokenInfo, AccessTokenInfoError> {
    let mut parts = access_token.split('.');
    let (Some(_header), Some(payload_b64), Some(_sig), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AccessTokenInfoError::InvalidFormat);
    };
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64.trim_end_matches('='))?;
    let claims: AccessClaims = serde_json::from_slice(&payload)?;
    Ok(AccessTokenInfo {
        subject: claims.sub.or(claims.id),
        role: claims.role,
        expires_at: claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
    })
}
