use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use saferoute_backend_client::ApiError;
use saferoute_backend_client::Client;
use saferoute_backend_client::CredentialStore;
use saferoute_backend_client::types::LoginRequest;
use saferoute_backend_client::types::RegisterFields;
use saferoute_backend_client::types::Role;
use saferoute_backend_client::types::User;
use thiserror::Error;
use tracing::debug;
use tracing::error;
use tracing::warn;

use crate::auth_store::AuthStore;
use crate::token_data::Session;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
pub const LOGOUT_FAILED: &str = "Could not clear the saved session.";

#[derive(Clone, Debug, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    /// A persisted session is being confirmed with the backend.
    Restoring,
    Authenticated(User),
}

/// Result of a user-initiated auth action. `message` is meant for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl AuthOutcome {
    pub(crate) fn succeeded(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
        }
    }

    pub(crate) fn failed(err: &ApiError, fallback: &str) -> Self {
        Self {
            success: false,
            message: Some(err.user_message(fallback)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Please sign in to continue")]
    NotSignedIn,
    #[error("Access denied: {required} role required")]
    AccessDenied { required: Role },
}

/// Owns the session for the lifetime of the process.
///
/// The manager shares its [`AuthStore`] with the [`Client`] it wraps, so
/// tokens refreshed by the client are persisted and seen here immediately.
#[derive(Debug)]
pub struct AuthManager {
    client: Client,
    store: Arc<AuthStore>,
    state: Mutex<AuthState>,
}

impl AuthManager {
    pub fn new(client: Client, store: Arc<AuthStore>) -> Self {
        let client = client.with_credentials(store.clone());
        Self {
            client,
            store,
            state: Mutex::new(AuthState::Anonymous),
        }
    }

    /// Build a manager over the storage kept in `saferoute_home`.
    pub fn load(client: Client, saferoute_home: &Path) -> Self {
        Self::new(client, Arc::new(AuthStore::load(saferoute_home)))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn store(&self) -> &Arc<AuthStore> {
        &self.store
    }

    pub fn state(&self) -> AuthState {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn current_user(&self) -> Option<User> {
        match self.state() {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous | AuthState::Restoring => None,
        }
    }

    pub(crate) fn set_state(&self, state: AuthState) {
        if let Ok(mut guard) = self.state.lock() {
            *guard = state;
        }
    }

    /// Confirm a persisted session with the backend.
    ///
    /// Without a stored access token this is a no-op that leaves the state
    /// anonymous. If the backend rejects the token with 401/403 (after the
    /// client's own refresh attempt), the session is logged out and cleared.
    /// Any other failure leaves the stored session in place and the state
    /// anonymous for this run.
    pub async fn restore(&self) -> AuthState {
        if self.store.access_token().is_none() {
            debug!("no persisted session to restore");
            self.set_state(AuthState::Anonymous);
            return AuthState::Anonymous;
        }

        self.set_state(AuthState::Restoring);
        match self.client.current_user().await {
            Ok(user) => {
                if let Err(err) = self.store.cache_user(&user) {
                    warn!("failed to cache user record: {err}");
                }
                self.set_state(AuthState::Authenticated(user));
            }
            Err(err) if err.is_credential_rejection() => {
                error!("persisted session rejected: {err}");
                self.logout().await;
            }
            Err(err) => {
                warn!("could not confirm persisted session; keeping it for next time: {err}");
                self.set_state(AuthState::Anonymous);
            }
        }
        self.state()
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.client.login(&request).await {
            Ok(response) => self.establish(Session::from(response)),
            Err(err) => {
                debug!("login failed: {err}");
                AuthOutcome::failed(&err, LOGIN_FAILED)
            }
        }
    }

    pub async fn register(&self, fields: &RegisterFields) -> AuthOutcome {
        match self.client.register(fields).await {
            Ok(response) => self.establish(Session::from(response)),
            Err(err) => {
                debug!("registration failed: {err}");
                AuthOutcome::failed(&err, REGISTRATION_FAILED)
            }
        }
    }

    fn establish(&self, session: Session) -> AuthOutcome {
        if let Err(err) = self.store.save_session(&session) {
            warn!("failed to persist session: {err}");
        }
        self.set_state(AuthState::Authenticated(session.user));
        AuthOutcome::succeeded(None)
    }

    /// Tell the backend the session is over, then forget it locally.
    ///
    /// The server call is best-effort: its failure is logged and the local
    /// session is cleared regardless.
    pub async fn logout(&self) -> AuthOutcome {
        if let Err(err) = self.client.logout().await {
            error!("logout request failed: {err}");
        }
        if self.clear_local_session() {
            AuthOutcome::succeeded(None)
        } else {
            AuthOutcome {
                success: false,
                message: Some(LOGOUT_FAILED.to_string()),
            }
        }
    }

    fn clear_local_session(&self) -> bool {
        self.set_state(AuthState::Anonymous);
        match self.store.clear_session() {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "failed to clear {}: {err}",
                    self.store.storage_file().display()
                );
                false
            }
        }
    }

    /// Guard for commands that need a signed-in user, or an admin.
    pub fn require(&self, role: Role) -> Result<User, AccessError> {
        let user = self.current_user().ok_or(AccessError::NotSignedIn)?;
        match role {
            Role::Admin if !user.is_admin() => Err(AccessError::AccessDenied { required: role }),
            _ => Ok(user),
        }
    }
}
