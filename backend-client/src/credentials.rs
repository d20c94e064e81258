use std::sync::Mutex;

/// Shared source of the bearer credentials attached to outbound requests.
///
/// The client reads the access token for every request it dispatches, so a
/// replacement made through [`CredentialStore::replace_access_token`] is seen
/// by every request issued afterwards.
pub trait CredentialStore: Send + Sync {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Store a freshly minted access token. Implementations must update the
    /// in-memory value before returning, even when persisting it fails.
    fn replace_access_token(&self, access_token: &str) -> std::io::Result<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Tokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Credentials that live only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryCredentials {
    tokens: Mutex<Tokens>,
}

impl InMemoryCredentials {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            tokens: Mutex::new(Tokens {
                access_token,
                refresh_token,
            }),
        }
    }

    pub fn set_tokens(&self, access_token: Option<String>, refresh_token: Option<String>) {
        if let Ok(mut guard) = self.tokens.lock() {
            *guard = Tokens {
                access_token,
                refresh_token,
            };
        }
    }

    pub fn clear(&self) {
        self.set_tokens(None, None);
    }
}

impl CredentialStore for InMemoryCredentials {
    fn access_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .ok()
            .and_then(|guard| guard.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .ok()
            .and_then(|guard| guard.refresh_token.clone())
    }

    fn replace_access_token(&self, access_token: &str) -> std::io::Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| std::io::Error::other("credential lock poisoned"))?;
        guard.access_token = Some(access_token.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_keeps_refresh_token() {
        let creds = InMemoryCredentials::new(Some("a1".to_string()), Some("r1".to_string()));
        creds.replace_access_token("a2").unwrap();
        assert_eq!(creds.access_token().as_deref(), Some("a2"));
        assert_eq!(creds.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn clear_drops_both_tokens() {
        let creds = InMemoryCredentials::new(Some("a1".to_string()), Some("r1".to_string()));
        creds.clear();
        assert_eq!(creds.access_token(), None);
        assert_eq!(creds.refresh_token(), None);
    }
}
