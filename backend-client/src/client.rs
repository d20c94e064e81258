use std::sync::Arc;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::credentials::CredentialStore;
use crate::credentials::InMemoryCredentials;
use crate::error::ApiError;
use crate::error::Result;
use crate::error::extract_message;
use crate::request::Attempt;
use crate::request::PendingRequest;
use crate::types::RefreshRequest;
use crate::types::RefreshResponse;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

const DEFAULT_USER_AGENT: &str = "saferoute-cli";

/// HTTP client for the SafeRoute backend.
///
/// Every request carries the current access token from the attached
/// [`CredentialStore`]. A 401 triggers at most one `POST /auth/refresh`
/// followed by a single replay of the original request.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
    credentials: Arc<dyn CredentialStore>,
    user_agent: Option<HeaderValue>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            base_url,
            http,
            credentials: Arc::new(InMemoryCredentials::default()),
            user_agent: None,
        })
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        if let Ok(hv) = HeaderValue::from_str(&ua.into()) {
            self.user_agent = Some(hv);
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn base_headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(ua) = &self.user_agent {
            h.insert(USER_AGENT, ua.clone());
        } else {
            h.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        }
        h
    }

    fn headers(&self) -> HeaderMap {
        let mut h = self.base_headers();
        if let Some(token) = self.credentials.access_token().filter(|t| !t.is_empty()) {
            let value = format!("Bearer {token}");
            if let Ok(hv) = HeaderValue::from_str(&value) {
                h.insert(AUTHORIZATION, hv);
            }
        }
        h
    }

    async fn dispatch(&self, request: &PendingRequest) -> Result<reqwest::Response> {
        let url = self.url(&request.path);
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(self.headers());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        debug!(method = %request.method, %url, "dispatching request");
        builder
            .send()
            .await
            .map_err(|source| ApiError::Transport { url, source })
    }

    /// Issue `request` and return the raw body of a successful response.
    ///
    /// Non-success statuses come back as [`ApiError::Status`]. A 401 is
    /// retried once after a successful refresh; if the refresh is impossible
    /// or fails, or the replay is rejected again, the 401 is returned.
    pub async fn execute(&self, request: PendingRequest) -> Result<String> {
        let mut attempt = Attempt::first(request);
        loop {
            let response = self.dispatch(&attempt.request).await?;
            let url = self.url(&attempt.request.path);
            if response.status() != StatusCode::UNAUTHORIZED {
                return ensure_success(&attempt.request.method, &url, response).await;
            }

            let unauthorized = status_error(&attempt.request.method, &url, response).await;
            attempt = match attempt.into_retry() {
                Some(retry) => retry,
                None => return Err(unauthorized),
            };
            if !self.refresh_after_unauthorized().await {
                return Err(unauthorized);
            }
            debug!(%url, "replaying request with refreshed credentials");
        }
    }

    async fn refresh_after_unauthorized(&self) -> bool {
        let Some(refresh_token) = self.credentials.refresh_token().filter(|t| !t.is_empty())
        else {
            debug!("no refresh token available; not retrying");
            return false;
        };
        match self.refresh_access_token(&refresh_token).await {
            Ok(access_token) => {
                if let Err(err) = self.credentials.replace_access_token(&access_token) {
                    warn!("failed to persist refreshed access token: {err}");
                }
                true
            }
            Err(err) => {
                warn!("token refresh failed: {err}");
                false
            }
        }
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Sent without the bearer header and never retried. The caller decides
    /// what to do with the returned token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let url = self.url("/auth/refresh");
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let response = self
            .http
            .post(&url)
            .headers(self.base_headers())
            .json(&body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let text = ensure_success(&Method::POST, &url, response).await?;
        let parsed: RefreshResponse = decode(&url, &text)?;
        Ok(parsed.access_token)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: PendingRequest) -> Result<T> {
        let url = self.url(&request.path);
        let body = self.execute(request).await?;
        decode(&url, &body)
    }

    /// Like [`Client::send_json`] for list endpoints: a body that is not a
    /// JSON array yields an empty list.
    pub(crate) async fn send_list<T: DeserializeOwned>(
        &self,
        request: PendingRequest,
    ) -> Result<Vec<T>> {
        let url = self.url(&request.path);
        let body = self.execute(request).await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(items)) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item).map_err(|source| ApiError::Decode {
                        url: url.clone(),
                        source,
                        body: body.clone(),
                    })
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// For endpoints whose body is either empty or `{ "message": ... }`.
    pub(crate) async fn send_for_message(&self, request: PendingRequest) -> Result<Option<String>> {
        let body = self.execute(request).await?;
        Ok(extract_message(&body))
    }
}

/// Trim trailing slashes and make sure the base URL is an absolute http(s) URL.
pub fn normalize_base_url(input: &str) -> Result<String> {
    let mut base_url = input.trim().to_string();
    while base_url.ends_with('/') {
        base_url.pop();
    }
    let parsed =
        url::Url::parse(&base_url).map_err(|err| ApiError::BaseUrl(format!("{input}: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(base_url),
        other => Err(ApiError::BaseUrl(format!(
            "{input}: unsupported scheme {other}"
        ))),
    }
}

async fn ensure_success(method: &Method, url: &str, response: reqwest::Response) -> Result<String> {
    if !response.status().is_success() {
        return Err(status_error(method, url, response).await);
    }
    response.text().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })
}

async fn status_error(method: &Method, url: &str, response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status {
        method: method.clone(),
        url: url.to_string(),
        status,
        message: extract_message(&body),
        body,
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
        body: body.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        assert_eq!(
            normalize_base_url("http://localhost:5000/api//").unwrap(),
            "http://localhost:5000/api"
        );
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(matches!(
            normalize_base_url("ftp://example.com/api"),
            Err(ApiError::BaseUrl(_))
        ));
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn bearer_header_follows_the_credential_store() {
        let creds = Arc::new(InMemoryCredentials::default());
        let client = Client::new(DEFAULT_API_BASE_URL)
            .unwrap()
            .with_credentials(creds.clone());
        assert!(client.headers().get(AUTHORIZATION).is_none());

        creds.set_tokens(Some("a1".to_string()), None);
        assert_eq!(
            client.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer a1")
        );
    }
}
