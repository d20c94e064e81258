use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// Everything needed to (re)issue a call: the client replays it verbatim
/// after a credential refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(ApiError::Encode)?);
        Ok(self)
    }
}

/// A request together with whether it has already been replayed after a
/// refresh. Once `attempted` is set, a 401 is returned to the caller as is.
#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
    pub request: PendingRequest,
    pub attempted: bool,
}

impl Attempt {
    pub fn first(request: PendingRequest) -> Self {
        Self {
            request,
            attempted: false,
        }
    }

    /// Consume a fresh attempt and yield its replay. Returns `None` when the
    /// request was already retried once.
    pub fn into_retry(self) -> Option<Self> {
        if self.attempted {
            None
        } else {
            Some(Self {
                request: self.request,
                attempted: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn retry_is_granted_once() {
        let attempt = Attempt::first(PendingRequest::get("/auth/me"));
        let retry = attempt.into_retry();
        assert_eq!(retry.as_ref().map(|a| a.attempted), Some(true));
        assert_eq!(retry.and_then(Attempt::into_retry), None);
    }

    #[test]
    fn query_pairs_keep_insertion_order() {
        let req = PendingRequest::get("/feedback/nearby")
            .with_query("limit", 10)
            .with_query("lat", 17.5);
        assert_eq!(
            req.query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("lat".to_string(), "17.5".to_string()),
            ]
        );
    }
}
