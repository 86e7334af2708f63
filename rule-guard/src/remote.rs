//! Remote validation transport.
//!
//! The `unique` check does not talk to the network itself. It calls an
//! [`HttpRequester`], injected per rule or installed process-wide with
//! [`set_http_requester`]. A `reqwest`-backed [`ReqwestRequester`] is provided
//! behind the default `http` feature; tests and non-HTTP backends can use
//! [`requester_fn`].

use crate::error::Result;
use crate::value::Params;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

/// A response from a remote validation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body
    pub data: serde_json::Value,
}

impl HttpResponse {
    /// Creates a `200` response with the given body.
    pub fn new(data: serde_json::Value) -> Self {
        Self { status: 200, data }
    }

    /// Returns true if the body reports that the value already exists.
    ///
    /// A non-empty array means "exists", as does an object whose `exists`
    /// field is `true` or `1`.
    ///
    /// ```rust
    /// use rule_guard::remote::HttpResponse;
    /// use serde_json::json;
    ///
    /// assert!(HttpResponse::new(json!([{"id": 1}])).exists());
    /// assert!(HttpResponse::new(json!({"exists": 1})).exists());
    /// assert!(!HttpResponse::new(json!({"exists": "yes"})).exists());
    /// assert!(!HttpResponse::new(json!([])).exists());
    /// ```
    pub fn exists(&self) -> bool {
        match &self.data {
            serde_json::Value::Array(items) => !items.is_empty(),
            serde_json::Value::Object(body) => match body.get("exists") {
                Some(serde_json::Value::Bool(flag)) => *flag,
                Some(serde_json::Value::Number(n)) => n.as_f64() == Some(1.0),
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<serde_json::Value> for HttpResponse {
    fn from(data: serde_json::Value) -> Self {
        Self::new(data)
    }
}

/// Capability to issue a GET request for remote validation.
///
/// `params` holds the query parameters left after path substitution.
#[async_trait]
pub trait HttpRequester: Send + Sync {
    /// Sends the request and decodes the response body.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success responses are errors. The `unique`
    /// check turns them into the `error` template message.
    async fn get(&self, url: &str, params: &Params) -> Result<HttpResponse>;
}

struct FnRequester<F, Fut> {
    func: F,
    _future: PhantomData<fn() -> Fut>,
}

#[async_trait]
impl<F, Fut> HttpRequester for FnRequester<F, Fut>
where
    F: Fn(String, Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse>> + Send,
{
    async fn get(&self, url: &str, params: &Params) -> Result<HttpResponse> {
        (self.func)(url.to_string(), params.clone()).await
    }
}

/// Adapts an async closure into an [`HttpRequester`].
///
/// ```rust
/// use rule_guard::remote::{requester_fn, HttpResponse};
/// use serde_json::json;
///
/// let requester = requester_fn(|url, _params| async move {
///     Ok(HttpResponse::new(json!({ "exists": url.ends_with("/taken") })))
/// });
/// # let _ = requester;
/// ```
pub fn requester_fn<F, Fut>(func: F) -> Arc<dyn HttpRequester>
where
    F: Fn(String, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
{
    Arc::new(FnRequester {
        func,
        _future: PhantomData,
    })
}

static HTTP_REQUESTER: Lazy<RwLock<Option<Arc<dyn HttpRequester>>>> =
    Lazy::new(|| RwLock::new(None));

/// Installs the process-wide requester used by rules built afterwards.
pub fn set_http_requester(requester: Arc<dyn HttpRequester>) {
    *HTTP_REQUESTER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(requester);
    tracing::debug!("Installed HTTP requester");
}

/// Removes the process-wide requester.
pub fn clear_http_requester() {
    *HTTP_REQUESTER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

/// Returns the process-wide requester, if one is installed.
pub fn http_requester() -> Option<Arc<dyn HttpRequester>> {
    HTTP_REQUESTER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(feature = "http")]
pub use self::reqwest_requester::ReqwestRequester;

#[cfg(feature = "http")]
mod reqwest_requester {
    use super::{HttpRequester, HttpResponse};
    use crate::config::HttpConfig;
    use crate::error::{Result, RuleError};
    use crate::value::Params;
    use async_trait::async_trait;
    use tracing::instrument;

    /// [`HttpRequester`] backed by `reqwest`.
    ///
    /// Relative URLs are joined onto [`HttpConfig::base_url`]; configured
    /// headers are sent with every request.
    #[derive(Debug, Clone)]
    pub struct ReqwestRequester {
        client: reqwest::Client,
        config: HttpConfig,
    }

    impl ReqwestRequester {
        /// Creates a requester with the given configuration.
        ///
        /// # Errors
        ///
        /// Returns [`RuleError::Configuration`] if the client cannot be built.
        pub fn new(config: HttpConfig) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|e| {
                    RuleError::Configuration(format!("Failed to build HTTP client: {e}"))
                })?;

            Ok(Self { client, config })
        }

        /// The configuration this requester was built with.
        pub fn config(&self) -> &HttpConfig {
            &self.config
        }

        pub(crate) fn resolve_url(&self, url: &str) -> String {
            if url.starts_with("http://") || url.starts_with("https://") {
                return url.to_string();
            }
            match &self.config.base_url {
                Some(base) => format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                ),
                None => url.to_string(),
            }
        }
    }

    #[async_trait]
    impl HttpRequester for ReqwestRequester {
        #[instrument(skip(self, params), fields(param_count = params.len()))]
        async fn get(&self, url: &str, params: &Params) -> Result<HttpResponse> {
            let query: Vec<(&str, String)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), value.to_text()))
                .collect();

            let mut request = self.client.get(self.resolve_url(url)).query(&query);
            for (key, value) in &self.config.headers {
                request = request.header(key, value);
            }

            let response = request
                .send()
                .await
                .map_err(|e| RuleError::http(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(RuleError::http_status(status.as_u16(), message));
            }

            let data = response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| RuleError::http(format!("Invalid response body: {e}")))?;

            tracing::debug!(status = status.as_u16(), "Remote validation response");
            Ok(HttpResponse {
                status: status.as_u16(),
                data,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_resolve_url() {
            let requester = ReqwestRequester::new(HttpConfig {
                base_url: Some("https://api.example.com/".to_string()),
                ..HttpConfig::default()
            })
            .unwrap();
            assert_eq!(
                requester.resolve_url("/user/5"),
                "https://api.example.com/user/5"
            );
            assert_eq!(
                requester.resolve_url("http://other.test/x"),
                "http://other.test/x"
            );
        }

        #[test]
        fn test_resolve_url_without_base() {
            let requester = ReqwestRequester::new(HttpConfig::default()).unwrap();
            assert_eq!(requester.resolve_url("api/user/5"), "api/user/5");
        }
    }
}

impl fmt::Debug for dyn HttpRequester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HttpRequester")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exists_shapes() {
        assert!(HttpResponse::new(json!({"exists": true})).exists());
        assert!(HttpResponse::new(json!({"exists": 1})).exists());
        assert!(HttpResponse::new(json!({"exists": 1.0})).exists());
        assert!(!HttpResponse::new(json!({"exists": false})).exists());
        assert!(!HttpResponse::new(json!({"exists": 0})).exists());
        assert!(!HttpResponse::new(json!({})).exists());
        assert!(!HttpResponse::new(json!(null)).exists());
        assert!(HttpResponse::new(json!(["taken"])).exists());
        assert!(!HttpResponse::new(json!([])).exists());
    }

    #[tokio::test]
    async fn test_requester_fn_passes_url_and_params() {
        let requester = requester_fn(|url, params| async move {
            Ok(HttpResponse::new(json!({
                "url": url,
                "count": params.len(),
            })))
        });

        let mut params = Params::new();
        params.insert("name".to_string(), "a".into());
        let response = requester.get("api/user/5", &params).await.unwrap();
        assert_eq!(response.data["url"], "api/user/5");
        assert_eq!(response.data["count"], 1);
    }
}
