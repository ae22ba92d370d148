//! Quantum API client.
//!
//! Owns the session (account, token, connection pool) and dispatches
//! requests with retry and response classification. Endpoint-specific
//! operations live in [`crate::endpoints`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

use crate::classify::ResponseClassifier;
use crate::config::{ClientConfig, Credentials};
use crate::endpoints::{Endpoint, Method, PathArgs};
use crate::envelope::Envelope;
use crate::error::{QuantumError, Result};
use crate::pagination::{PageSource, Paginator};
use crate::params::Params;
use crate::retry::RetryPolicy;

const AUTH_HEADER: &str = "X-Auth-Token";
const LOGIN_METHOD: &str = "API-SECRET";
const USER_AGENT: &str = concat!("quantumapi/", env!("CARGO_PKG_VERSION"));

/// Quantum API client.
///
/// Handles authentication, retries and response classification. Every call
/// awaits its own round trip (and retries) before returning; the client
/// never runs requests concurrently on its own.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use quantumapi::{ClientConfig, QuantumClient};
///
/// # async fn example() -> quantumapi::Result<()> {
/// // Account id and an already issued token
/// let client = QuantumClient::new("741", "eyJhbGciOiJIUzI1NiJ9...")?;
///
/// // Or exchange an API secret for a token
/// let client = QuantumClient::login("api-secret", ClientConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QuantumClient {
    http: Client,
    api_root: Arc<str>,
    api_prefix: Arc<str>,
    account_id: String,
    token: String,
    retry: RetryPolicy,
    classifier: ResponseClassifier,
}

impl std::fmt::Debug for QuantumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantumClient")
            .field("api_root", &self.api_root)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    method: &'static str,
    secret: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(alias = "jwt", deserialize_with = "non_empty_token")]
    token: String,
    #[serde(rename = "accountId", alias = "account_id", deserialize_with = "account_id_text")]
    account_id: String,
}

/// Account ids come back as numbers or strings.
fn account_id_text<'de, D: Deserializer<'de>>(deserializer: D) -> core::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) if !s.is_empty() => Ok(s),
        other => Err(serde::de::Error::custom(format!(
            "expected an account id, got {other}"
        ))),
    }
}

fn non_empty_token<'de, D: Deserializer<'de>>(deserializer: D) -> core::result::Result<String, D::Error> {
    let token = String::deserialize(deserializer)?;
    if token.is_empty() {
        return Err(serde::de::Error::custom("empty token"));
    }
    Ok(token)
}

impl QuantumClient {
    /// Create a client from environment variables.
    ///
    /// See [`Credentials::from_env`] and [`ClientConfig::from_env`] for the
    /// variables read. With `QUANTUM_API_SECRET` this performs the login
    /// exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or login fails.
    pub async fn from_env() -> Result<Self> {
        let credentials = Credentials::from_env()?;
        let config = ClientConfig::from_env()?;
        Self::connect(credentials, config).await
    }

    /// Create a client with an account id and bearer token, using the
    /// default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(account_id: impl ToString, token: &str) -> Result<Self> {
        Self::with_config(account_id, token, ClientConfig::default())
    }

    /// Create a client with an account id, bearer token and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn with_config(account_id: impl ToString, token: &str, config: ClientConfig) -> Result<Self> {
        let http = Self::build_http(&config)?;
        Self::assemble(http, account_id.to_string(), token.to_string(), &config)
    }

    /// Create a client from either form of [`Credentials`].
    ///
    /// # Errors
    ///
    /// Returns an error if construction or the login exchange fails.
    pub async fn connect(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        match credentials {
            Credentials::Token { account_id, token } => {
                Self::with_config(account_id, &token, config)
            }
            Credentials::Secret(secret) => Self::login(&secret, config).await,
        }
    }

    /// Exchange an API secret for a bearer token and account id.
    ///
    /// # Errors
    ///
    /// Returns [`QuantumError::Authentication`] if the login call fails for
    /// any reason: transport error, non-success status, or a response
    /// missing the token or account id.
    #[tracing::instrument(skip(secret, config), fields(api_root = %config.api_root()))]
    pub async fn login(secret: &str, config: ClientConfig) -> Result<Self> {
        let http = Self::build_http(&config)?;
        let url = Url::parse(&format!("{}/login", config.api_root()))?;

        let response = http
            .post(url)
            .json(&LoginRequest {
                method: LOGIN_METHOD,
                secret,
            })
            .send()
            .await
            .map_err(|e| QuantumError::Authentication(format!("login request failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| QuantumError::Authentication(format!("login request failed: {e}")))?;

        if !status.is_success() {
            return Err(QuantumError::Authentication(login_failure(status, &body)));
        }

        let login: LoginResponse = serde_json::from_slice(&body).map_err(|e| {
            QuantumError::Authentication(format!("malformed login response: {e}"))
        })?;

        tracing::debug!(account_id = %login.account_id, "Logged in to Quantum API");
        Self::assemble(http, login.account_id, login.token, &config)
    }

    fn build_http(config: &ClientConfig) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().map_err(QuantumError::HttpError)
    }

    fn assemble(http: Client, account_id: String, token: String, config: &ClientConfig) -> Result<Self> {
        let api_root = config.api_root();
        let api_prefix = Url::parse(&api_root)?.path().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            api_root: api_root.into(),
            api_prefix: api_prefix.into(),
            account_id,
            token,
            retry: config.retry,
            classifier: ResponseClassifier::new(config.number_mode),
        })
    }

    /// The versioned API root every path is appended to.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// The account the session belongs to.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The retry policy applied by [`QuantumClient::get`] and the endpoint
    /// methods.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Make a GET request with the client's retry budget.
    pub async fn get(&self, path: &str, params: &Params) -> Result<Envelope> {
        self.dispatch(Method::Get, path, params, self.retry.retries)
            .await
    }

    /// Write requests are not implemented by the API; always fails with
    /// [`QuantumError::Unsupported`].
    pub async fn post(&self, path: &str, params: &Params) -> Result<Envelope> {
        self.dispatch(Method::Post, path, params, self.retry.retries)
            .await
    }

    /// Always fails with [`QuantumError::Unsupported`].
    pub async fn put(&self, path: &str, params: &Params) -> Result<Envelope> {
        self.dispatch(Method::Put, path, params, self.retry.retries)
            .await
    }

    /// Always fails with [`QuantumError::Unsupported`].
    pub async fn delete(&self, path: &str, params: &Params) -> Result<Envelope> {
        self.dispatch(Method::Delete, path, params, self.retry.retries)
            .await
    }

    /// Send a request, retrying the whole operation up to `retries` extra
    /// times.
    ///
    /// Non-GET methods fail immediately without touching the network.
    /// After the budget is used up the last error is returned as is.
    ///
    /// # Errors
    ///
    /// Returns the final transport, decoding or classified API error.
    #[tracing::instrument(skip(self, params))]
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        retries: u32,
    ) -> Result<Envelope> {
        if method != Method::Get {
            return Err(QuantumError::Unsupported(method));
        }

        let policy = self.retry.with_retries(retries);
        let mut attempt = 0;

        loop {
            match self.send(path, params).await {
                Ok(envelope) => return Ok(envelope),
                Err(err) if policy.should_retry(&err, attempt) => {
                    attempt += 1;
                    tracing::warn!(attempt, retries, error = %err, "Quantum request failed, retrying");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One attempt: build the URL, call, classify.
    async fn send(&self, path: &str, params: &Params) -> Result<Envelope> {
        let url = Url::parse(&format!("{}{}", self.api_root, normalize_path(path)))?;
        let query = params.to_query_pairs();

        let response = self
            .http
            .get(url)
            .header(AUTH_HEADER, &self.token)
            .query(&query)
            .send()
            .await
            .map_err(QuantumError::HttpError)?;

        let status = response.status();
        let body = response.bytes().await.map_err(QuantumError::HttpError)?;
        tracing::debug!(%status, bytes = body.len(), "Quantum response received");

        self.classifier.classify(&body)
    }

    /// Call a catalogued endpoint and return its (first) page.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is not accepted by the endpoint, a
    /// path argument is missing, or the request fails.
    #[tracing::instrument(skip(self, args, params), fields(endpoint = endpoint.name))]
    pub async fn call(&self, endpoint: &Endpoint, args: &PathArgs, params: Params) -> Result<Envelope> {
        endpoint.check_params(&params)?;
        let path = endpoint.path(&self.account_id, args)?;
        self.dispatch(endpoint.method, &path, &params, self.retry.retries)
            .await
    }

    /// Walk every page of a catalogued endpoint.
    ///
    /// Nothing is fetched until the returned [`Paginator`] is polled.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a GET, a parameter is not
    /// accepted, or a path argument is missing.
    pub fn paginate(&self, endpoint: &Endpoint, args: &PathArgs, params: Params) -> Result<Paginator<'_>> {
        if endpoint.method != Method::Get {
            return Err(QuantumError::Unsupported(endpoint.method));
        }
        endpoint.check_params(&params)?;
        let path = endpoint.path(&self.account_id, args)?;
        Ok(Paginator::new(self, path, params))
    }
}

#[async_trait]
impl PageSource for QuantumClient {
    async fn fetch_page(&self, path: &str, params: &Params) -> Result<Envelope> {
        self.get(path, params).await
    }

    fn api_prefix(&self) -> &str {
        &self.api_prefix
    }
}

/// Ensure a path starts with exactly one `/`.
fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

fn login_failure(status: StatusCode, body: &[u8]) -> String {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());

    if message.is_empty() {
        format!("login failed with HTTP {status}")
    } else {
        format!("login failed with HTTP {status}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = QuantumClient::new(741, "test-token").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("QuantumClient"));
        assert!(debug.contains("api_root"));
        assert!(debug.contains("741"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_api_root_and_prefix() {
        let config = ClientConfig::default().with_base_url("http://localhost:9000/");
        let client = QuantumClient::with_config("1", "token", config).unwrap();
        assert_eq!(client.api_root(), "http://localhost:9000/v1");
        assert_eq!(client.api_prefix(), "/v1");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("accounts/1/projects"), "/accounts/1/projects");
        assert_eq!(normalize_path("/accounts/1/projects"), "/accounts/1/projects");
        assert_eq!(normalize_path("//accounts"), "/accounts");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_login_response_accepts_numeric_and_text_ids() {
        let numeric: LoginResponse =
            serde_json::from_str(r#"{"token": "abc", "accountId": 741}"#).unwrap();
        assert_eq!(numeric.account_id, "741");

        let text: LoginResponse =
            serde_json::from_str(r#"{"jwt": "abc", "account_id": "741"}"#).unwrap();
        assert_eq!(text.token, "abc");
        assert_eq!(text.account_id, "741");

        assert!(serde_json::from_str::<LoginResponse>(r#"{"token": "abc"}"#).is_err());
    }

    #[test]
    fn test_login_response_rejects_empty_values() {
        assert!(serde_json::from_str::<LoginResponse>(r#"{"token": "", "accountId": 741}"#).is_err());
        assert!(serde_json::from_str::<LoginResponse>(r#"{"token": "abc", "accountId": ""}"#).is_err());
    }

    #[test]
    fn test_login_failure_message() {
        let msg = login_failure(StatusCode::UNAUTHORIZED, br#"{"message": "invalid secret"}"#);
        assert_eq!(msg, "login failed with HTTP 401 Unauthorized: invalid secret");

        let msg = login_failure(StatusCode::BAD_GATEWAY, b"");
        assert_eq!(msg, "login failed with HTTP 502 Bad Gateway");
    }

    #[tokio::test]
    async fn test_write_methods_are_unsupported() {
        // Unroutable address: any network call would fail differently.
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
        let client = QuantumClient::with_config("1", "token", config).unwrap();
        let params = Params::new();

        for result in [
            client.post("/accounts/1/projects", &params).await,
            client.put("/accounts/1/projects", &params).await,
            client.delete("/accounts/1/projects", &params).await,
        ] {
            assert!(matches!(result, Err(QuantumError::Unsupported(_))));
        }
    }
}
