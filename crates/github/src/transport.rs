//! GraphQL transport.
//!
//! [`GraphQlTransport`] is one request/response round trip. [`HttpTransport`]
//! is the production implementation over `reqwest`. It never retries; callers
//! that want resilience inspect [`board::BoardError::retry_policy`] and
//! retry around it.

use async_trait::async_trait;
use board::{BoardError, BoardResult};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::{ApiToken, ConfigError, GithubConfig};
use crate::QueryKind;

/// Executes one catalogued GraphQL request.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Sends `query` with `variables` and returns the untyped `data` payload.
    ///
    /// # Errors
    ///
    /// - [`BoardError::Transport`] on network failure or a non-success HTTP
    ///   status.
    /// - [`BoardError::RemoteQuery`] when the response carries an `errors`
    ///   array.
    /// - [`BoardError::MalformedResponse`] when the body is not JSON or has
    ///   no `data`.
    async fn execute(&self, query: QueryKind, variables: Value) -> BoardResult<Value>;
}

/// [`GraphQlTransport`] over HTTPS with bearer-token authentication.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
    token: ApiToken,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Builds a transport from validated configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &GithubConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token()?.clone(),
        })
    }
}

#[async_trait]
impl GraphQlTransport for HttpTransport {
    #[tracing::instrument(skip_all, fields(query = %query))]
    async fn execute(&self, query: QueryKind, variables: Value) -> BoardResult<Value> {
        debug!("sending GraphQL request");
        let body = json!({
            "query": query.template(),
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| BoardError::Transport {
                status: None,
                message: e.to_string(),
                retry_after_secs: None,
            })?;

        let response = check_response(response).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| BoardError::malformed(format!("response body is not JSON: {e}")))?;

        into_data(payload)
    }
}

/// Maps a non-success HTTP status to [`BoardError::Transport`].
pub(crate) async fn check_response(response: reqwest::Response) -> BoardResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after_secs = parse_retry_after(&response);
    Err(BoardError::Transport {
        status: Some(status.as_u16()),
        message: response.text().await.unwrap_or_default(),
        retry_after_secs,
    })
}

fn parse_retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Splits a GraphQL response body into its `data` payload or an error.
///
/// A non-empty `errors` array wins over any partial `data`.
pub(crate) fn into_data(mut payload: Value) -> BoardResult<Value> {
    if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            return Err(BoardError::RemoteQuery {
                errors: errors.clone(),
            });
        }
    }
    match payload.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Err(BoardError::malformed("response has no 'data'")),
        Some(data) => Ok(data),
    }
}
