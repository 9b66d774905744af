//! HTTP implementation of the gateway traits over the StudyAI REST API.

mod learn_api;
mod payload;
mod progress_api;
mod quiz_api;
mod syllabus_api;

use std::env;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::contract::GatewayError;

/// Timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Connection settings for the REST backend.
///
/// The bearer token is an explicitly passed value; acquisition and refresh
/// belong to an external collaborator.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl GatewayConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the backend location from the environment.
    ///
    /// Returns `None` when `STUDYAI_API_BASE_URL` is unset or unparseable.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("STUDYAI_API_BASE_URL").ok()?;
        let base_url = Url::parse(base_url.trim()).ok()?;
        let mut config = Self::new(base_url);
        if let Ok(token) = env::var("STUDYAI_API_TOKEN") {
            if !token.trim().is_empty() {
                config.token = Some(token);
            }
        }
        if let Ok(secs) = env::var("STUDYAI_API_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.timeout = Duration::from_secs(secs);
            }
        }
        Some(config)
    }
}

//
// ─── CLIENT ────────────────────────────────────────────────────────────────────
//

/// `reqwest`-backed gateway; one instance serves all endpoint families.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl HttpGateway {
    /// Build a gateway with the configured timeout baked into the client.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.endpoint(path));
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, GatewayError> {
        Self::send(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        Self::send(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = builder.send().await.map_err(map_transport)?;
        Self::decode(response).await
    }

    /// Like [`Self::send`], but maps a 404 to `Ok(None)`.
    pub(crate) async fn send_optional<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<Option<T>, GatewayError> {
        let response = builder.send().await.map_err(map_transport)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::decode(response).await?))
    }

    /// Sends a request whose response body is irrelevant.
    pub(crate) async fn send_expect_ok(builder: RequestBuilder) -> Result<(), GatewayError> {
        let response = builder.send().await.map_err(map_transport)?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::InvalidPayload(e.to_string()))
    }

    async fn status_error(response: Response) -> GatewayError {
        let status = response.status().as_u16();
        let detail = match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                detail: Some(detail),
            }) => detail,
            _ => "unexpected backend error".to_string(),
        };
        tracing::debug!(status, %detail, "backend rejected request");
        GatewayError::Status { status, detail }
    }
}

fn map_transport(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = GatewayConfig::new(Url::parse("http://localhost:8000/api/v1/").unwrap());
        let gateway = HttpGateway::new(config).unwrap();
        assert_eq!(
            gateway.endpoint("/learn/5"),
            "http://localhost:8000/api/v1/learn/5"
        );
        assert_eq!(gateway.endpoint("syllabus"), "http://localhost:8000/api/v1/syllabus");
    }

    #[test]
    fn config_builder_overrides() {
        let config = GatewayConfig::new(Url::parse("http://localhost:8000").unwrap())
            .with_token("secret")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
