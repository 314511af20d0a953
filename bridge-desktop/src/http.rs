//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("quran-reader-core/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECTIVITY_PROBE: &str = "https://api.alquran.cloud/v1/meta";

/// Reqwest-based HTTP client implementation
///
/// Performs one request per [`HttpClient::execute`] call. Retry scheduling
/// belongs to the caller's `RetryPolicy`, so nothing is retried here.
pub struct ReqwestHttpClient {
    client: Client,
    default_timeout: Duration,
    probe_url: String,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new HTTP client with custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BridgeError::NotAvailable(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self::with_client(client, timeout))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
            probe_url: CONNECTIVITY_PROBE.to_string(),
        }
    }

    /// URL hit by [`HttpClient::is_connected`]
    pub fn with_probe_url(mut self, url: impl Into<String>) -> Self {
        self.probe_url = url.into();
        self
    }

    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }

    fn build_request(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            req = req.header(key, value);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    fn map_send_error(&self, request: &HttpRequest, error: reqwest::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::Timeout(request.timeout.unwrap_or(self.default_timeout))
        } else if error.is_connect() {
            BridgeError::OperationFailed(format!("Connection to {} failed: {}", request.url, error))
        } else {
            BridgeError::OperationFailed(format!("Request to {} failed: {}", request.url, error))
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = ?request.method, url = %request.url, "Executing HTTP request");

        let response = self
            .build_request(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %request.url, error = %e, "HTTP request failed");
                self.map_send_error(&request, e)
            })?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(&request, e))?;

        debug!(url = %request.url, status, bytes = body.len(), "HTTP response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn is_connected(&self) -> bool {
        self.client
            .head(&self.probe_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }
}
