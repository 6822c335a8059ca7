use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER},
    Client, Method, RequestBuilder, Url,
};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    backoff::RetryPolicy,
    config::ConfigError,
    error::{classify, ApiError, Failure},
    retry::{run_with_retry, RetryCallbacks},
};

use super::{
    cache_bust::{CacheBuster, CACHE_BUST_PARAM},
    config::ClientConfig,
};

/// Placeholder body for calls that send none.
pub const NO_BODY: Option<&()> = None;

/// Client for the scraping service.
///
/// Every failure is returned as an already-classified [`ApiError`]; callers
/// never see transport errors. The client does not report errors to users,
/// that is left to the caller.
///
/// Cloning is cheap: configuration, connection pool and cache-bust counter
/// are shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    base_url: Arc<str>,
    http: Client,
    cache_buster: Arc<CacheBuster>,
}

impl ApiClient {
    /// Builds a client, validating the timeout, base URL and default retry policy.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        if config.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .default_headers(default_headers())
            .build()?;
        Self::with_client(http, config)
    }

    /// Builds a client around an existing `reqwest::Client`.
    pub fn with_client(http: Client, config: ClientConfig) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&config.base_url)?;
        config.retry.validate().map_err(ConfigError::InvalidPolicy)?;
        Ok(Self {
            config: Arc::new(config),
            base_url: base_url.into(),
            http,
            cache_buster: Arc::new(CacheBuster::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The policy used by retrying calls that do not supply one.
    pub fn default_policy(&self) -> &RetryPolicy {
        &self.config.retry
    }

    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, query, NO_BODY).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, path, &[], NO_BODY).await
    }

    /// Performs a single attempt.
    ///
    /// GET requests carry a fresh cache-defeating `_t` parameter. An empty
    /// success body decodes as JSON `null`.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }
        if method == Method::GET {
            request = request.query(&[(CACHE_BUST_PARAM, self.cache_buster.next_value())]);
        }
        if let Some(body) = body {
            if log::log_enabled!(log::Level::Trace) {
                if let Ok(json) = serde_json::to_string(body) {
                    log::trace!("{method} {url} payload: {json}");
                }
            }
            request = request.json(body);
        }
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        self.send(request, &method, &url).await
    }

    /// Performs the call through the retry engine.
    ///
    /// Only wrap idempotent calls: the request may be sent up to
    /// `max_attempts` times. `None` uses [`ApiClient::default_policy`].
    pub async fn request_with_retry<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        policy: Option<&RetryPolicy>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let policy = policy.unwrap_or(&self.config.retry);
        run_with_retry(
            || self.request(method.clone(), path, query, body),
            policy,
            &RetryCallbacks::new(),
        )
        .await
    }

    async fn send<T>(
        &self,
        request: RequestBuilder,
        method: &Method,
        url: &str,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let resp = request.send().await.map_err(classify)?;
        let status = resp.status();
        log::debug!("{method} {url} -> {status}");

        if !status.is_success() {
            let retry_after = parse_retry_after(resp.headers());
            let body = resp.text().await.ok().filter(|b| !b.is_empty());
            return Err(classify(Failure::Response {
                status: status.as_u16(),
                body,
                retry_after,
            }));
        }

        let bytes = resp.bytes().await.map_err(classify)?;
        decode(&bytes)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed =
        Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl(format!("{raw}: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{raw}: unsupported scheme {}",
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(payload).map_err(classify)
}
