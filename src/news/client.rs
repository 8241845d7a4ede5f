use super::types::{ApiErrorBody, HeadlineQuery, HeadlinePage, HeadlinesResponse};
use super::PAGE_SIZE;
use futures::StreamExt;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const MAX_ERROR_BODY_SIZE: usize = 64 * 1024;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

/// Connection settings for the headlines API.
#[derive(Debug)]
pub struct NewsApiSettings {
    pub api_key: SecretString,
    pub base_url: String,
    pub country: String,
    pub timeout: Duration,
}

/// Client for the top-headlines endpoint.
///
/// Cheap to clone: the HTTP client is pooled and the settings are shared.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    settings: Arc<NewsApiSettings>,
    endpoint: Url,
}

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Resolve the endpoint URL, rejecting plain HTTP for anything but localhost.
fn endpoint_for(base_url: &str) -> Result<Url, NewsError> {
    let base = base_url.trim_end_matches('/');

    if !base.starts_with("https://") {
        let is_localhost =
            base.starts_with("http://127.0.0.1") || base.starts_with("http://localhost");
        if !is_localhost {
            tracing::error!(base_url = %base, "Rejecting non-HTTPS base URL (HTTPS required except for localhost)");
            return Err(NewsError::InsecureBaseUrl);
        }
        tracing::warn!(base_url = %base, "Using non-HTTPS news API base URL (localhost only)");
    }

    Ok(Url::parse(&format!("{}/top-headlines", base))?)
}

impl NewsClient {
    pub fn new(settings: NewsApiSettings) -> Result<Self, NewsError> {
        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(settings.timeout)
            .build()?;
        Self::with_http_client(http, settings)
    }

    /// Build around an existing `reqwest::Client` (tests, custom TLS setups).
    pub fn with_http_client(
        http: reqwest::Client,
        settings: NewsApiSettings,
    ) -> Result<Self, NewsError> {
        let endpoint = endpoint_for(&settings.base_url)?;
        if settings.base_url != DEFAULT_BASE_URL {
            tracing::info!(base_url = %settings.base_url, "Using custom news API base URL");
        }
        Ok(Self {
            http,
            settings: Arc::new(settings),
            endpoint,
        })
    }

    /// Full request URL for a query. The API key is not part of it.
    pub fn request_url(&self, query: &HeadlineQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("country", &self.settings.country);
            pairs.append_pair("category", query.category.as_str());
            if !query.query.is_empty() {
                pairs.append_pair("q", &query.query);
            }
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("pageSize", &PAGE_SIZE.to_string());
        }
        url
    }

    /// Fetch one page of headlines.
    ///
    /// Any non-2xx status is a failure; the API's error code is only logged.
    pub async fn fetch_headlines(&self, query: &HeadlineQuery) -> Result<HeadlinePage, NewsError> {
        let timeout = self.settings.timeout;
        tokio::time::timeout(timeout, self.exchange(query))
            .await
            .map_err(|_| NewsError::Timeout(timeout.as_secs()))?
    }

    async fn exchange(&self, query: &HeadlineQuery) -> Result<HeadlinePage, NewsError> {
        let url = self.request_url(query);
        tracing::debug!(
            category = query.category.as_str(),
            query = %query.query,
            page = query.page,
            "Requesting headlines"
        );

        let response = self
            .http
            .get(url)
            .header("X-Api-Key", self.settings.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if let Ok(body) = read_limited(response, MAX_ERROR_BODY_SIZE).await {
                if let Ok(err) = serde_json::from_slice::<ApiErrorBody>(&body) {
                    tracing::warn!(
                        status = status.as_u16(),
                        code = err.code.as_deref().unwrap_or("unknown"),
                        message = err.message.as_deref().unwrap_or(""),
                        "Headlines API returned an error"
                    );
                }
            }
            return Err(NewsError::HttpStatus(status.as_u16()));
        }

        let body = read_limited(response, MAX_RESPONSE_SIZE).await?;
        let decoded: HeadlinesResponse = serde_json::from_slice(&body)?;
        tracing::debug!(
            page = query.page,
            count = decoded.articles.len(),
            total = ?decoded.total_results,
            "Headlines received"
        );
        Ok(decoded.into())
    }
}

async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, NewsError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(NewsError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
