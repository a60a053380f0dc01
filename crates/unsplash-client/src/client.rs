// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{Result, UnsplashError};
use crate::models::{ApiErrorBody, Photo, SearchResponse};
use crate::search::SearchParams;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};
use url::Url;

const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";
const API_VERSION: &str = "v1";
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("unsplash-client/", env!("CARGO_PKG_VERSION"));

/// Unsplash API client.
///
/// Each call issues exactly one request. Nothing is cached and nothing is
/// retried, so a single client can be shared freely across tasks.
#[derive(Clone)]
pub struct UnsplashClient {
    client: Client,
    base_url: Url,
    access_key: String,
}

impl fmt::Debug for UnsplashClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsplashClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_key", &"<redacted>")
            .finish()
    }
}

impl UnsplashClient {
    /// Create a client for the public API with default settings.
    pub fn new(access_key: impl Into<String>) -> Result<Self> {
        Self::builder(access_key).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(access_key: impl Into<String>) -> UnsplashClientBuilder {
        UnsplashClientBuilder::new(access_key)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Search photos.
    ///
    /// # Example
    /// ```no_run
    /// # use unsplash_client::{SearchParamsBuilder, UnsplashClient};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = UnsplashClient::new("my-access-key")?;
    /// let params = SearchParamsBuilder::new().with_query("lighthouse")?.build()?;
    /// let response = client.search(&params).await?;
    /// for photo in &response.results {
    ///     println!("{} by {}", photo.id, photo.user.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(target = "unsplash", skip(self, params), fields(query = params.query(), page = params.page()))]
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let mut url = self.endpoint(&["search", "photos"])?;
        url.query_pairs_mut().extend_pairs(params.to_query_pairs());

        let response: SearchResponse = self.get(url).await?;
        debug!(
            target: "unsplash",
            total = response.total,
            returned = response.results.len(),
            "search completed"
        );
        Ok(response)
    }

    /// Look up a single photo by ID.
    #[instrument(target = "unsplash", skip(self))]
    pub async fn get_photo(&self, id: &str) -> Result<Photo> {
        let id = id.trim();
        if id.is_empty() {
            return Err(UnsplashError::invalid_field("id", "must not be empty"));
        }

        let url = self.endpoint(&["photos", id])?;
        self.get(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UnsplashError::invalid_field("base_url", "cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Internal method to perform an authenticated GET and decode the body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        trace!(target: "unsplash", "GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Client-ID {}", self.access_key))
            .header("Accept-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        debug!(target: "unsplash", "response status: {}", status);

        let remaining = rate_limit_remaining(response.headers());
        let body = match response.text().await {
            Ok(body) => body,
            // A broken error body must not hide the status it came with.
            Err(e) if !status.is_success() && !e.is_timeout() => {
                debug!(target: "unsplash", error = %e, "failed to read error body");
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        if !status.is_success() {
            let err = error_for_status(status, &body, remaining);
            warn!(target: "unsplash", status = status.as_u16(), error = %err, "request failed");
            return Err(err);
        }

        trace!(target: "unsplash", "response body: {}", body);

        serde_json::from_str(&body).map_err(|e| UnsplashError::Validation {
            status: Some(status.as_u16()),
            field: None,
            message: format!("failed to parse response: {e}"),
        })
    }
}

fn rate_limit_remaining(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RATE_LIMIT_REMAINING_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Map a non-success response onto the error taxonomy.
fn error_for_status(status: StatusCode, body: &str, remaining: Option<u32>) -> UnsplashError {
    let code = status.as_u16();
    match code {
        401 | 403 => UnsplashError::Authentication {
            status: code,
            message: api_message(status, body),
        },
        404 => UnsplashError::NotFound {
            status: code,
            message: api_message(status, body),
        },
        400 | 422 => UnsplashError::Validation {
            status: Some(code),
            field: None,
            message: api_message(status, body),
        },
        429 => UnsplashError::RateLimit {
            status: code,
            message: api_message(status, body),
            remaining,
        },
        500..=599 => UnsplashError::Server {
            status: code,
            message: api_message(status, body),
        },
        _ => UnsplashError::Client {
            status: Some(code),
            message: raw_message(status, body),
        },
    }
}

/// Messages from the `errors` array, else the raw body.
fn api_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors.join("; "),
        _ => raw_message(status, body),
    }
}

fn raw_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

/// Builder for configuring an Unsplash client.
#[derive(Debug)]
pub struct UnsplashClientBuilder {
    access_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl UnsplashClientBuilder {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            base_url: UNSPLASH_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Set a custom base URL (useful for testing with mock servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the deadline for a whole request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the Unsplash client.
    pub fn build(self) -> Result<UnsplashClient> {
        let access_key = self.access_key.trim().to_string();
        if access_key.is_empty() {
            return Err(UnsplashError::invalid_field(
                "access_key",
                "must not be empty",
            ));
        }

        let base_url = Url::parse(&self.base_url)
            .map_err(|e| UnsplashError::invalid_field("base_url", e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UnsplashError::invalid_field(
                "base_url",
                format!("{} cannot be used as a base", self.base_url),
            ));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;

        Ok(UnsplashClient {
            client,
            base_url,
            access_key,
        })
    }
}
