use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy, StatusCode};
use url::Url;

use crate::config::HttpConfig;
use crate::{Error, Result};

const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 500;

/// Raw response for a navigation target
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final URL after redirects
    pub url: Url,
    pub status: u16,
    pub body: String,
}

impl FetchedDocument {
    /// Only a plain 200 counts as a usable document
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Retrieves the raw HTML of a navigation target
///
/// Non-success statuses come back as `Ok` with the status set; `Err` is
/// reserved for transport failures.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument>;
}

/// Document fetcher over reqwest
pub struct HttpFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            max_bytes: config.max_document_bytes,
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument> {
        tracing::info!("Fetching document: {}", url);

        let (status, final_url, body) = fetch_with_retry(&self.client, url).await?;
        ensure_content_size(body.len(), self.max_bytes, url)?;

        Ok(FetchedDocument {
            url: final_url,
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

/// Build the shared HTTP client with optional proxy
pub(crate) fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .default_headers(build_headers())
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(ref proxy) = config.proxy_url {
        let proxy =
            Proxy::all(proxy).map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
        builder = builder.proxy(proxy);
        tracing::info!("Using HTTP proxy for document fetching");
    }

    builder.build().map_err(Error::Http)
}

fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

/// GET with retry and exponential backoff on 429/503 and transport errors
pub(crate) async fn fetch_with_retry(client: &Client, url: &Url) -> Result<(StatusCode, Url, Bytes)> {
    let mut last_error = None;
    let mut delay_ms = INITIAL_RETRY_DELAY_MS;

    for attempt in 0..MAX_RETRIES {
        tracing::debug!("Fetch attempt {} for {}", attempt + 1, url);

        match client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                let final_url = response.url().clone();

                if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE {
                    tracing::warn!("Received {} for {}, retrying after {}ms...", status, url, delay_ms);
                    last_error = Some(Error::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                } else {
                    match response.bytes().await {
                        Ok(bytes) => return Ok((status, final_url, bytes)),
                        Err(e) => {
                            tracing::warn!("Failed to read response body: {}", e);
                            last_error = Some(Error::Http(e));
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Request failed for {} (attempt {}): {}", url, attempt + 1, e);
                last_error = Some(Error::Http(e));
            }
        }

        if attempt < MAX_RETRIES - 1 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            delay_ms *= 2;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        Error::Other(format!("Failed to fetch URL after {} retries: {}", MAX_RETRIES, url))
    }))
}

pub(crate) fn ensure_content_size(size: usize, limit: usize, url: &Url) -> Result<()> {
    if size > limit {
        return Err(Error::DocumentTooLarge {
            size,
            url: url.to_string(),
        });
    }
    Ok(())
}
