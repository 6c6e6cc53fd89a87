use crate::config::ScraperConfig;
use crate::scraper::error::TransportError;
use crate::scraper::{Fetched, Fetcher};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

pub struct HttpClient {
    inner: reqwest::Client,
    config: ScraperConfig,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);

        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            inner,
            config: config.clone(),
        })
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.request_delay_ms.max(100) * 2u64.pow(attempt))
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    /// GET with a polite delay; retries rate limiting and transport errors.
    async fn fetch(&self, url: &Url) -> Result<Fetched, TransportError> {
        sleep(Duration::from_millis(self.config.request_delay_ms)).await;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            debug!("GET {} (attempt {})", url, attempt);
            let retries_left = attempt <= self.config.max_retries;

            match self.inner.get(url.clone()).send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if (status == 429 || status == 503) && retries_left {
                        let backoff = self.backoff(attempt);
                        warn!("Rate limited ({}) on attempt {}, sleeping {:?}", status, attempt, backoff);
                        sleep(backoff).await;
                        continue;
                    }

                    let content_type = resp
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    let body = resp.bytes().await.map_err(|source| TransportError::Request {
                        url: url.to_string(),
                        source,
                    })?;
                    return Ok(Fetched {
                        status,
                        content_type,
                        body: body.to_vec(),
                    });
                }
                Err(e) if retries_left => {
                    let backoff = self.backoff(attempt);
                    warn!("Request failed on attempt {}: {}", attempt, e);
                    sleep(backoff).await;
                }
                Err(source) => {
                    return Err(TransportError::Request {
                        url: url.to_string(),
                        source,
                    });
                }
            }
        }
    }
}
