pub mod cleaner;
pub mod error;
pub mod http_client;
pub mod parsers;
pub mod sections;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use tracing::{info, warn};
use url::Url;

use self::error::TransportError;
use self::parsers::{parse_page, ParsedPage};

// ── Fetch collaborator ────────────────────────────────────────────────────────

/// Status and body of a GET, whatever the status was.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    /// Raw `Content-Type` header, when the server sent one.
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Fetched {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Label from the `charset=` parameter of the content type.
    pub fn charset(&self) -> Option<&str> {
        let content_type = self.content_type.as_deref()?;
        regex!(r#"(?i)charset\s*=\s*"?([^";\s]+)"#)
            .captures(content_type)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Decode the body with the declared charset. A BOM wins over the
    /// header; unknown or missing labels fall back to UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        let encoding = match self.charset() {
            Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
                warn!("unknown charset '{}', decoding as UTF-8", label);
                UTF_8
            }),
            None => UTF_8,
        };

        let (text, used, had_errors) = encoding.decode(&self.body);
        if had_errors {
            warn!("malformed {} in response body", used.name());
        }
        text
    }
}

/// Swappable byte source for notice pages and unit images.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Fetched, TransportError>;
}

// ── Notice pages ──────────────────────────────────────────────────────────────

/// Fetch a notice page and parse every unit block on it.
pub async fn scrape_notice(fetcher: &dyn Fetcher, url: &Url) -> anyhow::Result<ParsedPage> {
    info!("Fetching {}...", url);

    let page = fetcher.fetch(url).await?;
    if !page.is_success() {
        return Err(TransportError::Status {
            url: url.to_string(),
            status: page.status,
        }
        .into());
    }

    Ok(parse_page(&page.text(), Some(url))?)
}
