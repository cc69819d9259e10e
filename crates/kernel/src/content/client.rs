//! Remote content service client.
//!
//! Reads pages and site settings from a Strapi-style REST API. Every failure
//! (timeout, refused connection, non-success status, malformed payload) is
//! logged and converted to an empty or not-found result at this boundary;
//! callers decide what to show instead.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::model::{MediaRef, Page, SiteSettings, resolve_media_url};

/// Per-call wall-clock budget when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Read access to pages and site settings.
///
/// Implementations never fail: an unavailable record is `None` or an empty
/// list.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First page whose slug matches exactly.
    async fn page_by_slug(&self, slug: &str) -> Option<Page>;

    /// All pages, ascending by display order.
    async fn pages(&self) -> Vec<Page>;

    /// The site settings singleton.
    async fn site_settings(&self) -> Option<SiteSettings>;

    /// Whether the source can currently serve content.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Connection settings for [`ContentClient`].
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Base address of the content service, e.g. `https://cms.example.com`.
    pub base_url: String,
    /// Bearer token for authenticated reads.
    pub api_token: Option<String>,
    /// Wall-clock limit for each call.
    pub timeout: Duration,
}

impl ContentConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Failures talking to the content service.
///
/// These never leave the client; they are logged and turned into empty
/// results.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("content service returned HTTP {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid content service URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Response envelope: `{ "data": ... }`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// A record either flat (v5) or wrapped as `{ "id", "attributes": {...} }` (v4).
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry<T> {
    Wrapped { attributes: T },
    Flat(T),
}

impl<T> Entry<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { attributes } => attributes,
            Self::Flat(inner) => inner,
        }
    }
}

/// HTTP client for the content service.
#[derive(Clone)]
pub struct ContentClient {
    client: reqwest::Client,
    config: ContentConfig,
}

impl ContentClient {
    /// Create a client. The configured timeout applies to every call.
    pub fn new(config: ContentConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(concat!("showcase/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// First page whose slug matches exactly, or `None` on zero matches or
    /// any failure.
    pub async fn page_by_slug(&self, slug: &str) -> Option<Page> {
        match self.fetch_page(slug).await {
            Ok(Some(page)) => Some(page),
            Ok(None) => {
                debug!(slug = %slug, "no page matches slug");
                None
            }
            Err(e) => {
                warn!(slug = %slug, error = %e, "page fetch failed; treating as not found");
                None
            }
        }
    }

    /// All pages ascending by display order, or empty on failure.
    pub async fn pages(&self) -> Vec<Page> {
        self.fetch_pages(&[]).await.unwrap_or_else(|e| {
            warn!(error = %e, "page list fetch failed; returning no pages");
            Vec::new()
        })
    }

    /// Pages in one category, ascending by display order, or empty on failure.
    pub async fn pages_by_category(&self, category: &str) -> Vec<Page> {
        self.fetch_pages(&[("filters[category][$eq]", category)])
            .await
            .map(|pages| {
                pages
                    .into_iter()
                    .filter(|p| p.category.as_deref() == Some(category))
                    .collect()
            })
            .unwrap_or_else(|e| {
                warn!(category = %category, error = %e, "category fetch failed; returning no pages");
                Vec::new()
            })
    }

    /// Site settings, or `None` on failure.
    pub async fn site_settings(&self) -> Option<SiteSettings> {
        match self.fetch_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "site settings fetch failed; treating as not found");
                None
            }
        }
    }

    /// Absolute URL for a media reference served by the content service.
    pub fn resolve_media_url(&self, media: Option<&MediaRef>) -> Option<String> {
        resolve_media_url(&self.config.base_url, media)
    }

    async fn fetch_page(&self, slug: &str) -> Result<Option<Page>, ContentError> {
        let pages = self.fetch_pages(&[("filters[slug][$eq]", slug)]).await?;
        Ok(pages.into_iter().find(|p| p.slug == slug))
    }

    async fn fetch_pages(&self, filters: &[(&str, &str)]) -> Result<Vec<Page>, ContentError> {
        let mut query = vec![("populate", "deep"), ("sort", "order:asc")];
        query.extend_from_slice(filters);

        let envelope: Envelope<Vec<Entry<Page>>> = self.get_json("/api/pages", &query).await?;
        let mut pages: Vec<Page> = envelope.data.into_iter().map(Entry::into_inner).collect();
        sort_by_display_order(&mut pages);
        Ok(pages)
    }

    async fn fetch_settings(&self) -> Result<Option<SiteSettings>, ContentError> {
        let envelope: Envelope<Option<Entry<SiteSettings>>> = self
            .get_json("/api/site-setting", &[("populate", "deep")])
            .await?;
        Ok(envelope.data.map(Entry::into_inner))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ContentError> {
        let url = url::Url::parse(&format!("{}{path}", self.config.base_url))?;

        let mut request = self.client.get(url).query(query);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn request_error(&self, error: reqwest::Error) -> ContentError {
        if error.is_timeout() {
            ContentError::Timeout(self.config.timeout)
        } else {
            ContentError::Request(error)
        }
    }
}

#[async_trait]
impl ContentSource for ContentClient {
    async fn page_by_slug(&self, slug: &str) -> Option<Page> {
        ContentClient::page_by_slug(self, slug).await
    }

    async fn pages(&self) -> Vec<Page> {
        ContentClient::pages(self).await
    }

    async fn site_settings(&self) -> Option<SiteSettings> {
        ContentClient::site_settings(self).await
    }

    async fn is_available(&self) -> bool {
        self.fetch_settings().await.is_ok()
    }
}

/// Stable sort ascending by display order; unordered pages go last.
pub(crate) fn sort_by_display_order(pages: &mut [Page]) {
    pages.sort_by_key(|p| (p.order.is_none(), p.order));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_trims_trailing_slash() {
        let config = ContentConfig::new("https://cms.example.com/");
        assert_eq!(config.base_url, "https://cms.example.com");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn envelope_accepts_flat_and_wrapped_entries() {
        let flat: Envelope<Vec<Entry<Page>>> = serde_json::from_value(json!({
            "data": [ { "id": 1, "slug": "about", "title": "About" } ]
        }))
        .unwrap();
        let page = flat.data.into_iter().next().unwrap().into_inner();
        assert_eq!(page.slug, "about");

        let wrapped: Envelope<Vec<Entry<Page>>> = serde_json::from_value(json!({
            "data": [ { "id": 1, "attributes": { "slug": "news", "title": "News" } } ],
            "meta": { "pagination": { "total": 1 } }
        }))
        .unwrap();
        let page = wrapped.data.into_iter().next().unwrap().into_inner();
        assert_eq!(page.slug, "news");
    }

    #[test]
    fn display_order_sort_is_stable_with_unordered_last() {
        let page = |slug: &str, order: Option<i64>| -> Page {
            serde_json::from_value(json!({ "slug": slug, "order": order })).unwrap()
        };
        let mut pages = vec![
            page("c", None),
            page("b", Some(2)),
            page("a", Some(1)),
            page("d", None),
            page("e", Some(2)),
        ];
        sort_by_display_order(&mut pages);
        let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b", "e", "c", "d"]);
    }

    #[test]
    fn client_resolves_media_against_base() {
        let client = ContentClient::new(ContentConfig::new("https://cms.example.com"));
        let media = MediaRef::from("/uploads/logo.svg");
        assert_eq!(
            client.resolve_media_url(Some(&media)),
            Some("https://cms.example.com/uploads/logo.svg".to_string())
        );
        assert_eq!(client.resolve_media_url(None), None);
    }
}
