//! Page rendering service.
//!
//! One render per request: the page and the site settings are fetched
//! concurrently from the content source, bundled content stands in for
//! whatever the source cannot provide, and the page's blocks are resolved,
//! rendered and paired with the derived meta set.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::block_render::RenderContext;
use super::bundled::BundledContent;
use super::client::ContentSource;
use super::model::{Page, SiteSettings};
use super::resolve::{BlockResolver, RenderReport, RenderedBlock};
use crate::seo::{self, PageMeta, SeoDefaults};

/// Where a rendered page's record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentOrigin {
    Remote,
    Bundled,
}

/// Everything needed to emit one page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub slug: String,
    pub title: String,
    pub source: ContentOrigin,
    pub blocks: Vec<RenderedBlock>,
    pub meta: PageMeta,
    pub settings: SiteSettings,
    pub report: RenderReport,
}

impl RenderedPage {
    /// Block HTML concatenated in page order.
    pub fn body_html(&self) -> String {
        self.blocks.iter().map(|b| b.html.as_str()).collect()
    }
}

/// Renders pages from a content source with bundled fallback.
#[derive(Clone)]
pub struct PageService {
    source: Arc<dyn ContentSource>,
    bundled: Arc<BundledContent>,
    resolver: BlockResolver,
    seo: SeoDefaults,
    /// Base address for media referenced by remote records.
    media_base: String,
}

impl PageService {
    pub fn new(
        source: Arc<dyn ContentSource>,
        media_base: impl Into<String>,
        seo: SeoDefaults,
    ) -> Self {
        Self {
            source,
            bundled: Arc::new(BundledContent::standard()),
            resolver: BlockResolver::standard(),
            seo,
            media_base: media_base.into(),
        }
    }

    /// Replace the bundled fallback content.
    pub fn with_bundled(mut self, bundled: BundledContent) -> Self {
        self.bundled = Arc::new(bundled);
        self
    }

    pub fn with_resolver(mut self, resolver: BlockResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn seo_defaults(&self) -> &SeoDefaults {
        &self.seo
    }

    /// Whether the content source currently answers.
    pub async fn source_available(&self) -> bool {
        self.source.is_available().await
    }

    /// Render the page at `slug`.
    ///
    /// `None` when neither the content source nor the bundled content knows
    /// the slug.
    pub async fn render(&self, slug: &str) -> Option<RenderedPage> {
        let (remote_page, remote_settings) =
            tokio::join!(self.source.page_by_slug(slug), self.source.site_settings());

        let (page, origin) = match remote_page {
            Some(page) => (page, ContentOrigin::Remote),
            None => {
                let page = self.bundled.page(slug)?.clone();
                info!(slug = %slug, "serving bundled content");
                (page, ContentOrigin::Bundled)
            }
        };

        let (settings, settings_base) = match remote_settings {
            Some(settings) => (settings, self.media_base.as_str()),
            None => (self.bundled.settings().clone(), ""),
        };

        let page_base = match origin {
            ContentOrigin::Remote => self.media_base.as_str(),
            ContentOrigin::Bundled => "",
        };

        Some(self.assemble(page, origin, settings, settings_base, page_base))
    }

    fn assemble(
        &self,
        page: Page,
        origin: ContentOrigin,
        settings: SiteSettings,
        settings_base: &str,
        page_base: &str,
    ) -> RenderedPage {
        let output = self
            .resolver
            .render(&page.content, &RenderContext::new(page_base));
        let defaults = self.seo.with_settings(&settings, settings_base);
        let meta = seo::derive_meta(&page, &defaults, page_base);

        debug!(
            slug = %page.slug,
            blocks = output.blocks.len(),
            skipped = output.report.skipped.len(),
            violations = output.report.violations.len(),
            "rendered page"
        );

        RenderedPage {
            slug: page.slug,
            title: page.title,
            source: origin,
            blocks: output.blocks,
            meta,
            settings,
            report: output.report,
        }
    }

    /// Pages known to the source, or the bundled pages when it has none.
    pub async fn pages(&self) -> Vec<Page> {
        let pages = self.source.pages().await;
        if pages.is_empty() {
            self.bundled.all_pages().to_vec()
        } else {
            pages
        }
    }

    /// Sitemap XML for every indexable page.
    pub async fn sitemap(&self) -> String {
        let pages = self.pages().await;
        let entries = seo::sitemap_entries(&pages);
        seo::generate_sitemap(&self.seo.site_url, &entries)
    }

    pub fn robots(&self) -> String {
        seo::generate_robots(&self.seo.site_url)
    }
}
