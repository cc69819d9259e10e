//! Per-page meta derivation.
//!
//! Every field of the meta set is filled: a page's own SEO record wins,
//! sitewide defaults cover whatever it leaves out.

use serde::Serialize;
use serde_json::Value;

use super::absolute_url;
use super::structured_data;
use crate::content::model::{Page, SiteSettings, resolve_media_url};

pub const DEFAULT_DESCRIPTION: &str = "Dependable software, designed and delivered.";

/// Sitewide fallbacks for page meta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoDefaults {
    pub site_name: String,
    /// Public base address of the site, without trailing slash.
    pub site_url: String,
    /// Title used when a page has neither an SEO title nor a title.
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    /// Absolute URL of the default social sharing image.
    pub og_image: Option<String>,
    pub organization_logo: Option<String>,
    /// Social profile URLs for the Organization `sameAs` list.
    pub same_as: Vec<String>,
}

impl SeoDefaults {
    pub fn new(site_name: impl Into<String>, site_url: impl Into<String>) -> Self {
        let site_name = site_name.into();
        Self {
            title: site_name.clone(),
            site_name,
            site_url: site_url.into().trim_end_matches('/').to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            keywords: None,
            og_image: None,
            organization_logo: None,
            same_as: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_og_image(mut self, url: impl Into<String>) -> Self {
        self.og_image = Some(url.into());
        self
    }

    pub fn with_logo(mut self, url: impl Into<String>) -> Self {
        self.organization_logo = Some(url.into());
        self
    }

    /// Overlay the fetched site settings: site name, logo, and social
    /// profiles. Configured values stay when the settings leave a field
    /// empty.
    pub fn with_settings(&self, settings: &SiteSettings, media_base: &str) -> Self {
        let mut merged = self.clone();
        if !settings.site_name.is_empty() {
            if merged.title == merged.site_name {
                merged.title = settings.site_name.clone();
            }
            merged.site_name = settings.site_name.clone();
        }
        if merged.organization_logo.is_none()
            && let Some(logo) = resolve_media_url(media_base, settings.logo.as_ref())
        {
            merged.organization_logo = Some(site_absolute(&self.site_url, logo));
        }
        if merged.same_as.is_empty() {
            merged.same_as = settings.social_links.iter().map(|l| l.url.clone()).collect();
        }
        merged
    }
}

/// The full meta set for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: Option<String>,
    pub canonical_url: String,
    pub og_image: Option<String>,
    /// `index, follow` or `noindex, nofollow`.
    pub robots: &'static str,
    pub site_name: String,
    /// Organization then BreadcrumbList JSON-LD.
    pub structured_data: Vec<Value>,
}

impl PageMeta {
    /// JSON-LD documents serialized for `<script type="application/ld+json">`.
    ///
    /// `</` is escaped so a value cannot close the script element.
    pub fn structured_data_json(&self) -> Vec<String> {
        self.structured_data
            .iter()
            .map(|doc| doc.to_string().replace("</", "<\\/"))
            .collect()
    }
}

/// Derive the meta set for `page`.
///
/// Relative media references (the SEO image) are joined onto `media_base`,
/// then onto the site URL if still relative.
pub fn derive_meta(page: &Page, defaults: &SeoDefaults, media_base: &str) -> PageMeta {
    let seo = page.seo.as_ref();
    let non_empty = |s: &Option<String>| {
        s.as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
    };

    let title = seo
        .and_then(|s| non_empty(&s.meta_title))
        .or_else(|| page_title(page, defaults))
        .unwrap_or_else(|| defaults.title.clone());

    let description = seo
        .and_then(|s| non_empty(&s.meta_description))
        .unwrap_or_else(|| defaults.description.clone());

    let keywords = seo
        .and_then(|s| non_empty(&s.keywords))
        .or_else(|| defaults.keywords.clone());

    let canonical_url = seo
        .and_then(|s| non_empty(&s.canonical_url))
        .unwrap_or_else(|| absolute_url(&defaults.site_url, &page.path()));

    let og_image = resolve_media_url(media_base, seo.and_then(|s| s.meta_image.as_ref()))
        .map(|url| site_absolute(&defaults.site_url, url))
        .or_else(|| defaults.og_image.clone());

    let robots = if page.prevents_indexing() {
        "noindex, nofollow"
    } else {
        "index, follow"
    };

    PageMeta {
        title,
        description,
        keywords,
        canonical_url,
        og_image,
        robots,
        site_name: defaults.site_name.clone(),
        structured_data: vec![
            structured_data::organization(defaults),
            structured_data::breadcrumbs(page, defaults),
        ],
    }
}

/// Site-relative URLs are joined onto the site address; others pass.
fn site_absolute(site_url: &str, url: String) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        absolute_url(site_url, &url)
    } else {
        url
    }
}

/// `{title} | {site name}`, or the bare title when it already is the site
/// name.
fn page_title(page: &Page, defaults: &SeoDefaults) -> Option<String> {
    let title = page.title.trim();
    if title.is_empty() {
        None
    } else if title == defaults.site_name {
        Some(title.to_string())
    } else {
        Some(format!("{title} | {}", defaults.site_name))
    }
}
