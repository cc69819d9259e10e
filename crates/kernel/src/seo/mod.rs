//! Search and discovery documents.
//!
//! - `meta`: per-page meta set with sitewide fallbacks
//! - `structured_data`: Organization and BreadcrumbList JSON-LD
//! - `sitemap`: sitemap XML
//! - `robots`: robots.txt policy

pub mod meta;
pub mod robots;
pub mod sitemap;
pub mod structured_data;

pub use meta::{PageMeta, SeoDefaults, derive_meta};
pub use robots::generate_robots;
pub use sitemap::{ChangeFreq, SitemapEntry, generate_sitemap, generate_sitemap_at, sitemap_entries};

/// Top-level marketing paths, always listed in the sitemap and explicitly
/// allowed in robots.txt.
pub const MARKETING_PATHS: &[&str] = &["/", "/technology", "/about", "/contact"];

/// Join a site-relative path onto the site's base address.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_joins_with_one_slash() {
        assert_eq!(absolute_url("https://a.test/", "/x"), "https://a.test/x");
        assert_eq!(absolute_url("https://a.test", "x"), "https://a.test/x");
        assert_eq!(absolute_url("https://a.test", "/"), "https://a.test/");
    }
}
