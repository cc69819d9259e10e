//! Sitemap generation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::{MARKETING_PATHS, absolute_url};
use crate::content::model::{HOME_SLUG, Page, page_path};

pub const DEFAULT_CHANGE_FREQ: ChangeFreq = ChangeFreq::Monthly;
pub const DEFAULT_PRIORITY: f32 = 0.8;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// One sitemap entry. Unset fields take the sitemap defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    /// Site-relative path.
    pub path: String,
    pub last_modified: Option<DateTime<Utc>>,
    pub change_freq: Option<ChangeFreq>,
    /// 0.0 to 1.0.
    pub priority: Option<f32>,
}

impl SitemapEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            last_modified: None,
            change_freq: None,
            priority: None,
        }
    }

    pub fn last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    pub fn change_freq(mut self, freq: ChangeFreq) -> Self {
        self.change_freq = Some(freq);
        self
    }

    pub fn priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Sitemap XML with missing last-modified dates set to now.
pub fn generate_sitemap(base_url: &str, entries: &[SitemapEntry]) -> String {
    generate_sitemap_at(base_url, entries, Utc::now())
}

/// Sitemap XML with missing last-modified dates set to `now`.
pub fn generate_sitemap_at(base_url: &str, entries: &[SitemapEntry], now: DateTime<Utc>) -> String {
    debug!(count = entries.len(), "generating sitemap");

    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        let lastmod = entry.last_modified.unwrap_or(now);
        let changefreq = entry.change_freq.unwrap_or(DEFAULT_CHANGE_FREQ);
        let priority = entry.priority.unwrap_or(DEFAULT_PRIORITY);

        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&absolute_url(base_url, &entry.path))
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%dT%H:%M:%SZ")
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            changefreq.as_str()
        ));
        xml.push_str(&format!(
            "    <priority>{}</priority>\n",
            format_priority(&entry.path, priority)
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Priority clamped to 0.0..=1.0, printed without rounding.
///
/// Whole numbers keep one decimal place (`1.0`); anything else uses the
/// shortest exact form (`0.75`).
fn format_priority(path: &str, priority: f32) -> String {
    let clamped = if priority.is_nan() {
        warn!(path = %path, "sitemap priority is NaN; using default");
        DEFAULT_PRIORITY
    } else if !(0.0..=1.0).contains(&priority) {
        warn!(path = %path, priority, "sitemap priority out of range; clamping");
        priority.clamp(0.0, 1.0)
    } else {
        priority
    };

    if clamped.fract() == 0.0 {
        format!("{clamped:.1}")
    } else {
        clamped.to_string()
    }
}

/// Entries for the marketing paths plus every indexable page.
///
/// The home page is listed first with weekly frequency and top priority.
/// Pages that prevent indexing are left out; each path appears once.
pub fn sitemap_entries(pages: &[Page]) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = MARKETING_PATHS
        .iter()
        .map(|path| path_entry(path))
        .collect();

    for page in pages {
        let path = page.path();
        let existing = entries.iter().position(|e| e.path == path);

        if page.prevents_indexing() {
            if let Some(index) = existing {
                entries.remove(index);
            }
            continue;
        }

        let entry = match existing {
            Some(index) => &mut entries[index],
            None => {
                entries.push(path_entry(&path));
                let last = entries.len() - 1;
                &mut entries[last]
            }
        };
        entry.last_modified = page.updated_at;
    }

    entries
}

fn path_entry(path: &str) -> SitemapEntry {
    if path == page_path(HOME_SLUG) {
        SitemapEntry::new(path)
            .change_freq(ChangeFreq::Weekly)
            .priority(1.0)
    } else {
        SitemapEntry::new(path)
    }
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn two_entries_with_defaults() {
        let entries = [SitemapEntry::new("/").priority(1.0), SitemapEntry::new("/contact")];
        let xml = generate_sitemap_at("https://example.com", &entries, fixed_now());

        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/contact</loc>"));

        let second = &xml[xml.find("/contact").unwrap()..];
        assert!(second.contains("<changefreq>monthly</changefreq>"));
        assert!(second.contains("<priority>0.8</priority>"));
        assert!(second.contains("<lastmod>2024-05-01T12:00:00Z</lastmod>"));

        let first = &xml[..xml.find("/contact").unwrap()];
        assert!(first.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn explicit_fields_are_kept() {
        let at = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let entries = [SitemapEntry::new("/about")
            .last_modified(at)
            .change_freq(ChangeFreq::Yearly)
            .priority(0.3)];
        let xml = generate_sitemap_at("https://example.com/", &entries, fixed_now());
        assert!(xml.contains("<lastmod>2023-01-02T03:04:05Z</lastmod>"));
        assert!(xml.contains("<changefreq>yearly</changefreq>"));
        assert!(xml.contains("<priority>0.3</priority>"));
    }

    #[test]
    fn fractional_priorities_are_not_rounded() {
        let entries = [
            SitemapEntry::new("/a").priority(0.75),
            SitemapEntry::new("/b").priority(0.25),
        ];
        let xml = generate_sitemap_at("https://example.com", &entries, fixed_now());
        assert!(xml.contains("<priority>0.75</priority>"));
        assert!(xml.contains("<priority>0.25</priority>"));
        assert!(!xml.contains("<priority>0.8</priority>"));
        assert!(!xml.contains("<priority>0.2</priority>"));
    }

    #[test]
    fn out_of_range_priorities_are_clamped() {
        assert_eq!(format_priority("/", 7.0), "1.0");
        assert_eq!(format_priority("/", -1.0), "0.0");
        assert_eq!(format_priority("/", f32::NAN), "0.8");
        assert_eq!(format_priority("/", 1.0), "1.0");
        assert_eq!(format_priority("/", 0.0), "0.0");

        let entries = [SitemapEntry::new("/loud").priority(7.0)];
        let xml = generate_sitemap_at("https://example.com", &entries, fixed_now());
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(!xml.contains("7.0"));
    }

    #[test]
    fn locations_are_escaped() {
        let entries = [SitemapEntry::new("/search?a=1&b=2")];
        let xml = generate_sitemap_at("https://example.com", &entries, fixed_now());
        assert!(xml.contains("<loc>https://example.com/search?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn empty_sitemap_is_well_formed() {
        let xml = generate_sitemap_at("https://example.com", &[], fixed_now());
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<urlset"));
        assert!(xml.trim_end().ends_with("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn entries_merge_pages_with_marketing_paths() {
        let pages: Vec<Page> = serde_json::from_value(json!([
            { "slug": "home", "updatedAt": "2024-02-01T00:00:00Z" },
            { "slug": "news" },
            { "slug": "contact", "seo": { "preventIndexing": true } }
        ]))
        .unwrap();
        let entries = sitemap_entries(&pages);
        let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/", "/technology", "/about", "/news"]);

        assert_eq!(entries[0].priority, Some(1.0));
        assert_eq!(entries[0].change_freq, Some(ChangeFreq::Weekly));
        assert!(entries[0].last_modified.is_some());
        assert_eq!(entries[3].priority, None);
    }

    #[test]
    fn escape_xml_all_chars() {
        assert_eq!(escape_xml("<a href=\"x\">'&'</a>"), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
    }
}
