//! Bundled fallback content.
//!
//! Static definitions of the core marketing pages and site settings,
//! compiled into the binary and served when the content service is
//! unreachable or has no record for a slug. Media paths are site-relative.

use async_trait::async_trait;
use serde_json::json;

use super::client::{ContentSource, sort_by_display_order};
use super::model::{BlockInstance, NavLink, Page, Seo, SiteSettings, SocialLink};

/// In-memory content source holding the bundled pages.
#[derive(Debug, Clone)]
pub struct BundledContent {
    pages: Vec<Page>,
    settings: SiteSettings,
}

impl BundledContent {
    /// Create a source from explicit pages and settings.
    pub fn new(mut pages: Vec<Page>, settings: SiteSettings) -> Self {
        sort_by_display_order(&mut pages);
        Self { pages, settings }
    }

    /// The pages and settings shipped with the site.
    pub fn standard() -> Self {
        Self::new(
            vec![home(), technology(), about(), contact()],
            standard_settings(),
        )
    }

    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    pub fn all_pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }
}

#[async_trait]
impl ContentSource for BundledContent {
    async fn page_by_slug(&self, slug: &str) -> Option<Page> {
        self.page(slug).cloned()
    }

    async fn pages(&self) -> Vec<Page> {
        self.pages.clone()
    }

    async fn site_settings(&self) -> Option<SiteSettings> {
        Some(self.settings.clone())
    }
}

fn page(slug: &str, title: &str, order: i64, seo: Seo, content: Vec<BlockInstance>) -> Page {
    Page {
        slug: slug.to_string(),
        title: title.to_string(),
        category: Some("marketing".to_string()),
        order: Some(order),
        updated_at: None,
        seo: Some(seo),
        content,
    }
}

fn seo(title: &str, description: &str) -> Seo {
    Seo {
        meta_title: Some(title.to_string()),
        meta_description: Some(description.to_string()),
        ..Seo::default()
    }
}

fn home() -> Page {
    page(
        "home",
        "Home",
        0,
        seo(
            "Showcase | Software that ships",
            "We design, build, and run dependable software products for teams that cannot afford downtime.",
        ),
        vec![
            BlockInstance::new(
                "blocks.hero-section",
                json!({
                    "title": "Software that ships",
                    "subtitle": "Product engineering for teams that cannot afford downtime.",
                    "backgroundImage": "/images/hero.jpg",
                    "buttons": [
                        { "label": "Our technology", "url": "/technology" },
                        { "label": "Talk to us", "url": "/contact", "variant": "outline" }
                    ]
                }),
            ),
            BlockInstance::new(
                "blocks.feature-grid",
                json!({
                    "title": "What we do",
                    "features": [
                        { "title": "Platform engineering", "description": "Infrastructure that scales with you.", "icon": "server" },
                        { "title": "Product design", "description": "Interfaces people enjoy using.", "icon": "pen" },
                        { "title": "Data systems", "description": "Pipelines and analytics you can trust.", "icon": "chart" }
                    ]
                }),
            ),
            BlockInstance::new(
                "blocks.stats-section",
                json!({
                    "title": "By the numbers",
                    "stats": [
                        { "value": "120", "suffix": "+", "label": "Projects delivered" },
                        { "value": "99.98", "suffix": "%", "label": "Average uptime" },
                        { "value": "14", "label": "Countries served" }
                    ]
                }),
            ),
            BlockInstance::new(
                "blocks.cta-section",
                json!({
                    "title": "Ready to start?",
                    "description": "Tell us about your project and we will get back within a day.",
                    "buttons": [ { "label": "Contact us", "url": "/contact" } ]
                }),
            ),
        ],
    )
}

fn technology() -> Page {
    page(
        "technology",
        "Technology",
        1,
        seo(
            "Technology | Showcase",
            "The languages, platforms, and practices behind every system we build and operate.",
        ),
        vec![
            BlockInstance::new(
                "blocks.hero-section",
                json!({
                    "title": "Our technology",
                    "height": "medium",
                    "textAlignment": "left"
                }),
            ),
            BlockInstance::new(
                "blocks.text-block",
                json!({
                    "content": "We favour **boring, proven tools** and invest in observability from day one."
                }),
            ),
            BlockInstance::new(
                "blocks.chart",
                json!({
                    "title": "Where our engineering time goes",
                    "chartType": "bar",
                    "unit": "%",
                    "dataPoints": [
                        { "label": "Backend services", "value": 40 },
                        { "label": "Frontend", "value": 25 },
                        { "label": "Infrastructure", "value": 20 },
                        { "label": "Data", "value": 15 }
                    ]
                }),
            ),
        ],
    )
}

fn about() -> Page {
    page(
        "about",
        "About",
        2,
        seo(
            "About | Showcase",
            "A small, senior team of engineers and designers working with clients since 2012.",
        ),
        vec![
            BlockInstance::new(
                "blocks.text-block",
                json!({
                    "content": "## Who we are\n\nA small, senior team of engineers and designers.",
                    "maxWidth": "medium"
                }),
            ),
            BlockInstance::new(
                "blocks.timeline",
                json!({
                    "title": "Our story",
                    "events": [
                        { "date": "2012", "title": "Founded" },
                        { "date": "2017", "title": "First platform client" },
                        { "date": "2023", "title": "Opened second office" }
                    ]
                }),
            ),
        ],
    )
}

fn contact() -> Page {
    page(
        "contact",
        "Contact",
        3,
        seo(
            "Contact | Showcase",
            "Get in touch to discuss your project, request a proposal, or just say hello to the team.",
        ),
        vec![
            BlockInstance::new(
                "blocks.text-block",
                json!({
                    "content": "Write to [hello@example.com](mailto:hello@example.com) and we will reply within one business day.",
                    "textAlignment": "center"
                }),
            ),
            BlockInstance::new(
                "blocks.faq-section",
                json!({
                    "items": [
                        { "question": "How quickly can you start?", "answer": "Usually within **two weeks**." },
                        { "question": "Do you work remotely?", "answer": "Yes, with regular on-site visits." }
                    ]
                }),
            ),
        ],
    )
}

fn standard_settings() -> SiteSettings {
    let link = |label: &str, url: &str| NavLink {
        label: label.to_string(),
        url: url.to_string(),
        is_external: false,
    };

    SiteSettings {
        site_name: "Showcase".to_string(),
        tagline: Some("Software that ships".to_string()),
        logo: Some("/images/logo.svg".into()),
        navigation: vec![
            link("Home", "/"),
            link("Technology", "/technology"),
            link("About", "/about"),
            link("Contact", "/contact"),
        ],
        footer_links: vec![link("Sitemap", "/sitemap.xml")],
        social_links: vec![SocialLink {
            platform: "github".to_string(),
            url: "https://github.com/".to_string(),
        }],
        contact_email: Some("hello@example.com".to_string()),
    }
}
