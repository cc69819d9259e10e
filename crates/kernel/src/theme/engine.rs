//! Theme engine with Tera templates.

use std::path::Path;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::debug;

use crate::content::RenderedPage;
use crate::content::block_render::is_safe_link;
use crate::content::filter::FilterPipeline;

/// The page shell compiled into the binary.
const PAGE_TEMPLATE: &str = include_str!("../../templates/page.html");
const PAGE_TEMPLATE_NAME: &str = "page.html";

/// Renders rendered pages into full HTML documents.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Engine with the built-in page shell.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .context("failed to compile built-in page template")?;
        Self::register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Engine loading templates from `template_dir`.
    ///
    /// The built-in shell is used when the directory has no `page.html`.
    pub fn from_dir(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        if !tera.get_template_names().any(|n| n == PAGE_TEMPLATE_NAME) {
            tera.add_raw_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
                .context("failed to compile built-in page template")?;
        }
        Self::register_filters(&mut tera);

        debug!(
            count = tera.get_template_names().count(),
            dir = %template_dir.display(),
            "loaded templates"
        );
        Ok(Self { tera })
    }

    fn register_filters(tera: &mut Tera) {
        // Escaped text with line breaks preserved.
        tera.register_filter(
            "plain_text",
            |value: &tera::Value, _args: &std::collections::HashMap<String, tera::Value>| {
                let text = tera::try_get_value!("plain_text", "value", String, value);
                Ok(tera::Value::String(FilterPipeline::plain_text().process(&text)))
            },
        );

        // Link targets from site settings; unsafe schemes become "#".
        tera.register_filter(
            "safe_href",
            |value: &tera::Value, _args: &std::collections::HashMap<String, tera::Value>| {
                let url = tera::try_get_value!("safe_href", "value", String, value);
                let href = if is_safe_link(&url) { url.trim() } else { "#" };
                Ok(tera::Value::String(href.to_string()))
            },
        );
    }

    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Render the full HTML document for `page`.
    pub fn render_page(&self, page: &RenderedPage) -> Result<String> {
        let mut context = tera::Context::new();
        context.insert("page", page);
        context.insert("meta", &page.meta);
        context.insert("structured_data", &page.meta.structured_data_json());
        context.insert("body", &page.body_html());

        self.tera
            .render(PAGE_TEMPLATE_NAME, &context)
            .with_context(|| format!("failed to render page '{}'", page.slug))
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::content::model::{NavLink, SocialLink};
    use crate::content::{BundledContent, PageService};
    use crate::seo::SeoDefaults;

    async fn rendered(slug: &str) -> RenderedPage {
        let service = PageService::new(
            Arc::new(BundledContent::standard()),
            "",
            SeoDefaults::new("Showcase", "https://showcase.test"),
        );
        service.render(slug).await.unwrap()
    }

    #[tokio::test]
    async fn page_shell_carries_meta_and_blocks() {
        let page = rendered("technology").await;
        let html = ThemeEngine::new().unwrap().render_page(&page).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Technology | Showcase</title>"));
        assert!(html.contains("<meta name=\"robots\" content=\"index, follow\">"));
        assert_eq!(html.matches("application/ld+json").count(), 2);
        assert!(html.contains("\"@type\":\"BreadcrumbList\""));
        assert!(html.contains("<h1>Our technology</h1>"));
        assert!(html.contains("class=\"page page-technology\""));
    }

    #[tokio::test]
    async fn navigation_comes_from_settings() {
        let page = rendered("home").await;
        let html = ThemeEngine::new().unwrap().render_page(&page).unwrap();
        assert!(html.contains(">Technology</a>"));
        assert!(html.contains(">Contact</a>"));
        assert!(html.contains("class=\"tagline\""));
    }

    #[tokio::test]
    async fn settings_links_with_unsafe_schemes_are_neutralised() {
        let mut page = rendered("home").await;
        let evil = |label: &str, url: &str| NavLink {
            label: label.to_string(),
            url: url.to_string(),
            is_external: false,
        };
        page.settings.navigation = vec![
            evil("Evil", "javascript:alert(document.cookie)"),
            evil("Docs", "https://docs.example.com"),
        ];
        page.settings.footer_links = vec![evil("Data", " data:text/html,<b>x</b>")];
        page.settings.social_links = vec![SocialLink {
            platform: "github".to_string(),
            url: "vbscript:msgbox".to_string(),
        }];
        page.settings.tagline = Some("Fast <b>&</b> safe".to_string());

        let html = ThemeEngine::new().unwrap().render_page(&page).unwrap();
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("data:text"));
        assert!(!html.contains("vbscript:"));
        assert!(html.contains("<a href=\"#\">Evil</a>"));
        assert!(html.contains("<a href=\"#\">Data</a>"));
        assert!(html.contains("class=\"social-github\" href=\"#\""));
        assert!(html.contains(">Docs</a>"));
        assert!(html.contains("<p class=\"tagline\">Fast &lt;b&gt;&amp;&lt;/b&gt; safe</p>"));
    }

    #[test]
    fn plain_text_filter() {
        let mut engine = ThemeEngine::new().unwrap();
        engine
            .tera
            .add_raw_template("t", "{{ v | plain_text | safe }}")
            .unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert("v", "a<b>\nc");
        assert_eq!(engine.tera.render("t", &ctx).unwrap(), "a&lt;b&gt;<br>\nc");
    }
}
