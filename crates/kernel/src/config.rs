//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::content::ContentConfig;
use crate::seo::SeoDefaults;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Base address of the content service (default: http://localhost:1337).
    pub content_api_url: String,

    /// Bearer token for the content service.
    pub content_api_token: Option<String>,

    /// Per-call timeout for content service requests (default: 5000 ms).
    pub content_timeout: Duration,

    /// Public site URL for canonical links, sitemap and robots
    /// (default: http://localhost:{port}).
    pub site_url: String,

    /// Site name used in titles and structured data (default: Showcase).
    pub site_name: String,

    pub site_description: Option<String>,

    pub site_keywords: Option<String>,

    /// Absolute URL of the default social sharing image.
    pub default_og_image: Option<String>,

    /// Absolute URL of the logo in the Organization descriptor.
    pub organization_logo: Option<String>,

    /// Directory overriding the built-in page template.
    pub template_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let content_api_url = var("CONTENT_API_URL")
            .unwrap_or_else(|| "http://localhost:1337".to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&content_api_url).context("CONTENT_API_URL must be a valid URL")?;

        let content_api_token = var("CONTENT_API_TOKEN");

        let timeout_ms: u64 = var("CONTENT_TIMEOUT_MS")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .context("CONTENT_TIMEOUT_MS must be a whole number of milliseconds")?;

        let site_url = var("SITE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let site_name = var("SITE_NAME").unwrap_or_else(|| "Showcase".to_string());

        Ok(Self {
            port,
            content_api_url,
            content_api_token,
            content_timeout: Duration::from_millis(timeout_ms),
            site_url,
            site_name,
            site_description: var("SITE_DESCRIPTION"),
            site_keywords: var("SITE_KEYWORDS"),
            default_og_image: var("DEFAULT_OG_IMAGE"),
            organization_logo: var("ORGANIZATION_LOGO"),
            template_dir: var("TEMPLATE_DIR").map(PathBuf::from),
        })
    }

    /// Connection settings for the content client.
    pub fn content_config(&self) -> ContentConfig {
        let config =
            ContentConfig::new(self.content_api_url.as_str()).with_timeout(self.content_timeout);
        match &self.content_api_token {
            Some(token) => config.with_token(token.as_str()),
            None => config,
        }
    }

    /// Sitewide SEO fallbacks.
    pub fn seo_defaults(&self) -> SeoDefaults {
        let mut defaults = SeoDefaults::new(self.site_name.as_str(), self.site_url.as_str());
        if let Some(description) = &self.site_description {
            defaults = defaults.with_description(description.as_str());
        }
        if let Some(keywords) = &self.site_keywords {
            defaults = defaults.with_keywords(keywords.as_str());
        }
        if let Some(image) = &self.default_og_image {
            defaults = defaults.with_og_image(image.as_str());
        }
        if let Some(logo) = &self.organization_logo {
            defaults = defaults.with_logo(logo.as_str());
        }
        defaults
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.content_api_url, "http://localhost:1337");
        assert!(config.content_api_token.is_none());
        assert_eq!(config.content_timeout, Duration::from_millis(5000));
        assert_eq!(config.site_url, "http://localhost:3000");
        assert_eq!(config.site_name, "Showcase");
        assert!(config.template_dir.is_none());
    }

    #[test]
    fn explicit_values() {
        let config = config(&[
            ("PORT", "8080"),
            ("CONTENT_API_URL", "https://cms.example.com/"),
            ("CONTENT_API_TOKEN", "secret"),
            ("CONTENT_TIMEOUT_MS", "250"),
            ("SITE_URL", "https://example.com/"),
            ("SITE_NAME", "Example"),
            ("DEFAULT_OG_IMAGE", "https://example.com/og.png"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.content_api_url, "https://cms.example.com");
        assert_eq!(config.site_url, "https://example.com");

        let content = config.content_config();
        assert_eq!(content.base_url, "https://cms.example.com");
        assert_eq!(content.api_token.as_deref(), Some("secret"));
        assert_eq!(content.timeout, Duration::from_millis(250));

        let seo = config.seo_defaults();
        assert_eq!(seo.site_name, "Example");
        assert_eq!(seo.og_image.as_deref(), Some("https://example.com/og.png"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config(&[("CONTENT_API_TOKEN", ""), ("SITE_NAME", "  ")]).unwrap();
        assert!(config.content_api_token.is_none());
        assert_eq!(config.site_name, "Showcase");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("PORT", "not-a-port")]).is_err());
        assert!(config(&[("CONTENT_TIMEOUT_MS", "-1")]).is_err());
        assert!(config(&[("CONTENT_API_URL", "not a url")]).is_err());
    }
}
