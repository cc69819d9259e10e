//! Content records as read from the content service.
//!
//! Pages and site settings are authored externally and only ever read here.
//! Field names follow the service's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use showcase_schema::Attributes;

/// Slug of the page served at `/`.
pub const HOME_SLUG: &str = "home";

/// One block in a page's content sequence.
///
/// The type identifier arrives as `type` or, from Strapi dynamic zones, as
/// `__component`. Every other key is an attribute. Decoding never fails: an
/// entry that is not an object, or whose type is not a string, becomes a
/// block without a type and is skipped at render time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockInstance {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl BlockInstance {
    /// Build a block from a type identifier and a JSON object of attributes.
    ///
    /// Non-object `attributes` yield an empty attribute map.
    pub fn new(type_id: &str, attributes: Value) -> Self {
        Self {
            type_id: Some(type_id.to_string()),
            attributes: match attributes {
                Value::Object(map) => map,
                _ => Attributes::new(),
            },
        }
    }

    /// Read one content entry as delivered by the content service.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut attributes) = value else {
            return Self {
                type_id: None,
                attributes: Attributes::new(),
            };
        };
        let type_id = TYPE_KEYS
            .iter()
            .find_map(|key| attributes.get(*key).and_then(Value::as_str))
            .map(str::to_string);
        for key in TYPE_KEYS {
            attributes.remove(key);
        }
        Self {
            type_id,
            attributes,
        }
    }
}

/// Keys that may carry a block's type identifier, in precedence order.
const TYPE_KEYS: [&str; 2] = ["type", "__component"];

impl<'de> Deserialize<'de> for BlockInstance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// A page record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Display order; lists sort ascending on it.
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seo: Option<Seo>,
    #[serde(default, deserialize_with = "nullable")]
    pub content: Vec<BlockInstance>,
}

impl Page {
    pub fn is_home(&self) -> bool {
        self.slug == HOME_SLUG
    }

    /// Site-relative path the page is served at.
    pub fn path(&self) -> String {
        page_path(&self.slug)
    }

    pub fn prevents_indexing(&self) -> bool {
        self.seo
            .as_ref()
            .and_then(|s| s.prevent_indexing)
            .unwrap_or(false)
    }
}

/// Site-relative path for a slug: `/` for the home page, `/{slug}` otherwise.
pub fn page_path(slug: &str) -> String {
    let slug = slug.trim_matches('/');
    if slug.is_empty() || slug == HOME_SLUG {
        "/".to_string()
    } else {
        format!("/{slug}")
    }
}

/// Per-page SEO fragment (`shared.seo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default, rename = "canonicalURL", alias = "canonicalUrl")]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub meta_image: Option<MediaRef>,
    #[serde(default)]
    pub prevent_indexing: Option<bool>,
}

/// Site-wide settings singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default, deserialize_with = "nullable")]
    pub site_name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub logo: Option<MediaRef>,
    #[serde(default, deserialize_with = "nullable")]
    pub navigation: Vec<NavLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub footer_links: Vec<NavLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

/// Navigation entry (`shared.nav-link`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: String,
    pub url: String,
    #[serde(default, deserialize_with = "nullable")]
    pub is_external: bool,
}

/// Social profile link (`shared.social-link`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Reference to a media asset.
///
/// The service hands media out in several shapes: a bare URL string, an
/// asset object `{url, alternativeText}`, or a v4 envelope
/// `{data: {attributes: {...}}}`. The raw value is kept and interpreted on
/// access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(Value);

impl MediaRef {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// URL of the asset as stored, possibly relative.
    pub fn url(&self) -> Option<&str> {
        media_field(&self.0, "url").filter(|url| !url.is_empty())
    }

    /// Alternative text, if the asset carries one.
    pub fn alt(&self) -> Option<&str> {
        media_field(&self.0, "alternativeText").filter(|alt| !alt.is_empty())
    }
}

impl From<&str> for MediaRef {
    fn from(url: &str) -> Self {
        Self(Value::String(url.to_string()))
    }
}

fn media_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    match value {
        Value::String(s) if field == "url" => Some(s.as_str()),
        Value::Object(map) => {
            if let Some(found) = map.get(field).and_then(Value::as_str) {
                return Some(found);
            }
            map.get("attributes")
                .or_else(|| map.get("data"))
                .and_then(|inner| media_field(inner, field))
        }
        Value::Array(items) => items.first().and_then(|first| media_field(first, field)),
        _ => None,
    }
}

/// Absolute URL for a media reference.
///
/// Relative references are joined onto `base_url`; absolute `http(s)` and
/// protocol-relative URLs pass through unchanged. An absent reference (or
/// one with no URL) yields `None`.
pub fn resolve_media_url(base_url: &str, media: Option<&MediaRef>) -> Option<String> {
    let url = media?.url()?;
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//") {
        return Some(url.to_string());
    }
    let base = base_url.trim_end_matches('/');
    if url.starts_with('/') {
        Some(format!("{base}{url}"))
    } else {
        Some(format!("{base}/{url}"))
    }
}

/// Deserialize `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn block_instance_reads_type_and_flattened_attributes() {
        let block: BlockInstance = serde_json::from_value(json!({
            "type": "blocks.hero-section",
            "title": "Welcome",
            "height": "small"
        }))
        .unwrap();
        assert_eq!(block.type_id.as_deref(), Some("blocks.hero-section"));
        assert_eq!(block.attributes["title"], json!("Welcome"));
        assert_eq!(block.attributes.len(), 2);
    }

    #[test]
    fn block_instance_accepts_component_key() {
        let block: BlockInstance = serde_json::from_value(json!({
            "__component": "blocks.text-block",
            "id": 4,
            "content": "Hi"
        }))
        .unwrap();
        assert_eq!(block.type_id.as_deref(), Some("blocks.text-block"));
        assert_eq!(block.attributes["id"], json!(4));
    }

    #[test]
    fn block_instance_without_type() {
        let block: BlockInstance = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert!(block.type_id.is_none());
    }

    #[test]
    fn malformed_entries_become_untyped_blocks() {
        let page: Page = serde_json::from_value(json!({
            "slug": "launch",
            "content": [
                { "__component": "blocks.hero-section", "title": "Welcome" },
                { "__component": 42, "title": "Numeric type" },
                null,
                "just a string",
                { "type": ["blocks.text-block"] },
                { "__component": "blocks.text-block", "content": "Hi" }
            ]
        }))
        .unwrap();

        let types: Vec<Option<&str>> = page.content.iter().map(|b| b.type_id.as_deref()).collect();
        assert_eq!(
            types,
            [
                Some("blocks.hero-section"),
                None,
                None,
                None,
                None,
                Some("blocks.text-block")
            ]
        );
        assert_eq!(page.content[1].attributes["title"], json!("Numeric type"));
        assert!(!page.content[1].attributes.contains_key("__component"));
        assert!(page.content[2].attributes.is_empty());
    }

    #[test]
    fn page_tolerates_null_collections() {
        let page: Page = serde_json::from_value(json!({
            "slug": "about",
            "title": null,
            "content": null,
            "seo": null
        }))
        .unwrap();
        assert_eq!(page.title, "");
        assert!(page.content.is_empty());
        assert!(page.seo.is_none());
    }

    #[test]
    fn page_paths() {
        assert_eq!(page_path("home"), "/");
        assert_eq!(page_path(""), "/");
        assert_eq!(page_path("technology"), "/technology");
        assert_eq!(page_path("/contact/"), "/contact");
    }

    #[test]
    fn seo_reads_canonical_url_spellings() {
        let seo: Seo = serde_json::from_value(json!({ "canonicalURL": "https://a.test/x" })).unwrap();
        assert_eq!(seo.canonical_url.as_deref(), Some("https://a.test/x"));
        let seo: Seo = serde_json::from_value(json!({ "canonicalUrl": "https://a.test/y" })).unwrap();
        assert_eq!(seo.canonical_url.as_deref(), Some("https://a.test/y"));
    }

    #[test]
    fn media_url_shapes() {
        assert_eq!(MediaRef::from("/uploads/a.png").url(), Some("/uploads/a.png"));
        assert_eq!(
            MediaRef::new(json!({ "url": "/uploads/b.png", "alternativeText": "B" })).alt(),
            Some("B")
        );
        assert_eq!(
            MediaRef::new(json!({ "data": { "id": 1, "attributes": { "url": "/uploads/c.png" } } }))
                .url(),
            Some("/uploads/c.png")
        );
        assert_eq!(MediaRef::new(json!({ "data": null })).url(), None);
        assert_eq!(MediaRef::new(Value::Null).url(), None);
    }

    #[test]
    fn resolve_media_url_prefixes_base() {
        let media = MediaRef::from("/uploads/hero.jpg");
        assert_eq!(
            resolve_media_url("https://cms.example.com/", Some(&media)),
            Some("https://cms.example.com/uploads/hero.jpg".to_string())
        );

        let media = MediaRef::from("uploads/hero.jpg");
        assert_eq!(
            resolve_media_url("https://cms.example.com", Some(&media)),
            Some("https://cms.example.com/uploads/hero.jpg".to_string())
        );
    }

    #[test]
    fn resolve_media_url_keeps_absolute_urls() {
        let media = MediaRef::from("https://cdn.example.com/a.png");
        assert_eq!(
            resolve_media_url("https://cms.example.com", Some(&media)),
            Some("https://cdn.example.com/a.png".to_string())
        );
    }

    #[test]
    fn resolve_media_url_absent() {
        assert_eq!(resolve_media_url("https://cms.example.com", None), None);
        let empty = MediaRef::new(json!({ "data": null }));
        assert_eq!(resolve_media_url("https://cms.example.com", Some(&empty)), None);
    }
}
