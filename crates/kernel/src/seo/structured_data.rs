//! JSON-LD documents embedded in every page head.

use serde_json::{Value, json};

use super::absolute_url;
use super::meta::SeoDefaults;
use crate::content::model::{HOME_SLUG, Page};

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// The Organization descriptor. Identical on every page.
pub fn organization(defaults: &SeoDefaults) -> Value {
    let mut doc = json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "Organization",
        "name": defaults.site_name,
        "url": absolute_url(&defaults.site_url, "/"),
        "description": defaults.description,
    });
    if let Some(logo) = &defaults.organization_logo {
        doc["logo"] = json!(logo);
    }
    if !defaults.same_as.is_empty() {
        doc["sameAs"] = json!(defaults.same_as);
    }
    doc
}

/// BreadcrumbList for the two-level hierarchy home → page.
///
/// The home page yields a single-item list.
pub fn breadcrumbs(page: &Page, defaults: &SeoDefaults) -> Value {
    let mut items = vec![json!({
        "@type": "ListItem",
        "position": 1,
        "name": "Home",
        "item": absolute_url(&defaults.site_url, "/"),
    })];

    if page.slug != HOME_SLUG {
        let name = if page.title.is_empty() {
            page.slug.as_str()
        } else {
            page.title.as_str()
        };
        items.push(json!({
            "@type": "ListItem",
            "position": 2,
            "name": name,
            "item": absolute_url(&defaults.site_url, &page.path()),
        }));
    }

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}
