//! Showcase test utilities.
//!
//! Builders for content-service JSON fixtures (pages, blocks, site settings)
//! and the REST envelopes they arrive in, plus assertion helpers.

use serde_json::{Value as JsonValue, json};

/// Create a test page with a slug and title and no content.
pub fn test_page(slug: &str, title: &str) -> TestPage {
    TestPage {
        slug: slug.to_string(),
        title: title.to_string(),
        category: None,
        order: None,
        updated_at: None,
        seo: None,
        content: Vec::new(),
    }
}

/// A page record builder.
#[derive(Debug, Clone)]
pub struct TestPage {
    pub slug: String,
    pub title: String,
    pub category: Option<String>,
    pub order: Option<i64>,
    pub updated_at: Option<String>,
    pub seo: Option<JsonValue>,
    pub content: Vec<JsonValue>,
}

impl TestPage {
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Set `updatedAt` (RFC 3339).
    pub fn updated_at(mut self, timestamp: &str) -> Self {
        self.updated_at = Some(timestamp.to_string());
        self
    }

    pub fn with_seo(mut self, seo: JsonValue) -> Self {
        self.seo = Some(seo);
        self
    }

    /// Append a block.
    pub fn with_block(mut self, block: JsonValue) -> Self {
        self.content.push(block);
        self
    }

    /// The page as a flat (v5) record.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "slug": self.slug,
            "title": self.title,
            "category": self.category,
            "order": self.order,
            "updatedAt": self.updated_at,
            "seo": self.seo,
            "content": self.content,
        })
    }

    /// The page wrapped as a v4 `{id, attributes}` record.
    pub fn to_v4_json(&self, id: u64) -> JsonValue {
        json!({ "id": id, "attributes": self.to_json() })
    }
}

/// A block record in dynamic-zone form: `__component` plus attributes.
pub fn block(type_id: &str, attributes: JsonValue) -> JsonValue {
    let mut record = match attributes {
        JsonValue::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    record.insert("__component".to_string(), json!(type_id));
    JsonValue::Object(record)
}

/// Collection response: `{ "data": [...], "meta": {...} }`.
pub fn collection(pages: &[TestPage]) -> JsonValue {
    let data: Vec<JsonValue> = pages.iter().map(TestPage::to_json).collect();
    json!({
        "data": data,
        "meta": { "pagination": { "page": 1, "pageSize": 25, "pageCount": 1, "total": pages.len() } }
    })
}

/// Collection response in v4 shape, ids assigned from 1.
pub fn collection_v4(pages: &[TestPage]) -> JsonValue {
    let data: Vec<JsonValue> = pages
        .iter()
        .zip(1..)
        .map(|(page, id)| page.to_v4_json(id))
        .collect();
    json!({ "data": data, "meta": {} })
}

/// Single-type response: `{ "data": {...} }`.
pub fn single(record: JsonValue) -> JsonValue {
    json!({ "data": record, "meta": {} })
}

/// Site settings with a name and a two-entry navigation.
pub fn test_settings(site_name: &str) -> JsonValue {
    json!({
        "siteName": site_name,
        "tagline": "Remote tagline",
        "logo": { "url": "/uploads/logo.png", "alternativeText": "Logo" },
        "navigation": [
            { "label": "Home", "url": "/", "isExternal": false },
            { "label": "Docs", "url": "https://docs.example.com", "isExternal": true }
        ],
        "footerLinks": [],
        "socialLinks": [ { "platform": "github", "url": "https://github.com/example" } ],
        "contactEmail": "team@example.com"
    })
}

/// Assertion helpers for rendered output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `first` occurs before `second` in `haystack`.
    pub fn in_order(haystack: &str, first: &str, second: &str) {
        let a = haystack.find(first);
        let b = haystack.find(second);
        assert!(
            matches!((a, b), (Some(a), Some(b)) if a < b),
            "Expected '{first}' before '{second}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_builder_emits_camel_case_record() {
        let page = test_page("about", "About")
            .with_order(2)
            .with_block(block("blocks.text-block", json!({ "content": "Hi" })));
        let value = page.to_json();
        assert_eq!(value["slug"], "about");
        assert_eq!(value["order"], 2);
        assert_eq!(value["content"][0]["__component"], "blocks.text-block");
        assert!(value["updatedAt"].is_null());
    }

    #[test]
    fn envelopes() {
        let pages = [test_page("a", "A"), test_page("b", "B")];
        assert_eq!(collection(&pages)["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(collection_v4(&pages)["data"][1]["id"], 2);
        assert_eq!(single(test_settings("X"))["data"]["siteName"], "X");
    }
}
