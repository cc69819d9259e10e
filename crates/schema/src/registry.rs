//! Schema registry: the single source of truth mapping every supported type
//! identifier to its attribute contract.
//!
//! Provides:
//! - `lookup` / `defaults_for`: contract and fully-defaulted attribute map
//! - `resolve_attributes`: per-attribute merge of supplied values over
//!   defaults, recursing into component attributes
//! - `validate`: constraint checks that report violations without touching
//!   the values

use std::collections::HashMap;

use serde_json::Value;

use crate::catalog;
use crate::types::{AttributeDefinition, AttributeType, Attributes, BlockType, Namespace, json_kind};
use crate::violation::{SchemaViolation, ViolationKind};

/// Result of merging supplied attributes over a type's defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Every declared attribute, supplied or defaulted.
    pub attributes: Attributes,
    /// Constraint and shape problems found along the way.
    pub violations: Vec<SchemaViolation>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Registry of block types, keyed by type identifier.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, BlockType>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Create a registry holding the full compiled catalog.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        catalog::register_standard_types(&mut registry);
        registry
    }

    /// Register a block type, replacing any previous definition of that id.
    pub fn register(&mut self, block_type: BlockType) {
        self.types.insert(block_type.type_id.clone(), block_type);
    }

    /// Look up a block type by identifier.
    pub fn lookup(&self, type_id: &str) -> Option<&BlockType> {
        self.types.get(type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered identifiers, sorted.
    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.types.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered types within one namespace, sorted by identifier.
    pub fn types_in(&self, namespace: Namespace) -> Vec<&BlockType> {
        let mut types: Vec<&BlockType> = self
            .types
            .values()
            .filter(|t| t.namespace() == Some(namespace))
            .collect();
        types.sort_by(|a, b| a.type_id.cmp(&b.type_id));
        types
    }

    /// Attribute map with every declared attribute set to its default.
    ///
    /// Attributes without a declared default are present as `null`
    /// (repeatable components as `[]`).
    pub fn defaults_for(&self, type_id: &str) -> Option<Attributes> {
        let block_type = self.lookup(type_id)?;
        Some(
            block_type
                .attributes
                .iter()
                .map(|def| (def.name.clone(), def.resolved_default()))
                .collect(),
        )
    }

    /// Merge supplied attributes over the defaults of `type_id`.
    ///
    /// Supplied values pass through unchanged, including ones that violate a
    /// constraint; absent or `null` values take the default. Nested records
    /// in component attributes are resolved against their own type with the
    /// same rule. Keys the type does not declare are dropped.
    ///
    /// Returns `None` when `type_id` is not registered.
    pub fn resolve_attributes(&self, type_id: &str, supplied: &Attributes) -> Option<Resolution> {
        let mut violations = Vec::new();
        let attributes = self.merge(type_id, supplied, &mut violations)?;
        violations.extend(self.validate(type_id, &attributes));
        Some(Resolution {
            attributes,
            violations,
        })
    }

    /// Check an attribute map against the contract of `type_id`.
    ///
    /// Returns one entry per problem; an empty list means the map satisfies
    /// the contract. An unregistered `type_id` yields no violations, since
    /// there is no contract to check against.
    pub fn validate(&self, type_id: &str, attributes: &Attributes) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        if let Some(block_type) = self.lookup(type_id) {
            for def in &block_type.attributes {
                let value = attributes.get(&def.name).unwrap_or(&Value::Null);
                self.validate_value(type_id, def, value, &mut violations);
            }
        }
        violations
    }

    /// Component references that do not name a registered type.
    ///
    /// Each entry reads `owner.attribute -> component`. The standard catalog
    /// must produce an empty list.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut dangling: Vec<String> = self
            .types
            .values()
            .flat_map(|t| {
                t.attributes.iter().filter_map(move |def| {
                    let component = def.attribute_type.component()?;
                    (!self.contains(component))
                        .then(|| format!("{}.{} -> {component}", t.type_id, def.name))
                })
            })
            .collect();
        dangling.sort();
        dangling
    }

    fn merge(
        &self,
        type_id: &str,
        supplied: &Attributes,
        violations: &mut Vec<SchemaViolation>,
    ) -> Option<Attributes> {
        let block_type = self.lookup(type_id)?;
        let mut merged = Attributes::new();

        for def in &block_type.attributes {
            let value = match supplied.get(&def.name).filter(|v| !v.is_null()) {
                None => def.resolved_default(),
                Some(value) => match &def.attribute_type {
                    AttributeType::Component {
                        component,
                        repeatable,
                    } => self.merge_component(type_id, def, component, *repeatable, value, violations),
                    _ => value.clone(),
                },
            };
            merged.insert(def.name.clone(), value);
        }

        Some(merged)
    }

    fn merge_component(
        &self,
        type_id: &str,
        def: &AttributeDefinition,
        component: &str,
        repeatable: bool,
        value: &Value,
        violations: &mut Vec<SchemaViolation>,
    ) -> Value {
        if !self.contains(component) {
            violations.push(SchemaViolation::new(
                type_id,
                def.name.as_str(),
                ViolationKind::UnknownComponent {
                    component: component.to_string(),
                },
            ));
            return value.clone();
        }

        match (repeatable, value) {
            (true, Value::Array(items)) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let prefix = format!("{}[{index}]", def.name);
                    let Value::Object(record) = item else {
                        violations.push(SchemaViolation::new(
                            type_id,
                            prefix,
                            ViolationKind::MalformedNested,
                        ));
                        continue;
                    };
                    let mut nested = Vec::new();
                    if let Some(merged) = self.merge(component, record, &mut nested) {
                        resolved.push(Value::Object(merged));
                    }
                    violations.extend(nested.into_iter().map(|v| v.nested_under(type_id, &prefix)));
                }
                Value::Array(resolved)
            }
            (false, Value::Object(record)) => {
                let mut nested = Vec::new();
                let merged = self.merge(component, record, &mut nested);
                violations.extend(
                    nested
                        .into_iter()
                        .map(|v| v.nested_under(type_id, &def.name)),
                );
                merged.map(Value::Object).unwrap_or_else(|| value.clone())
            }
            // Wrong shape: left as supplied, reported by validation.
            _ => value.clone(),
        }
    }

    fn validate_value(
        &self,
        type_id: &str,
        def: &AttributeDefinition,
        value: &Value,
        violations: &mut Vec<SchemaViolation>,
    ) {
        let path = def.name.as_str();

        if value.is_null() {
            if def.required {
                violations.push(SchemaViolation::new(
                    type_id,
                    path,
                    ViolationKind::MissingRequired,
                ));
            }
            return;
        }

        if !def.attribute_type.accepts(value) {
            violations.push(SchemaViolation::new(
                type_id,
                path,
                ViolationKind::TypeMismatch {
                    expected: def.attribute_type.describe(),
                    found: json_kind(value),
                },
            ));
            return;
        }

        match &def.attribute_type {
            AttributeType::Enumeration(allowed) => {
                if let Some(s) = value.as_str()
                    && !allowed.iter().any(|a| a == s)
                {
                    violations.push(SchemaViolation::new(
                        type_id,
                        path,
                        ViolationKind::NotAllowed {
                            value: s.to_string(),
                            allowed: allowed.clone(),
                        },
                    ));
                }
            }
            AttributeType::String | AttributeType::Text | AttributeType::RichText => {
                if let Some(s) = value.as_str() {
                    let length = s.chars().count();
                    if let Some(min) = def.constraints.min_length
                        && length < min
                    {
                        violations.push(SchemaViolation::new(
                            type_id,
                            path,
                            ViolationKind::TooShort { length, min },
                        ));
                    }
                    if let Some(max) = def.constraints.max_length
                        && length > max
                    {
                        violations.push(SchemaViolation::new(
                            type_id,
                            path,
                            ViolationKind::TooLong { length, max },
                        ));
                    }
                }
            }
            AttributeType::Integer | AttributeType::Decimal => {
                if let Some(n) = value.as_f64() {
                    let below = def.constraints.min.is_some_and(|min| n < min);
                    let above = def.constraints.max.is_some_and(|max| n > max);
                    if below || above {
                        violations.push(SchemaViolation::new(
                            type_id,
                            path,
                            ViolationKind::OutOfRange {
                                value: n,
                                min: def.constraints.min,
                                max: def.constraints.max,
                            },
                        ));
                    }
                }
            }
            AttributeType::Component {
                component,
                repeatable,
            } => {
                let records: Vec<(String, &Value)> = if *repeatable {
                    value
                        .as_array()
                        .map(|items| {
                            items
                                .iter()
                                .enumerate()
                                .map(|(i, item)| (format!("{path}[{i}]"), item))
                                .collect()
                        })
                        .unwrap_or_default()
                } else {
                    vec![(path.to_string(), value)]
                };
                for (prefix, record) in records {
                    let Some(record) = record.as_object() else {
                        violations.push(SchemaViolation::new(
                            type_id,
                            prefix,
                            ViolationKind::MalformedNested,
                        ));
                        continue;
                    };
                    violations.extend(
                        self.validate(component, record)
                            .into_iter()
                            .map(|v| v.nested_under(type_id, &prefix)),
                    );
                }
            }
            AttributeType::Boolean | AttributeType::Media | AttributeType::Relation { .. } => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn standard_registry_has_full_catalog() {
        let registry = SchemaRegistry::standard();
        assert_eq!(registry.len(), 25);
        assert_eq!(registry.types_in(Namespace::Blocks).len(), 13);
        assert_eq!(registry.types_in(Namespace::Elements).len(), 9);
        assert_eq!(registry.types_in(Namespace::Shared).len(), 3);
    }

    #[test]
    fn standard_catalog_has_no_dangling_references() {
        let registry = SchemaRegistry::standard();
        let dangling = registry.dangling_references();
        assert!(dangling.is_empty(), "dangling references: {dangling:?}");
    }

    #[test]
    fn every_type_id_is_namespaced() {
        let registry = SchemaRegistry::standard();
        for id in registry.type_ids() {
            assert!(
                Namespace::from_type_id(id).is_some(),
                "type id '{id}' has no known namespace"
            );
        }
    }

    #[test]
    fn lookup_unknown_type() {
        let registry = SchemaRegistry::standard();
        assert!(registry.lookup("blocks.unknown-thing").is_none());
        assert!(registry.defaults_for("blocks.unknown-thing").is_none());
        assert!(
            registry
                .resolve_attributes("blocks.unknown-thing", &Attributes::new())
                .is_none()
        );
    }

    #[test]
    fn hero_section_defaults() {
        let registry = SchemaRegistry::standard();
        let defaults = registry.defaults_for("blocks.hero-section").unwrap();
        assert_eq!(defaults["textAlignment"], json!("center"));
        assert_eq!(defaults["height"], json!("large"));
        assert_eq!(defaults["buttons"], json!([]));
        assert_eq!(defaults["title"], Value::Null);
    }

    #[test]
    fn text_block_defaults() {
        let registry = SchemaRegistry::standard();
        let defaults = registry.defaults_for("blocks.text-block").unwrap();
        assert_eq!(defaults["textAlignment"], json!("left"));
        assert_eq!(defaults["padding"], json!("medium"));
        assert_eq!(defaults["maxWidth"], json!("large"));
    }

    #[test]
    fn defaults_contain_every_attribute_name() {
        let registry = SchemaRegistry::standard();
        for id in registry.type_ids() {
            let block_type = registry.lookup(id).unwrap();
            let defaults = registry.defaults_for(id).unwrap();
            assert_eq!(defaults.len(), block_type.attributes.len(), "{id}");
            for def in &block_type.attributes {
                assert!(defaults.contains_key(&def.name), "{id}.{}", def.name);
            }
        }
    }

    #[test]
    fn resolve_merges_per_attribute() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({
            "content": "<p>Hi</p>",
            "padding": "large",
        }));
        let resolution = registry
            .resolve_attributes("blocks.text-block", &supplied)
            .unwrap();

        assert!(resolution.is_clean(), "{:?}", resolution.violations);
        assert_eq!(resolution.attributes["content"], json!("<p>Hi</p>"));
        assert_eq!(resolution.attributes["padding"], json!("large"));
        assert_eq!(resolution.attributes["textAlignment"], json!("left"));
        assert_eq!(resolution.attributes["maxWidth"], json!("large"));
    }

    #[test]
    fn null_supplied_value_takes_default() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({ "title": "Welcome", "height": null }));
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &supplied)
            .unwrap();
        assert_eq!(resolution.attributes["height"], json!("large"));
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({ "id": 7, "title": "Welcome", "__component": "x" }));
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &supplied)
            .unwrap();
        assert!(!resolution.attributes.contains_key("id"));
        assert!(!resolution.attributes.contains_key("__component"));
    }

    #[test]
    fn constraint_violation_passes_through_and_is_reported() {
        let registry = SchemaRegistry::standard();
        let long_title = "x".repeat(200);
        let supplied = attrs(json!({
            "title": long_title,
            "textAlignment": "diagonal",
        }));
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &supplied)
            .unwrap();

        assert_eq!(resolution.attributes["title"], json!(long_title));
        assert_eq!(resolution.attributes["textAlignment"], json!("diagonal"));
        assert_eq!(resolution.violations.len(), 2);
        assert!(
            resolution
                .violations
                .iter()
                .any(|v| v.path == "title" && matches!(v.kind, ViolationKind::TooLong { .. }))
        );
        assert!(
            resolution
                .violations
                .iter()
                .any(|v| v.path == "textAlignment"
                    && matches!(v.kind, ViolationKind::NotAllowed { .. }))
        );
    }

    #[test]
    fn missing_required_is_reported() {
        let registry = SchemaRegistry::standard();
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &Attributes::new())
            .unwrap();
        assert_eq!(resolution.violations.len(), 1);
        assert_eq!(resolution.violations[0].path, "title");
        assert_eq!(resolution.violations[0].kind, ViolationKind::MissingRequired);
    }

    #[test]
    fn out_of_range_integer_is_reported() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({ "columns": 9 }));
        let resolution = registry
            .resolve_attributes("blocks.feature-grid", &supplied)
            .unwrap();
        assert_eq!(resolution.attributes["columns"], json!(9));
        assert!(matches!(
            resolution.violations[0].kind,
            ViolationKind::OutOfRange { value, .. } if value == 9.0
        ));
    }

    #[test]
    fn type_mismatch_is_reported() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({ "title": { "nested": true } }));
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &supplied)
            .unwrap();
        assert_eq!(
            resolution.violations[0].kind,
            ViolationKind::TypeMismatch {
                expected: "string",
                found: "object"
            }
        );
    }

    #[test]
    fn nested_components_receive_defaults() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({
            "title": "Welcome",
            "buttons": [
                { "id": 1, "label": "Start", "url": "/start" },
                { "label": "Docs", "url": "/docs", "variant": "outline" }
            ]
        }));
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &supplied)
            .unwrap();
        assert!(resolution.is_clean(), "{:?}", resolution.violations);

        let buttons = resolution.attributes["buttons"].as_array().unwrap();
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0]["variant"], json!("primary"));
        assert_eq!(buttons[0]["openInNewTab"], json!(false));
        assert!(buttons[0].get("id").is_none());
        assert_eq!(buttons[1]["variant"], json!("outline"));
    }

    #[test]
    fn malformed_nested_records_are_dropped_and_reported() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({
            "title": "Features",
            "features": [ { "title": "Fast" }, "not a record", { "title": "Safe" } ]
        }));
        let resolution = registry
            .resolve_attributes("blocks.feature-grid", &supplied)
            .unwrap();
        let features = resolution.attributes["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["title"], json!("Safe"));
        assert_eq!(resolution.violations.len(), 1);
        assert_eq!(resolution.violations[0].path, "features[1]");
        assert_eq!(resolution.violations[0].kind, ViolationKind::MalformedNested);
    }

    #[test]
    fn nested_violations_are_anchored_on_parent() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({
            "title": "Welcome",
            "buttons": [ { "url": "/start" } ]
        }));
        let resolution = registry
            .resolve_attributes("blocks.hero-section", &supplied)
            .unwrap();
        assert_eq!(resolution.violations.len(), 1);
        let violation = &resolution.violations[0];
        assert_eq!(violation.type_id, "blocks.hero-section");
        assert_eq!(violation.path, "buttons[0].label");
    }

    #[test]
    fn resolution_is_idempotent() {
        let registry = SchemaRegistry::standard();
        let supplied = attrs(json!({
            "title": "Numbers",
            "stats": [ { "value": "99%", "label": "Uptime" } ]
        }));
        let first = registry
            .resolve_attributes("blocks.stats-section", &supplied)
            .unwrap();
        let second = registry
            .resolve_attributes("blocks.stats-section", &supplied)
            .unwrap();
        assert_eq!(first, second);

        // Resolving an already-resolved map changes nothing.
        let again = registry
            .resolve_attributes("blocks.stats-section", &first.attributes)
            .unwrap();
        assert_eq!(again.attributes, first.attributes);
    }

    #[test]
    fn validate_unknown_type_is_empty() {
        let registry = SchemaRegistry::standard();
        assert!(registry.validate("blocks.nope", &Attributes::new()).is_empty());
    }

    #[test]
    fn custom_registry_reports_dangling_component() {
        let mut registry = SchemaRegistry::new();
        registry.register(
            BlockType::new("blocks.list", "List")
                .attribute(AttributeDefinition::repeatable("items", "elements.missing")),
        );
        assert_eq!(
            registry.dangling_references(),
            vec!["blocks.list.items -> elements.missing".to_string()]
        );

        let supplied = attrs(json!({ "items": [ { "a": 1 } ] }));
        let resolution = registry.resolve_attributes("blocks.list", &supplied).unwrap();
        assert_eq!(resolution.attributes["items"], json!([ { "a": 1 } ]));
        assert!(matches!(
            resolution.violations[0].kind,
            ViolationKind::UnknownComponent { .. }
        ));
    }

    #[test]
    fn empty_registry() {
        let registry = SchemaRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
