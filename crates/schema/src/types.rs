//! Core schema types: namespaces, semantic attribute types, constraints,
//! attribute definitions, and block types.
//!
//! Block types are compiled into the application; nothing here is editable
//! at runtime. Definitions are assembled with small builder methods so the
//! catalog reads like a table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute map of a single block or nested record.
pub type Attributes = serde_json::Map<String, Value>;

/// Top-level namespace of a type identifier (`namespace.kind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Page-level sections that appear in a page's content sequence.
    Blocks,
    /// Sub-records embedded through component attributes.
    Elements,
    /// Cross-cutting metadata fragments attached to a page (SEO, navigation).
    Shared,
}

impl Namespace {
    /// Parse the namespace prefix of a type identifier.
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        let (namespace, kind) = type_id.split_once('.')?;
        if kind.is_empty() {
            return None;
        }
        match namespace {
            "blocks" => Some(Self::Blocks),
            "elements" => Some(Self::Elements),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Elements => "elements",
            Self::Shared => "shared",
        }
    }
}

/// Semantic type of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeType {
    /// Short single-line string.
    String,
    /// Multi-line plain text.
    Text,
    /// Markdown/HTML rich text.
    RichText,
    Boolean,
    Integer,
    Decimal,
    /// String restricted to an allowed set of values.
    Enumeration(Vec<String>),
    /// Reference to an uploaded media asset.
    Media,
    /// One nested record (or an ordered list of them) of the named type.
    Component { component: String, repeatable: bool },
    /// Reference to another content-service record; passed through as-is.
    Relation { target: String },
}

impl AttributeType {
    /// Whether a non-null JSON value has the shape this type declares.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String | Self::Text | Self::RichText | Self::Enumeration(_) => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Decimal => value.is_number(),
            Self::Media => value.is_string() || value.is_object(),
            Self::Component {
                repeatable: true, ..
            } => value.is_array(),
            Self::Component {
                repeatable: false, ..
            } => value.is_object(),
            Self::Relation { .. } => true,
        }
    }

    /// Short human-readable name used in violation messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Enumeration(_) => "enumeration",
            Self::Media => "media",
            Self::Component {
                repeatable: true, ..
            } => "component list",
            Self::Component { .. } => "component",
            Self::Relation { .. } => "relation",
        }
    }

    /// The nested type identifier, for component attributes.
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::Component { component, .. } => Some(component.as_str()),
            _ => None,
        }
    }
}

/// Length and numeric bounds on an attribute value.
///
/// Lengths are measured in characters; numeric bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A single attribute within a block type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub constraints: Constraints,
}

impl AttributeDefinition {
    pub fn new(name: &str, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            default: None,
            required: false,
            constraints: Constraints::default(),
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, AttributeType::Text)
    }

    pub fn rich_text(name: &str) -> Self {
        Self::new(name, AttributeType::RichText)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, AttributeType::Boolean)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, AttributeType::Integer)
    }

    pub fn decimal(name: &str) -> Self {
        Self::new(name, AttributeType::Decimal)
    }

    pub fn enumeration(name: &str, allowed: &[&str]) -> Self {
        Self::new(
            name,
            AttributeType::Enumeration(allowed.iter().map(|s| s.to_string()).collect()),
        )
    }

    pub fn media(name: &str) -> Self {
        Self::new(name, AttributeType::Media)
    }

    /// A single nested record of `component` type.
    pub fn component(name: &str, component: &str) -> Self {
        Self::new(
            name,
            AttributeType::Component {
                component: component.into(),
                repeatable: false,
            },
        )
    }

    /// An ordered list of nested records of `component` type.
    pub fn repeatable(name: &str, component: &str) -> Self {
        Self::new(
            name,
            AttributeType::Component {
                component: component.into(),
                repeatable: true,
            },
        )
    }

    pub fn relation(name: &str, target: &str) -> Self {
        Self::new(
            name,
            AttributeType::Relation {
                target: target.into(),
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.constraints.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.constraints.max_length = Some(n);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraints.min = Some(min);
        self.constraints.max = Some(max);
        self
    }

    /// The value an absent attribute resolves to.
    ///
    /// The declared default if there is one; an empty list for repeatable
    /// components; `null` otherwise.
    pub fn resolved_default(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match self.attribute_type {
            AttributeType::Component {
                repeatable: true, ..
            } => Value::Array(Vec::new()),
            _ => Value::Null,
        }
    }

    /// Allowed values, for enumeration attributes.
    pub fn allowed_values(&self) -> Option<&[String]> {
        match &self.attribute_type {
            AttributeType::Enumeration(values) => Some(values),
            _ => None,
        }
    }
}

/// Attribute contract for one type identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockType {
    /// Type identifier, e.g. `blocks.hero-section`.
    pub type_id: String,
    /// Human-readable label, e.g. "Hero Section".
    pub label: String,
    /// Attribute definitions in declaration order.
    pub attributes: Vec<AttributeDefinition>,
}

impl BlockType {
    pub fn new(type_id: &str, label: &str) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, definition: AttributeDefinition) -> Self {
        self.attributes.push(definition);
        self
    }

    pub fn namespace(&self) -> Option<Namespace> {
        Namespace::from_type_id(&self.type_id)
    }

    /// Look up an attribute definition by name.
    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// JSON kind name for a value, used in violation messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
