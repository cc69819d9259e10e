//! Showcase block schema.
//!
//! Attribute contracts for every block, element, and shared metadata type a
//! page may contain, and the registry that resolves supplied attributes
//! against those contracts.

pub mod catalog;
pub mod registry;
pub mod types;
pub mod violation;

pub use registry::{Resolution, SchemaRegistry};
pub use types::{AttributeDefinition, AttributeType, Attributes, BlockType, Constraints, Namespace};
pub use violation::{SchemaViolation, ViolationKind};
