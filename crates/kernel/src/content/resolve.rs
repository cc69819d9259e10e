//! Block resolution and renderer dispatch.
//!
//! Walks a page's content sequence in order. Each block is checked against
//! the schema registry, its attributes are merged over the type's defaults,
//! and the registered renderer is invoked. Blocks that cannot be rendered
//! are skipped and recorded; a bad block never aborts the page.

use std::sync::Arc;

use serde::Serialize;
use showcase_schema::{Attributes, SchemaRegistry, SchemaViolation};
use tracing::{debug, warn};

use super::block_render::{RenderContext, RendererRegistry};
use super::model::BlockInstance;

/// A block whose attributes have been merged over its type's defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBlock {
    pub type_id: String,
    /// Index in the page's content sequence.
    pub position: usize,
    pub attributes: Attributes,
}

/// Why a block produced no output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The block carried no type identifier.
    MissingType,
    /// The type identifier is not in the schema registry.
    UnknownType { type_id: String },
    /// The type is known but nothing renders it.
    NoRenderer { type_id: String },
    /// The resolved attributes do not form the renderer's typed view.
    Untyped { type_id: String, error: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingType => write!(f, "block has no type"),
            Self::UnknownType { type_id } => write!(f, "unknown block type '{type_id}'"),
            Self::NoRenderer { type_id } => write!(f, "no renderer for '{type_id}'"),
            Self::Untyped { type_id, error } => {
                write!(f, "'{type_id}' attributes do not fit the block: {error}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedBlock {
    pub position: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// What went wrong while rendering a page, block by block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderReport {
    pub skipped: Vec<SkippedBlock>,
    pub violations: Vec<SchemaViolation>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.violations.is_empty()
    }
}

/// HTML for one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBlock {
    pub type_id: String,
    pub position: usize,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderOutput {
    pub blocks: Vec<RenderedBlock>,
    pub report: RenderReport,
}

impl RenderOutput {
    /// Block HTML concatenated in page order.
    pub fn html(&self) -> String {
        self.blocks.iter().map(|b| b.html.as_str()).collect()
    }
}

/// Resolves and renders content sequences. Holds no per-render state.
#[derive(Debug, Clone)]
pub struct BlockResolver {
    schema: Arc<SchemaRegistry>,
    renderers: Arc<RendererRegistry>,
}

impl BlockResolver {
    pub fn new(schema: Arc<SchemaRegistry>, renderers: Arc<RendererRegistry>) -> Self {
        Self { schema, renderers }
    }

    /// Resolver over the standard catalog and renderers.
    pub fn standard() -> Self {
        Self::new(
            Arc::new(SchemaRegistry::standard()),
            Arc::new(RendererRegistry::standard()),
        )
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Merge every known block over its defaults, in order.
    ///
    /// Blocks with a missing or unregistered type are skipped and reported.
    pub fn resolve(&self, blocks: &[BlockInstance]) -> (Vec<ResolvedBlock>, RenderReport) {
        let mut resolved = Vec::with_capacity(blocks.len());
        let mut report = RenderReport::default();

        for (position, block) in blocks.iter().enumerate() {
            let Some(type_id) = block.type_id.as_deref().filter(|t| !t.is_empty()) else {
                warn!(position, "skipping block without a type");
                report.skipped.push(SkippedBlock {
                    position,
                    reason: SkipReason::MissingType,
                });
                continue;
            };

            let Some(resolution) = self.schema.resolve_attributes(type_id, &block.attributes)
            else {
                warn!(position, type_id = %type_id, "skipping block of unknown type");
                report.skipped.push(SkippedBlock {
                    position,
                    reason: SkipReason::UnknownType {
                        type_id: type_id.to_string(),
                    },
                });
                continue;
            };

            for violation in &resolution.violations {
                warn!(position, violation = %violation, "block attribute violates schema");
            }
            report.violations.extend(resolution.violations);

            resolved.push(ResolvedBlock {
                type_id: type_id.to_string(),
                position,
                attributes: resolution.attributes,
            });
        }

        (resolved, report)
    }

    /// Resolve then render a content sequence.
    pub fn render(&self, blocks: &[BlockInstance], ctx: &RenderContext) -> RenderOutput {
        let (resolved, mut report) = self.resolve(blocks);
        let mut rendered = Vec::with_capacity(resolved.len());

        for block in resolved {
            let reason = match self.renderers.render(&block.type_id, &block.attributes, ctx) {
                Some(Ok(html)) => {
                    debug!(position = block.position, type_id = %block.type_id, "rendered block");
                    rendered.push(RenderedBlock {
                        type_id: block.type_id,
                        position: block.position,
                        html,
                    });
                    continue;
                }
                Some(Err(e)) => SkipReason::Untyped {
                    type_id: block.type_id,
                    error: e.to_string(),
                },
                None => SkipReason::NoRenderer {
                    type_id: block.type_id,
                },
            };
            warn!(position = block.position, reason = %reason, "skipping block");
            report.skipped.push(SkippedBlock {
                position: block.position,
                reason,
            });
        }

        report.skipped.sort_by_key(|s| s.position);
        RenderOutput {
            blocks: rendered,
            report,
        }
    }
}

impl Default for BlockResolver {
    fn default() -> Self {
        Self::standard()
    }
}
