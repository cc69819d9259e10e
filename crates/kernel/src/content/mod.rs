//! Page content: records, sources, and block rendering.
//!
//! This module provides:
//! - `ContentClient`: reads pages and settings from the content service
//! - `BundledContent`: static fallback pages compiled into the binary
//! - `BlockResolver`: schema resolution and renderer dispatch per block
//! - `RendererRegistry`: HTML renderers for every page section type
//! - `PageService`: one full page render with fallback and meta

pub mod block_render;
pub mod blocks;
pub mod bundled;
pub mod client;
pub mod filter;
pub mod model;
pub mod page_service;
pub mod resolve;

pub use block_render::{RenderContext, RendererRegistry};
pub use bundled::BundledContent;
pub use client::{ContentClient, ContentConfig, ContentError, ContentSource};
pub use filter::{FilterPipeline, TextFilter};
pub use model::{BlockInstance, MediaRef, Page, Seo, SiteSettings};
pub use page_service::{ContentOrigin, PageService, RenderedPage};
pub use resolve::{BlockResolver, RenderOutput, RenderReport, RenderedBlock, ResolvedBlock, SkipReason};
