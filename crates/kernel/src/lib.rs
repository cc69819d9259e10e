//! Showcase site kernel.
//!
//! Content client, block resolution and rendering, SEO documents, and the
//! HTTP surface. The `showcase` binary is the entry point for running the
//! server.

pub mod config;
pub mod content;
pub mod error;
pub mod routes;
pub mod seo;
pub mod state;
pub mod theme;
