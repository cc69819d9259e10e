//! Page shell rendering with Tera.

mod engine;

pub use engine::ThemeEngine;
