//! # formforge-template
//!
//! Template rendering for the formforge workspace, backed by [`tera`]. The
//! [`Engine`] holds named templates (registered strings or files loaded from
//! directories) and also renders one-off per-record template strings;
//! [`render_string`] does the same without an engine, which is what the
//! form-template views fall back to when none is configured.
//!
//! ## Modules
//!
//! - [`engine`] - The tera-backed [`Engine`] and one-off rendering
//! - [`context`] - Context data alias and conversion helpers
//! - [`processors`] - Context processors adding request-derived entries

pub mod context;
pub mod engine;
pub mod processors;

// Re-export the most commonly used types at the crate root.
pub use context::{merge_defaults, ContextData};
pub use engine::{render_string, Engine};
pub use processors::ContextProcessor;
