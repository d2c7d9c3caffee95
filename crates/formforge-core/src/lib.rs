//! # formforge-core
//!
//! Shared foundation for the formforge workspace: the [`ForgeError`] type
//! used across all crates, workspace [`Settings`] with TOML loading, and
//! tracing-based logging setup. This crate has no web or forms dependencies
//! and sits at the bottom of the crate graph.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Workspace settings and global configuration
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;

// Re-export the most commonly used types at the crate root.
pub use error::{ForgeError, ForgeResult, ValidationError};
pub use settings::{Settings, SETTINGS};
