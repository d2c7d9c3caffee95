//! # formforge
//!
//! Dynamic form assembly paired with per-form response templates.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `formforge` to get the whole stack, or on individual
//! crates for finer-grained control.

/// Settings, logging, and error types.
pub use formforge_core as core;

/// HTTP layer: request, response, and query dicts.
pub use formforge_http as http;

/// Tera-backed template engine and context helpers.
pub use formforge_template as template;

/// Dynamic forms: fields, widgets, assembly, and the entry store.
pub use formforge_forms as forms;

/// Views: method dispatch, the form-template flow, and the app server.
pub use formforge_views as views;

/// Request factory for exercising views in tests.
#[cfg(feature = "testing")]
pub use formforge_test as test;
