//! # formforge-views
//!
//! Trait-based request handlers and the application server. Views are
//! `Send + Sync` trait objects dispatching on HTTP method. The form template
//! views render a per-form response template after a valid submission;
//! [`server::App`] mounts views on paths and serves them.

pub mod server;
pub mod views;

pub use server::App;
pub use views::{
    ContextMixin, FormTemplateMixin, FormTemplateView, FormView, ModelFormTemplateMixin,
    ModelFormTemplateView, RedirectView, TemplateContextMixin, TemplateRenderMixin,
    TemplateResponseMixin, TemplateView, View, ViewFn,
};
