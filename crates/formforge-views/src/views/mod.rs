//! Trait-based request handlers.

use std::future::Future;
use std::pin::Pin;

use formforge_http::{HttpRequest, HttpResponse};

pub mod class_based;
pub mod form_template;
pub mod form_view;

pub use class_based::{
    ContextMixin, RedirectView, TemplateResponseMixin, TemplateView, View,
};
pub use form_template::{
    FormTemplateMixin, FormTemplateView, ModelFormTemplateMixin, ModelFormTemplateView,
    TemplateContextMixin, TemplateRenderMixin,
};
pub use form_view::{bind_form_from_request, extract_post_data, FormView};

/// A boxed async handler, the form a view takes once routed.
pub type ViewFn =
    Box<dyn Fn(HttpRequest) -> Pin<Box<dyn Future<Output = HttpResponse> + Send>> + Send + Sync>;
