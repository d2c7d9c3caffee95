//! # formforge-http
//!
//! Request/response plumbing for the formforge workspace: an [`HttpRequest`]
//! with parsed query and form data, an [`HttpResponse`] convertible into an
//! axum response, and the multi-value [`QueryDict`] both are built on.
//!
//! ## Modules
//!
//! - [`querydict`] - Immutable-by-default multi-value parameter dictionary
//! - [`request`] - The request type, its builder, and axum conversion
//! - [`response`] - The response type and convenience constructors

pub mod querydict;
pub mod request;
pub mod response;

// Re-export the most commonly used types at the crate root.
pub use querydict::QueryDict;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::{HttpResponse, JsonResponse};
