//! Form handling in views: request-to-form plumbing and the [`FormView`]
//! trait for the show-validate-redirect page flow.

use std::collections::HashMap;

use async_trait::async_trait;

use formforge_core::ForgeResult;
use formforge_forms::{BaseForm, Form};
use formforge_http::{HttpRequest, HttpResponse, QueryDict};
use formforge_template::{ContextData, Engine};

use super::class_based::{ContextMixin, TemplateResponseMixin};

/// Extract submitted form data from a request.
///
/// The request parses `application/x-www-form-urlencoded` bodies on
/// construction; anything else yields an empty dict.
///
/// # Examples
///
/// ```
/// use formforge_http::HttpRequest;
/// use formforge_views::views::form_view::extract_post_data;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::POST)
///     .content_type("application/x-www-form-urlencoded")
///     .body(b"name=Ada".to_vec())
///     .build();
/// assert_eq!(extract_post_data(&request).get("name"), Some("Ada"));
/// ```
pub fn extract_post_data(request: &HttpRequest) -> QueryDict {
    request.post().clone()
}

/// Bind a request's POST data to a form, leaving it ready for
/// `is_valid()`.
pub fn bind_form_from_request(form: &mut dyn Form, request: &HttpRequest) {
    form.bind(extract_post_data(request));
}

/// The classic form page flow: GET renders the form, POST validates it
/// and either redirects or re-renders with errors.
///
/// Implementors supply the form via `get_form` and wire `handle_get` /
/// `handle_post` into their [`super::View`] methods.
#[async_trait]
pub trait FormView: TemplateResponseMixin + ContextMixin {
    /// Where a successful submission redirects to.
    fn success_url(&self) -> &str;

    /// Engine used to render the page template.
    fn engine(&self) -> Option<&Engine> {
        None
    }

    /// Build the form for this request.
    async fn get_form(&self, request: &HttpRequest) -> ForgeResult<BaseForm>;

    /// Page context: the view's context data plus the form under `form`.
    fn form_context(&self, form: &dyn Form, kwargs: &HashMap<String, String>) -> ContextData {
        let mut context = self.get_context_data(kwargs);
        context.insert(
            "form".to_string(),
            serde_json::Value::Object(form.as_context().into_iter().collect()),
        );
        context
    }

    async fn render_form_page(&self, form: &dyn Form, request: &HttpRequest) -> HttpResponse {
        let context = self.form_context(form, request.params());
        self.render_to_response(&context, self.engine())
    }

    /// Called when the submission validates. Redirects to `success_url`.
    async fn form_valid(&self, form: &BaseForm, _request: &HttpRequest) -> HttpResponse {
        tracing::debug!(fields = form.fields().len(), "form valid");
        HttpResponse::redirect(self.success_url())
    }

    /// Called when the submission fails validation. Re-renders the page
    /// with the bound form and its errors.
    async fn form_invalid(&self, form: &BaseForm, request: &HttpRequest) -> HttpResponse {
        tracing::debug!(errors = form.errors().len(), "form invalid");
        self.render_form_page(form, request).await
    }

    /// GET: render the unbound form.
    async fn handle_get(&self, request: HttpRequest) -> HttpResponse {
        match self.get_form(&request).await {
            Ok(form) => self.render_form_page(&form, &request).await,
            Err(e) => HttpResponse::from_error(&e),
        }
    }

    /// POST: bind, validate, branch.
    async fn handle_post(&self, request: HttpRequest) -> HttpResponse {
        let mut form = match self.get_form(&request).await {
            Ok(form) => form,
            Err(e) => return HttpResponse::from_error(&e),
        };
        bind_form_from_request(&mut form, &request);
        if form.is_valid().await {
            self.form_valid(&form, &request).await
        } else {
            self.form_invalid(&form, &request).await
        }
    }
}
