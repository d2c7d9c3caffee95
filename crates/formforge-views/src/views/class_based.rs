//! The base [`View`] trait and template/redirect views built on it.
//!
//! A view is a `Send + Sync` trait object holding per-route configuration.
//! [`View::dispatch`] routes a request to the matching HTTP method handler;
//! handlers default to 405 Method Not Allowed until overridden.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use formforge_core::ForgeError;
use formforge_http::{HttpRequest, HttpResponse};
use formforge_template::{ContextData, Engine};

use super::ViewFn;

/// The base trait for request handlers.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use formforge_http::{HttpRequest, HttpResponse};
/// use formforge_views::views::View;
///
/// struct Ping;
///
/// #[async_trait]
/// impl View for Ping {
///     async fn get(&self, _request: HttpRequest) -> HttpResponse {
///         HttpResponse::ok("pong")
///     }
/// }
/// ```
#[async_trait]
pub trait View: Send + Sync {
    /// The HTTP methods this view accepts.
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::HEAD,
            http::Method::OPTIONS,
        ]
    }

    /// Route the request to the handler for its method.
    async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        match *request.method() {
            http::Method::GET => self.get(request).await,
            http::Method::POST => self.post(request).await,
            http::Method::HEAD => self.head(request).await,
            http::Method::OPTIONS => self.options(request).await,
            _ => self.http_method_not_allowed(request).await,
        }
    }

    /// Handle GET. 405 until overridden.
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    /// Handle POST. 405 until overridden.
    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.http_method_not_allowed(request).await
    }

    /// Handle HEAD. Delegates to `get`.
    async fn head(&self, request: HttpRequest) -> HttpResponse {
        self.get(request).await
    }

    /// Handle OPTIONS: an empty 200 carrying the `Allow` header.
    async fn options(&self, _request: HttpRequest) -> HttpResponse {
        let methods = self.allowed_methods();
        let names: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        let mut response = HttpResponse::ok("");
        if let Ok(value) = http::header::HeaderValue::from_str(&names.join(", ")) {
            response.headers_mut().insert(http::header::ALLOW, value);
        }
        response
    }

    async fn http_method_not_allowed(&self, request: HttpRequest) -> HttpResponse {
        tracing::warn!(method = %request.method(), path = request.path(), "method not allowed");
        let methods = self.allowed_methods();
        let names: Vec<&str> = methods.iter().map(http::Method::as_str).collect();
        HttpResponse::not_allowed(&names)
    }

    /// Box this view into a plain async handler function.
    #[allow(clippy::wrong_self_convention)]
    fn as_view(self) -> ViewFn
    where
        Self: Sized + 'static,
    {
        let view = Arc::new(self);
        Box::new(move |request: HttpRequest| {
            let view = view.clone();
            Box::pin(async move { view.dispatch(request).await })
        })
    }
}

/// Supplies context data for page rendering.
pub trait ContextMixin {
    /// Context for the page template. `kwargs` holds URL path parameters.
    fn get_context_data(&self, kwargs: &HashMap<String, String>) -> ContextData;
}

/// Renders a named page template through the engine.
pub trait TemplateResponseMixin: View {
    /// The primary template name.
    fn template_name(&self) -> &str;

    /// Template names to try, in order.
    fn get_template_names(&self) -> Vec<String> {
        vec![self.template_name().to_string()]
    }

    /// Render the view's template with `context` into an HTML response.
    ///
    /// Rendering requires an engine; without one the response is the
    /// configuration error, mapped to a 500.
    fn render_to_response(&self, context: &ContextData, engine: Option<&Engine>) -> HttpResponse {
        let Some(engine) = engine else {
            return HttpResponse::from_error(&ForgeError::ImproperlyConfigured(
                "no template engine configured".to_string(),
            ));
        };
        for name in self.get_template_names() {
            if engine.has_template(&name) {
                return match engine.render_to_string(&name, context) {
                    Ok(html) => {
                        let mut response = HttpResponse::ok(html);
                        response.set_content_type("text/html");
                        response
                    }
                    Err(e) => HttpResponse::from_error(&e),
                };
            }
        }
        HttpResponse::from_error(&ForgeError::TemplateDoesNotExist(self.template_name().to_string()))
    }
}

/// A view that renders one template on GET.
///
/// # Examples
///
/// ```
/// use formforge_views::views::TemplateView;
///
/// let view = TemplateView::new("home.html");
/// ```
pub struct TemplateView {
    template: String,
    extra_context: ContextData,
    engine: Option<Arc<Engine>>,
}

impl TemplateView {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            extra_context: ContextData::new(),
            engine: None,
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Arc<Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extra_context.insert(key.to_string(), value);
        self
    }
}

impl ContextMixin for TemplateView {
    fn get_context_data(&self, kwargs: &HashMap<String, String>) -> ContextData {
        let mut context = self.extra_context.clone();
        for (key, value) in kwargs {
            context.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        context
    }
}

impl TemplateResponseMixin for TemplateView {
    fn template_name(&self) -> &str {
        &self.template
    }
}

#[async_trait]
impl View for TemplateView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        let context = self.get_context_data(request.params());
        self.render_to_response(&context, self.engine.as_deref())
    }
}

/// A view that redirects every GET or POST.
pub struct RedirectView {
    url: String,
    permanent: bool,
}

impl RedirectView {
    /// A 302 temporary redirect.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            permanent: false,
        }
    }

    /// A 301 permanent redirect.
    pub fn permanent(url: &str) -> Self {
        Self {
            url: url.to_string(),
            permanent: true,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub const fn is_permanent(&self) -> bool {
        self.permanent
    }
}

#[async_trait]
impl View for RedirectView {
    async fn get(&self, _request: HttpRequest) -> HttpResponse {
        if self.permanent {
            HttpResponse::permanent_redirect(&self.url)
        } else {
            HttpResponse::redirect(&self.url)
        }
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.get(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoView;

    #[async_trait]
    impl View for EchoView {
        async fn get(&self, _request: HttpRequest) -> HttpResponse {
            HttpResponse::ok("GET response")
        }

        async fn post(&self, _request: HttpRequest) -> HttpResponse {
            HttpResponse::ok("POST response")
        }
    }

    fn request(method: http::Method) -> HttpRequest {
        HttpRequest::builder().method(method).build()
    }

    #[tokio::test]
    async fn dispatch_routes_by_method() {
        let view = EchoView;
        let response = view.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.text(), "GET response");
        let response = view.dispatch(request(http::Method::POST)).await;
        assert_eq!(response.text(), "POST response");
    }

    #[tokio::test]
    async fn unrouted_methods_are_rejected() {
        let view = EchoView;
        let response = view.dispatch(request(http::Method::DELETE)).await;
        assert_eq!(response.status(), http::StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn head_delegates_to_get() {
        let view = EchoView;
        let response = view.dispatch(request(http::Method::HEAD)).await;
        assert_eq!(response.text(), "GET response");
    }

    #[tokio::test]
    async fn options_lists_allowed_methods() {
        let view = EchoView;
        let response = view.dispatch(request(http::Method::OPTIONS)).await;
        let allow = response
            .headers()
            .get(http::header::ALLOW)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allow.contains("GET"));
        assert!(allow.contains("POST"));
    }

    #[tokio::test]
    async fn as_view_produces_a_callable_handler() {
        let handler = EchoView.as_view();
        let response = handler(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[tokio::test]
    async fn template_view_renders_through_engine() {
        let engine = Arc::new(Engine::new());
        engine
            .add_string_template("home.html", "Hello {{ name }}!")
            .unwrap();
        let view = TemplateView::new("home.html")
            .with_engine(engine)
            .with_context("name", serde_json::json!("World"));
        let response = view.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.text(), "Hello World!");
        assert_eq!(response.content_type(), "text/html");
    }

    #[tokio::test]
    async fn template_view_without_engine_is_a_config_error() {
        let view = TemplateView::new("home.html");
        let response = view.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("Improperly configured"));
    }

    #[tokio::test]
    async fn template_view_merges_url_params_into_context() {
        let engine = Arc::new(Engine::new());
        engine
            .add_string_template("page.html", "Page {{ slug }}")
            .unwrap();
        let view = TemplateView::new("page.html").with_engine(engine);
        let request = HttpRequest::builder()
            .method(http::Method::GET)
            .param("slug", "about")
            .build();
        let response = view.dispatch(request).await;
        assert_eq!(response.text(), "Page about");
    }

    #[tokio::test]
    async fn missing_template_is_reported() {
        let engine = Arc::new(Engine::new());
        let view = TemplateView::new("nowhere.html").with_engine(engine);
        let response = view.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("nowhere.html"));
    }

    #[tokio::test]
    async fn redirect_view_redirects_get_and_post() {
        let view = RedirectView::new("/next/");
        let response = view.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::FOUND);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/next/"
        );
        let response = view.dispatch(request(http::Method::POST)).await;
        assert_eq!(response.status(), http::StatusCode::FOUND);
    }

    #[tokio::test]
    async fn permanent_redirect_uses_301() {
        let view = RedirectView::permanent("/moved/");
        assert!(view.is_permanent());
        let response = view.dispatch(request(http::Method::GET)).await;
        assert_eq!(response.status(), http::StatusCode::MOVED_PERMANENTLY);
    }
}
