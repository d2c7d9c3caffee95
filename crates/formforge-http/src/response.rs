//! HTTP response types.
//!
//! [`HttpResponse`] is the response type produced by views, with convenience
//! constructors for the common status codes and an axum [`IntoResponse`]
//! conversion. [`JsonResponse`] builds JSON-bodied responses from anything
//! serializable.

use axum::response::IntoResponse;
use http::{HeaderMap, HeaderValue, StatusCode};

use formforge_core::ForgeError;

/// The body content of an HTTP response.
pub enum ResponseContent {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
}

impl std::fmt::Debug for ResponseContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Text(t) => f
                .debug_tuple("Text")
                .field(&t.chars().take(100).collect::<String>())
                .finish(),
        }
    }
}

/// An HTTP response.
///
/// # Examples
///
/// ```
/// use formforge_http::HttpResponse;
///
/// let response = HttpResponse::ok("Hello, World!");
/// assert_eq!(response.status(), http::StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content: ResponseContent,
    charset: String,
    content_type: String,
}

impl HttpResponse {
    /// Creates a response with the given status and text body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content: ResponseContent::Text(body.into()),
            charset: "utf-8".to_string(),
            content_type: "text/html".to_string(),
        }
    }

    /// Creates a response with the given status and raw byte body.
    pub fn with_bytes(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content: ResponseContent::Bytes(body),
            charset: "utf-8".to_string(),
            content_type: "application/octet-stream".to_string(),
        }
    }

    /// Creates a 200 OK response.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, body)
    }

    /// Creates a 403 Forbidden response.
    pub fn forbidden(body: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, body)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn server_error(body: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    /// Creates a 405 Method Not Allowed response listing the permitted methods.
    pub fn not_allowed(permitted_methods: &[&str]) -> Self {
        let mut response = Self::new(StatusCode::METHOD_NOT_ALLOWED, "");
        if let Ok(value) = HeaderValue::from_str(&permitted_methods.join(", ")) {
            response.headers.insert(http::header::ALLOW, value);
        }
        response
    }

    /// Creates a 302 Found redirect to the given URL.
    pub fn redirect(url: &str) -> Self {
        let mut response = Self::new(StatusCode::FOUND, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers.insert(http::header::LOCATION, value);
        }
        response
    }

    /// Creates a 301 Moved Permanently redirect to the given URL.
    pub fn permanent_redirect(url: &str) -> Self {
        let mut response = Self::new(StatusCode::MOVED_PERMANENTLY, "");
        if let Ok(value) = HeaderValue::from_str(url) {
            response.headers.insert(http::header::LOCATION, value);
        }
        response
    }

    /// Creates a plain-text response for an error, using its status mapping.
    ///
    /// The error's display form is the body, which keeps configuration
    /// mistakes visible during development.
    pub fn from_error(error: &ForgeError) -> Self {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Self::new(status, error.to_string());
        response.set_content_type("text/plain");
        response
    }

    /// Returns the response status.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the response headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a mutable reference to the response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets a header, replacing any existing value. Invalid names or values
    /// are silently skipped.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::try_from(name),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
    }

    /// Returns the response charset.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Returns the content type (without the charset suffix).
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sets the content type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = content_type.into();
    }

    /// Returns the body content.
    pub const fn content(&self) -> &ResponseContent {
        &self.content
    }

    /// Returns the body as text, lossily decoding byte bodies.
    pub fn text(&self) -> String {
        match &self.content {
            ResponseContent::Text(t) => t.clone(),
            ResponseContent::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }

    /// Returns the full `Content-Type` header value including the charset.
    fn full_content_type(&self) -> String {
        if self.content_type.starts_with("text/") || self.content_type == "application/json" {
            format!("{}; charset={}", self.content_type, self.charset)
        } else {
            self.content_type.clone()
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> axum::response::Response {
        let mut builder = axum::response::Response::builder().status(self.status);

        if let Ok(ct) = HeaderValue::from_str(&self.full_content_type()) {
            builder = builder.header(http::header::CONTENT_TYPE, ct);
        }

        let headers = self.headers;
        let body = match self.content {
            ResponseContent::Text(text) => axum::body::Body::from(text),
            ResponseContent::Bytes(bytes) => axum::body::Body::from(bytes),
        };

        let mut response = builder.body(body).unwrap_or_else(|_| {
            axum::response::Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(axum::body::Body::from("Internal Server Error"))
                .expect("fallback response should always be valid")
        });

        for (name, value) in &headers {
            response.headers_mut().insert(name, value.clone());
        }

        response
    }
}

/// Shortcut builders for JSON-bodied responses.
pub struct JsonResponse;

impl JsonResponse {
    /// Creates a 200 OK response with a JSON body.
    ///
    /// Serialization failures produce a 500 response instead.
    pub fn new<T: serde::Serialize>(data: &T) -> HttpResponse {
        Self::with_status(StatusCode::OK, data)
    }

    /// Creates a response with the given status and a JSON body.
    pub fn with_status<T: serde::Serialize>(status: StatusCode, data: &T) -> HttpResponse {
        match serde_json::to_string(data) {
            Ok(json) => {
                let mut response = HttpResponse::new(status, json);
                response.set_content_type("application/json");
                response
            }
            Err(e) => HttpResponse::server_error(format!("JSON serialization failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formforge_core::ForgeError;

    #[test]
    fn test_ok() {
        let response = HttpResponse::ok("hello");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text(), "hello");
        assert_eq!(response.content_type(), "text/html");
    }

    #[test]
    fn test_status_constructors() {
        assert_eq!(
            HttpResponse::bad_request("").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(HttpResponse::forbidden("").status(), StatusCode::FORBIDDEN);
        assert_eq!(HttpResponse::not_found("").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            HttpResponse::server_error("").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_allowed_sets_allow_header() {
        let response = HttpResponse::not_allowed(&["GET", "POST"]);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(http::header::ALLOW).unwrap(),
            "GET, POST"
        );
    }

    #[test]
    fn test_redirect() {
        let response = HttpResponse::redirect("/thanks/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/thanks/"
        );

        let permanent = HttpResponse::permanent_redirect("/new-home/");
        assert_eq!(permanent.status(), StatusCode::MOVED_PERMANENTLY);
    }

    #[test]
    fn test_from_error_maps_status() {
        let err = ForgeError::ImproperlyConfigured("No additional template set.".into());
        let response = HttpResponse::from_error(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("No additional template set."));

        let err = ForgeError::DoesNotExist("FormEntry id=9".into());
        assert_eq!(
            HttpResponse::from_error(&err).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_set_header() {
        let mut response = HttpResponse::ok("");
        response.set_header("X-Rendered", "1");
        assert_eq!(response.headers().get("x-rendered").unwrap(), "1");
    }

    #[test]
    fn test_json_response() {
        let response = JsonResponse::new(&serde_json::json!({"ok": true}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.content_type(), "application/json");
        assert!(response.text().contains("\"ok\":true"));
    }

    #[test]
    fn test_into_axum_response() {
        let mut response = HttpResponse::ok("body");
        response.set_header("X-Test", "yes");
        let axum_response = response.into_response();
        assert_eq!(axum_response.status(), StatusCode::OK);
        assert_eq!(axum_response.headers().get("x-test").unwrap(), "yes");
        assert!(axum_response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));
    }
}
