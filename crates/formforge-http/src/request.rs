//! HTTP request type.
//!
//! [`HttpRequest`] carries the request method, path, headers, parsed GET and
//! POST parameters, and any path parameters captured by the router. Incoming
//! axum requests are converted via [`HttpRequest::from_axum`]; tests build
//! requests directly through [`HttpRequest::builder`].

use std::collections::HashMap;

use http::{HeaderMap, Method};

use crate::querydict::QueryDict;

/// An HTTP request.
///
/// # Examples
///
/// ```
/// use formforge_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/pages/1/")
///     .query_string("page=1")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.path(), "/pages/1/");
/// assert_eq!(request.get().get("page"), Some("1"));
/// ```
#[derive(Debug)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    get: QueryDict,
    post: QueryDict,
    headers: HeaderMap,
    params: HashMap<String, String>,
    body: Vec<u8>,
    scheme: String,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`].
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from axum request parts and body bytes.
    ///
    /// The query string is parsed into the GET dict; a form-encoded body is
    /// parsed into the POST dict. Path parameters are not known at this
    /// level and are filled in by the router via [`params_mut`](Self::params_mut).
    pub fn from_axum(parts: http::request::Parts, body: Vec<u8>) -> Self {
        let path = parts.uri.path().to_string();
        let query_string = parts.uri.query().unwrap_or("").to_string();
        let get = QueryDict::parse(&query_string);

        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let post = parse_form_body(content_type.as_deref(), &body);

        let scheme = if parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "https")
        {
            "https".to_string()
        } else {
            "http".to_string()
        };

        Self {
            method: parts.method,
            path,
            query_string,
            content_type,
            get,
            post,
            headers: parts.headers,
            params: HashMap::new(),
            body,
            scheme,
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the content type, if the request carried one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Returns the parsed query string parameters.
    pub const fn get(&self) -> &QueryDict {
        &self.get
    }

    /// Returns the parsed form-encoded POST parameters.
    pub const fn post(&self) -> &QueryDict {
        &self.post
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the path parameters captured by the router.
    pub const fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Returns a mutable reference to the path parameters.
    pub fn params_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.params
    }

    /// Returns the path parameter with the given name, if captured.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the raw request body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns `true` if the request was made over HTTPS.
    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }

    /// Returns the request scheme (`http` or `https`).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host from the `Host` header, or an empty string.
    pub fn host(&self) -> &str {
        self.headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Returns the path including the query string, if any.
    pub fn full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }
}

/// Parses a form-encoded body into a `QueryDict`.
///
/// Non-form content types produce an empty dict; parsing is never an error.
fn parse_form_body(content_type: Option<&str>, body: &[u8]) -> QueryDict {
    if content_type.is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded")) {
        QueryDict::parse(&String::from_utf8_lossy(body))
    } else {
        QueryDict::new()
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    content_type: Option<String>,
    headers: HeaderMap,
    params: HashMap<String, String>,
    body: Vec<u8>,
    scheme: String,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            content_type: None,
            headers: HeaderMap::new(),
            params: HashMap::new(),
            body: Vec::new(),
            scheme: "http".to_string(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the raw query string (without the leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Adds a header. Invalid names or values are silently skipped.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Adds a path parameter, as the router would after matching.
    #[must_use]
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the request scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Builds the [`HttpRequest`], parsing GET and POST data.
    pub fn build(self) -> HttpRequest {
        let get = QueryDict::parse(&self.query_string);
        let post = parse_form_body(self.content_type.as_deref(), &self.body);

        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            content_type: self.content_type,
            get,
            post,
            headers: self.headers,
            params: self.params,
            body: self.body,
            scheme: self.scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.get().is_empty());
        assert!(request.post().is_empty());
        assert!(!request.is_secure());
    }

    #[test]
    fn test_builder_query_string() {
        let request = HttpRequest::builder()
            .path("/search/")
            .query_string("q=rust&page=2")
            .build();
        assert_eq!(request.get().get("q"), Some("rust"));
        assert_eq!(request.get().get("page"), Some("2"));
        assert_eq!(request.full_path(), "/search/?q=rust&page=2");
    }

    #[test]
    fn test_builder_form_encoded_post() {
        let request = HttpRequest::builder()
            .method(Method::POST)
            .content_type("application/x-www-form-urlencoded")
            .body(b"name=Alice&email=alice%40example.com".to_vec())
            .build();
        assert_eq!(request.post().get("name"), Some("Alice"));
        assert_eq!(request.post().get("email"), Some("alice@example.com"));
    }

    #[test]
    fn test_post_ignored_for_other_content_types() {
        let request = HttpRequest::builder()
            .method(Method::POST)
            .content_type("application/json")
            .body(b"{\"name\": \"Alice\"}".to_vec())
            .build();
        assert!(request.post().is_empty());
        assert_eq!(request.body(), b"{\"name\": \"Alice\"}");
    }

    #[test]
    fn test_params() {
        let request = HttpRequest::builder()
            .path("/pages/7/")
            .param("pk", "7")
            .build();
        assert_eq!(request.param("pk"), Some("7"));
        assert_eq!(request.param("missing"), None);
    }

    #[test]
    fn test_params_mut() {
        let mut request = HttpRequest::builder().build();
        request
            .params_mut()
            .insert("slug".to_string(), "contact".to_string());
        assert_eq!(request.param("slug"), Some("contact"));
    }

    #[test]
    fn test_header_and_host() {
        let request = HttpRequest::builder()
            .header("Host", "testserver")
            .header("X-Custom", "1")
            .build();
        assert_eq!(request.host(), "testserver");
        assert_eq!(
            request.headers().get("x-custom").unwrap().to_str().unwrap(),
            "1"
        );
    }

    #[test]
    fn test_from_axum() {
        let (parts, ()) = http::Request::builder()
            .method(Method::POST)
            .uri("/contact/?source=footer")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("host", "example.com")
            .body(())
            .unwrap()
            .into_parts();

        let request = HttpRequest::from_axum(parts, b"name=Bob".to_vec());
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/contact/");
        assert_eq!(request.get().get("source"), Some("footer"));
        assert_eq!(request.post().get("name"), Some("Bob"));
        assert_eq!(request.host(), "example.com");
        assert!(!request.is_secure());
    }

    #[test]
    fn test_from_axum_forwarded_proto() {
        let (parts, ()) = http::Request::builder()
            .uri("/")
            .header("x-forwarded-proto", "https")
            .body(())
            .unwrap()
            .into_parts();

        let request = HttpRequest::from_axum(parts, Vec::new());
        assert!(request.is_secure());
        assert_eq!(request.scheme(), "https");
    }
}
