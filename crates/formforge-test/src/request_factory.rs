//! A factory for building [`HttpRequest`] objects in tests.
//!
//! Requests are constructed directly, bypassing routing, so individual
//! views can be exercised in isolation. URL parameters a route would have
//! captured can be added through `params_mut()` on the built request.
//!
//! ## Example
//!
//! ```rust
//! use formforge_test::RequestFactory;
//!
//! let factory = RequestFactory::new();
//! let request = factory.get("/contact/");
//! assert_eq!(request.method(), &http::Method::GET);
//! assert_eq!(request.host(), "testserver");
//! ```

use std::collections::HashMap;

use http::Method;

use formforge_http::{HttpRequest, QueryDict};

/// Builds [`HttpRequest`] objects without routing or middleware.
///
/// Every request carries a `testserver` host header plus any defaults set
/// with [`RequestFactory::with_default_header`].
pub struct RequestFactory {
    default_headers: Vec<(String, String)>,
}

impl Default for RequestFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFactory {
    pub fn new() -> Self {
        Self {
            default_headers: vec![("host".to_string(), "testserver".to_string())],
        }
    }

    /// Add a header applied to every request this factory builds.
    #[must_use]
    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .push((name.to_string(), value.to_string()));
        self
    }

    /// A GET request. A query string after `?` is parsed into GET data.
    pub fn get(&self, path: &str) -> HttpRequest {
        self.build_request(Method::GET, path, None, None)
    }

    /// A POST request with a form-encoded body.
    pub fn post(&self, path: &str, data: &HashMap<String, String>) -> HttpRequest {
        self.build_request(
            Method::POST,
            path,
            Some(encode_form_data(data).into_bytes()),
            Some("application/x-www-form-urlencoded"),
        )
    }

    /// A POST request with a JSON body.
    pub fn post_json(&self, path: &str, json: &serde_json::Value) -> HttpRequest {
        let body = serde_json::to_vec(json).unwrap_or_default();
        self.build_request(Method::POST, path, Some(body), Some("application/json"))
    }

    /// A PUT request with a form-encoded body.
    pub fn put(&self, path: &str, data: &HashMap<String, String>) -> HttpRequest {
        self.build_request(
            Method::PUT,
            path,
            Some(encode_form_data(data).into_bytes()),
            Some("application/x-www-form-urlencoded"),
        )
    }

    /// A PATCH request with a form-encoded body.
    pub fn patch(&self, path: &str, data: &HashMap<String, String>) -> HttpRequest {
        self.build_request(
            Method::PATCH,
            path,
            Some(encode_form_data(data).into_bytes()),
            Some("application/x-www-form-urlencoded"),
        )
    }

    pub fn delete(&self, path: &str) -> HttpRequest {
        self.build_request(Method::DELETE, path, None, None)
    }

    pub fn head(&self, path: &str) -> HttpRequest {
        self.build_request(Method::HEAD, path, None, None)
    }

    pub fn options(&self, path: &str) -> HttpRequest {
        self.build_request(Method::OPTIONS, path, None, None)
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        content_type: Option<&str>,
    ) -> HttpRequest {
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let mut builder = HttpRequest::builder()
            .method(method)
            .path(path)
            .query_string(query);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(content_type) = content_type {
            builder = builder.content_type(content_type);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        builder.build()
    }
}

/// URL-encode a data map, keys sorted for determinism.
fn encode_form_data(data: &HashMap<String, String>) -> String {
    let mut dict = QueryDict::new_mutable();
    let mut keys: Vec<&String> = data.keys().collect();
    keys.sort();
    for key in keys {
        if let Some(value) = data.get(key) {
            dict.append(key, value).ok();
        }
    }
    dict.urlencode()
}
