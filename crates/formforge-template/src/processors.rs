//! Context processors.
//!
//! Context processors add variables to a template context based on the
//! current request, so page templates can rely on entries like `request`
//! and `debug` without every view inserting them.

use formforge_http::HttpRequest;
use serde_json::json;

use crate::context::ContextData;

/// A context processor that adds variables to a template context.
pub trait ContextProcessor: Send + Sync {
    /// Inspects the request and returns context variables to add.
    fn process(&self, request: &HttpRequest) -> ContextData;
}

/// Adds `request` as a dict with `path`, `method`, and `is_secure` fields.
pub struct RequestContextProcessor;

impl ContextProcessor for RequestContextProcessor {
    fn process(&self, request: &HttpRequest) -> ContextData {
        let mut ctx = ContextData::new();
        ctx.insert(
            "request".to_string(),
            json!({
                "path": request.path(),
                "method": request.method().to_string(),
                "is_secure": request.is_secure(),
            }),
        );
        ctx
    }
}

/// Adds a `debug` flag to the context.
pub struct DebugContextProcessor {
    /// The debug flag to expose.
    pub debug: bool,
}

impl DebugContextProcessor {
    /// Creates a processor exposing the given debug flag.
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl ContextProcessor for DebugContextProcessor {
    fn process(&self, _request: &HttpRequest) -> ContextData {
        let mut ctx = ContextData::new();
        ctx.insert("debug".to_string(), json!(self.debug));
        ctx
    }
}

/// Runs every processor against the request and merges the results.
///
/// Later processors win on key collisions.
pub fn apply_processors(
    processors: &[Box<dyn ContextProcessor>],
    request: &HttpRequest,
) -> ContextData {
    let mut merged = ContextData::new();
    for processor in processors {
        merged.extend(processor.process(request));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_processor() {
        let request = HttpRequest::builder()
            .method(http::Method::POST)
            .path("/contact/")
            .build();

        let ctx = RequestContextProcessor.process(&request);
        let request_ctx = &ctx["request"];
        assert_eq!(request_ctx["path"], "/contact/");
        assert_eq!(request_ctx["method"], "POST");
        assert_eq!(request_ctx["is_secure"], false);
    }

    #[test]
    fn test_debug_processor() {
        let request = HttpRequest::builder().build();
        let ctx = DebugContextProcessor::new(true).process(&request);
        assert_eq!(ctx["debug"], true);
    }

    #[test]
    fn test_apply_processors_merges() {
        let request = HttpRequest::builder().path("/x/").build();
        let processors: Vec<Box<dyn ContextProcessor>> = vec![
            Box::new(RequestContextProcessor),
            Box::new(DebugContextProcessor::new(false)),
        ];

        let ctx = apply_processors(&processors, &request);
        assert!(ctx.contains_key("request"));
        assert_eq!(ctx["debug"], false);
    }
}
