//! Error types shared across the formforge workspace.
//!
//! [`ForgeError`] is the single error enum used by the HTTP, template, forms,
//! and views crates. Each variant carries enough context to produce a log
//! line and maps to an HTTP status code via [`ForgeError::status_code`].

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A single validation failure for one field value.
///
/// Carries a human-readable message plus a short machine code such as
/// `"required"` or `"invalid"`, mirroring the codes used by the field
/// cleaning pipeline.
///
/// # Examples
///
/// ```
/// use formforge_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.code, "required");
///
/// let err = ValidationError::new("Ensure this value is at least {min}.", "min_value")
///     .with_param("min", "0");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the kind of failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters giving context for the message.
    pub params: HashMap<String, String>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for the formforge workspace.
///
/// Covers request errors, storage errors, template errors, and configuration
/// errors. The configuration variant is the one raised when a view has no
/// template source to render; everything else is plumbing.
#[derive(Error, Debug)]
pub enum ForgeError {
    // ── Requests ─────────────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP 405 Method Not Allowed.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// A potentially malicious operation was detected, such as mutating an
    /// immutable query dict.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),

    // ── Storage ──────────────────────────────────────────────────────

    /// A lookup expected a record that is not there, e.g. a form entry
    /// referenced by a dangling id.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    /// A referential-integrity rule was violated on write.
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    // ── Validation ───────────────────────────────────────────────────

    /// A field value failed validation.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A view or component is missing required configuration. Raised by the
    /// template-resolving hooks when no template source is available.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Templates ────────────────────────────────────────────────────

    /// A template source failed to parse.
    #[error("Template syntax error: {0}")]
    TemplateSyntax(String),

    /// A named template is not registered with the engine.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    /// A template parsed but failed during rendering (missing variable,
    /// bad filter input, and so on).
    #[error("Template render error: {0}")]
    TemplateRender(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error during serialization or deserialization, e.g. malformed
    /// element plugin data.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error, e.g. an unreadable settings file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForgeError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest`, `Validation` -> 400
    /// - `SuspiciousOperation` -> 403
    /// - `NotFound`, `DoesNotExist` -> 404
    /// - `MethodNotAllowed` -> 405
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => 400,
            Self::SuspiciousOperation(_) => 403,
            Self::NotFound(_) | Self::DoesNotExist(_) => 404,
            Self::MethodNotAllowed(_) => 405,
            Self::IntegrityError(_)
            | Self::ImproperlyConfigured(_)
            | Self::TemplateSyntax(_)
            | Self::TemplateDoesNotExist(_)
            | Self::TemplateRender(_)
            | Self::Serialization(_)
            | Self::Io(_) => 500,
        }
    }
}

impl From<ValidationError> for ForgeError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, ForgeError>`.
pub type ForgeResult<T> = Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Value too small.", "min_value").with_param("min", "1");
        assert_eq!(err.params.get("min").unwrap(), "1");
        assert_eq!(err.code, "min_value");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ForgeError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(
            ForgeError::Validation(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert_eq!(ForgeError::SuspiciousOperation("x".into()).status_code(), 403);
        assert_eq!(ForgeError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ForgeError::DoesNotExist("x".into()).status_code(), 404);
        assert_eq!(ForgeError::MethodNotAllowed("x".into()).status_code(), 405);
        assert_eq!(ForgeError::IntegrityError("x".into()).status_code(), 500);
        assert_eq!(ForgeError::ImproperlyConfigured("x".into()).status_code(), 500);
        assert_eq!(ForgeError::TemplateSyntax("x".into()).status_code(), 500);
        assert_eq!(ForgeError::TemplateDoesNotExist("x".into()).status_code(), 500);
        assert_eq!(ForgeError::TemplateRender("x".into()).status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = ForgeError::ImproperlyConfigured("No additional template set.".into());
        assert_eq!(
            err.to_string(),
            "Improperly configured: No additional template set."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "settings.toml missing");
        let err: ForgeError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("settings.toml missing"));
    }

    #[test]
    fn test_validation_error_into_forge_error() {
        let err: ForgeError = ValidationError::new("bad", "invalid").into();
        assert_eq!(err.status_code(), 400);
    }
}
