//! The tera-backed template engine.
//!
//! [`Engine`] owns a [`tera::Tera`] instance behind an `RwLock` so string
//! templates can be registered at runtime while renders share the instance.
//! [`render_string`] renders a one-off template source with a fresh
//! throwaway instance, the counterpart of building an engine from a string
//! for a single render.

use std::path::Path;
use std::sync::RwLock;

use formforge_core::settings::Settings;
use formforge_core::{ForgeError, ForgeResult};

use crate::context::{to_tera_context, ContextData};

/// A template engine holding named templates.
///
/// Templates come from two sources: strings registered via
/// [`add_string_template`](Engine::add_string_template) and files loaded
/// from configured directories. Rendering takes a [`ContextData`] map.
///
/// # Examples
///
/// ```
/// use formforge_template::{ContextData, Engine};
///
/// let engine = Engine::new();
/// engine
///     .add_string_template("hello.html", "Hello {{ name }}!")
///     .unwrap();
///
/// let mut context = ContextData::new();
/// context.insert("name".to_string(), serde_json::json!("Ada"));
/// let html = engine.render_to_string("hello.html", &context).unwrap();
/// assert_eq!(html, "Hello Ada!");
/// ```
pub struct Engine {
    tera: RwLock<tera::Tera>,
    autoescape: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates an empty engine with autoescaping enabled for one-off strings.
    pub fn new() -> Self {
        Self {
            tera: RwLock::new(tera::Tera::default()),
            autoescape: true,
        }
    }

    /// Creates an engine loading every file under the given directories.
    ///
    /// # Errors
    ///
    /// Returns a template syntax error if any loaded file fails to parse.
    pub fn with_dirs<P: AsRef<Path>>(dirs: &[P]) -> ForgeResult<Self> {
        let mut tera = tera::Tera::default();
        for dir in dirs {
            let glob = format!("{}/**/*", dir.as_ref().display());
            let loaded = tera::Tera::new(&glob)
                .map_err(|e| ForgeError::TemplateSyntax(error_detail(&e)))?;
            tera.extend(&loaded)
                .map_err(|e| ForgeError::TemplateSyntax(error_detail(&e)))?;
        }
        Ok(Self {
            tera: RwLock::new(tera),
            autoescape: true,
        })
    }

    /// Creates an engine from workspace settings (template dirs, autoescape).
    ///
    /// # Errors
    ///
    /// Returns a template syntax error if any configured file fails to parse.
    pub fn from_settings(settings: &Settings) -> ForgeResult<Self> {
        let mut engine = Self::with_dirs(&settings.templates.dirs)?;
        engine.autoescape = settings.templates.autoescape;
        Ok(engine)
    }

    /// Returns whether one-off string rendering autoescapes HTML.
    pub const fn autoescape(&self) -> bool {
        self.autoescape
    }

    /// Registers a named string template, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a template syntax error if the source fails to parse.
    pub fn add_string_template(&self, name: &str, source: &str) -> ForgeResult<()> {
        self.tera
            .write()
            .unwrap()
            .add_raw_template(name, source)
            .map_err(|e| ForgeError::TemplateSyntax(error_detail(&e)))
    }

    /// Returns `true` if a template with the given name is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera
            .read()
            .unwrap()
            .get_template_names()
            .any(|n| n == name)
    }

    /// Renders a named template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`ForgeError::TemplateDoesNotExist`] for unknown names and
    /// [`ForgeError::TemplateRender`] for rendering failures.
    pub fn render_to_string(&self, name: &str, context: &ContextData) -> ForgeResult<String> {
        let context = to_tera_context(context)?;
        self.tera
            .read()
            .unwrap()
            .render(name, &context)
            .map_err(|e| classify_render_error(&e))
    }

    /// Renders a one-off template source with this engine's registered
    /// templates and filters available.
    ///
    /// The source is registered transiently under an internal name whose
    /// suffix decides whether tera's HTML autoescaping applies, per the
    /// engine's [`autoescape`](Engine::autoescape) setting.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for unparsable sources and a render error for
    /// rendering failures.
    pub fn render_str(&self, source: &str, context: &ContextData) -> ForgeResult<String> {
        let context = to_tera_context(context)?;
        let name = if self.autoescape {
            "__one_off.html"
        } else {
            "__one_off"
        };
        let mut tera = self.tera.write().unwrap();
        tera.add_raw_template(name, source)
            .map_err(|e| classify_source_error(&e))?;
        let result = tera
            .render(name, &context)
            .map_err(|e| classify_render_error(&e));
        tera.templates.remove(name);
        result
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .tera
            .read()
            .unwrap()
            .get_template_names()
            .map(String::from)
            .collect();
        f.debug_struct("Engine")
            .field("templates", &names)
            .field("autoescape", &self.autoescape)
            .finish()
    }
}

/// Renders a one-off template source without an engine.
///
/// Equivalent to constructing a throwaway engine for a single string, which
/// is how per-record template strings are rendered when the view has no
/// engine configured.
///
/// # Errors
///
/// Returns a syntax error for unparsable sources and a render error for
/// rendering failures (e.g. an undefined variable).
pub fn render_string(source: &str, context: &ContextData, autoescape: bool) -> ForgeResult<String> {
    let context = to_tera_context(context)?;
    tera::Tera::one_off(source, &context, autoescape).map_err(|e| classify_source_error(&e))
}

/// Builds a readable message from a tera error and its source chain.
fn error_detail(error: &tera::Error) -> String {
    use std::error::Error;

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Maps a render-time tera error onto the workspace error enum.
fn classify_render_error(error: &tera::Error) -> ForgeError {
    match &error.kind {
        tera::ErrorKind::TemplateNotFound(name) => ForgeError::TemplateDoesNotExist(name.clone()),
        _ => ForgeError::TemplateRender(error_detail(error)),
    }
}

/// Maps a tera error from one-off source rendering; parse failures become
/// syntax errors, everything else is a render error.
fn classify_source_error(error: &tera::Error) -> ForgeError {
    match &error.kind {
        tera::ErrorKind::Msg(msg) if msg.contains("Failed to parse") => {
            ForgeError::TemplateSyntax(error_detail(error))
        }
        tera::ErrorKind::TemplateNotFound(name) => ForgeError::TemplateDoesNotExist(name.clone()),
        _ => ForgeError::TemplateRender(error_detail(error)),
    }
}
