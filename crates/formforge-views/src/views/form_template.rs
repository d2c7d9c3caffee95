//! Views that render a per-form response template after a successful
//! submission.
//!
//! The flow mirrors the classic form page flow with one addition: each
//! form carries a response template (configured inline or resolved from a
//! stored pairing), and a valid POST renders that template with the
//! submission's cleaned data before redirecting. The rendered output is
//! stashed on the view for downstream use.
//!
//! ## Method flow (POST)
//!
//! 1. `get_form` assembles the form
//! 2. `bind_form_from_request` binds the submitted data
//! 3. `is_valid` runs the cleaning pipeline
//! 4. valid: `render_template` -> `use_template` -> `form_valid`
//! 5. invalid: `form_invalid`

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use formforge_core::{ForgeError, ForgeResult};
use formforge_forms::{assemble_form, BaseForm, Form, FormStore, FormTemplate};
use formforge_http::{HttpRequest, HttpResponse};
use formforge_template::{merge_defaults, render_string, ContextData, Engine};

use super::class_based::{ContextMixin, TemplateResponseMixin, View};
use super::form_view::{bind_form_from_request, FormView};

/// Supplies the context a response template is rendered with.
pub trait TemplateContextMixin: Send + Sync {
    /// Name identifying the view, used in context data and error messages.
    fn view_name(&self) -> &str {
        "view"
    }

    /// The value placed under the `view` context key.
    fn view_context(&self) -> serde_json::Value {
        serde_json::json!({ "name": self.view_name() })
    }

    /// Optional registered template to render the context with.
    fn context_template_name(&self) -> Option<&str> {
        None
    }

    fn get_context_template_name(&self) -> Option<&str> {
        self.context_template_name()
    }

    /// Build the render context from the caller's data. `view` is inserted
    /// only when the caller has not set it.
    fn get_template_context_data(&self, kwargs: &ContextData) -> ContextData {
        let mut context = kwargs.clone();
        if !context.contains_key("view") {
            context.insert("view".to_string(), self.view_context());
        }
        context
    }
}

/// Renders a response template source with hook-supplied context.
#[async_trait]
pub trait TemplateRenderMixin: TemplateContextMixin {
    /// The template source to render.
    async fn get_template(&self, request: &HttpRequest) -> ForgeResult<String>;

    /// Engine for rendering. Without one, sources render standalone with
    /// autoescaping on.
    fn template_engine(&self) -> Option<&Engine> {
        None
    }

    /// The context used when the caller supplies none.
    fn get_template_context(&self) -> ContextData {
        self.get_template_context_data(&ContextData::new())
    }

    /// Render the template source with `context`, falling back to
    /// [`TemplateRenderMixin::get_template_context`] when none is given.
    async fn render_template(
        &self,
        request: &HttpRequest,
        context: Option<&ContextData>,
    ) -> ForgeResult<String> {
        let source = self.get_template(request).await?;
        let default_context;
        let context = match context {
            Some(context) => context,
            None => {
                default_context = self.get_template_context();
                &default_context
            }
        };
        match self.template_engine() {
            Some(engine) => engine.render_str(&source, context),
            None => render_string(&source, context, true),
        }
    }
}

/// The form flow with a response template: a valid submission renders the
/// template with its cleaned data and stashes the output before the usual
/// success handling runs.
#[async_trait]
pub trait FormTemplateMixin: TemplateRenderMixin + FormView {
    /// Storage for the rendered output. Holds the most recent successful
    /// render.
    fn rendered_template_slot(&self) -> &RwLock<Option<String>>;

    /// Stash rendered output for downstream use.
    fn use_template(&self, rendered: String) {
        *self.rendered_template_slot().write().unwrap() = Some(rendered);
    }

    /// The most recently stashed render, if any.
    fn rendered_template(&self) -> Option<String> {
        self.rendered_template_slot().read().unwrap().clone()
    }

    /// POST flow: validate, then render-and-stash before `form_valid`.
    ///
    /// The render context is the context hooks' data with the form's
    /// cleaned data filled in underneath; hook keys win on collision.
    async fn process_submission(&self, request: HttpRequest) -> HttpResponse {
        let mut form = match self.get_form(&request).await {
            Ok(form) => form,
            Err(e) => return HttpResponse::from_error(&e),
        };
        bind_form_from_request(&mut form, &request);

        if form.is_valid().await {
            let mut context = self.get_template_context_data(&ContextData::new());
            merge_defaults(&mut context, form.cleaned_data().clone());
            match self.render_template(&request, Some(&context)).await {
                Ok(rendered) => {
                    self.use_template(rendered);
                    self.form_valid(&form, &request).await
                }
                Err(e) => HttpResponse::from_error(&e),
            }
        } else {
            self.form_invalid(&form, &request).await
        }
    }
}

/// A form view whose response template is configured inline.
///
/// GET renders the form page; POST runs the template flow. Without a
/// `template_string` the POST flow fails with the configuration error.
pub struct FormTemplateView {
    store: Arc<dyn FormStore>,
    form_entry_id: i64,
    template_string: Option<String>,
    success_url: String,
    page_template: String,
    extra_context: ContextData,
    engine: Option<Arc<Engine>>,
    rendered: RwLock<Option<String>>,
}

impl FormTemplateView {
    pub fn new(store: Arc<dyn FormStore>, form_entry_id: i64) -> Self {
        Self {
            store,
            form_entry_id,
            template_string: None,
            success_url: "/".to_string(),
            page_template: "form.html".to_string(),
            extra_context: ContextData::new(),
            engine: None,
            rendered: RwLock::new(None),
        }
    }

    /// The response template source rendered on success.
    #[must_use]
    pub fn with_template_string(mut self, source: &str) -> Self {
        self.template_string = Some(source.to_string());
        self
    }

    #[must_use]
    pub fn with_success_url(mut self, url: &str) -> Self {
        self.success_url = url.to_string();
        self
    }

    /// The page template rendered on GET and on invalid submissions.
    #[must_use]
    pub fn with_page_template(mut self, name: &str) -> Self {
        self.page_template = name.to_string();
        self
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

impl TemplateContextMixin for FormTemplateView {
    fn view_name(&self) -> &str {
        "FormTemplateView"
    }
}

#[async_trait]
impl TemplateRenderMixin for FormTemplateView {
    async fn get_template(&self, _request: &HttpRequest) -> ForgeResult<String> {
        match self.template_string.as_deref() {
            Some(source) if !source.is_empty() => Ok(source.to_string()),
            _ => Err(ForgeError::ImproperlyConfigured(
                "No additional template set. Provide a template.".to_string(),
            )),
        }
    }

    fn template_engine(&self) -> Option<&Engine> {
        self.engine.as_deref()
    }
}

impl ContextMixin for FormTemplateView {
    fn get_context_data(&self, kwargs: &HashMap<String, String>) -> ContextData {
        let mut context = self.extra_context.clone();
        for (key, value) in kwargs {
            context.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        context
    }
}

impl TemplateResponseMixin for FormTemplateView {
    fn template_name(&self) -> &str {
        &self.page_template
    }
}

#[async_trait]
impl FormView for FormTemplateView {
    fn success_url(&self) -> &str {
        &self.success_url
    }

    fn engine(&self) -> Option<&Engine> {
        self.engine.as_deref()
    }

    async fn get_form(&self, _request: &HttpRequest) -> ForgeResult<BaseForm> {
        let entry = self
            .store
            .form_entry(self.form_entry_id)
            .await?
            .ok_or_else(|| {
                ForgeError::DoesNotExist(format!("form entry {}", self.form_entry_id))
            })?;
        let elements = self.store.element_entries(entry.id).await?;
        assemble_form(&entry, &elements)
    }
}

impl FormTemplateMixin for FormTemplateView {
    fn rendered_template_slot(&self) -> &RwLock<Option<String>> {
        &self.rendered
    }
}

#[async_trait]
impl View for FormTemplateView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.handle_get(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.process_submission(request).await
    }
}

/// Resolves the response template from a stored record at request time.
#[async_trait]
pub trait ModelFormTemplateMixin: TemplateContextMixin {
    /// Attribute of the fetched record holding the template source.
    /// `None` falls back to `template`.
    fn model_template_name(&self) -> Option<&str> {
        None
    }

    /// Display name of the record type, for error messages.
    fn model_name(&self) -> &str;

    /// Fetch the record for this request as JSON. `kwargs` holds URL path
    /// parameters.
    async fn get_object(&self, kwargs: &HashMap<String, String>)
        -> ForgeResult<serde_json::Value>;

    /// Read the template source off the fetched record.
    ///
    /// # Errors
    ///
    /// Fails with the configuration error when the attribute is missing,
    /// not a string, or empty.
    async fn resolve_model_template(
        &self,
        kwargs: &HashMap<String, String>,
    ) -> ForgeResult<String> {
        let object = self.get_object(kwargs).await?;
        let field = self.model_template_name().unwrap_or("template");
        object
            .get(field)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| {
                let model = self.model_name();
                let view = self.view_name();
                ForgeError::ImproperlyConfigured(format!(
                    "{model} is missing a template. Define {model}.template, \
                     {view}.model_template_name or override {view}.get_template()."
                ))
            })
    }
}

/// A form view whose response template lives on a stored
/// [`FormTemplate`] record, looked up by the `pk` URL parameter.
pub struct ModelFormTemplateView {
    store: Arc<dyn FormStore>,
    success_url: String,
    page_template: String,
    extra_context: ContextData,
    engine: Option<Arc<Engine>>,
    model_template_name: Option<String>,
    pk_url_kwarg: String,
    rendered: RwLock<Option<String>>,
}

impl ModelFormTemplateView {
    pub fn new(store: Arc<dyn FormStore>) -> Self {
        Self {
            store,
            success_url: "/".to_string(),
            page_template: "form.html".to_string(),
            extra_context: ContextData::new(),
            engine: None,
            model_template_name: None,
            pk_url_kwarg: "pk".to_string(),
            rendered: RwLock::new(None),
        }
    }

    /// Read the template from a different record attribute.
    #[must_use]
    pub fn with_model_template_name(mut self, name: &str) -> Self {
        self.model_template_name = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn with_success_url(mut self, url: &str) -> Self {
        self.success_url = url.to_string();
        self
    }

    #[must_use]
    pub fn with_page_template(mut self, name: &str) -> Self {
        self.page_template = name.to_string();
        self
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Arc<Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use]
    pub fn with_pk_url_kwarg(mut self, name: &str) -> Self {
        self.pk_url_kwarg = name.to_string();
        self
    }

    /// Fetch the stored pairing this request addresses.
    async fn form_template_record(
        &self,
        kwargs: &HashMap<String, String>,
    ) -> ForgeResult<FormTemplate> {
        let raw = kwargs.get(&self.pk_url_kwarg).ok_or_else(|| {
            ForgeError::BadRequest(format!("missing URL parameter {}", self.pk_url_kwarg))
        })?;
        let pk: i64 = raw.parse().map_err(|_| {
            ForgeError::BadRequest(format!("invalid {} value {raw}", self.pk_url_kwarg))
        })?;
        self.store
            .form_template(pk)
            .await?
            .ok_or_else(|| ForgeError::NotFound(format!("form template {pk}")))
    }
}

impl TemplateContextMixin for ModelFormTemplateView {
    fn view_name(&self) -> &str {
        "ModelFormTemplateView"
    }
}

#[async_trait]
impl ModelFormTemplateMixin for ModelFormTemplateView {
    fn model_template_name(&self) -> Option<&str> {
        self.model_template_name.as_deref()
    }

    fn model_name(&self) -> &str {
        "FormTemplate"
    }

    async fn get_object(
        &self,
        kwargs: &HashMap<String, String>,
    ) -> ForgeResult<serde_json::Value> {
        let record = self.form_template_record(kwargs).await?;
        serde_json::to_value(&record).map_err(|e| ForgeError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl TemplateRenderMixin for ModelFormTemplateView {
    async fn get_template(&self, request: &HttpRequest) -> ForgeResult<String> {
        self.resolve_model_template(request.params()).await
    }

    fn template_engine(&self) -> Option<&Engine> {
        self.engine.as_deref()
    }
}

impl ContextMixin for ModelFormTemplateView {
    fn get_context_data(&self, kwargs: &HashMap<String, String>) -> ContextData {
        let mut context = self.extra_context.clone();
        for (key, value) in kwargs {
            context.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        context
    }
}

impl TemplateResponseMixin for ModelFormTemplateView {
    fn template_name(&self) -> &str {
        &self.page_template
    }
}

#[async_trait]
impl FormView for ModelFormTemplateView {
    fn success_url(&self) -> &str {
        &self.success_url
    }

    fn engine(&self) -> Option<&Engine> {
        self.engine.as_deref()
    }

    async fn get_form(&self, request: &HttpRequest) -> ForgeResult<BaseForm> {
        let record = self.form_template_record(request.params()).await?;
        record.build_form(self.store.as_ref()).await
    }
}

impl FormTemplateMixin for ModelFormTemplateView {
    fn rendered_template_slot(&self) -> &RwLock<Option<String>> {
        &self.rendered
    }
}

#[async_trait]
impl View for ModelFormTemplateView {
    async fn get(&self, request: HttpRequest) -> HttpResponse {
        self.handle_get(request).await
    }

    async fn post(&self, request: HttpRequest) -> HttpResponse {
        self.process_submission(request).await
    }
}
