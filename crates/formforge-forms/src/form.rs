//! The form abstraction: a trait for anything that validates submitted
//! data, plus the concrete `BaseForm` that dynamic assembly produces.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use formforge_core::ValidationError;
use formforge_http::QueryDict;

use crate::bound_field::BoundField;
use crate::fields::FormFieldDef;
use crate::validation::clean_fields;

/// Key under which form-level errors are collected.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Something that holds fields, binds submitted data, and validates it.
///
/// `is_valid` runs the cleaning pipeline once and caches the outcome;
/// calling it again is cheap. An unbound form is never valid.
#[async_trait]
pub trait Form: Send + Sync {
    fn fields(&self) -> &[FormFieldDef];

    /// The data bound to the form, if any.
    fn data(&self) -> Option<&QueryDict>;

    /// Bind submitted data to the form, resetting any prior validation.
    fn bind(&mut self, data: QueryDict);

    fn is_bound(&self) -> bool {
        self.data().is_some()
    }

    async fn is_valid(&mut self) -> bool;

    fn errors(&self) -> &HashMap<String, Vec<String>>;

    fn cleaned_data(&self) -> &HashMap<String, Value>;

    fn add_error(&mut self, field: &str, message: String);

    /// Form-level validation hook, run after every field cleaned. Errors
    /// land under [`NON_FIELD_ERRORS`].
    async fn clean(&mut self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// The form as template context: a `fields` list with rendered HTML,
    /// the error map, and the bound flag.
    fn as_context(&self) -> HashMap<String, Value> {
        let fields: Vec<Value> = self
            .fields()
            .iter()
            .map(|def| {
                let errors = self
                    .errors()
                    .get(&def.name)
                    .map_or(&[][..], Vec::as_slice);
                BoundField::new(def, self.data(), errors).as_json()
            })
            .collect();

        let mut context = HashMap::new();
        context.insert("fields".to_string(), Value::Array(fields));
        context.insert(
            "errors".to_string(),
            serde_json::to_value(self.errors()).unwrap_or(Value::Null),
        );
        context.insert("is_bound".to_string(), json!(self.is_bound()));
        context
    }
}

/// A form built from a list of field definitions.
///
/// This is what [`crate::assembly::assemble_form`] returns. It can also be
/// constructed directly for statically known forms.
#[derive(Debug, Default)]
pub struct BaseForm {
    fields: Vec<FormFieldDef>,
    data: Option<QueryDict>,
    cleaned: HashMap<String, Value>,
    errors: HashMap<String, Vec<String>>,
    validated: bool,
}

impl BaseForm {
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Build a form and bind data in one step.
    pub fn bound(fields: Vec<FormFieldDef>, data: QueryDict) -> Self {
        let mut form = Self::new(fields);
        form.bind(data);
        form
    }

    pub fn add_field(&mut self, field: FormFieldDef) {
        self.fields.push(field);
        self.validated = false;
    }

    pub fn field(&self, name: &str) -> Option<&FormFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every field paired with its bound data, for rendering.
    pub fn bound_fields(&self) -> Vec<BoundField<'_>> {
        self.fields
            .iter()
            .map(|def| {
                let errors = self.errors.get(&def.name).map_or(&[][..], Vec::as_slice);
                BoundField::new(def, self.data.as_ref(), errors)
            })
            .collect()
    }

    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[][..], Vec::as_slice)
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.fields
    }

    fn data(&self) -> Option<&QueryDict> {
        self.data.as_ref()
    }

    fn bind(&mut self, data: QueryDict) {
        self.data = Some(data);
        self.cleaned.clear();
        self.errors.clear();
        self.validated = false;
    }

    async fn is_valid(&mut self) -> bool {
        if !self.validated {
            let Some(data) = self.data.clone() else {
                return false;
            };
            let (cleaned, errors) = clean_fields(&self.fields, &data);
            self.cleaned = cleaned;
            self.errors = errors;
            if let Err(e) = self.clean().await {
                self.errors
                    .entry(NON_FIELD_ERRORS.to_string())
                    .or_default()
                    .push(e.message);
            }
            self.validated = true;
        }
        self.is_bound() && self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned
    }

    fn add_error(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_string()).or_default().push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;

    fn signup_fields() -> Vec<FormFieldDef> {
        vec![
            FormFieldDef::new("name", FormFieldType::char()),
            FormFieldDef::new("email", FormFieldType::Email),
            FormFieldDef::new(
                "age",
                FormFieldType::Integer {
                    min_value: Some(13),
                    max_value: None,
                },
            )
            .required(false),
        ]
    }

    #[tokio::test]
    async fn unbound_form_is_never_valid() {
        let mut form = BaseForm::new(signup_fields());
        assert!(!form.is_bound());
        assert!(!form.is_valid().await);
    }

    #[tokio::test]
    async fn valid_submission_populates_cleaned_data() {
        let data = QueryDict::parse("name=Ada&email=ada%40example.com&age=36");
        let mut form = BaseForm::bound(signup_fields(), data);
        assert!(form.is_valid().await);
        assert_eq!(form.cleaned_data()["name"], json!("Ada"));
        assert_eq!(form.cleaned_data()["email"], json!("ada@example.com"));
        assert_eq!(form.cleaned_data()["age"], json!(36));
    }

    #[tokio::test]
    async fn invalid_submission_collects_errors() {
        let data = QueryDict::parse("email=nope&age=7");
        let mut form = BaseForm::bound(signup_fields(), data);
        assert!(!form.is_valid().await);
        assert_eq!(form.errors()["name"], vec!["This field is required."]);
        assert_eq!(form.errors()["email"], vec!["Enter a valid email address."]);
        assert_eq!(
            form.errors()["age"],
            vec!["Ensure this value is greater than or equal to 13."]
        );
        assert!(form.cleaned_data().get("email").is_none());
    }

    #[tokio::test]
    async fn rebinding_resets_validation_state() {
        let mut form = BaseForm::bound(signup_fields(), QueryDict::parse("name=&email=bad"));
        assert!(!form.is_valid().await);
        form.bind(QueryDict::parse("name=Ada&email=ada%40example.com"));
        assert!(form.is_valid().await);
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn add_error_marks_form_invalid() {
        let data = QueryDict::parse("name=Ada&email=ada%40example.com");
        let mut form = BaseForm::bound(signup_fields(), data);
        assert!(form.is_valid().await);
        form.add_error("name", "Already taken.".to_string());
        assert_eq!(form.errors()["name"], vec!["Already taken."]);
    }

    #[tokio::test]
    async fn as_context_exposes_fields_and_errors() {
        let data = QueryDict::parse("email=bad");
        let mut form = BaseForm::bound(signup_fields(), data);
        let _ = form.is_valid().await;
        let context = form.as_context();

        assert_eq!(context["is_bound"], json!(true));
        let fields = context["fields"].as_array().expect("fields array");
        assert_eq!(fields.len(), 3);
        let email = fields
            .iter()
            .find(|f| f["name"] == json!("email"))
            .expect("email field");
        assert_eq!(email["errors"], json!(["Enter a valid email address."]));
        assert!(email["html"].as_str().expect("html").contains("type=\"email\""));
    }
}
