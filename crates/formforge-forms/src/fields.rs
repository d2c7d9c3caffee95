//! Field definitions and per-field value cleaning.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use formforge_core::ValidationError;

use crate::widgets::{Widget, WidgetType};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid regex"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// The data type of a form field, with its type-specific constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Char {
        min_length: Option<usize>,
        max_length: Option<usize>,
        strip: bool,
    },
    Integer {
        min_value: Option<i64>,
        max_value: Option<i64>,
    },
    Float {
        min_value: Option<f64>,
        max_value: Option<f64>,
    },
    Boolean,
    Date,
    DateTime,
    Email,
    Url,
    Choice {
        choices: Vec<(String, String)>,
    },
    MultipleChoice {
        choices: Vec<(String, String)>,
    },
}

impl FormFieldType {
    /// An unconstrained text field that strips surrounding whitespace.
    pub const fn char() -> Self {
        Self::Char {
            min_length: None,
            max_length: None,
            strip: true,
        }
    }

    pub const fn is_multi_value(&self) -> bool {
        matches!(self, Self::MultipleChoice { .. })
    }
}

/// A validator run against the raw submitted value after type checks pass.
pub type FieldValidator = Arc<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Definition of a single form field: name, type, and presentation knobs.
///
/// Built with a chained constructor:
///
/// ```
/// use formforge_forms::fields::{FormFieldDef, FormFieldType};
///
/// let field = FormFieldDef::new("email", FormFieldType::Email)
///     .help_text("We never share it.")
///     .required(true);
/// assert_eq!(field.label, "Email");
/// ```
#[derive(Clone)]
pub struct FormFieldDef {
    pub name: String,
    pub field_type: FormFieldType,
    pub required: bool,
    pub label: String,
    pub help_text: String,
    pub initial: Option<Value>,
    pub disabled: bool,
    pub widget: Option<Widget>,
    pub validators: Vec<FieldValidator>,
    pub error_messages: HashMap<String, String>,
}

impl FormFieldDef {
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        // Default label: underscores to spaces, first letter capitalized.
        let mut label = name.replace('_', " ");
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Self {
            name,
            field_type,
            required: true,
            label,
            help_text: String::new(),
            initial: None,
            disabled: false,
            widget: None,
            validators: Vec::new(),
            error_messages: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    #[must_use]
    pub fn initial(mut self, initial: Value) -> Self {
        self.initial = Some(initial);
        self
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn widget(mut self, widget: Widget) -> Self {
        self.widget = Some(widget);
        self
    }

    #[must_use]
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), message.into());
        self
    }

    /// The widget to render with: the explicit override, or the default
    /// for this field type.
    pub fn effective_widget(&self) -> Widget {
        self.widget
            .clone()
            .unwrap_or_else(|| default_widget(&self.field_type))
    }

    /// The initial value rendered into an unbound form, as a string.
    pub fn initial_as_string(&self) -> Option<String> {
        self.initial.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn message(&self, code: &str, default: String) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or(default)
    }
}

impl fmt::Debug for FormFieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFieldDef")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

/// The widget a field type renders as when none is set explicitly.
pub fn default_widget(field_type: &FormFieldType) -> Widget {
    match field_type {
        FormFieldType::Char { max_length, .. } => {
            let mut widget = Widget::new(WidgetType::TextInput);
            if let Some(max) = max_length {
                widget = widget.with_attr("maxlength", max.to_string());
            }
            widget
        }
        FormFieldType::Integer { .. } | FormFieldType::Float { .. } => {
            Widget::new(WidgetType::NumberInput)
        }
        FormFieldType::Boolean => Widget::new(WidgetType::CheckboxInput),
        FormFieldType::Date => Widget::new(WidgetType::DateInput),
        FormFieldType::DateTime => Widget::new(WidgetType::DateTimeInput),
        FormFieldType::Email => Widget::new(WidgetType::EmailInput),
        FormFieldType::Url => Widget::new(WidgetType::UrlInput),
        FormFieldType::Choice { choices } => {
            Widget::new(WidgetType::Select).with_choices(choices.clone())
        }
        FormFieldType::MultipleChoice { choices } => {
            Widget::new(WidgetType::SelectMultiple).with_choices(choices.clone())
        }
    }
}

/// Clean and validate the submitted values for one field.
///
/// `values` holds every submitted value under the field's name; single-value
/// fields use the last one. Returns the cleaned value as JSON, or the list
/// of error messages for the field.
pub fn clean_field_value(def: &FormFieldDef, values: &[String]) -> Result<Value, Vec<String>> {
    let raw = values.last().map(String::as_str).unwrap_or_default();
    let is_empty = if def.field_type.is_multi_value() {
        values.iter().all(|v| v.is_empty())
    } else {
        raw.trim().is_empty()
    };

    if is_empty {
        if def.required {
            let msg = def.message("required", "This field is required.".to_string());
            return Err(vec![msg]);
        }
        return Ok(empty_value(def));
    }

    let mut errors = Vec::new();
    let cleaned = clean_typed(def, raw, values, &mut errors);

    if errors.is_empty() {
        for validator in &def.validators {
            if let Err(e) = validator(raw) {
                errors.push(e.message);
            }
        }
    }

    if errors.is_empty() {
        Ok(cleaned)
    } else {
        Err(errors)
    }
}

/// The cleaned value for an optional field that received no input.
fn empty_value(def: &FormFieldDef) -> Value {
    match def.field_type {
        FormFieldType::Boolean => json!(false),
        FormFieldType::MultipleChoice { .. } => json!([]),
        _ => def.initial.clone().unwrap_or(Value::Null),
    }
}

#[allow(clippy::too_many_lines)]
fn clean_typed(def: &FormFieldDef, raw: &str, values: &[String], errors: &mut Vec<String>) -> Value {
    match &def.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let value = if *strip { raw.trim() } else { raw };
            let n = value.chars().count();
            if let Some(min) = min_length {
                if n < *min {
                    errors.push(def.message(
                        "min_length",
                        format!("Ensure this value has at least {min} characters (it has {n})."),
                    ));
                }
            }
            if let Some(max) = max_length {
                if n > *max {
                    errors.push(def.message(
                        "max_length",
                        format!("Ensure this value has at most {max} characters (it has {n})."),
                    ));
                }
            }
            json!(value)
        }
        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw.trim().parse::<i64>() {
            Ok(v) => {
                check_bounds(def, v, min_value.as_ref(), max_value.as_ref(), errors);
                json!(v)
            }
            Err(_) => {
                errors.push(def.message("invalid", "Enter a whole number.".to_string()));
                Value::Null
            }
        },
        FormFieldType::Float {
            min_value,
            max_value,
        } => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => {
                check_bounds(def, v, min_value.as_ref(), max_value.as_ref(), errors);
                json!(v)
            }
            _ => {
                errors.push(def.message("invalid", "Enter a number.".to_string()));
                Value::Null
            }
        },
        FormFieldType::Boolean => {
            let truthy = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            );
            json!(truthy)
        }
        FormFieldType::Date => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(d) => json!(d.format("%Y-%m-%d").to_string()),
            Err(_) => {
                errors.push(def.message("invalid", "Enter a valid date (YYYY-MM-DD).".to_string()));
                Value::Null
            }
        },
        FormFieldType::DateTime => {
            let trimmed = raw.trim();
            let parsed = DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok());
            parsed.map_or_else(
                || {
                    errors.push(def.message("invalid", "Enter a valid date/time.".to_string()));
                    Value::Null
                },
                |dt| json!(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            )
        }
        FormFieldType::Email => {
            let value = raw.trim();
            if EMAIL_RE.is_match(value) {
                json!(value)
            } else {
                errors.push(def.message("invalid", "Enter a valid email address.".to_string()));
                Value::Null
            }
        }
        FormFieldType::Url => {
            let value = raw.trim();
            if URL_RE.is_match(value) {
                json!(value)
            } else {
                errors.push(def.message("invalid", "Enter a valid URL.".to_string()));
                Value::Null
            }
        }
        FormFieldType::Choice { choices } => {
            if choices.iter().any(|(value, _)| value == raw) {
                json!(raw)
            } else {
                errors.push(def.message(
                    "invalid_choice",
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                ));
                Value::Null
            }
        }
        FormFieldType::MultipleChoice { choices } => {
            let mut selected = Vec::new();
            for value in values {
                if choices.iter().any(|(v, _)| v == value) {
                    selected.push(value.clone());
                } else {
                    errors.push(def.message(
                        "invalid_choice",
                        format!(
                            "Select a valid choice. {value} is not one of the available choices."
                        ),
                    ));
                }
            }
            json!(selected)
        }
    }
}

fn check_bounds<T: PartialOrd + fmt::Display>(
    def: &FormFieldDef,
    value: T,
    min: Option<&T>,
    max: Option<&T>,
    errors: &mut Vec<String>,
) {
    if let Some(min) = min {
        if value < *min {
            errors.push(def.message(
                "min_value",
                format!("Ensure this value is greater than or equal to {min}."),
            ));
        }
    }
    if let Some(max) = max {
        if value > *max {
            errors.push(def.message(
                "max_value",
                format!("Ensure this value is less than or equal to {max}."),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn required_field_rejects_empty() {
        let def = FormFieldDef::new("name", FormFieldType::char());
        let err = clean_field_value(&def, &[]).unwrap_err();
        assert_eq!(err, vec!["This field is required.".to_string()]);
    }

    #[test]
    fn required_message_can_be_overridden() {
        let def = FormFieldDef::new("name", FormFieldType::char())
            .error_message("required", "Name is mandatory.");
        let err = clean_field_value(&def, &[]).unwrap_err();
        assert_eq!(err, vec!["Name is mandatory.".to_string()]);
    }

    #[test]
    fn optional_empty_field_cleans_to_initial_or_null() {
        let def = FormFieldDef::new("nick", FormFieldType::char()).required(false);
        assert_eq!(clean_field_value(&def, &[]).unwrap(), Value::Null);

        let def = def.initial(json!("anon"));
        assert_eq!(clean_field_value(&def, &[]).unwrap(), json!("anon"));
    }

    #[test]
    fn char_field_strips_and_checks_length() {
        let def = FormFieldDef::new(
            "code",
            FormFieldType::Char {
                min_length: Some(3),
                max_length: Some(5),
                strip: true,
            },
        );
        assert_eq!(clean_field_value(&def, &values(&["  abc  "])).unwrap(), json!("abc"));

        let err = clean_field_value(&def, &values(&["ab"])).unwrap_err();
        assert_eq!(
            err,
            vec!["Ensure this value has at least 3 characters (it has 2).".to_string()]
        );

        let err = clean_field_value(&def, &values(&["abcdef"])).unwrap_err();
        assert_eq!(
            err,
            vec!["Ensure this value has at most 5 characters (it has 6).".to_string()]
        );
    }

    #[test]
    fn integer_field_parses_and_bounds() {
        let def = FormFieldDef::new(
            "age",
            FormFieldType::Integer {
                min_value: Some(0),
                max_value: Some(130),
            },
        );
        assert_eq!(clean_field_value(&def, &values(&["42"])).unwrap(), json!(42));

        let err = clean_field_value(&def, &values(&["abc"])).unwrap_err();
        assert_eq!(err, vec!["Enter a whole number.".to_string()]);

        let err = clean_field_value(&def, &values(&["-1"])).unwrap_err();
        assert_eq!(
            err,
            vec!["Ensure this value is greater than or equal to 0.".to_string()]
        );

        let err = clean_field_value(&def, &values(&["200"])).unwrap_err();
        assert_eq!(
            err,
            vec!["Ensure this value is less than or equal to 130.".to_string()]
        );
    }

    #[test]
    fn float_field_rejects_non_finite() {
        let def = FormFieldDef::new(
            "score",
            FormFieldType::Float {
                min_value: None,
                max_value: None,
            },
        );
        assert_eq!(clean_field_value(&def, &values(&["2.5"])).unwrap(), json!(2.5));
        let err = clean_field_value(&def, &values(&["NaN"])).unwrap_err();
        assert_eq!(err, vec!["Enter a number.".to_string()]);
    }

    #[test]
    fn boolean_field_truthy_values() {
        let def = FormFieldDef::new("subscribe", FormFieldType::Boolean).required(false);
        for truthy in ["true", "1", "yes", "on", "ON"] {
            assert_eq!(clean_field_value(&def, &values(&[truthy])).unwrap(), json!(true));
        }
        assert_eq!(clean_field_value(&def, &values(&["false"])).unwrap(), json!(false));
        assert_eq!(clean_field_value(&def, &[]).unwrap(), json!(false));
    }

    #[test]
    fn date_field_normalizes() {
        let def = FormFieldDef::new("born", FormFieldType::Date);
        assert_eq!(
            clean_field_value(&def, &values(&["2024-03-05"])).unwrap(),
            json!("2024-03-05")
        );
        let err = clean_field_value(&def, &values(&["05/03/2024"])).unwrap_err();
        assert_eq!(err, vec!["Enter a valid date (YYYY-MM-DD).".to_string()]);
    }

    #[test]
    fn datetime_field_accepts_several_formats() {
        let def = FormFieldDef::new("at", FormFieldType::DateTime);
        for raw in [
            "2024-03-05T10:30:00",
            "2024-03-05T10:30",
            "2024-03-05 10:30:00",
            "2024-03-05 10:30",
        ] {
            let cleaned = clean_field_value(&def, &values(&[raw])).unwrap();
            assert_eq!(cleaned, json!("2024-03-05T10:30:00"), "format {raw}");
        }
        let err = clean_field_value(&def, &values(&["soon"])).unwrap_err();
        assert_eq!(err, vec!["Enter a valid date/time.".to_string()]);
    }

    #[test]
    fn email_field_validates() {
        let def = FormFieldDef::new("email", FormFieldType::Email);
        assert_eq!(
            clean_field_value(&def, &values(&["ada@example.com"])).unwrap(),
            json!("ada@example.com")
        );
        let err = clean_field_value(&def, &values(&["not-an-email"])).unwrap_err();
        assert_eq!(err, vec!["Enter a valid email address.".to_string()]);
    }

    #[test]
    fn url_field_validates() {
        let def = FormFieldDef::new("site", FormFieldType::Url);
        assert_eq!(
            clean_field_value(&def, &values(&["https://example.com/x"])).unwrap(),
            json!("https://example.com/x")
        );
        let err = clean_field_value(&def, &values(&["example.com"])).unwrap_err();
        assert_eq!(err, vec!["Enter a valid URL.".to_string()]);
    }

    #[test]
    fn choice_field_rejects_unknown_value() {
        let def = FormFieldDef::new(
            "color",
            FormFieldType::Choice {
                choices: vec![
                    ("red".to_string(), "Red".to_string()),
                    ("blue".to_string(), "Blue".to_string()),
                ],
            },
        );
        assert_eq!(clean_field_value(&def, &values(&["red"])).unwrap(), json!("red"));
        let err = clean_field_value(&def, &values(&["green"])).unwrap_err();
        assert_eq!(
            err,
            vec!["Select a valid choice. green is not one of the available choices.".to_string()]
        );
    }

    #[test]
    fn multiple_choice_validates_each_value() {
        let def = FormFieldDef::new(
            "tags",
            FormFieldType::MultipleChoice {
                choices: vec![
                    ("a".to_string(), "A".to_string()),
                    ("b".to_string(), "B".to_string()),
                ],
            },
        );
        assert_eq!(
            clean_field_value(&def, &values(&["a", "b"])).unwrap(),
            json!(["a", "b"])
        );
        let err = clean_field_value(&def, &values(&["a", "z"])).unwrap_err();
        assert_eq!(
            err,
            vec!["Select a valid choice. z is not one of the available choices.".to_string()]
        );
    }

    #[test]
    fn custom_validator_runs_after_type_checks() {
        let def = FormFieldDef::new("name", FormFieldType::char()).validator(|raw| {
            if raw.contains(' ') {
                Err(ValidationError::new("No spaces allowed.", "no_spaces"))
            } else {
                Ok(())
            }
        });
        assert!(clean_field_value(&def, &values(&["ada"])).is_ok());
        let err = clean_field_value(&def, &values(&["ada lovelace"])).unwrap_err();
        assert_eq!(err, vec!["No spaces allowed.".to_string()]);
    }

    #[test]
    fn default_widget_matches_field_type() {
        let email = FormFieldDef::new("email", FormFieldType::Email);
        assert_eq!(email.effective_widget().widget_type(), WidgetType::EmailInput);

        let choice = FormFieldDef::new(
            "color",
            FormFieldType::Choice {
                choices: vec![("red".to_string(), "Red".to_string())],
            },
        );
        let widget = choice.effective_widget();
        assert_eq!(widget.widget_type(), WidgetType::Select);
        assert_eq!(widget.choices().len(), 1);
    }

    #[test]
    fn label_defaults_from_name() {
        let def = FormFieldDef::new("first_name", FormFieldType::char());
        assert_eq!(def.label, "First name");
    }
}
