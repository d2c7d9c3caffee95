//! A field definition paired with the data bound to its form.

use serde_json::{json, Value};

use formforge_http::QueryDict;

use crate::fields::FormFieldDef;
use crate::widgets::{escape_html, WidgetValue};

/// A field plus the submitted data and errors that belong to it, ready
/// to render.
#[derive(Debug)]
pub struct BoundField<'a> {
    def: &'a FormFieldDef,
    data: Option<&'a QueryDict>,
    errors: &'a [String],
}

impl<'a> BoundField<'a> {
    pub const fn new(
        def: &'a FormFieldDef,
        data: Option<&'a QueryDict>,
        errors: &'a [String],
    ) -> Self {
        Self { def, data, errors }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn label(&self) -> &str {
        &self.def.label
    }

    pub fn errors(&self) -> &[String] {
        self.errors
    }

    /// The value the widget should display: submitted data when bound,
    /// the field's initial value otherwise.
    pub fn widget_value(&self) -> WidgetValue {
        match self.data {
            Some(data) => self
                .def
                .effective_widget()
                .value_from_data(data, &self.def.name),
            None => self
                .def
                .initial_as_string()
                .map_or(WidgetValue::None, WidgetValue::Single),
        }
    }

    /// The display value as a single string, if there is one.
    pub fn value(&self) -> Option<String> {
        match self.widget_value() {
            WidgetValue::None => None,
            WidgetValue::Single(v) => Some(v),
            WidgetValue::Multi(values) => Some(values.join(", ")),
        }
    }

    /// Render the field's widget to HTML.
    pub fn as_widget(&self) -> String {
        self.def
            .effective_widget()
            .render(&self.def.name, &self.widget_value())
    }

    pub fn label_tag(&self) -> String {
        let id = self.def.effective_widget().id_for_label(&self.def.name);
        let label = escape_html(&self.def.label);
        format!(r#"<label for="{id}">{label}</label>"#)
    }

    /// The field as a JSON object for template contexts.
    pub fn as_json(&self) -> Value {
        json!({
            "name": self.def.name,
            "label": self.def.label,
            "label_tag": self.label_tag(),
            "help_text": self.def.help_text,
            "required": self.def.required,
            "value": self.value(),
            "html": self.as_widget(),
            "errors": self.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormFieldType;

    #[test]
    fn unbound_field_shows_initial() {
        let def = FormFieldDef::new("name", FormFieldType::char()).initial(json!("Ada"));
        let bound = BoundField::new(&def, None, &[]);
        assert_eq!(bound.value(), Some("Ada".to_string()));
        assert!(bound.as_widget().contains(r#"value="Ada""#));
    }

    #[test]
    fn bound_field_shows_submitted_value() {
        let def = FormFieldDef::new("name", FormFieldType::char()).initial(json!("Ada"));
        let data = QueryDict::parse("name=Grace");
        let bound = BoundField::new(&def, Some(&data), &[]);
        assert_eq!(bound.value(), Some("Grace".to_string()));
    }

    #[test]
    fn label_tag_points_at_widget_id() {
        let def = FormFieldDef::new("email", FormFieldType::Email);
        let bound = BoundField::new(&def, None, &[]);
        assert_eq!(
            bound.label_tag(),
            r#"<label for="id_email">Email</label>"#
        );
    }

    #[test]
    fn as_json_carries_errors() {
        let def = FormFieldDef::new("age", FormFieldType::char());
        let errors = vec!["Enter a whole number.".to_string()];
        let bound = BoundField::new(&def, None, &errors);
        let value = bound.as_json();
        assert_eq!(value["errors"], json!(["Enter a whole number."]));
        assert_eq!(value["required"], json!(true));
    }
}
