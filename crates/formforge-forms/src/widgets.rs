//! HTML widgets used to render form fields.

use std::collections::HashMap;
use std::fmt;

use formforge_http::QueryDict;

/// The kind of HTML control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
    TextInput,
    NumberInput,
    EmailInput,
    UrlInput,
    PasswordInput,
    HiddenInput,
    Textarea,
    CheckboxInput,
    Select,
    SelectMultiple,
    DateInput,
    DateTimeInput,
}

impl WidgetType {
    /// The `type` attribute for `<input>`-based widgets, `None` otherwise.
    const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::TextInput => Some("text"),
            Self::NumberInput => Some("number"),
            Self::EmailInput => Some("email"),
            Self::UrlInput => Some("url"),
            Self::PasswordInput => Some("password"),
            Self::HiddenInput => Some("hidden"),
            Self::CheckboxInput => Some("checkbox"),
            Self::DateInput => Some("date"),
            Self::DateTimeInput => Some("datetime-local"),
            Self::Textarea | Self::Select | Self::SelectMultiple => None,
        }
    }

    /// Whether the widget submits multiple values under one name.
    pub const fn is_multi_value(self) -> bool {
        matches!(self, Self::SelectMultiple)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::UrlInput => "UrlInput",
            Self::PasswordInput => "PasswordInput",
            Self::HiddenInput => "HiddenInput",
            Self::Textarea => "Textarea",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::DateInput => "DateInput",
            Self::DateTimeInput => "DateTimeInput",
        };
        f.write_str(name)
    }
}

/// Value handed to a widget when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WidgetValue {
    #[default]
    None,
    Single(String),
    Multi(Vec<String>),
}

impl WidgetValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(v) => Some(v),
            Self::None | Self::Multi(_) => None,
        }
    }

    fn contains(&self, candidate: &str) -> bool {
        match self {
            Self::None => false,
            Self::Single(v) => v == candidate,
            Self::Multi(values) => values.iter().any(|v| v == candidate),
        }
    }

    /// Checkbox semantics: present and not an explicit false.
    fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Single(v) => !matches!(v.as_str(), "" | "false" | "0"),
            Self::Multi(values) => !values.is_empty(),
        }
    }
}

/// A configured widget: the control type plus HTML attributes and, for
/// selects, the available choices as `(value, label)` pairs.
#[derive(Debug, Clone)]
pub struct Widget {
    widget_type: WidgetType,
    attrs: HashMap<String, String>,
    choices: Vec<(String, String)>,
}

impl Widget {
    pub fn new(widget_type: WidgetType) -> Self {
        Self {
            widget_type,
            attrs: HashMap::new(),
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Vec<(String, String)>) -> Self {
        self.choices = choices;
        self
    }

    pub const fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    pub fn choices(&self) -> &[(String, String)] {
        &self.choices
    }

    /// The `id` attribute the widget renders with: an explicit `id` attr
    /// when set, `id_<name>` otherwise.
    pub fn id_for_label(&self, name: &str) -> String {
        self.attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"))
    }

    /// Pull this widget's submitted value out of request data.
    pub fn value_from_data(&self, data: &QueryDict, name: &str) -> WidgetValue {
        if self.widget_type.is_multi_value() {
            match data.get_list(name) {
                Some(values) if !values.is_empty() => WidgetValue::Multi(values.clone()),
                _ => WidgetValue::None,
            }
        } else {
            data.get(name)
                .map_or(WidgetValue::None, |v| WidgetValue::Single(v.to_string()))
        }
    }

    /// Render the widget to an HTML string.
    pub fn render(&self, name: &str, value: &WidgetValue) -> String {
        let id = self.id_for_label(name);
        let attrs = render_attrs(&self.attrs);
        match self.widget_type {
            WidgetType::Textarea => {
                let text = value.as_single().map(escape_html).unwrap_or_default();
                format!(r#"<textarea name="{name}" id="{id}"{attrs}>{text}</textarea>"#)
            }
            WidgetType::CheckboxInput => {
                let checked = if value.is_truthy() { " checked" } else { "" };
                format!(r#"<input type="checkbox" name="{name}" id="{id}"{checked}{attrs} />"#)
            }
            WidgetType::Select => self.render_select(name, &id, value, false),
            WidgetType::SelectMultiple => self.render_select(name, &id, value, true),
            other => {
                // Remaining widget types are all plain <input> controls.
                let input_type = other.input_type().unwrap_or("text");
                let val = value.as_single().map(escape_html).unwrap_or_default();
                format!(
                    r#"<input type="{input_type}" name="{name}" id="{id}" value="{val}"{attrs} />"#
                )
            }
        }
    }

    fn render_select(&self, name: &str, id: &str, value: &WidgetValue, multiple: bool) -> String {
        let multi_attr = if multiple { " multiple" } else { "" };
        let attrs = render_attrs(&self.attrs);
        let mut html = format!(r#"<select name="{name}" id="{id}"{multi_attr}{attrs}>"#);
        for (choice_value, label) in &self.choices {
            let selected = if value.contains(choice_value) {
                " selected"
            } else {
                ""
            };
            let v = escape_html(choice_value);
            let l = escape_html(label);
            html.push_str(&format!(r#"<option value="{v}"{selected}>{l}</option>"#));
        }
        html.push_str("</select>");
        html
    }
}

/// Render extra attributes sorted by name so output is deterministic.
/// `id` is excluded; the render methods emit it themselves.
fn render_attrs(attrs: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = attrs.iter().filter(|(k, _)| k.as_str() != "id").collect();
    pairs.sort_by_key(|(k, _)| k.as_str());
    pairs
        .into_iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape_html(v)))
        .collect()
}

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
