//! Assembly of a runtime form from stored element entries.
//!
//! Each element entry names a plugin uid and carries a JSON configuration
//! blob. Assembly sorts the elements by position, maps every known uid to
//! a [`FormFieldDef`], skips unknown uids with a warning, and fails on
//! malformed configuration for a known uid.

use serde::Deserialize;
use serde_json::{Number, Value};

use formforge_core::{ForgeError, ForgeResult};

use crate::entry::{FormElementEntry, FormEntry};
use crate::fields::{FormFieldDef, FormFieldType};
use crate::form::BaseForm;
use crate::widgets::{Widget, WidgetType};

/// Plugin uids assembly knows how to turn into fields.
pub const KNOWN_PLUGIN_UIDS: &[&str] = &[
    "text",
    "textarea",
    "email",
    "url",
    "integer",
    "float",
    "boolean",
    "date",
    "datetime",
    "select",
    "select_multiple",
    "hidden",
];

/// The JSON configuration stored in an element's `plugin_data`.
#[derive(Debug, Deserialize)]
struct ElementData {
    name: String,
    label: Option<String>,
    help_text: Option<String>,
    #[serde(default = "default_required")]
    required: bool,
    initial: Option<Value>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    min_value: Option<Number>,
    max_value: Option<Number>,
    #[serde(default)]
    choices: Vec<ChoiceDef>,
}

const fn default_required() -> bool {
    true
}

/// A choice entry: either a `[value, label]` pair or a bare value used as
/// its own label.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChoiceDef {
    Pair(String, String),
    Bare(String),
}

/// Build a form for `entry` from its element entries.
///
/// Elements belonging to a different form entry are ignored.
///
/// # Errors
///
/// Fails when a known plugin uid carries configuration that does not
/// deserialize, or names no field.
pub fn assemble_form(entry: &FormEntry, elements: &[FormElementEntry]) -> ForgeResult<BaseForm> {
    let own: Vec<FormElementEntry> = elements
        .iter()
        .filter(|e| e.form_entry_id == entry.id)
        .cloned()
        .collect();
    let fields = assemble_form_fields(&own)?;
    tracing::debug!(form = %entry.slug, fields = fields.len(), "assembled form");
    Ok(BaseForm::new(fields))
}

/// Map element entries to field definitions, sorted by position.
pub fn assemble_form_fields(elements: &[FormElementEntry]) -> ForgeResult<Vec<FormFieldDef>> {
    let mut sorted: Vec<&FormElementEntry> = elements.iter().collect();
    sorted.sort_by_key(|e| e.position);

    let mut fields = Vec::with_capacity(sorted.len());
    for element in sorted {
        if let Some(field) = field_from_element(element)? {
            fields.push(field);
        }
    }
    Ok(fields)
}

fn field_from_element(element: &FormElementEntry) -> ForgeResult<Option<FormFieldDef>> {
    let uid = element.plugin_uid.as_str();
    if !KNOWN_PLUGIN_UIDS.contains(&uid) {
        tracing::warn!(
            element = element.id,
            plugin_uid = uid,
            "skipping element with unknown plugin uid"
        );
        return Ok(None);
    }

    let data: ElementData = serde_json::from_value(element.plugin_data.clone()).map_err(|e| {
        ForgeError::Serialization(format!(
            "element {} (plugin {uid}): invalid plugin data: {e}",
            element.id
        ))
    })?;
    if data.name.is_empty() {
        return Err(ForgeError::Serialization(format!(
            "element {} (plugin {uid}): empty field name",
            element.id
        )));
    }

    let choices = || {
        data.choices
            .iter()
            .map(|c| match c {
                ChoiceDef::Pair(value, label) => (value.clone(), label.clone()),
                ChoiceDef::Bare(value) => (value.clone(), value.clone()),
            })
            .collect::<Vec<_>>()
    };

    let field_type = match uid {
        "text" | "textarea" | "hidden" => FormFieldType::Char {
            min_length: data.min_length,
            max_length: data.max_length,
            strip: true,
        },
        "email" => FormFieldType::Email,
        "url" => FormFieldType::Url,
        "integer" => FormFieldType::Integer {
            min_value: data.min_value.as_ref().and_then(Number::as_i64),
            max_value: data.max_value.as_ref().and_then(Number::as_i64),
        },
        "float" => FormFieldType::Float {
            min_value: data.min_value.as_ref().and_then(Number::as_f64),
            max_value: data.max_value.as_ref().and_then(Number::as_f64),
        },
        "boolean" => FormFieldType::Boolean,
        "date" => FormFieldType::Date,
        "datetime" => FormFieldType::DateTime,
        "select" => FormFieldType::Choice { choices: choices() },
        "select_multiple" => FormFieldType::MultipleChoice { choices: choices() },
        // Membership was checked above.
        _ => return Ok(None),
    };

    let mut def = FormFieldDef::new(data.name, field_type).required(data.required);
    if let Some(label) = data.label {
        def = def.label(label);
    }
    if let Some(help_text) = data.help_text {
        def = def.help_text(help_text);
    }
    if let Some(initial) = data.initial {
        def = def.initial(initial);
    }
    match uid {
        "textarea" => def = def.widget(Widget::new(WidgetType::Textarea)),
        "hidden" => def = def.widget(Widget::new(WidgetType::HiddenInput)),
        _ => {}
    }
    Ok(Some(def))
}
