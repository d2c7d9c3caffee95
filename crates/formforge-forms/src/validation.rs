//! The field cleaning pipeline shared by every form.

use std::collections::HashMap;

use serde_json::Value;

use formforge_http::QueryDict;

use crate::fields::{clean_field_value, FormFieldDef};

/// Clean every field against the submitted data.
///
/// Returns cleaned values keyed by field name alongside per-field error
/// lists. A field appears in exactly one of the two maps. Disabled fields
/// ignore submitted data and clean to their initial value.
pub fn clean_fields(
    fields: &[FormFieldDef],
    data: &QueryDict,
) -> (HashMap<String, Value>, HashMap<String, Vec<String>>) {
    let mut cleaned = HashMap::new();
    let mut errors = HashMap::new();

    for def in fields {
        if def.disabled {
            cleaned.insert(def.name.clone(), def.initial.clone().unwrap_or(Value::Null));
            continue;
        }
        let values = data.get_list(&def.name).map_or(&[][..], Vec::as_slice);
        match clean_field_value(def, values) {
            Ok(value) => {
                cleaned.insert(def.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(def.name.clone(), field_errors);
            }
        }
    }

    (cleaned, errors)
}
