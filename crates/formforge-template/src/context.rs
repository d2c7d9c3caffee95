//! Template context data.
//!
//! Contexts are plain JSON maps throughout the workspace; this module holds
//! the alias and the conversion into tera's own context type.

use std::collections::HashMap;

use formforge_core::{ForgeError, ForgeResult};

/// The context data passed to template rendering: variable name to value.
pub type ContextData = HashMap<String, serde_json::Value>;

/// Converts a [`ContextData`] map into a [`tera::Context`].
///
/// # Errors
///
/// Returns a serialization error if the map cannot be represented, which in
/// practice only happens for non-string-keyed nested maps.
pub fn to_tera_context(data: &ContextData) -> ForgeResult<tera::Context> {
    tera::Context::from_serialize(data)
        .map_err(|e| ForgeError::Serialization(format!("Invalid template context: {e}")))
}

/// Merges `overlay` into `base`. Keys already present in `base` win.
pub fn merge_defaults(base: &mut ContextData, overlay: ContextData) {
    for (key, value) in overlay {
        base.entry(key).or_insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_tera_context() {
        let mut data = ContextData::new();
        data.insert("name".to_string(), json!("Ada"));
        data.insert("count".to_string(), json!(3));

        let ctx = to_tera_context(&data).unwrap();
        assert_eq!(ctx.get("name").unwrap(), &tera::Value::from("Ada"));
        assert_eq!(ctx.get("count").unwrap(), &tera::Value::from(3));
    }

    #[test]
    fn test_merge_defaults_existing_keys_win() {
        let mut base = ContextData::new();
        base.insert("view".to_string(), json!({"name": "custom"}));

        let mut overlay = ContextData::new();
        overlay.insert("view".to_string(), json!({"name": "default"}));
        overlay.insert("extra".to_string(), json!(1));

        merge_defaults(&mut base, overlay);
        assert_eq!(base["view"], json!({"name": "custom"}));
        assert_eq!(base["extra"], json!(1));
    }
}
