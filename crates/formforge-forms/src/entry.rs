//! Persisted form records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored form definition. Element entries reference it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEntry {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One element of a stored form: which plugin handles it and the plugin's
/// configuration blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormElementEntry {
    pub id: i64,
    pub form_entry_id: i64,
    pub plugin_uid: String,
    pub plugin_data: Value,
    /// Sort key within the form. Lower positions render first.
    pub position: i32,
}
