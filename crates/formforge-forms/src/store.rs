//! Storage for form records.
//!
//! [`FormStore`] is the read seam views consume. [`MemoryStore`] is the
//! in-process implementation; its write methods enforce referential
//! integrity between entries, elements, and templates.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use formforge_core::{ForgeError, ForgeResult};

use crate::entry::{FormElementEntry, FormEntry};
use crate::form_template::FormTemplate;

/// Read access to stored form records.
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn form_entry(&self, id: i64) -> ForgeResult<Option<FormEntry>>;

    async fn form_entry_by_slug(&self, slug: &str) -> ForgeResult<Option<FormEntry>>;

    /// Every element belonging to a form entry, sorted by position.
    async fn element_entries(&self, form_entry_id: i64) -> ForgeResult<Vec<FormElementEntry>>;

    async fn form_template(&self, id: i64) -> ForgeResult<Option<FormTemplate>>;
}

#[derive(Debug, Default)]
struct Tables {
    entries: HashMap<i64, FormEntry>,
    elements: HashMap<i64, FormElementEntry>,
    templates: HashMap<i64, FormTemplate>,
    next_entry_id: i64,
    next_element_id: i64,
    next_template_id: i64,
}

/// In-memory store backed by a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_form_entry(&self, name: &str, slug: &str, is_public: bool) -> FormEntry {
        let mut tables = self.tables.write().unwrap();
        tables.next_entry_id += 1;
        let now = Utc::now();
        let entry = FormEntry {
            id: tables.next_entry_id,
            name: name.to_string(),
            slug: slug.to_string(),
            is_public,
            created_at: now,
            updated_at: now,
        };
        tables.entries.insert(entry.id, entry.clone());
        entry
    }

    /// Add an element to a form entry.
    ///
    /// # Errors
    ///
    /// Fails with [`ForgeError::IntegrityError`] when the form entry does
    /// not exist.
    pub fn add_element(
        &self,
        form_entry_id: i64,
        plugin_uid: &str,
        plugin_data: Value,
        position: i32,
    ) -> ForgeResult<FormElementEntry> {
        let mut tables = self.tables.write().unwrap();
        if !tables.entries.contains_key(&form_entry_id) {
            tracing::warn!(form_entry_id, "rejecting element for missing form entry");
            return Err(ForgeError::IntegrityError(format!(
                "form element references missing form entry {form_entry_id}"
            )));
        }
        tables.next_element_id += 1;
        let element = FormElementEntry {
            id: tables.next_element_id,
            form_entry_id,
            plugin_uid: plugin_uid.to_string(),
            plugin_data,
            position,
        };
        tables.elements.insert(element.id, element.clone());
        if let Some(entry) = tables.entries.get_mut(&form_entry_id) {
            entry.updated_at = Utc::now();
        }
        Ok(element)
    }

    /// Pair a template with a form entry.
    ///
    /// # Errors
    ///
    /// Fails with [`ForgeError::IntegrityError`] when the form entry does
    /// not exist.
    pub fn add_form_template(
        &self,
        template: &str,
        form_entry_id: i64,
    ) -> ForgeResult<FormTemplate> {
        let mut tables = self.tables.write().unwrap();
        if !tables.entries.contains_key(&form_entry_id) {
            tracing::warn!(form_entry_id, "rejecting template for missing form entry");
            return Err(ForgeError::IntegrityError(format!(
                "form template references missing form entry {form_entry_id}"
            )));
        }
        tables.next_template_id += 1;
        let record = FormTemplate {
            id: tables.next_template_id,
            template: template.to_string(),
            form_entry_id,
        };
        tables.templates.insert(record.id, record.clone());
        Ok(record)
    }

    /// Replace the template text of a stored pairing.
    ///
    /// # Errors
    ///
    /// Fails with [`ForgeError::DoesNotExist`] when there is no such record.
    pub fn update_form_template(&self, id: i64, template: &str) -> ForgeResult<FormTemplate> {
        let mut tables = self.tables.write().unwrap();
        let record = tables
            .templates
            .get_mut(&id)
            .ok_or_else(|| ForgeError::DoesNotExist(format!("form template {id}")))?;
        record.template = template.to_string();
        Ok(record.clone())
    }

    pub fn delete_form_template(&self, id: i64) -> bool {
        self.tables.write().unwrap().templates.remove(&id).is_some()
    }

    pub fn delete_element(&self, id: i64) -> bool {
        self.tables.write().unwrap().elements.remove(&id).is_some()
    }

    /// Delete a form entry along with its elements and template pairings.
    pub fn delete_form_entry(&self, id: i64) -> bool {
        let mut tables = self.tables.write().unwrap();
        if tables.entries.remove(&id).is_none() {
            return false;
        }
        tables.elements.retain(|_, e| e.form_entry_id != id);
        tables.templates.retain(|_, t| t.form_entry_id != id);
        true
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn form_entry(&self, id: i64) -> ForgeResult<Option<FormEntry>> {
        Ok(self.tables.read().unwrap().entries.get(&id).cloned())
    }

    async fn form_entry_by_slug(&self, slug: &str) -> ForgeResult<Option<FormEntry>> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .entries
            .values()
            .find(|e| e.slug == slug)
            .cloned())
    }

    async fn element_entries(&self, form_entry_id: i64) -> ForgeResult<Vec<FormElementEntry>> {
        let mut elements: Vec<FormElementEntry> = self
            .tables
            .read()
            .unwrap()
            .elements
            .values()
            .filter(|e| e.form_entry_id == form_entry_id)
            .cloned()
            .collect();
        elements.sort_by_key(|e| e.position);
        Ok(elements)
    }

    async fn form_template(&self, id: i64) -> ForgeResult<Option<FormTemplate>> {
        Ok(self.tables.read().unwrap().templates.get(&id).cloned())
    }
}
