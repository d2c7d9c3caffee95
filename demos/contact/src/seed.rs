//! Sample data for the demo: a contact form entry, its field elements, and
//! a stored response-template pairing.

use std::sync::Arc;

use serde_json::json;

use formforge_core::ForgeResult;
use formforge_forms::MemoryStore;

/// Handles into the seeded store.
pub struct SampleSite {
    pub store: Arc<MemoryStore>,
    pub entry_id: i64,
    pub entry_slug: String,
    pub record_id: i64,
}

/// Seed the store with the contact form and its stored pairing.
pub fn sample_site() -> ForgeResult<SampleSite> {
    let store = MemoryStore::new();

    let entry = store.add_form_entry("Contact us", "contact", true);
    store.add_element(
        entry.id,
        "text",
        json!({"name": "name", "label": "Your name", "max_length": 80}),
        1,
    )?;
    store.add_element(
        entry.id,
        "email",
        json!({"name": "email", "label": "Email address"}),
        2,
    )?;
    store.add_element(
        entry.id,
        "select",
        json!({
            "name": "topic",
            "label": "Topic",
            "choices": [["support", "Support"], ["sales", "Sales"], ["other", "Other"]],
        }),
        3,
    )?;
    store.add_element(
        entry.id,
        "textarea",
        json!({"name": "message", "label": "Message", "required": false}),
        4,
    )?;

    let record = store.add_form_template(
        "Hello {{ name }}, your note about {{ topic }} reached us. \
         A reply lands at {{ email }} shortly.",
        entry.id,
    )?;

    Ok(SampleSite {
        store: Arc::new(store),
        entry_id: entry.id,
        entry_slug: entry.slug,
        record_id: record.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_site_pairs_template_and_entry() {
        use formforge_forms::FormStore;

        let site = sample_site().unwrap();
        let record = site
            .store
            .form_template(site.record_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.form_entry_id, site.entry_id);

        let elements = site.store.element_entries(site.entry_id).await.unwrap();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].plugin_uid, "text");
        assert_eq!(elements[3].plugin_uid, "textarea");
    }
}
