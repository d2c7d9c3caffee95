//! The pairing of a response template with a stored form.

use serde::{Deserialize, Serialize};

use formforge_core::{ForgeError, ForgeResult};

use crate::assembly::assemble_form;
use crate::form::BaseForm;
use crate::store::FormStore;

/// A response template paired with the form entry whose submissions it
/// renders.
///
/// The template text is kept verbatim; rendering happens in the view layer
/// once a submission validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub id: i64,
    /// Template source rendered after a successful submission.
    pub template: String,
    pub form_entry_id: i64,
}

impl FormTemplate {
    /// Assemble the runtime form for this pairing from its stored elements.
    ///
    /// # Errors
    ///
    /// Fails with [`ForgeError::DoesNotExist`] when the referenced form
    /// entry is gone, and propagates element assembly failures.
    pub async fn build_form(&self, store: &dyn FormStore) -> ForgeResult<BaseForm> {
        let entry = store.form_entry(self.form_entry_id).await?.ok_or_else(|| {
            ForgeError::DoesNotExist(format!(
                "form entry {} referenced by form template {}",
                self.form_entry_id, self.id
            ))
        })?;
        let elements = store.element_entries(entry.id).await?;
        assemble_form(&entry, &elements)
    }
}
