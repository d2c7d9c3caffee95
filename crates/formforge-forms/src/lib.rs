//! # formforge-forms
//!
//! Dynamic form definitions, assembly, and validation. Forms are assembled
//! at runtime from stored [`entry::FormEntry`] and [`entry::FormElementEntry`]
//! records rather than declared in code. A [`form_template::FormTemplate`]
//! pairs such a form with the template rendered after a successful
//! submission.

pub mod assembly;
pub mod bound_field;
pub mod entry;
pub mod fields;
pub mod form;
pub mod form_template;
pub mod store;
pub mod validation;
pub mod widgets;

pub use assembly::{assemble_form, assemble_form_fields};
pub use bound_field::BoundField;
pub use entry::{FormElementEntry, FormEntry};
pub use fields::{clean_field_value, FieldValidator, FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form, NON_FIELD_ERRORS};
pub use form_template::FormTemplate;
pub use store::{FormStore, MemoryStore};
pub use validation::clean_fields;
pub use widgets::{Widget, WidgetType, WidgetValue};
