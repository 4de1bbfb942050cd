/// Entity edit forms
///
/// The generic edit workflow shared by every record kind:
/// - `fields`: record <-> form text <-> payload conversions
/// - `entity_form`: validation, image upload and submission state machine
/// - `delete`: confirmation-gated deletion
/// - `registry`: one form instance per record for the admin service

pub mod delete;
pub mod entity_form;
pub mod fields;
pub mod registry;

pub use delete::{DeleteDialog, DeleteOutcome};
pub use entity_form::{EntityForm, FormContext, FormError, ImagePreview, SubmitOutcome};
pub use fields::split_list;
pub use registry::FormRegistry;
