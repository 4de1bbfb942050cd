/// Static description of an editable record type
///
/// Every record kind declares its resource segment, upload folder, field descriptors and
/// notification texts once. The generic form and gateway code is driven entirely by these.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;

/// Raw form values keyed by field name, as typed by the editor
pub type FieldValues = BTreeMap<String, String>;

/// How a field is rendered by the admin UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Textarea,
    /// Rich-text editor producing HTML
    Editor,
}

/// How a field's text is turned into payload JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Submitted as a string
    Text,
    /// Edited as delimited text, submitted as an array of strings
    List,
}

/// Declarative `{name, label, type}` entry driving form rendering and payload assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: InputType,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input_type: InputType::Text,
            kind: FieldKind::Text,
            required: true,
        }
    }

    pub const fn editor(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input_type: InputType::Editor,
            kind: FieldKind::Text,
            required: true,
        }
    }

    pub const fn list(name: &'static str, label: &'static str, input_type: InputType) -> Self {
        Self {
            name,
            label,
            input_type,
            kind: FieldKind::List,
            required: false,
        }
    }
}

/// Notification texts shown to the editor for each outcome
#[derive(Debug, Clone, Copy)]
pub struct EntityMessages {
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

/// A persisted business record the admin can edit
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// REST collection segment, e.g. "projects"
    const RESOURCE: &'static str;
    /// Object storage folder new images for this kind are uploaded into
    const UPLOAD_FOLDER: &'static str;
    const MESSAGES: EntityMessages;

    /// Editable fields in display order (the image is handled separately)
    fn fields() -> &'static [FieldDescriptor];

    fn id(&self) -> &str;

    fn image(&self) -> &str;

    /// Short human label, used as the delete dialog title
    fn title(&self) -> &str;

    /// Resource path of a single record, e.g. "projects/42"
    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::RESOURCE, id)
    }

    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

/// Record kinds the admin may create with `post`
pub trait Creatable: Entity {}

/// Record kinds the admin may remove with `delete`
pub trait Deletable: Entity {}
