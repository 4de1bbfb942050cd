/// Record management module
///
/// Defines the three editable record kinds (blog posts, categories, projects), the static
/// field descriptors the generic form is built from, and client-side schema validation.

pub mod entity;
pub mod schema;
pub mod types;

pub use entity::{Creatable, Deletable, Entity, EntityMessages, FieldDescriptor, FieldKind, FieldValues, InputType};
pub use schema::{validate, ValidationErrors};
pub use types::{Blog, Category, Project};
