/// Record type definitions for the portfolio content
///
/// Field names on the wire follow the backend: Mongo-style `_id` and camelCase keys.

use crate::records::entity::{
    Creatable, Deletable, Entity, EntityMessages, FieldDescriptor, InputType,
};
use serde::{Deserialize, Serialize};

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub category: String,
    /// URL slug, generated by the backend and never edited here
    #[serde(default)]
    pub slug: String,
    /// Rich-text body (HTML)
    pub description: String,
    pub image: String,
}

/// A blog category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub image: String,
}

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub company: String,
    pub project_name: String,
    /// Free-form time span, e.g. "1 Year"
    pub time: String,
    pub area: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub goals: Vec<String>,
    pub scope: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<String>,
    pub image: String,
}

const BLOG_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("title", "Title"),
    FieldDescriptor::text("category", "Category"),
    FieldDescriptor::editor("description", "Description"),
];

const CATEGORY_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::text("name", "Name")];

const PROJECT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("company", "Company"),
    FieldDescriptor::text("projectName", "Project Name"),
    FieldDescriptor::text("time", "Time"),
    FieldDescriptor::text("area", "Area"),
    FieldDescriptor::list("tags", "Tags", InputType::Text),
    FieldDescriptor::text("description", "Description"),
    FieldDescriptor::list("goals", "Goals", InputType::Textarea),
    FieldDescriptor::text("scope", "Scope"),
    FieldDescriptor::list("requirements", "Requirements", InputType::Textarea),
    FieldDescriptor::list("tasks", "Tasks", InputType::Text),
];

impl Entity for Blog {
    const RESOURCE: &'static str = "blog";
    const UPLOAD_FOLDER: &'static str = "blogs";
    const MESSAGES: EntityMessages = EntityMessages {
        created: "Blog Eklendi",
        create_failed: "Blog Eklenemedi",
        updated: "Blog Güncellendi",
        update_failed: "Blog Güncellenemedi",
        deleted: "Blog silindi",
        delete_failed: "Blog Silinemedi",
    };

    fn fields() -> &'static [FieldDescriptor] {
        BLOG_FIELDS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Entity for Category {
    const RESOURCE: &'static str = "categories";
    const UPLOAD_FOLDER: &'static str = "categories";
    const MESSAGES: EntityMessages = EntityMessages {
        created: "Kategori Eklendi",
        create_failed: "Kategori Eklenemedi",
        updated: "Kategori Güncellendi",
        update_failed: "Kategori Güncellenemedi",
        deleted: "Kategori silindi",
        delete_failed: "Kategori Silinemedi",
    };

    fn fields() -> &'static [FieldDescriptor] {
        CATEGORY_FIELDS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn title(&self) -> &str {
        &self.name
    }
}

impl Entity for Project {
    const RESOURCE: &'static str = "projects";
    const UPLOAD_FOLDER: &'static str = "projects";
    const MESSAGES: EntityMessages = EntityMessages {
        created: "Proje Eklendi",
        create_failed: "Proje Eklenemedi",
        updated: "Proje Güncellendi",
        update_failed: "Proje Güncellenemedi",
        deleted: "Proje silindi",
        delete_failed: "Proje Silinemedi",
    };

    fn fields() -> &'static [FieldDescriptor] {
        PROJECT_FIELDS
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn title(&self) -> &str {
        &self.company
    }
}

impl Creatable for Project {}

impl Deletable for Project {}
