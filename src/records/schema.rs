/// Client-side schema validation for form values
///
/// Runs before any upload result is used or any API call is made. Errors are reported
/// per field so the UI can show them inline.

use crate::records::entity::{Entity, FieldKind, FieldValues};
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;

/// Name under which image problems are reported
pub const IMAGE_FIELD: &str = "image";

/// Per-field validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// A single failure not tied to one descriptor
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate raw values and the resolved image against the entity's descriptors
pub fn validate<E: Entity>(values: &FieldValues, image: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field in E::fields() {
        let raw = values.get(field.name).map(|v| v.trim()).unwrap_or("");
        if field.required && raw.is_empty() {
            errors.add(field.name, format!("\"{}\" is required", field.label));
            continue;
        }
        if field.kind == FieldKind::List && field.required && crate::form::split_list(raw).is_empty() {
            errors.add(field.name, format!("\"{}\" must contain at least one item", field.label));
        }
    }

    match image.map(str::trim).filter(|i| !i.is_empty()) {
        None => errors.add(IMAGE_FIELD, "\"Image\" is required"),
        Some(url) => {
            if !is_http_url(url) {
                errors.add(IMAGE_FIELD, "\"Image\" must be a valid http(s) URL");
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Category, Project};

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let errs = validate::<Category>(&values(&[("name", "   ")]), Some("https://x/a.png")).unwrap_err();
        assert_eq!(errs.fields().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn image_must_be_present_and_http() {
        let v = values(&[("name", "Rust")]);
        assert_eq!(validate::<Category>(&v, None).unwrap_err().fields().collect::<Vec<_>>(), vec![IMAGE_FIELD]);
        assert!(validate::<Category>(&v, Some("blob:1234")).is_err());
        assert!(validate::<Category>(&v, Some("ftp://x/a.png")).is_err());
        assert!(validate::<Category>(&v, Some("https://images.unsplash.com/a")).is_ok());
    }

    #[test]
    fn optional_list_fields_may_be_empty() {
        let v = values(&[
            ("company", "Acme"),
            ("projectName", "Citio"),
            ("time", "1 Year"),
            ("area", "Web"),
            ("description", "d"),
            ("scope", "s"),
        ]);
        assert!(validate::<Project>(&v, Some("https://x/old.png")).is_ok());
    }
}
