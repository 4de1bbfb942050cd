/// HTTP API Layer
///
/// This module provides the REST endpoints of the admin service. It handles:
/// - Cached reads of admin page data
/// - Form submissions for blog posts, categories and projects
/// - Image selection and project deletion

// Admin read and form action endpoints
pub mod admin;

// Re-export router builder and shared state
pub use admin::{create_admin_routes, AppState};
