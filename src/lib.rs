/// folio-admin: content-management core for a personal portfolio
///
/// This library provides the admin workflow for blog posts, categories and projects:
/// a typed gateway to the REST backend, generic schema-validated edit forms with image
/// upload, and the HTTP service wiring them together.

// Core configuration and setup
pub mod config;

// Record kinds, field descriptors and client-side validation
pub mod records;

// API gateway client - tagged outcomes and post-mutation revalidation
pub mod gateway;

// Admin listing cache invalidated by the gateway
pub mod cache;

// Editor-facing success/error notifications
pub mod notify;

// Image upload to object storage
pub mod upload;

// Generic entity edit forms, delete dialogs and the per-record registry
pub mod form;

// HTTP API layer - admin reads and form actions
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use form::{EntityForm, FormContext, SubmitOutcome};
pub use gateway::{ApiGateway, ApiRequest, Method, Outcome};
pub use records::{Blog, Category, Entity, Project};
pub use server::start_server;
