/// Admin action REST endpoints
///
/// Exposes the admin pages' data reads (served from the listing cache) and the form
/// actions: field submission, image selection, project creation and deletion.

use crate::{
    cache::ListingCache,
    form::{DeleteOutcome, EntityForm, FormRegistry, SubmitOutcome},
    gateway::{admin_path, ApiGateway, Outcome},
    notify::{NotificationLog, NO_FILE_SELECTED},
    records::{Blog, Category, Entity, FieldValues, Project},
    upload::ImageFile,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Gateway to the backend REST API
    pub gateway: ApiGateway,
    /// Cached admin page data, revalidated by the gateway after mutations
    pub cache: Arc<ListingCache>,
    /// Notifications raised by forms, drained by the admin UI
    pub notifications: Arc<NotificationLog>,
    pub blogs: Arc<FormRegistry<Blog>>,
    pub categories: Arc<FormRegistry<Category>>,
    pub projects: Arc<FormRegistry<Project>>,
}

/// Record kinds with admin routes, mapped to their form registry
pub trait AdminResource: Entity {
    fn registry(state: &AppState) -> &FormRegistry<Self>;
}

impl AdminResource for Blog {
    fn registry(state: &AppState) -> &FormRegistry<Self> {
        &state.blogs
    }
}

impl AdminResource for Category {
    fn registry(state: &AppState) -> &FormRegistry<Self> {
        &state.categories
    }
}

impl AdminResource for Project {
    fn registry(state: &AppState) -> &FormRegistry<Self> {
        &state.projects
    }
}

/// Request body for form submissions
#[derive(Debug, Default, Deserialize)]
pub struct FormSubmission {
    /// Raw field text keyed by field name; `"image"` sets the image URL
    #[serde(default)]
    pub fields: FieldValues,
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub filename: Option<String>,
}

/// Create admin routes
///
/// Blog posts and categories are editable; projects can also be created and deleted.
pub fn create_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/notifications", get(drain_notifications))
        .merge(record_routes::<Blog>())
        .merge(record_routes::<Category>())
        .merge(
            record_routes::<Project>()
                .route("/admin/projects", post(create_project))
                .route("/admin/projects/{id}", delete(delete_project))
                .route("/admin/projects/new/image", post(select_draft_image)),
        )
}

fn record_routes<E: AdminResource>() -> Router<AppState> {
    let collection = format!("/admin/{}", E::RESOURCE);
    Router::new()
        .route(&collection, get(read_collection::<E>))
        .route(&format!("{}/{{id}}", collection), get(read_record::<E>))
        .route(&format!("{}/{{id}}", collection), patch(update_record::<E>))
        .route(&format!("{}/{{id}}/image", collection), post(select_image::<E>))
}

/// GET /admin/{resource}
async fn read_collection<E: AdminResource>(State(state): State<AppState>) -> Response {
    read_cached(&state, E::RESOURCE).await
}

/// GET /admin/{resource}/{id}
async fn read_record<E: AdminResource>(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Err(rejected) = check_id(&id) {
        return rejected;
    }
    read_cached(&state, &E::item_path(&id)).await
}

async fn read_cached(state: &AppState, resource_path: &str) -> Response {
    let key = admin_path(resource_path);
    if let Some(hit) = state.cache.get(&key) {
        tracing::debug!("Cache hit for {} (fetched {})", key, hit.fetched_at);
        return Json(hit.data).into_response();
    }

    let epoch = state.cache.epoch();
    match state.gateway.get(resource_path).await {
        Outcome::Ok { data } => {
            state.cache.store_if_current(&key, data.clone(), epoch);
            Json(data).into_response()
        }
        error => outcome_response(error),
    }
}

/// PATCH /admin/{resource}/{id}
/// Body: { "fields": { "title": "...", "image": "https://..." } }
async fn update_record<E: AdminResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FormSubmission>,
) -> Response {
    if let Err(rejected) = check_id(&id) {
        return rejected;
    }
    match E::registry(&state).edit_form(&id).await {
        Ok(form) => fill_and_submit(&form, body).await,
        Err(outcome) => outcome_response(outcome),
    }
}

/// POST /admin/projects
async fn create_project(State(state): State<AppState>, Json(body): Json<FormSubmission>) -> Response {
    let form = state.projects.create_form().await;
    fill_and_submit(&form, body).await
}

async fn fill_and_submit<E: Entity>(form: &EntityForm<E>, body: FormSubmission) -> Response {
    match form.submit_with(body.fields).await {
        Ok(outcome) => submit_response(outcome),
        Err(e) => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": e.to_string() }))).into_response(),
    }
}

/// POST /admin/{resource}/{id}/image?filename=cover.png
/// Body: raw image bytes
async fn select_image<E: AdminResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ImageQuery>,
    body: Bytes,
) -> Response {
    if let Err(rejected) = check_id(&id) {
        return rejected;
    }
    match E::registry(&state).edit_form(&id).await {
        Ok(form) => start_upload(&form, query, body),
        Err(outcome) => outcome_response(outcome),
    }
}

/// POST /admin/projects/new/image?filename=cover.png
async fn select_draft_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
    body: Bytes,
) -> Response {
    let form = state.projects.create_form().await;
    start_upload(&form, query, body)
}

fn start_upload<E: Entity>(form: &EntityForm<E>, query: ImageQuery, body: Bytes) -> Response {
    let file = (!body.is_empty()).then(|| {
        ImageFile::new(query.filename.unwrap_or_else(|| "image".to_string()), body.to_vec())
    });
    match form.select_image(file) {
        Some(preview) => (StatusCode::ACCEPTED, Json(preview)).into_response(),
        None => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": NO_FILE_SELECTED }))).into_response(),
    }
}

/// DELETE /admin/projects/{id}
async fn delete_project(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if let Err(rejected) = check_id(&id) {
        return rejected;
    }
    let dialog = state.projects.delete_dialog(&id).await;
    let outcome = dialog.confirm().await;
    let status = match &outcome {
        DeleteOutcome::Deleted => {
            state.projects.forget(&id).await;
            StatusCode::OK
        }
        DeleteOutcome::Failed { status, .. } => upstream_status(*status),
        DeleteOutcome::Busy | DeleteOutcome::Closed => StatusCode::CONFLICT,
    };
    (status, Json(outcome)).into_response()
}

/// GET /admin/notifications
async fn drain_notifications(State(state): State<AppState>) -> Response {
    Json(state.notifications.drain()).into_response()
}

/// Record ids are single path segments; anything that could walk the backend path is refused
fn check_id(id: &str) -> Result<(), Response> {
    let valid = !id.trim().is_empty() && !id.contains(['/', '\\']) && !id.contains("..");
    if valid {
        Ok(())
    } else {
        tracing::warn!("Rejected record id {:?}", id);
        Err((StatusCode::BAD_REQUEST, Json(json!({ "error": format!("invalid record id '{}'", id) }))).into_response())
    }
}

fn submit_response(outcome: SubmitOutcome) -> Response {
    let status = match &outcome {
        SubmitOutcome::Saved { .. } => StatusCode::OK,
        SubmitOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitOutcome::Failed { status, .. } => upstream_status(*status),
        SubmitOutcome::Busy => StatusCode::CONFLICT,
    };
    (status, Json(outcome)).into_response()
}

fn outcome_response(outcome: Outcome) -> Response {
    let status = outcome.status().map(upstream_status).unwrap_or(StatusCode::OK);
    (status, Json(outcome)).into_response()
}

fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
