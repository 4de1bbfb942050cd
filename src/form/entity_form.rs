/// Generic entity edit form
///
/// One instance edits one record (or drafts one new record). It owns the raw field text,
/// the stored image URL and at most one in-flight image upload, and submits through the
/// API gateway. A loading flag refuses overlapping submissions.

use crate::form::fields::{apply_payload, assemble_payload, populate};
use crate::gateway::outcome::DEFAULT_ERROR_STATUS;
use crate::gateway::{ApiGateway, ApiRequest, Outcome};
use crate::notify::{Notifier, IMAGE_UPLOAD_FAILED, NO_FILE_SELECTED};
use crate::records::schema::{self, ValidationErrors, IMAGE_FIELD};
use crate::records::{Creatable, Entity, FieldValues};
use crate::upload::{ImageFile, ImageUploader, UploadError, UploadRequest};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::task::JoinHandle;

/// Shared collaborators every form is built with
#[derive(Clone)]
pub struct FormContext {
    pub gateway: ApiGateway,
    pub uploader: Arc<dyn ImageUploader>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

/// Local handle shown while the real upload runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePreview {
    /// `blob:<uuid>` handle for the locally held file
    pub url: String,
    pub filename: String,
}

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum SubmitOutcome {
    /// Backend accepted the change; the form has been reset
    Saved { data: Value },
    /// Schema validation failed; nothing was sent
    Invalid { errors: ValidationErrors },
    /// Backend or transport failure; values are kept for retry
    Failed { message: String, status: u16 },
    /// Another submission from this form is still in flight
    Busy,
}

/// Clears a loading flag when dropped, on every exit path
pub(crate) struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
struct ImageSelection {
    /// Bumped on every selection and reset; stale upload results are discarded
    generation: u64,
    preview: Option<ImagePreview>,
    uploaded_url: Option<String>,
    task: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct FormState<E> {
    /// Record being edited; `None` while drafting a new one
    baseline: Option<E>,
    values: FieldValues,
    /// Persisted or hand-typed image URL
    image_url: Option<String>,
    selection: ImageSelection,
}

impl<E: Entity> FormState<E> {
    fn set_field(&mut self, name: &str, value: String) -> Result<(), FormError> {
        if name == IMAGE_FIELD {
            self.image_url = Some(value);
            return Ok(());
        }
        match E::field(name) {
            Some(field) => {
                self.values.insert(field.name.to_string(), value);
                Ok(())
            }
            None => Err(FormError::UnknownField(name.to_string())),
        }
    }
}

impl<E> FormState<E> {
    fn resolved_image(&self) -> Option<String> {
        self.selection
            .uploaded_url
            .clone()
            .or_else(|| self.image_url.clone())
            .filter(|url| !url.trim().is_empty())
    }

    fn clear_selection(&mut self) {
        if let Some(task) = self.selection.task.take() {
            task.abort();
        }
        self.selection = ImageSelection {
            generation: self.selection.generation + 1,
            ..ImageSelection::default()
        };
    }
}

pub struct EntityForm<E: Entity> {
    ctx: FormContext,
    state: Arc<Mutex<FormState<E>>>,
    loading: AtomicBool,
}

impl<E: Entity> EntityForm<E> {
    /// Form editing an existing record, pre-populated from it
    pub fn edit(record: E, ctx: FormContext) -> Self {
        let state = FormState {
            values: populate(&record),
            image_url: Some(record.image().to_string()),
            baseline: Some(record),
            selection: ImageSelection::default(),
        };
        Self::with_state(state, ctx)
    }

    fn with_state(state: FormState<E>, ctx: FormContext) -> Self {
        Self {
            ctx,
            state: Arc::new(Mutex::new(state)),
            loading: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState<E>> {
        lock_state(&self.state)
    }

    /// Record currently being edited (`None` for a create form)
    pub fn record(&self) -> Option<E> {
        self.lock().baseline.clone()
    }

    pub fn values(&self) -> FieldValues {
        self.lock().values.clone()
    }

    /// Set one field's raw text; `"image"` sets the image URL directly
    pub fn set_field(&self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.lock().set_field(name, value.into())
    }

    /// Image URL a submit would send right now
    pub fn image(&self) -> Option<String> {
        self.lock().resolved_image()
    }

    /// What the editor sees: the local preview if a file is selected, else the stored image
    pub fn preview(&self) -> Option<String> {
        let state = self.lock();
        state
            .selection
            .preview
            .as_ref()
            .map(|p| p.url.clone())
            .or_else(|| state.resolved_image())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn is_uploading(&self) -> bool {
        self.lock()
            .selection
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Hold a picked file for preview and start uploading it in the background
    ///
    /// `None` models an input change without a file. A newer selection supersedes one
    /// still uploading. Upload failures are notified and leave the stored URL in effect.
    pub fn select_image(&self, file: Option<ImageFile>) -> Option<ImagePreview> {
        let Some(file) = file else {
            self.ctx.notifier.error(NO_FILE_SELECTED);
            return None;
        };

        let preview = ImagePreview {
            url: format!("blob:{}", uuid::Uuid::new_v4()),
            filename: file.name.clone(),
        };

        let mut state = self.lock();
        state.clear_selection();
        let generation = state.selection.generation;
        state.selection.preview = Some(preview.clone());

        let request = UploadRequest {
            filename: file.name.clone(),
            destination: E::UPLOAD_FOLDER.to_string(),
            file,
        };
        let uploader = Arc::clone(&self.ctx.uploader);
        let notifier = Arc::clone(&self.ctx.notifier);
        let shared = Arc::clone(&self.state);

        tracing::debug!("🖼️ Uploading {} for {}", request.filename, E::RESOURCE);
        state.selection.task = Some(tokio::spawn(async move {
            let result = uploader.upload(request).await;
            let mut state = lock_state(&shared);
            if state.selection.generation != generation {
                tracing::debug!("Discarding superseded upload result");
                return;
            }
            match result {
                Ok(url) => state.selection.uploaded_url = Some(url),
                Err(e) => {
                    state.selection.preview = None;
                    drop(state);
                    tracing::warn!("Image upload failed: {}", e);
                    notifier.error(&format!("{}{}", IMAGE_UPLOAD_FAILED, e));
                }
            }
        }));

        Some(preview)
    }

    /// Validate, assemble and send the record
    ///
    /// Edit forms `patch <resource>/<id>`, create forms `post <resource>`.
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_loading) = self.begin_submit() else {
            return SubmitOutcome::Busy;
        };
        self.send().await
    }

    /// Apply `fields` and submit, as one step guarded by the loading flag
    ///
    /// While another submission is in flight nothing is applied and `Busy` is returned.
    /// An unknown field name rejects the whole set before any value changes.
    pub async fn submit_with(&self, fields: FieldValues) -> Result<SubmitOutcome, FormError> {
        let Some(_loading) = self.begin_submit() else {
            return Ok(SubmitOutcome::Busy);
        };
        {
            let mut state = self.lock();
            if let Some(unknown) = fields
                .keys()
                .find(|name| name.as_str() != IMAGE_FIELD && E::field(name).is_none())
            {
                return Err(FormError::UnknownField(unknown.clone()));
            }
            for (name, value) in fields {
                state.set_field(&name, value)?;
            }
        }
        Ok(self.send().await)
    }

    fn begin_submit(&self) -> Option<LoadingGuard<'_>> {
        let guard = LoadingGuard::acquire(&self.loading);
        if guard.is_none() {
            tracing::debug!("Submit ignored for {}: already in flight", E::RESOURCE);
        }
        guard
    }

    /// Body of a submission; the caller holds the loading guard
    async fn send(&self) -> SubmitOutcome {
        let pending = self.lock().selection.task.take();
        if let Some(task) = pending {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    let e = UploadError::Aborted(e.to_string());
                    tracing::warn!("Image upload failed: {}", e);
                    self.ctx.notifier.error(&format!("{}{}", IMAGE_UPLOAD_FAILED, e));
                }
            }
        }

        let (baseline, values, image) = {
            let state = self.lock();
            (state.baseline.clone(), state.values.clone(), state.resolved_image())
        };

        if let Err(errors) = schema::validate::<E>(&values, image.as_deref()) {
            tracing::debug!("Validation failed for {}: {}", E::RESOURCE, errors);
            return SubmitOutcome::Invalid { errors };
        }
        let image = image.unwrap_or_default();

        let payload = assemble_payload::<E>(&values, &image);
        let saved = match apply_payload::<E>(baseline.as_ref(), &payload) {
            Ok(record) => record,
            Err(e) => {
                return SubmitOutcome::Invalid {
                    errors: ValidationErrors::single("payload", e.to_string()),
                }
            }
        };

        let messages = E::MESSAGES;
        let (request, done, failed) = match &baseline {
            Some(record) => (
                ApiRequest::patch(E::item_path(record.id()), Value::Object(payload)),
                messages.updated,
                messages.update_failed,
            ),
            None => (
                ApiRequest::post(E::RESOURCE, Value::Object(payload)),
                messages.created,
                messages.create_failed,
            ),
        };

        let outcome = self.ctx.gateway.call(request).await;
        let status = outcome.status();
        let server_message = outcome.error_message();
        match outcome {
            Outcome::Ok { data } => {
                self.ctx.notifier.success(done);
                self.reset(baseline.map(|_| saved));
                SubmitOutcome::Saved { data }
            }
            Outcome::Error { .. } => {
                let message = match server_message.filter(|m| !m.is_empty()) {
                    Some(detail) => format!("{}: {}", failed, detail),
                    None => failed.to_string(),
                };
                self.ctx.notifier.error(&message);
                SubmitOutcome::Failed {
                    message,
                    status: status.unwrap_or(DEFAULT_ERROR_STATUS),
                }
            }
        }
    }

    /// Edit forms adopt the saved record as their new baseline; create forms go blank
    fn reset(&self, saved: Option<E>) {
        let mut state = self.lock();
        state.clear_selection();
        match saved {
            Some(record) => {
                state.values = populate(&record);
                state.image_url = Some(record.image().to_string());
                state.baseline = Some(record);
            }
            None => {
                state.values = FieldValues::new();
                state.image_url = None;
            }
        }
    }
}

impl<E: Creatable> EntityForm<E> {
    /// Blank form drafting a new record
    pub fn create(ctx: FormContext) -> Self {
        let state = FormState {
            baseline: None,
            values: FieldValues::new(),
            image_url: None,
            selection: ImageSelection::default(),
        };
        Self::with_state(state, ctx)
    }
}

fn lock_state<E>(state: &Mutex<FormState<E>>) -> MutexGuard<'_, FormState<E>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
