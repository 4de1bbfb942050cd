/// Confirmation dialog gating record deletion

use crate::form::entity_form::LoadingGuard;
use crate::gateway::{ApiGateway, ApiRequest, Outcome};
use crate::notify::Notifier;
use crate::records::{Deletable, Entity};
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum DeleteOutcome {
    Deleted,
    Failed { message: String, status: u16 },
    /// A delete from this dialog is still in flight
    Busy,
    /// The dialog was dismissed before confirming
    Closed,
}

/// Open dialog asking to delete one record
pub struct DeleteDialog<E: Entity> {
    gateway: ApiGateway,
    notifier: Arc<dyn Notifier>,
    id: String,
    title: String,
    open: AtomicBool,
    deleting: AtomicBool,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Deletable> DeleteDialog<E> {
    pub fn open(id: impl Into<String>, title: impl Into<String>, gateway: ApiGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            id: id.into(),
            title: title.into(),
            open: AtomicBool::new(true),
            deleting: AtomicBool::new(false),
            _kind: PhantomData,
        }
    }

    pub fn for_record(record: &E, gateway: ApiGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self::open(record.id(), record.title(), gateway, notifier)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::Acquire)
    }

    pub fn dismiss(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Send `delete <resource>/<id>`; the dialog closes only on success
    pub async fn confirm(&self) -> DeleteOutcome {
        if !self.is_open() {
            return DeleteOutcome::Closed;
        }
        let Some(_deleting) = LoadingGuard::acquire(&self.deleting) else {
            return DeleteOutcome::Busy;
        };

        let messages = E::MESSAGES;
        let outcome = self.gateway.call(ApiRequest::delete(E::item_path(&self.id))).await;
        match &outcome {
            Outcome::Ok { .. } => {
                self.open.store(false, Ordering::Release);
                self.notifier.success(messages.deleted);
                tracing::info!("🗑️ Deleted {} '{}'", E::RESOURCE, self.title);
                DeleteOutcome::Deleted
            }
            Outcome::Error { status, .. } => {
                let message = match outcome.error_message().filter(|m| !m.is_empty()) {
                    Some(detail) => format!("{}: {}", messages.delete_failed, detail),
                    None => messages.delete_failed.to_string(),
                };
                self.notifier.error(&message);
                DeleteOutcome::Failed {
                    message,
                    status: *status,
                }
            }
        }
    }
}
