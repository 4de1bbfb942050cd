/// Per-record form registry
///
/// Keeps one form instance per record so the loading flag holds across concurrent
/// requests. Forms are opened lazily: the first access fetches the record through the
/// gateway, later accesses reuse the cached instance.

use crate::form::delete::DeleteDialog;
use crate::form::entity_form::{EntityForm, FormContext};
use crate::gateway::Outcome;
use crate::records::{Creatable, Deletable, Entity};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

pub struct FormRegistry<E: Entity> {
    ctx: FormContext,
    forms: RwLock<HashMap<String, Arc<EntityForm<E>>>>,
    dialogs: RwLock<HashMap<String, Arc<DeleteDialog<E>>>>,
    draft: OnceCell<Arc<EntityForm<E>>>,
}

impl<E: Entity> FormRegistry<E> {
    pub fn new(ctx: FormContext) -> Self {
        Self {
            ctx,
            forms: RwLock::new(HashMap::new()),
            dialogs: RwLock::new(HashMap::new()),
            draft: OnceCell::new(),
        }
    }

    pub fn context(&self) -> &FormContext {
        &self.ctx
    }

    /// Get or open the edit form for record `id`
    ///
    /// Returns the gateway outcome when the record cannot be fetched.
    pub async fn edit_form(&self, id: &str) -> Result<Arc<EntityForm<E>>, Outcome> {
        // Try read lock first (fast path for open forms)
        {
            let forms = self.forms.read().await;
            if let Some(form) = forms.get(id) {
                return Ok(Arc::clone(form));
            }
        }

        let record: E = self.ctx.gateway.get(E::item_path(id)).await.into_data()?;

        let mut forms = self.forms.write().await;
        // Double-check: another request may have opened it meanwhile
        if let Some(form) = forms.get(id) {
            return Ok(Arc::clone(form));
        }
        let form = Arc::new(EntityForm::edit(record, self.ctx.clone()));
        forms.insert(id.to_string(), Arc::clone(&form));
        tracing::debug!("📝 Opened {} form for {}", E::RESOURCE, id);
        Ok(form)
    }

    /// Number of open edit forms
    pub async fn open_forms(&self) -> usize {
        self.forms.read().await.len()
    }

    /// Drop the form and dialog of a record that no longer exists
    pub async fn forget(&self, id: &str) {
        self.forms.write().await.remove(id);
        self.dialogs.write().await.remove(id);
    }
}

impl<E: Creatable> FormRegistry<E> {
    /// The shared draft form for new records
    pub async fn create_form(&self) -> Arc<EntityForm<E>> {
        let ctx = self.ctx.clone();
        Arc::clone(
            self.draft
                .get_or_init(|| async move { Arc::new(EntityForm::create(ctx)) })
                .await,
        )
    }
}

impl<E: Deletable> FormRegistry<E> {
    /// Get or open the delete dialog for record `id`
    ///
    /// The title comes from an already open edit form when there is one.
    pub async fn delete_dialog(&self, id: &str) -> Arc<DeleteDialog<E>> {
        {
            let dialogs = self.dialogs.read().await;
            if let Some(dialog) = dialogs.get(id).filter(|d| d.is_open()) {
                return Arc::clone(dialog);
            }
        }

        let title = match self.forms.read().await.get(id).and_then(|f| f.record()) {
            Some(record) => record.title().to_string(),
            None => id.to_string(),
        };

        let mut dialogs = self.dialogs.write().await;
        if let Some(dialog) = dialogs.get(id).filter(|d| d.is_open()) {
            return Arc::clone(dialog);
        }
        let dialog = Arc::new(DeleteDialog::open(
            id,
            title,
            self.ctx.gateway.clone(),
            Arc::clone(&self.ctx.notifier),
        ));
        dialogs.insert(id.to_string(), Arc::clone(&dialog));
        dialog
    }
}
