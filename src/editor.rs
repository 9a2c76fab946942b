//! The editing layer: checkpoints history before each mutating operation,
//! applies the edit to the local store optimistically, persists it through
//! the session client, and routes failures into the toast queue under the
//! configured sync-failure policy.

use std::rc::Rc;

use thiserror::Error;
use tracing::warn;

use todana_core::{CabinetEntry, NestingRequest, NestingSolution, Project, SheetSpec};

use crate::config::{ClientConfig, SyncFailurePolicy};
use crate::history::History;
use crate::scheduler::Scheduler;
use crate::session::{ClientError, SessionClient};
use crate::store::ProjectStore;
use crate::toast::{Severity, ToastQueue};
use crate::transport::ApiTransport;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no project loaded")]
    NoProject,
    #[error("no cabinet at index {0}")]
    CabinetIndexOutOfRange(usize),
    #[error("no cabinet draft in progress")]
    NoDraft,
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub struct Editor {
    store: Rc<ProjectStore>,
    client: Rc<SessionClient>,
    history: History,
    toasts: ToastQueue,
    policy: SyncFailurePolicy,
}

impl Editor {
    pub fn new(
        transport: Rc<dyn ApiTransport>,
        scheduler: Rc<dyn Scheduler>,
        config: ClientConfig,
    ) -> Self {
        let client = SessionClient::new(transport, &config);
        Self {
            store: Rc::new(ProjectStore::new()),
            client,
            history: History::new(),
            toasts: ToastQueue::new(scheduler),
            policy: config.sync_failure,
        }
    }

    /// Browser wiring: fetch transport, `setTimeout` scheduler, and
    /// localStorage debug overrides.
    #[cfg(target_arch = "wasm32")]
    pub fn new_web() -> Self {
        Self::new(
            Rc::new(crate::fetch::FetchTransport),
            Rc::new(crate::scheduler::TimeoutScheduler),
            crate::config::from_browser(),
        )
    }

    pub fn store(&self) -> &Rc<ProjectStore> {
        &self.store
    }

    pub fn client(&self) -> &Rc<SessionClient> {
        &self.client
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    /// Start a fresh document and push it to the server. The document is
    /// dirty until that first persist confirms.
    pub async fn create_project(&self, name: &str) -> Result<(), EditError> {
        let mut project = Project::new(name);
        project.refresh_derived();
        self.store.load(project);
        self.persist_project().await
    }

    pub async fn add_cabinet(&self, entry: CabinetEntry) -> Result<(), EditError> {
        self.require_project()?;
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| project.cabinets.push(entry));
        self.persist_project().await
    }

    pub async fn remove_cabinet(&self, index: usize) -> Result<(), EditError> {
        let project = self.require_project()?;
        if index >= project.cabinets.len() {
            return Err(EditError::CabinetIndexOutOfRange(index));
        }
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| {
            project.cabinets.remove(index);
        });
        self.persist_project().await
    }

    /// Replace one cabinet's parameters; persists only that entry.
    pub async fn update_cabinet(&self, index: usize, entry: CabinetEntry) -> Result<(), EditError> {
        let project = self.require_project()?;
        if index >= project.cabinets.len() {
            return Err(EditError::CabinetIndexOutOfRange(index));
        }
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| project.cabinets[index] = entry.clone());
        let revision = self.current_revision();

        match self.client.update_cabinet(index, &entry).await {
            Ok(()) => {
                self.store.mark_persisted(revision);
                Ok(())
            }
            Err(err) => self.handle_sync_failure(err),
        }
    }

    /// Begin editing a new cabinet. The draft stays local until committed.
    pub fn begin_cabinet(&self, entry: CabinetEntry) -> Result<(), EditError> {
        self.require_project()?;
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| project.in_progress = Some(entry));
        Ok(())
    }

    pub fn update_draft(&self, entry: CabinetEntry) -> Result<(), EditError> {
        let project = self.require_project()?;
        if project.in_progress.is_none() {
            return Err(EditError::NoDraft);
        }
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| project.in_progress = Some(entry));
        Ok(())
    }

    pub fn discard_draft(&self) -> Result<(), EditError> {
        let project = self.require_project()?;
        if project.in_progress.is_none() {
            return Err(EditError::NoDraft);
        }
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| project.in_progress = None);
        Ok(())
    }

    /// Move the draft into the cabinet sequence and persist the document.
    pub async fn commit_draft(&self) -> Result<(), EditError> {
        let project = self.require_project()?;
        if project.in_progress.is_none() {
            return Err(EditError::NoDraft);
        }
        self.history.push_snapshot(&self.store);
        self.store.mutate(|project| {
            if let Some(entry) = project.in_progress.take() {
                project.cabinets.push(entry);
            }
        });
        self.persist_project().await
    }

    /// Restore the previous checkpoint and re-sync the whole document.
    /// A failed re-sync only surfaces a toast: the local restore stands so
    /// history stays consistent with what the user sees.
    pub async fn undo(&self) -> Result<bool, EditError> {
        if !self.history.undo(&self.store) {
            return Ok(false);
        }
        self.resync_after_restore().await?;
        Ok(true)
    }

    pub async fn redo(&self) -> Result<bool, EditError> {
        if !self.history.redo(&self.store) {
            return Ok(false);
        }
        self.resync_after_restore().await?;
        Ok(true)
    }

    pub async fn request_nesting(&self, sheet: SheetSpec) -> Result<NestingSolution, EditError> {
        let project = self.require_project()?;
        let request = NestingRequest {
            sheet,
            rows: project.cut_rows.clone(),
        };
        match self.client.request_nesting(&request).await {
            Ok(solution) => {
                self.store.set_nesting(solution.clone());
                Ok(solution)
            }
            Err(err) => {
                self.toasts.show(err.to_string(), Severity::Error);
                Err(err.into())
            }
        }
    }

    fn require_project(&self) -> Result<Project, EditError> {
        self.store.current().ok_or(EditError::NoProject)
    }

    fn current_revision(&self) -> u64 {
        self.store
            .current()
            .map(|project| project.revision)
            .unwrap_or_default()
    }

    async fn persist_project(&self) -> Result<(), EditError> {
        let Some(project) = self.store.current() else {
            return Ok(());
        };
        let revision = project.revision;
        match self.client.update_project(&project).await {
            Ok(()) => {
                self.store.mark_persisted(revision);
                Ok(())
            }
            Err(err) => self.handle_sync_failure(err),
        }
    }

    async fn resync_after_restore(&self) -> Result<(), EditError> {
        let Some(project) = self.store.current() else {
            return Ok(());
        };
        let revision = project.revision;
        match self.client.update_project(&project).await {
            Ok(()) => {
                self.store.mark_persisted(revision);
                Ok(())
            }
            Err(err) => {
                warn!("re-sync after restore failed: {err}");
                self.toasts.show(err.to_string(), Severity::Error);
                Err(err.into())
            }
        }
    }

    fn handle_sync_failure(&self, err: ClientError) -> Result<(), EditError> {
        warn!("persist failed: {err}");
        self.toasts.show(err.to_string(), Severity::Error);
        if self.policy == SyncFailurePolicy::Rollback {
            self.history.revert_last(&self.store);
        }
        Err(err.into())
    }
}
