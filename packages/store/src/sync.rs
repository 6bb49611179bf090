//! Edit session bound to the store.
//!
//! Document operations stay synchronous on the inner [`EditSession`]; only
//! load and save touch the backend. Progress of the last I/O is tracked in
//! an [`IoStatus`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagecraft_editor::{EditSession, Page, PageId, DEFAULT_MAX_LEVELS};

use crate::error::StoreResult;
use crate::gateway::{PersistenceGateway, SaveAck};
use crate::validate::DocumentFormat;

/// State of the most recent load or save
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IoStatus {
    #[default]
    Idle,
    Pending,
    Saved { version: u64, at: DateTime<Utc> },
    Failed(String),
}

pub struct SyncedSession {
    page_id: PageId,
    session: EditSession,
    gateway: Arc<PersistenceGateway>,
    status: IoStatus,

    /// Store version the session was loaded at or last saved as
    store_version: Option<u64>,
    format: Option<DocumentFormat>,
}

impl SyncedSession {
    /// Load `page_id` and start editing it
    pub async fn open(gateway: Arc<PersistenceGateway>, page_id: PageId) -> StoreResult<Self> {
        Self::open_with_history(gateway, page_id, DEFAULT_MAX_LEVELS).await
    }

    pub async fn open_with_history(
        gateway: Arc<PersistenceGateway>,
        page_id: PageId,
        history_depth: usize,
    ) -> StoreResult<Self> {
        let loaded = gateway.load(&page_id).await?;
        let session = EditSession::with_history_depth(loaded.page, gateway.registry().clone(), history_depth);

        Ok(Self {
            page_id,
            session,
            gateway,
            status: IoStatus::Idle,
            store_version: Some(loaded.version),
            format: Some(loaded.format),
        })
    }

    /// Start editing a page that is not stored yet. It counts as unsaved
    /// until the first save.
    pub fn create(gateway: Arc<PersistenceGateway>, page: Page, history_depth: usize) -> Self {
        let page_id = page.id.clone();
        let session = EditSession::with_history_depth(page, gateway.registry().clone(), history_depth);

        Self {
            page_id,
            session,
            gateway,
            status: IoStatus::Idle,
            store_version: None,
            format: None,
        }
    }

    pub fn page_id(&self) -> &PageId {
        &self.page_id
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    pub fn status(&self) -> &IoStatus {
        &self.status
    }

    pub fn store_version(&self) -> Option<u64> {
        self.store_version
    }

    /// Shape the page was loaded from, `None` for pages created here
    pub fn loaded_format(&self) -> Option<DocumentFormat> {
        self.format
    }

    /// Unsaved changes exist (always true for a page never saved)
    pub fn is_dirty(&self) -> bool {
        self.store_version.is_none() || self.session.is_dirty()
    }

    /// Save the current page. On failure the page is left as it was, the
    /// session stays dirty and the save can simply be retried.
    pub async fn save(&mut self) -> StoreResult<SaveAck> {
        self.status = IoStatus::Pending;
        let version = self.session.version();

        match self.gateway.save(&self.page_id, self.session.page()).await {
            Ok(ack) => {
                self.session.mark_saved(version);
                self.store_version = Some(ack.version);
                self.status = IoStatus::Saved {
                    version: ack.version,
                    at: ack.saved_at,
                };
                Ok(ack)
            }
            Err(e) => {
                self.status = IoStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Save only when there is something to save
    pub async fn save_if_dirty(&mut self) -> StoreResult<Option<SaveAck>> {
        if self.is_dirty() {
            self.save().await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Replace the page with the stored one, dropping local changes and history
    pub async fn reload(&mut self) -> StoreResult<()> {
        self.status = IoStatus::Pending;
        match self.gateway.load(&self.page_id).await {
            Ok(loaded) => {
                self.session.reset(loaded.page);
                self.store_version = Some(loaded.version);
                self.format = Some(loaded.format);
                self.status = IoStatus::Idle;
                Ok(())
            }
            Err(e) => {
                self.status = IoStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }
}
