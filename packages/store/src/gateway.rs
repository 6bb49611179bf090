//! # Persistence Gateway
//!
//! Loads pages from and saves pages to a [`StoreBackend`].
//!
//! ```text
//! load:  backend body ──detect──┬─ page shape ─── validate ──┐
//!                               └─ draft config ─ convert ───┴─> Page
//! save:  Page ──> page shape ──> backend (version + 1)
//! ```
//!
//! Loading fails closed: a body that does not validate yields a
//! [`ValidationError`](crate::ValidationError) listing every issue and no page.
//! Saving always writes the page shape, even for pages that were loaded from
//! a draft config.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagecraft_editor::{BlockRegistry, Page, PageId};

use crate::backend::StoreBackend;
use crate::draft::DraftConfig;
use crate::error::{StoreError, StoreResult, ValidationError};
use crate::validate::{page_from_value, DocumentFormat};

/// A page as loaded from the store
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub page: Page,
    pub version: u64,
    pub saved_at: DateTime<Utc>,

    /// Shape the page was stored in
    pub format: DocumentFormat,
}

/// Acknowledgement of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveAck {
    pub version: u64,
    pub saved_at: DateTime<Utc>,
}

pub struct PersistenceGateway {
    backend: Arc<dyn StoreBackend>,
    registry: Arc<BlockRegistry>,
}

impl PersistenceGateway {
    pub fn new(backend: Arc<dyn StoreBackend>, registry: Arc<BlockRegistry>) -> Self {
        Self { backend, registry }
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn backend(&self) -> &Arc<dyn StoreBackend> {
        &self.backend
    }

    pub async fn load(&self, page_id: &PageId) -> StoreResult<LoadedPage> {
        let stored = self
            .backend
            .read(page_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(page_id.to_string()))?;

        let format = DocumentFormat::detect(&stored.body).ok_or_else(|| {
            let mut errors = ValidationError::new(page_id.as_str());
            errors.push("$", "neither a page (`blocks`) nor a draft config (`sections`)");
            errors
        })?;

        let page = match format {
            DocumentFormat::Page => page_from_value(page_id, &stored.body)?,
            DocumentFormat::DraftConfig => {
                DraftConfig::from_value(page_id, &stored.body)?.to_page(page_id, &self.registry)?
            }
        };

        tracing::info!(
            "Loaded page {} ({} blocks, version {}, {:?})",
            page_id,
            page.len(),
            stored.version,
            format
        );
        Ok(LoadedPage {
            page,
            version: stored.version,
            saved_at: stored.saved_at,
            format,
        })
    }

    /// Save `page` under `page_id`. Safe to retry after a failure.
    pub async fn save(&self, page_id: &PageId, page: &Page) -> StoreResult<SaveAck> {
        let body = serde_json::to_value(page)?;
        match self.backend.write(page_id, body).await {
            Ok(stored) => {
                tracing::info!("Saved page {} (version {})", page_id, stored.version);
                Ok(SaveAck {
                    version: stored.version,
                    saved_at: stored.saved_at,
                })
            }
            Err(e) => {
                tracing::warn!("Failed to save page {}: {}", page_id, e);
                Err(e)
            }
        }
    }

    pub async fn exists(&self, page_id: &PageId) -> StoreResult<bool> {
        Ok(self.backend.read(page_id).await?.is_some())
    }

    pub async fn list(&self) -> StoreResult<Vec<PageId>> {
        self.backend.list().await
    }

    pub async fn remove(&self, page_id: &PageId) -> StoreResult<bool> {
        self.backend.remove(page_id).await
    }
}
