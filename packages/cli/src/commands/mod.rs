pub mod catalog;
pub mod edit;
pub mod import;
pub mod new;
pub mod show;

pub use catalog::{blocks, templates};
pub use edit::{add, move_block, remove, AddArgs, MoveArgs, RemoveArgs};
pub use import::{import_draft, ImportDraftArgs};
pub use new::{new_page, NewArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use anyhow::{Context, Result};
use pagecraft_common::validate_key;
use pagecraft_editor::{BlockRegistry, PageId};
use pagecraft_store::{FileBackend, PersistenceGateway, SyncedSession};
use std::path::Path;
use std::sync::Arc;

/// Config plus the page store it points at
pub struct Workspace {
    pub config: Config,
    pub gateway: Arc<PersistenceGateway>,
}

impl Workspace {
    pub fn open(cwd: &Path) -> Result<Self> {
        let config = Config::load(cwd).context("Failed to load config")?;
        let backend = FileBackend::new(config.get_store_dir(cwd));
        let gateway = PersistenceGateway::new(Arc::new(backend), Arc::new(BlockRegistry::with_builtins()));

        Ok(Self {
            config,
            gateway: Arc::new(gateway),
        })
    }

    /// Load a stored page for editing
    pub async fn edit(&self, page: &str) -> Result<SyncedSession> {
        let page_id = page_id(page)?;
        SyncedSession::open_with_history(self.gateway.clone(), page_id, self.config.history_depth)
            .await
            .with_context(|| format!("Failed to open page {}", page))
    }
}

/// Page id from user input; must be usable as a file name
pub fn page_id(page: &str) -> Result<PageId> {
    validate_key(page).with_context(|| format!("Invalid page id {:?}", page))?;
    Ok(PageId::from(page))
}
