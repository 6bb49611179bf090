//! # Pagecraft Store
//!
//! Persistence for pages edited with `pagecraft-editor`.
//!
//! - [`StoreBackend`]: raw versioned JSON storage (in memory or one file per page)
//! - [`PersistenceGateway`]: validation, legacy draft-config conversion, save acks
//! - [`SyncedSession`]: an edit session with async load/save and an [`IoStatus`]
//!
//! ```rust,ignore
//! let gateway = Arc::new(PersistenceGateway::new(
//!     Arc::new(FileBackend::new("pages")),
//!     Arc::new(BlockRegistry::with_builtins()),
//! ));
//!
//! let mut synced = SyncedSession::open(gateway, PageId::from("home")).await?;
//! synced.session_mut().add_block("text", None)?;
//! synced.save().await?;
//! ```

mod backend;
mod draft;
mod error;
mod gateway;
mod sync;
mod validate;

pub use backend::{FileBackend, MemoryBackend, StoreBackend, StoredDocument};
pub use draft::{DraftConfig, DraftSections, DraftTheme, DRAFT_PAGE_SLUG};
pub use error::{StoreError, StoreResult, ValidationError, ValidationIssue};
pub use gateway::{LoadedPage, PersistenceGateway, SaveAck};
pub use sync::{IoStatus, SyncedSession};
pub use validate::{page_from_value, DocumentFormat};
