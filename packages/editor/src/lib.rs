//! # Pagecraft Editor
//!
//! Core block-document editing engine for Pagecraft.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: type tag → defaults + validation  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Page model + mutations              │
//! │  - Pure operations: &Page → Page            │
//! │  - Snapshot undo/redo                       │
//! │  - Drag/keyboard gestures → mutations       │
//! │  - Templates → fresh pages                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ render: type tag → renderer, actions back   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Blocks are opaque to the model**: content and settings are plain maps;
//!    only the registry and renderers know what they mean
//! 2. **Pages are values**: every operation returns a new page and shares the
//!    blocks it did not touch
//! 3. **Unknown types survive**: a block whose type is not registered is kept
//!    verbatim and rendered as a placeholder
//! 4. **Single writer**: one session owns one page
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pagecraft_editor::{BlockRegistry, EditSession, Page, PageId};
//!
//! let registry = Arc::new(BlockRegistry::with_builtins());
//! let mut session = EditSession::new(Page::new(PageId::from("home"), "Home", "home"), registry);
//!
//! let hero = session.add_block("hero", None)?;
//! let text = session.add_block("text", Some(&hero))?;
//! session.move_block(&text, 0)?;
//!
//! session.undo();
//! ```

mod block;
mod builtin;
mod document;
mod drag;
mod errors;
mod mutations;
mod registry;
mod render;
mod session;
mod templates;
mod undo_stack;

pub use block::{merge_shallow, Block, BlockId, BlockPatch, BlockSeed, DataMap, Viewport, ViewportVisibility};
pub use builtin::{
    builtin_definitions, default_layout, BlockData, FormContent, FormField, GalleryContent, GalleryImage, HeroContent,
    ImageContent, TextContent,
};
pub use document::{Page, PageId};
pub use drag::{
    resolve_drop, resolve_key, DragController, DragGesture, DragSource, DropAction, DropTarget, InsertPosition, KeyMove,
    Placement,
};
pub use errors::EditorError;
pub use mutations::{Applied, Mutation, MutationError, MutationResult};
pub use registry::{BlockCategory, BlockRegistry, BlockTypeDefinition, RegistryError};
pub use render::{
    BlockAction, BlockCallbacks, BlockRenderer, RenderContext, RenderedBlock, RendererDispatch, UnrecognizedBlock,
};
pub use session::EditSession;
pub use templates::{builtin_templates, Template, TemplateCatalog, TemplateError, TemplateSource};
pub use undo_stack::{HistoryEntry, PageSnapshot, UndoStack, DEFAULT_MAX_LEVELS};
