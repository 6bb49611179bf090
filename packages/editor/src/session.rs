//! # Edit Session Management
//!
//! An EditSession owns the page being edited together with everything the
//! editor tracks around it: undo history, selection, hover, clipboard,
//! preview viewport, and whether there are unsaved changes.
//!
//! Every change goes through [`EditSession::apply`], which records history
//! only when the page actually changed. Selection and hover are pruned after
//! every change so they never point at a block that is gone; the clipboard
//! holds copied block data rather than an id.

use std::sync::Arc;

use crate::block::{Block, BlockId, BlockPatch, BlockSeed, Viewport};
use crate::document::Page;
use crate::drag::{resolve_drop, resolve_key, DragGesture, DropAction, KeyMove};
use crate::mutations::{Mutation, MutationError, MutationResult};
use crate::registry::BlockRegistry;
use crate::render::BlockAction;
use crate::undo_stack::{PageSnapshot, UndoStack, DEFAULT_MAX_LEVELS};
use crate::EditorError;

/// Single-writer editing session for one page
pub struct EditSession {
    page: Page,
    registry: Arc<BlockRegistry>,
    history: UndoStack,

    selected: Option<BlockId>,
    hovered: Option<BlockId>,
    clipboard: Option<BlockSeed>,
    viewport: Viewport,

    /// Bumped on every change to the page (including undo/redo)
    version: u64,
    saved_version: u64,
}

impl EditSession {
    /// Create new edit session with the default history depth
    pub fn new(page: Page, registry: Arc<BlockRegistry>) -> Self {
        Self::with_history_depth(page, registry, DEFAULT_MAX_LEVELS)
    }

    pub fn with_history_depth(page: Page, registry: Arc<BlockRegistry>, depth: usize) -> Self {
        Self {
            page,
            registry,
            history: UndoStack::with_max_levels(depth),
            selected: None,
            hovered: None,
            clipboard: None,
            viewport: Viewport::default(),
            version: 0,
            saved_version: 0,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Unsaved changes exist
    pub fn is_dirty(&self) -> bool {
        self.version != self.saved_version
    }

    /// The page as of `version` has been persisted. A save of an older
    /// version leaves the session dirty.
    pub fn mark_saved(&mut self, version: u64) {
        if version <= self.version {
            self.saved_version = version;
        }
    }

    /// Swap in a freshly loaded page, dropping history and UI state
    pub fn reset(&mut self, page: Page) {
        self.page = page;
        self.history.clear();
        self.selected = None;
        self.hovered = None;
        self.version += 1;
        self.saved_version = self.version;
    }

    // Selection / hover / viewport

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: Option<BlockId>) -> Result<(), EditorError> {
        if let Some(id) = &id {
            if !self.page.contains(id) {
                return Err(MutationError::BlockNotFound(id.clone()).into());
            }
        }
        self.selected = id;
        Ok(())
    }

    pub fn hovered(&self) -> Option<&BlockId> {
        self.hovered.as_ref()
    }

    /// Hovering something that is not on the page clears the hover
    pub fn hover(&mut self, id: Option<BlockId>) {
        self.hovered = id.filter(|id| self.page.contains(id));
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Blocks shown in the current preview viewport
    pub fn visible_blocks(&self) -> Vec<&Block> {
        self.page.visible_blocks(self.viewport)
    }

    // Mutations

    /// Apply a mutation, recording history when the page changed.
    /// A block the mutation created becomes the selection.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let applied = mutation.apply(&self.page, &self.registry)?;
        let changed = self.commit(applied.page, applied.created.clone(), mutation.name());

        Ok(MutationResult {
            version: self.version,
            created: applied.created,
            changed,
        })
    }

    /// Replace the page with `next`, recording one history step when it
    /// differs. Returns whether the page changed.
    fn commit(&mut self, next: Page, created: Option<BlockId>, description: &str) -> bool {
        let changed = next != self.page;

        if changed {
            self.history.record(PageSnapshot::of(&self.page), Some(description));
            self.page = next;
            self.version += 1;
        } else {
            tracing::debug!("{} left page {} unchanged", description, self.page.id);
        }

        if let Some(created) = created {
            self.selected = Some(created);
        }
        self.prune();
        changed
    }

    pub fn add_block(&mut self, block_type: &str, after: Option<&BlockId>) -> Result<BlockId, EditorError> {
        self.apply_creating(Mutation::AddBlock {
            block_type: block_type.to_string(),
            after: after.cloned(),
        })
    }

    pub fn add_block_at(&mut self, block_type: &str, index: usize) -> Result<BlockId, EditorError> {
        self.apply_creating(Mutation::AddBlockAt {
            block_type: block_type.to_string(),
            index,
        })
    }

    pub fn update_block(&mut self, id: &BlockId, patch: BlockPatch) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateBlock {
            block_id: id.clone(),
            patch,
        })
    }

    pub fn delete_block(&mut self, id: &BlockId) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::DeleteBlock { block_id: id.clone() })
    }

    pub fn move_block(&mut self, id: &BlockId, to_index: usize) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::MoveBlock {
            block_id: id.clone(),
            to_index,
        })
    }

    pub fn duplicate_block(&mut self, id: &BlockId) -> Result<BlockId, EditorError> {
        self.apply_creating(Mutation::DuplicateBlock { block_id: id.clone() })
    }

    pub fn reorder_blocks(&mut self, order: Vec<BlockId>) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::ReorderBlocks { order })
    }

    pub fn set_meta(&mut self, title: Option<&str>, slug: Option<&str>) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::SetPageMeta {
            title: title.map(str::to_string),
            slug: slug.map(str::to_string),
        })
    }

    fn apply_creating(&mut self, mutation: Mutation) -> Result<BlockId, EditorError> {
        let name = mutation.name();
        self.apply(mutation)?
            .created
            .ok_or(EditorError::NothingCreated(name))
    }

    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the page as it was before the last change. Returns false
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(PageSnapshot::of(&self.page)) {
            Some(previous) => {
                self.page = previous.restore_onto(&self.page);
                self.after_history_step();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(PageSnapshot::of(&self.page)) {
            Some(next) => {
                self.page = next.restore_onto(&self.page);
                self.after_history_step();
                true
            }
            None => false,
        }
    }

    /// Group the following changes into one undo step. Inside an open batch
    /// this nests, and the outer description is kept.
    pub fn begin_batch(&mut self, description: impl Into<String>) {
        self.history.begin_batch();
        self.history.describe_batch(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    fn after_history_step(&mut self) {
        self.version += 1;
        self.prune();
    }

    // Gestures

    /// Carry out a finished drag gesture. A no-op drop returns `None` and
    /// leaves history alone.
    pub fn drop(&mut self, gesture: &DragGesture) -> Result<Option<MutationResult>, EditorError> {
        let action = resolve_drop(&self.page, gesture)?;
        self.apply_drop(action)
    }

    pub fn key_move(&mut self, id: &BlockId, key: KeyMove) -> Result<Option<MutationResult>, EditorError> {
        let action = resolve_key(&self.page, id, key)?;
        self.apply_drop(action)
    }

    fn apply_drop(&mut self, action: DropAction) -> Result<Option<MutationResult>, EditorError> {
        match action.into_mutation() {
            Some(mutation) => self.apply(mutation).map(Some),
            None => Ok(None),
        }
    }

    /// Turn actions recorded by a block renderer into mutations.
    ///
    /// The actions are applied in order to a scratch copy of the page and
    /// committed as a single undo step. If any of them fails, the page,
    /// history and version are left as they were.
    pub fn dispatch(&mut self, block_id: &BlockId, actions: Vec<BlockAction>) -> Result<Vec<MutationResult>, EditorError> {
        let description = match actions.as_slice() {
            [single] => single.clone().into_mutation(block_id).name().to_string(),
            _ => format!("Edit {}", block_id),
        };

        let mut scratch = self.page.clone();
        let mut steps = Vec::with_capacity(actions.len());
        let mut last_created = None;
        for action in actions {
            let mutation = action.into_mutation(block_id);
            let applied = mutation.apply(&scratch, &self.registry).map_err(|err| {
                tracing::debug!("{} on {} rejected, dispatch discarded: {}", mutation.name(), block_id, err);
                err
            })?;
            steps.push((applied.created.clone(), applied.page != scratch));
            if applied.created.is_some() {
                last_created = applied.created;
            }
            scratch = applied.page;
        }

        self.commit(scratch, last_created, &description);

        Ok(steps
            .into_iter()
            .map(|(created, changed)| MutationResult {
                version: self.version,
                created,
                changed,
            })
            .collect())
    }

    // Clipboard

    pub fn clipboard(&self) -> Option<&BlockSeed> {
        self.clipboard.as_ref()
    }

    /// Copy a block's data (not its id) to the clipboard
    pub fn copy_block(&mut self, id: &BlockId) -> Result<(), EditorError> {
        let block = self
            .page
            .get(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
        self.clipboard = Some(block.to_seed());
        Ok(())
    }

    /// Paste the clipboard under a fresh id: after `after`, else after the
    /// selection, else at the end
    pub fn paste_block(&mut self, after: Option<&BlockId>) -> Result<BlockId, EditorError> {
        let seed = self.clipboard.clone().ok_or(EditorError::EmptyClipboard)?;
        let after = after.or(self.selected.as_ref()).cloned();
        self.apply_creating(Mutation::InsertBlock { seed, after })
    }

    /// Forget selection/hover ids that are no longer on the page
    fn prune(&mut self) {
        let page = &self.page;
        if self.selected.as_ref().is_some_and(|id| !page.contains(id)) {
            self.selected = None;
        }
        if self.hovered.as_ref().is_some_and(|id| !page.contains(id)) {
            self.hovered = None;
        }
    }
}
