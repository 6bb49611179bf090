//! # Undo/Redo Stack
//!
//! Tracks page history as snapshots and enables undo/redo.
//!
//! ## Design
//!
//! - Before a change is committed, the pre-change snapshot is recorded
//! - Undo swaps the current page with the newest recorded snapshot
//! - Redo swaps it back
//! - New changes clear the redo stack
//! - Batches group several changes into one undo step
//!
//! Snapshots share blocks with the pages they were taken from, so taking
//! one costs a vector of pointers, not a copy of the page.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! stack.record(PageSnapshot::of(&page), Some("Add hero"));
//! page = next_page;
//!
//! if let Some(previous) = stack.undo(PageSnapshot::of(&page)) {
//!     page = previous.restore_onto(&page);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use crate::block::{Block, BlockId};
use crate::document::Page;

/// Default number of retained undo levels
pub const DEFAULT_MAX_LEVELS: usize = 50;

/// Immutable copy of a page's blocks and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    title: String,
    slug: String,
    blocks: Vec<Arc<Block>>,
}

impl PageSnapshot {
    pub fn of(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
            blocks: page.shared_blocks().to_vec(),
        }
    }

    /// `page` with this snapshot's blocks and metadata
    pub fn restore_onto(&self, page: &Page) -> Page {
        page.restored(&self.title, &self.slug, &self.blocks)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().map(|b| b.as_ref())
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One undo step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// State to return to
    pub snapshot: PageSnapshot,

    /// Optional description of the change this entry reverts
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct OpenBatch {
    before: Option<PageSnapshot>,
    description: Option<String>,

    /// Unmatched `begin_batch` calls; the batch closes when this reaches zero
    depth: usize,
}

/// Undo/redo stack for page editing
#[derive(Debug)]
pub struct UndoStack {
    /// Recorded states (most recent last)
    undo_stack: VecDeque<HistoryEntry>,

    /// Undone states (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (at least 1)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<OpenBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (50)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_MAX_LEVELS)
    }

    /// Create an undo stack with custom max levels. Zero is raised to one.
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels: max_levels.max(1),
            current_batch: None,
        }
    }

    /// Record the state a committed change started from
    pub fn record(&mut self, before: PageSnapshot, description: Option<&str>) {
        if let Some(batch) = &mut self.current_batch {
            // Only the state before the first change of a batch matters
            if batch.before.is_none() {
                batch.before = Some(before);
            }
            if batch.description.is_none() {
                batch.description = description.map(str::to_string);
            }
            return;
        }

        self.push_entry(HistoryEntry {
            snapshot: before,
            description: description.map(str::to_string),
        });
    }

    /// Start a batch of changes (will be undone/redone together).
    /// Batches nest: an inner batch joins the one already open.
    pub fn begin_batch(&mut self) {
        self.current_batch.get_or_insert_with(OpenBatch::default).depth += 1;
    }

    /// End the innermost batch. Closing the outermost one pushes the whole
    /// batch to the undo stack.
    pub fn end_batch(&mut self) {
        let Some(batch) = &mut self.current_batch else {
            return;
        };
        batch.depth = batch.depth.saturating_sub(1);
        if batch.depth == 0 {
            self.close_batch();
        }
    }

    /// Close the open batch regardless of nesting
    fn close_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if let Some(before) = batch.before {
                self.push_entry(HistoryEntry {
                    snapshot: before,
                    description: batch.description,
                });
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    /// Describe the current batch unless it already has a description
    pub fn describe_batch(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description.get_or_insert_with(|| description.into());
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.push_undo(entry);

        // New action invalidates future
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);

        // Trim if exceeded max levels
        while self.undo_stack.len() > self.max_levels {
            self.undo_stack.pop_front();
        }
    }

    /// Step back. `current` is kept for redo; the returned snapshot is the
    /// state to restore. An open batch is closed first, however deeply nested.
    pub fn undo(&mut self, current: PageSnapshot) -> Option<PageSnapshot> {
        self.close_batch();

        let entry = self.undo_stack.pop_back()?;
        self.redo_stack.push(HistoryEntry {
            snapshot: current,
            description: entry.description.clone(),
        });
        Some(entry.snapshot)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: PageSnapshot) -> Option<PageSnapshot> {
        let entry = self.redo_stack.pop()?;
        self.push_undo(HistoryEntry {
            snapshot: current,
            description: entry.description.clone(),
        });
        Some(entry.snapshot)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .back()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageId;
    use crate::registry::BlockRegistry;

    fn page_with(types: &[&str]) -> Page {
        let registry = BlockRegistry::with_builtins();
        let mut page = Page::new(PageId::from("home"), "Home", "home");
        for block_type in types {
            page = page.add_block(&registry, block_type, None).unwrap().0;
        }
        page
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.max_levels(), DEFAULT_MAX_LEVELS);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let before = page_with(&["hero"]);
        let after = page_with(&["hero", "text"]);
        let mut stack = UndoStack::new();

        stack.record(PageSnapshot::of(&before), Some("Add text"));
        assert!(stack.can_undo());
        assert_eq!(stack.undo_description(), Some("Add text"));

        let restored = stack.undo(PageSnapshot::of(&after)).unwrap();
        assert_eq!(restored, PageSnapshot::of(&before));
        assert_eq!(stack.redo_levels(), 1);
        assert_eq!(stack.redo_description(), Some("Add text"));

        let redone = stack.redo(PageSnapshot::of(&before)).unwrap();
        assert_eq!(redone, PageSnapshot::of(&after));
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_empty_stacks_return_none() {
        let page = page_with(&[]);
        let mut stack = UndoStack::new();

        assert!(stack.undo(PageSnapshot::of(&page)).is_none());
        assert!(stack.redo(PageSnapshot::of(&page)).is_none());
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let page = page_with(&["hero"]);
        let mut stack = UndoStack::new();

        stack.record(PageSnapshot::of(&page), None);
        stack.undo(PageSnapshot::of(&page));
        assert_eq!(stack.redo_levels(), 1);

        stack.record(PageSnapshot::of(&page), None);
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_batched_records() {
        let first = page_with(&[]);
        let second = page_with(&["hero"]);
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.set_batch_description("Build header");
        stack.record(PageSnapshot::of(&first), Some("AddBlock"));
        stack.record(PageSnapshot::of(&second), Some("AddBlock"));
        assert_eq!(stack.undo_levels(), 0);
        stack.end_batch();

        // One entry, pointing at the state before the whole batch
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Build header"));
        let restored = stack.undo(PageSnapshot::of(&second)).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_empty_batch_adds_nothing() {
        let mut stack = UndoStack::new();
        stack.begin_batch();
        stack.end_batch();
        assert_eq!(stack.undo_levels(), 0);
    }

    #[test]
    fn test_nested_batches_form_one_step() {
        let empty = page_with(&[]);
        let one = page_with(&["hero"]);
        let two = page_with(&["hero", "text"]);
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.describe_batch("Outer");
        stack.record(PageSnapshot::of(&empty), Some("AddBlock"));

        stack.begin_batch();
        stack.describe_batch("Inner");
        stack.record(PageSnapshot::of(&one), Some("AddBlock"));
        stack.end_batch();

        // Inner end leaves the outer batch open
        assert!(stack.is_batching());
        assert_eq!(stack.undo_levels(), 0);

        stack.end_batch();
        assert!(!stack.is_batching());
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Outer"));

        let restored = stack.undo(PageSnapshot::of(&two)).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_undo_closes_nested_batch() {
        let empty = page_with(&[]);
        let one = page_with(&["hero"]);
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.begin_batch();
        stack.record(PageSnapshot::of(&empty), None);

        let restored = stack.undo(PageSnapshot::of(&one)).unwrap();
        assert!(restored.is_empty());
        assert!(!stack.is_batching());

        // Stray ends after the forced close are ignored
        stack.end_batch();
        stack.end_batch();
        assert_eq!(stack.redo_levels(), 1);
    }

    #[test]
    fn test_zero_max_levels_keeps_one() {
        let mut stack = UndoStack::with_max_levels(0);
        assert_eq!(stack.max_levels(), 1);

        stack.record(PageSnapshot::of(&page_with(&[])), None);
        stack.record(PageSnapshot::of(&page_with(&["text"])), None);
        assert_eq!(stack.undo_levels(), 1);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut stack = UndoStack::with_max_levels(2);
        for count in 0..3 {
            let types = vec!["text"; count];
            stack.record(PageSnapshot::of(&page_with(&types)), None);
        }

        // Oldest entry (the empty page) was dropped
        assert_eq!(stack.undo_levels(), 2);
        let page = page_with(&["text", "text", "text"]);
        let newest = stack.undo(PageSnapshot::of(&page)).unwrap();
        assert_eq!(newest.len(), 2);
        let oldest = stack.undo(newest).unwrap();
        assert_eq!(oldest.len(), 1);
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_clear() {
        let page = page_with(&["hero"]);
        let mut stack = UndoStack::new();
        stack.record(PageSnapshot::of(&page), None);
        stack.begin_batch();
        stack.clear();

        assert!(!stack.can_undo());
        assert!(!stack.is_batching());
    }
}
