//! # Page Document
//!
//! A page is an ordered list of blocks plus page-level metadata.
//!
//! Every operation here is pure: it borrows the page and returns a new one.
//! Blocks are held behind `Arc`, so a new page shares every block the
//! operation did not touch and history snapshots stay cheap.
//!
//! ## Invariants
//!
//! - Block ids are unique within a page and never handed out twice
//! - `sort_order` of the block at index `i` is `i`
//! - Blocks of unregistered types are kept as they are

use std::fmt;
use std::sync::Arc;

use pagecraft_common::IDGenerator;
use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockId, BlockPatch, BlockSeed, Viewport};
use crate::mutations::MutationError;
use crate::registry::BlockRegistry;

/// Identifier of a page in the backing store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Editable page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub slug: String,
    blocks: Vec<Arc<Block>>,

    /// Source of new block ids; not persisted, a loaded page gets a fresh seed
    #[serde(skip)]
    ids: IDGenerator,
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.slug == other.slug
            && self.blocks == other.blocks
    }
}

impl Page {
    /// Empty page
    pub fn new(id: PageId, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            blocks: Vec::new(),
            ids: IDGenerator::fresh(),
        }
    }

    /// Build a page from already-identified blocks (e.g. after loading).
    ///
    /// Blocks are kept in the given order and their sort orders renumbered.
    /// Duplicate ids are rejected.
    pub fn from_blocks(
        id: PageId,
        title: impl Into<String>,
        slug: impl Into<String>,
        blocks: Vec<Block>,
    ) -> Result<Self, MutationError> {
        let mut seen = std::collections::HashSet::new();
        for block in &blocks {
            if !seen.insert(block.id.clone()) {
                return Err(MutationError::DuplicateId(block.id.clone()));
            }
        }

        let mut page = Self::new(id, title, slug);
        page.blocks = blocks.into_iter().map(Arc::new).collect();
        page.renumber();
        Ok(page)
    }

    /// Page whose blocks are created from `seeds`, in order, under fresh ids
    pub fn from_seeds(
        id: PageId,
        title: impl Into<String>,
        slug: impl Into<String>,
        seeds: impl IntoIterator<Item = BlockSeed>,
    ) -> Self {
        let mut page = Self::new(id, title, slug);
        for seed in seeds {
            let id = page.next_id(&seed.block_type);
            page.blocks.push(Arc::new(seed.into_block(id)));
        }
        page.renumber();
        page
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.iter().map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id).map(|b| b.as_ref())
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    pub fn block_at(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index).map(|b| b.as_ref())
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id.clone()).collect()
    }

    /// Blocks shown when previewing at `viewport`, in page order
    pub fn visible_blocks(&self, viewport: Viewport) -> Vec<&Block> {
        self.blocks()
            .filter(|b| b.is_visible_on(viewport))
            .collect()
    }

    /// Add a block of `block_type` with registry defaults, right after
    /// `after` or at the end when `after` is `None`.
    pub fn add_block(
        &self,
        registry: &BlockRegistry,
        block_type: &str,
        after: Option<&BlockId>,
    ) -> Result<(Page, BlockId), MutationError> {
        let index = self.insertion_index(after)?;
        Ok(self.add_block_at(registry, block_type, index))
    }

    /// Add a block of `block_type` at `index` (clamped to `0..=len`)
    pub fn add_block_at(&self, registry: &BlockRegistry, block_type: &str, index: usize) -> (Page, BlockId) {
        if !registry.has(block_type) {
            tracing::warn!("Adding block of unregistered type: {}", block_type);
        }

        let seed = BlockSeed::new(block_type)
            .with_content(registry.default_content(block_type))
            .with_settings(registry.default_settings(block_type))
            .with_layout(registry.default_layout(block_type));

        self.insert_seed(seed, index)
    }

    /// Insert copied block data under a fresh id, right after `after` or at the end
    pub fn insert_block(&self, seed: BlockSeed, after: Option<&BlockId>) -> Result<(Page, BlockId), MutationError> {
        let index = self.insertion_index(after)?;
        Ok(self.insert_seed(seed, index))
    }

    /// Shallow-merge `patch` into the block
    pub fn update_block(&self, id: &BlockId, patch: &BlockPatch) -> Result<Page, MutationError> {
        let index = self.require(id)?;
        let mut page = self.clone();
        patch.apply_to(Arc::make_mut(&mut page.blocks[index]));
        Ok(page)
    }

    /// Remove the block and compact sort orders
    pub fn delete_block(&self, id: &BlockId) -> Result<Page, MutationError> {
        let index = self.require(id)?;
        let mut page = self.clone();
        page.blocks.remove(index);
        page.renumber();
        Ok(page)
    }

    /// Move the block to `to_index`, clamped to the last position
    pub fn move_block(&self, id: &BlockId, to_index: usize) -> Result<Page, MutationError> {
        let from = self.require(id)?;
        let to = to_index.min(self.blocks.len() - 1);

        let mut page = self.clone();
        let block = page.blocks.remove(from);
        page.blocks.insert(to, block);
        page.renumber();
        Ok(page)
    }

    /// Deep copy of the block under a new id, right after the source
    pub fn duplicate_block(&self, id: &BlockId) -> Result<(Page, BlockId), MutationError> {
        let index = self.require(id)?;
        let seed = self.blocks[index].to_seed();
        Ok(self.insert_seed(seed, index + 1))
    }

    /// Reorder to match `order`, which must name every block exactly once
    pub fn reorder_blocks(&self, order: &[BlockId]) -> Result<Page, MutationError> {
        if order.len() != self.blocks.len() {
            return Err(MutationError::InvalidOrder(format!(
                "expected {} ids, got {}",
                self.blocks.len(),
                order.len()
            )));
        }

        let mut remaining: Vec<Option<Arc<Block>>> = self.blocks.iter().cloned().map(Some).collect();
        let mut blocks = Vec::with_capacity(order.len());
        for id in order {
            let index = self.require(id)?;
            let block = remaining[index]
                .take()
                .ok_or_else(|| MutationError::InvalidOrder(format!("{} listed twice", id)))?;
            blocks.push(block);
        }

        let mut page = self.clone();
        page.blocks = blocks;
        page.renumber();
        Ok(page)
    }

    /// Replace page title and/or slug
    pub fn set_meta(&self, title: Option<&str>, slug: Option<&str>) -> Page {
        let mut page = self.clone();
        if let Some(title) = title {
            page.title = title.to_string();
        }
        if let Some(slug) = slug {
            page.slug = slug.to_string();
        }
        page
    }

    /// Same page with another block list and metadata; the id source is kept
    pub(crate) fn restored(&self, title: &str, slug: &str, blocks: &[Arc<Block>]) -> Page {
        Page {
            id: self.id.clone(),
            title: title.to_string(),
            slug: slug.to_string(),
            blocks: blocks.to_vec(),
            ids: self.ids.clone(),
        }
    }

    pub(crate) fn shared_blocks(&self) -> &[Arc<Block>] {
        &self.blocks
    }

    fn require(&self, id: &BlockId) -> Result<usize, MutationError> {
        self.index_of(id)
            .ok_or_else(|| MutationError::BlockNotFound(id.clone()))
    }

    fn insertion_index(&self, after: Option<&BlockId>) -> Result<usize, MutationError> {
        match after {
            Some(anchor) => self
                .index_of(anchor)
                .map(|i| i + 1)
                .ok_or_else(|| MutationError::AnchorNotFound(anchor.clone())),
            None => Ok(self.blocks.len()),
        }
    }

    fn insert_seed(&self, seed: BlockSeed, index: usize) -> (Page, BlockId) {
        let mut page = self.clone();
        let id = page.next_id(&seed.block_type);
        let index = index.min(page.blocks.len());

        page.blocks.insert(index, Arc::new(seed.into_block(id.clone())));
        page.renumber();
        (page, id)
    }

    fn next_id(&mut self, block_type: &str) -> BlockId {
        loop {
            let id = BlockId::new(self.ids.new_id(block_type));
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Make `sort_order` match list position, touching only blocks that moved
    fn renumber(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            if block.sort_order != index {
                Arc::make_mut(block).sort_order = index;
            }
        }
    }
}
