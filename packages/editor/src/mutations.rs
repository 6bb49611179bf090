//! # Page Mutations
//!
//! Serializable description of every edit the document model supports.
//!
//! A mutation is validated against the current page and, when applied,
//! produces the next page without touching the current one:
//!
//! ```rust,ignore
//! let mutation = Mutation::AddBlock { block_type: "hero".into(), after: None };
//! let applied = mutation.apply(&page, &registry)?;
//! let page = applied.page;
//! ```
//!
//! ## Mutation Semantics
//!
//! ### UpdateBlock
//! - Shallow merge: keys present in the patch overwrite, absent keys survive
//!
//! ### MoveBlock
//! - Target index is clamped to the last position
//!
//! ### Anything naming a block id
//! - A missing id is a caller error, reported as `MutationError`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::{BlockId, BlockPatch, BlockSeed};
use crate::document::Page;
use crate::registry::BlockRegistry;

/// Semantic page edits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// Add a block with registry defaults after `after`, or at the end
    AddBlock {
        block_type: String,
        after: Option<BlockId>,
    },

    /// Add a block with registry defaults at an index
    AddBlockAt {
        block_type: String,
        index: usize,
    },

    /// Insert copied block data (clipboard paste) under a fresh id
    InsertBlock {
        seed: BlockSeed,
        after: Option<BlockId>,
    },

    /// Shallow-merge a patch into a block
    UpdateBlock {
        block_id: BlockId,
        patch: BlockPatch,
    },

    DeleteBlock {
        block_id: BlockId,
    },

    MoveBlock {
        block_id: BlockId,
        to_index: usize,
    },

    DuplicateBlock {
        block_id: BlockId,
    },

    /// Replace the whole order; must be a permutation of the current ids
    ReorderBlocks {
        order: Vec<BlockId>,
    },

    SetPageMeta {
        title: Option<String>,
        slug: Option<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Insert anchor not found: {0}")]
    AnchorNotFound(BlockId),

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Invalid block order: {0}")]
    InvalidOrder(String),
}

/// Outcome of applying a mutation
#[derive(Debug, Clone)]
pub struct Applied {
    /// The page after the mutation
    pub page: Page,

    /// Id of the block the mutation created, if any
    pub created: Option<BlockId>,
}

impl Mutation {
    /// Apply the mutation to `page`, returning the next page
    pub fn apply(&self, page: &Page, registry: &BlockRegistry) -> Result<Applied, MutationError> {
        self.validate(page)?;

        let (page, created) = match self {
            Mutation::AddBlock { block_type, after } => {
                let (page, id) = page.add_block(registry, block_type, after.as_ref())?;
                (page, Some(id))
            }

            Mutation::AddBlockAt { block_type, index } => {
                let (page, id) = page.add_block_at(registry, block_type, *index);
                (page, Some(id))
            }

            Mutation::InsertBlock { seed, after } => {
                let (page, id) = page.insert_block(seed.clone(), after.as_ref())?;
                (page, Some(id))
            }

            Mutation::UpdateBlock { block_id, patch } => (page.update_block(block_id, patch)?, None),

            Mutation::DeleteBlock { block_id } => (page.delete_block(block_id)?, None),

            Mutation::MoveBlock { block_id, to_index } => (page.move_block(block_id, *to_index)?, None),

            Mutation::DuplicateBlock { block_id } => {
                let (page, id) = page.duplicate_block(block_id)?;
                (page, Some(id))
            }

            Mutation::ReorderBlocks { order } => (page.reorder_blocks(order)?, None),

            Mutation::SetPageMeta { title, slug } => (page.set_meta(title.as_deref(), slug.as_deref()), None),
        };

        tracing::debug!("Applied {} to page {}", self.name(), page.id);
        Ok(Applied { page, created })
    }

    /// Validate without applying
    pub fn validate(&self, page: &Page) -> Result<(), MutationError> {
        match self {
            Mutation::AddBlock { after, .. } | Mutation::InsertBlock { after, .. } => match after {
                Some(anchor) if !page.contains(anchor) => Err(MutationError::AnchorNotFound(anchor.clone())),
                _ => Ok(()),
            },

            Mutation::UpdateBlock { block_id, .. }
            | Mutation::DeleteBlock { block_id }
            | Mutation::MoveBlock { block_id, .. }
            | Mutation::DuplicateBlock { block_id } => {
                if page.contains(block_id) {
                    Ok(())
                } else {
                    Err(MutationError::BlockNotFound(block_id.clone()))
                }
            }

            Mutation::ReorderBlocks { order } => {
                if order.len() != page.len() {
                    return Err(MutationError::InvalidOrder(format!(
                        "expected {} ids, got {}",
                        page.len(),
                        order.len()
                    )));
                }
                match order.iter().find(|id| !page.contains(id)) {
                    Some(missing) => Err(MutationError::BlockNotFound(missing.clone())),
                    None => Ok(()),
                }
            }

            Mutation::AddBlockAt { .. } | Mutation::SetPageMeta { .. } => Ok(()),
        }
    }

    /// Debug name of the mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "AddBlock",
            Mutation::AddBlockAt { .. } => "AddBlockAt",
            Mutation::InsertBlock { .. } => "InsertBlock",
            Mutation::UpdateBlock { .. } => "UpdateBlock",
            Mutation::DeleteBlock { .. } => "DeleteBlock",
            Mutation::MoveBlock { .. } => "MoveBlock",
            Mutation::DuplicateBlock { .. } => "DuplicateBlock",
            Mutation::ReorderBlocks { .. } => "ReorderBlocks",
            Mutation::SetPageMeta { .. } => "SetPageMeta",
        }
    }
}

/// Result of applying a mutation through an edit session
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Session version after the mutation
    pub version: u64,

    /// Id of the block the mutation created, if any
    pub created: Option<BlockId>,

    /// False when the mutation left the page as it was (no history entry)
    pub changed: bool,
}
