//! # Drag-Reorder Controller
//!
//! Turns a drag gesture (or a keyboard move) into exactly one [`DropAction`].
//!
//! Positions are resolved against the page as it is when the drop lands:
//!
//! ```text
//! [hero, text, form]     drag `form` onto `hero`, upper half
//!   target slot = 0      final index = 0  ->  Move { form, 0 }
//!
//! [hero, text, form]     drag `hero` onto `text`, lower half
//!   target slot = 2      final index = 1  ->  Move { hero, 1 }
//! ```
//!
//! Dropping a block where it already sits is a [`DropAction::NoOp`], which the
//! session never records in history.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::document::Page;
use crate::mutations::{Mutation, MutationError};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSource {
    /// A block already on the page
    Block(BlockId),

    /// A block type dragged from the palette
    Palette(String),
}

/// Which side of the target block the pointer is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Before,
    After,
}

impl Placement {
    /// Before the vertical midpoint of the target's rect is `Before`;
    /// at or past it is `After`.
    pub fn from_pointer(pointer_y: f64, rect_top: f64, rect_height: f64) -> Self {
        let midpoint = rect_top + rect_height / 2.0;
        if pointer_y < midpoint {
            Placement::Before
        } else {
            Placement::After
        }
    }
}

/// Where the gesture ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    Block { id: BlockId, placement: Placement },

    /// The page canvas itself (outside any block)
    Container,
}

/// A finished drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragGesture {
    pub source: DragSource,
    pub target: DropTarget,
}

/// Where a palette drop inserts its new block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPosition {
    After(BlockId),
    At(usize),
    End,
}

/// Resolved outcome of a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    Move { block_id: BlockId, to_index: usize },
    Insert { block_type: String, position: InsertPosition },
    NoOp,
}

impl DropAction {
    pub fn is_noop(&self) -> bool {
        matches!(self, DropAction::NoOp)
    }

    /// Mutation that carries out this action (`None` for `NoOp`)
    pub fn into_mutation(self) -> Option<Mutation> {
        match self {
            DropAction::Move { block_id, to_index } => Some(Mutation::MoveBlock { block_id, to_index }),
            DropAction::Insert { block_type, position } => Some(match position {
                InsertPosition::After(anchor) => Mutation::AddBlock {
                    block_type,
                    after: Some(anchor),
                },
                InsertPosition::At(index) => Mutation::AddBlockAt { block_type, index },
                InsertPosition::End => Mutation::AddBlock {
                    block_type,
                    after: None,
                },
            }),
            DropAction::NoOp => None,
        }
    }
}

/// Keyboard reorder commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMove {
    Up,
    Down,
    Top,
    Bottom,
}

/// Resolve a finished gesture against the current page
pub fn resolve_drop(page: &Page, gesture: &DragGesture) -> Result<DropAction, MutationError> {
    let action = match &gesture.source {
        DragSource::Block(id) => {
            let from = page
                .index_of(id)
                .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
            let slot = target_slot(page, &gesture.target)?;

            // Removing the source first shifts later slots down by one
            let to_index = if slot > from { slot - 1 } else { slot };
            if to_index == from {
                DropAction::NoOp
            } else {
                DropAction::Move {
                    block_id: id.clone(),
                    to_index,
                }
            }
        }
        DragSource::Palette(block_type) => {
            let position = match &gesture.target {
                DropTarget::Block {
                    id,
                    placement: Placement::Before,
                } => InsertPosition::At(require_target(page, id)?),
                DropTarget::Block {
                    id,
                    placement: Placement::After,
                } => {
                    require_target(page, id)?;
                    InsertPosition::After(id.clone())
                }
                DropTarget::Container => InsertPosition::End,
            };
            DropAction::Insert {
                block_type: block_type.clone(),
                position,
            }
        }
    };

    tracing::debug!(?gesture, ?action, "resolved drop");
    Ok(action)
}

/// Resolve a keyboard move for `id`
pub fn resolve_key(page: &Page, id: &BlockId, key: KeyMove) -> Result<DropAction, MutationError> {
    let from = page
        .index_of(id)
        .ok_or_else(|| MutationError::BlockNotFound(id.clone()))?;
    let last = page.len().saturating_sub(1);

    let to_index = match key {
        KeyMove::Up => from.saturating_sub(1),
        KeyMove::Down => (from + 1).min(last),
        KeyMove::Top => 0,
        KeyMove::Bottom => last,
    };

    if to_index == from {
        return Ok(DropAction::NoOp);
    }
    Ok(DropAction::Move {
        block_id: id.clone(),
        to_index,
    })
}

fn require_target(page: &Page, id: &BlockId) -> Result<usize, MutationError> {
    page.index_of(id)
        .ok_or_else(|| MutationError::AnchorNotFound(id.clone()))
}

/// Insertion slot in `0..=N` on the page as it stands
fn target_slot(page: &Page, target: &DropTarget) -> Result<usize, MutationError> {
    match target {
        DropTarget::Block { id, placement } => {
            let index = require_target(page, id)?;
            Ok(match placement {
                Placement::Before => index,
                Placement::After => index + 1,
            })
        }
        DropTarget::Container => Ok(page.len()),
    }
}

/// In-flight drag state: what is being dragged and what it currently hovers
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<DragSource>,
    over: Option<DropTarget>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, source: DragSource) {
        self.active = Some(source);
        self.over = None;
    }

    /// Update the hovered target; `None` when the pointer left every target
    pub fn hover(&mut self, target: Option<DropTarget>) {
        if self.active.is_some() {
            self.over = target;
        }
    }

    pub fn active(&self) -> Option<&DragSource> {
        self.active.as_ref()
    }

    pub fn over(&self) -> Option<&DropTarget> {
        self.over.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }

    /// End the drag. Dropping outside every target (or with nothing
    /// dragged) is a no-op.
    pub fn finish(&mut self, page: &Page) -> Result<DropAction, MutationError> {
        let source = self.active.take();
        let target = self.over.take();

        match (source, target) {
            (Some(source), Some(target)) => resolve_drop(page, &DragGesture { source, target }),
            _ => Ok(DropAction::NoOp),
        }
    }
}
