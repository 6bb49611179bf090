//! # Block Renderer Dispatch
//!
//! Maps a block's type tag to the renderer that draws it. Renderers are
//! generic over their output (`String`, a widget tree, a VDOM node...) and
//! report user intent through [`BlockCallbacks`] instead of touching the page.
//! The session turns the recorded [`BlockAction`]s into mutations.
//!
//! Types without a registered renderer go to the fallback, so an unknown
//! block still shows up (as a placeholder) and is never dropped.

use std::collections::HashMap;

use crate::block::{Block, BlockId, BlockPatch, DataMap, Viewport};
use crate::document::Page;
use crate::mutations::Mutation;

/// How a block is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    /// Edit mode (controls shown, hidden blocks still drawn)
    pub editing: bool,
    pub viewport: Viewport,
    pub selected: bool,
}

impl RenderContext {
    pub fn editing(viewport: Viewport) -> Self {
        Self {
            editing: true,
            viewport,
            selected: false,
        }
    }

    pub fn viewing(viewport: Viewport) -> Self {
        Self {
            editing: false,
            viewport,
            selected: false,
        }
    }
}

/// Something a renderer's controls asked for
#[derive(Debug, Clone, PartialEq)]
pub enum BlockAction {
    ContentChange(DataMap),
    SettingsChange(DataMap),
    Delete,
    Duplicate,
    /// Add a new block of this type right after the rendered one
    InsertAfter(String),
}

impl BlockAction {
    pub fn into_mutation(self, block_id: &BlockId) -> Mutation {
        let block_id = block_id.clone();
        match self {
            BlockAction::ContentChange(content) => Mutation::UpdateBlock {
                block_id,
                patch: BlockPatch::content(content),
            },
            BlockAction::SettingsChange(settings) => Mutation::UpdateBlock {
                block_id,
                patch: BlockPatch::settings(settings),
            },
            BlockAction::Delete => Mutation::DeleteBlock { block_id },
            BlockAction::Duplicate => Mutation::DuplicateBlock { block_id },
            BlockAction::InsertAfter(block_type) => Mutation::AddBlock {
                block_type,
                after: Some(block_id),
            },
        }
    }
}

/// Records the actions a renderer triggers
#[derive(Debug, Default)]
pub struct BlockCallbacks {
    actions: Vec<BlockAction>,
}

impl BlockCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_content_change(&mut self, patch: DataMap) {
        self.actions.push(BlockAction::ContentChange(patch));
    }

    pub fn on_settings_change(&mut self, patch: DataMap) {
        self.actions.push(BlockAction::SettingsChange(patch));
    }

    pub fn on_delete(&mut self) {
        self.actions.push(BlockAction::Delete);
    }

    pub fn on_duplicate(&mut self) {
        self.actions.push(BlockAction::Duplicate);
    }

    pub fn on_insert_after(&mut self, block_type: impl Into<String>) {
        self.actions.push(BlockAction::InsertAfter(block_type.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<BlockAction> {
        self.actions
    }
}

/// Draws one block type
pub trait BlockRenderer<O> {
    fn render(&self, block: &Block, context: &RenderContext, callbacks: &mut BlockCallbacks) -> O;
}

impl<O, F> BlockRenderer<O> for F
where
    F: Fn(&Block, &RenderContext, &mut BlockCallbacks) -> O,
{
    fn render(&self, block: &Block, context: &RenderContext, callbacks: &mut BlockCallbacks) -> O {
        self(block, context, callbacks)
    }
}

/// Fallback that names the type it could not render
#[derive(Debug, Clone, Copy, Default)]
pub struct UnrecognizedBlock;

impl BlockRenderer<String> for UnrecognizedBlock {
    fn render(&self, block: &Block, _context: &RenderContext, _callbacks: &mut BlockCallbacks) -> String {
        format!("[unrecognized block type: {}]", block.block_type)
    }
}

/// One block's render output plus whatever its controls triggered
#[derive(Debug)]
pub struct RenderedBlock<O> {
    pub block_id: BlockId,
    pub output: O,
    pub actions: Vec<BlockAction>,
}

type BoxedRenderer<O> = Box<dyn BlockRenderer<O> + Send + Sync>;

/// Type tag -> renderer table
pub struct RendererDispatch<O> {
    renderers: HashMap<String, BoxedRenderer<O>>,
    fallback: BoxedRenderer<O>,
}

impl<O> RendererDispatch<O> {
    pub fn new(fallback: impl BlockRenderer<O> + Send + Sync + 'static) -> Self {
        Self {
            renderers: HashMap::new(),
            fallback: Box::new(fallback),
        }
    }

    /// Register (or replace) the renderer for a type tag
    pub fn register(&mut self, block_type: impl Into<String>, renderer: impl BlockRenderer<O> + Send + Sync + 'static) {
        self.renderers.insert(block_type.into(), Box::new(renderer));
    }

    pub fn has(&self, block_type: &str) -> bool {
        self.renderers.contains_key(block_type)
    }

    pub fn render(&self, block: &Block, context: &RenderContext, callbacks: &mut BlockCallbacks) -> O {
        match self.renderers.get(&block.block_type) {
            Some(renderer) => renderer.render(block, context, callbacks),
            None => {
                tracing::warn!("No renderer for block type {}, using placeholder", block.block_type);
                self.fallback.render(block, context, callbacks)
            }
        }
    }

    /// Render a page in order. Viewing skips blocks hidden in the context's
    /// viewport; editing draws every block.
    pub fn render_page(&self, page: &Page, context: &RenderContext) -> Vec<RenderedBlock<O>> {
        page.blocks()
            .filter(|block| context.editing || block.is_visible_on(context.viewport))
            .map(|block| {
                let mut callbacks = BlockCallbacks::new();
                let output = self.render(block, context, &mut callbacks);
                RenderedBlock {
                    block_id: block.id.clone(),
                    output,
                    actions: callbacks.into_actions(),
                }
            })
            .collect()
    }
}

impl RendererDispatch<String> {
    /// String dispatch with the [`UnrecognizedBlock`] fallback
    pub fn with_placeholder() -> Self {
        Self::new(UnrecognizedBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockPatch;
    use crate::document::PageId;
    use crate::registry::BlockRegistry;
    use serde_json::json;

    fn sample_page() -> Page {
        let registry = BlockRegistry::with_builtins();
        let page = Page::new(PageId::from("home"), "Home", "home");
        let (page, _) = page.add_block(&registry, "hero", None).unwrap();
        let (page, text) = page.add_block(&registry, "text", None).unwrap();
        let (page, _) = page.add_block(&registry, "carousel", None).unwrap();
        page.update_block(&text, &BlockPatch::visibility(false)).unwrap()
    }

    fn headline_renderer(block: &Block, _: &RenderContext, _: &mut BlockCallbacks) -> String {
        format!("hero:{}", block.content["headline"].as_str().unwrap_or_default())
    }

    #[test]
    fn test_dispatch_by_type_with_fallback() {
        let mut dispatch = RendererDispatch::with_placeholder();
        dispatch.register("hero", headline_renderer);
        dispatch.register("text", |_: &Block, _: &RenderContext, _: &mut BlockCallbacks| "text".to_string());

        let page = sample_page();
        let rendered = dispatch.render_page(&page, &RenderContext::editing(Viewport::Desktop));
        let outputs: Vec<&str> = rendered.iter().map(|r| r.output.as_str()).collect();

        assert_eq!(
            outputs,
            vec![
                "hero:Welcome to My Portfolio",
                "text",
                "[unrecognized block type: carousel]"
            ]
        );
    }

    #[test]
    fn test_viewing_skips_hidden_blocks() {
        let dispatch = RendererDispatch::with_placeholder();
        let page = sample_page();

        let rendered = dispatch.render_page(&page, &RenderContext::viewing(Viewport::Mobile));
        assert_eq!(rendered.len(), 2);
        assert!(rendered.iter().all(|r| !r.block_id.as_str().starts_with("text-")));
    }

    #[test]
    fn test_callbacks_become_mutations() {
        let mut dispatch = RendererDispatch::with_placeholder();
        dispatch.register("hero", |_: &Block, ctx: &RenderContext, callbacks: &mut BlockCallbacks| {
            if ctx.editing {
                callbacks.on_content_change(json!({ "headline": "Hi" }).as_object().cloned().unwrap_or_default());
                callbacks.on_insert_after("text");
            }
            String::new()
        });

        let page = sample_page();
        let hero = page.block_at(0).unwrap().id.clone();
        let rendered = dispatch.render_page(&page, &RenderContext::editing(Viewport::Desktop));
        let mutations: Vec<Mutation> = rendered[0]
            .actions
            .iter()
            .cloned()
            .map(|action| action.into_mutation(&hero))
            .collect();

        assert_eq!(mutations.len(), 2);
        assert!(matches!(&mutations[0], Mutation::UpdateBlock { block_id, .. } if *block_id == hero));
        assert_eq!(
            mutations[1],
            Mutation::AddBlock {
                block_type: "text".into(),
                after: Some(hero)
            }
        );
    }
}
