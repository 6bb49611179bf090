//! # Blocks
//!
//! A block is one typed, addressable unit of page content. Its `content`,
//! `settings` and `layout` are opaque maps; their meaning belongs to the
//! renderer registered for the block's type tag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::EditorError;

/// Opaque key → value data carried by a block
pub type DataMap = Map<String, Value>;

/// Overwrite keys of `target` with the keys present in `patch`.
/// Keys absent from `patch` keep their previous value.
pub fn merge_shallow(target: &mut DataMap, patch: &DataMap) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

/// Identifier of a block, unique within its page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `-`, or the whole id when there is none.
    /// Legacy section ids encode their block type this way (`hero-123` → `hero`).
    pub fn type_prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Preview viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    /// Preview canvas width in CSS pixels
    pub fn width(self) -> u32 {
        match self {
            Viewport::Desktop => 1280,
            Viewport::Tablet => 768,
            Viewport::Mobile => 375,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Tablet => "tablet",
            Viewport::Mobile => "mobile",
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::Desktop
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Viewport {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop" => Ok(Viewport::Desktop),
            "tablet" => Ok(Viewport::Tablet),
            "mobile" => Ok(Viewport::Mobile),
            other => Err(EditorError::UnknownViewport(other.to_string())),
        }
    }
}

/// Per-viewport visibility overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportVisibility {
    #[serde(default = "default_true")]
    pub desktop: bool,
    #[serde(default = "default_true")]
    pub tablet: bool,
    #[serde(default = "default_true")]
    pub mobile: bool,
}

impl ViewportVisibility {
    pub fn get(&self, viewport: Viewport) -> bool {
        match viewport {
            Viewport::Desktop => self.desktop,
            Viewport::Tablet => self.tablet,
            Viewport::Mobile => self.mobile,
        }
    }

    pub fn set(&mut self, viewport: Viewport, visible: bool) {
        match viewport {
            Viewport::Desktop => self.desktop = visible,
            Viewport::Tablet => self.tablet = visible,
            Viewport::Mobile => self.mobile = visible,
        }
    }
}

impl Default for ViewportVisibility {
    fn default() -> Self {
        Self {
            desktop: true,
            tablet: true,
            mobile: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A block inside a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    /// Registry type tag (`hero`, `text`, ...). Unknown tags are kept verbatim.
    pub block_type: String,

    pub content: DataMap,

    #[serde(default)]
    pub settings: DataMap,

    /// Position, size and z-order
    #[serde(default)]
    pub layout: DataMap,

    #[serde(default = "default_true")]
    pub is_visible: bool,

    #[serde(default)]
    pub visible_on: ViewportVisibility,

    /// Position within the page, always equal to the list index
    #[serde(default)]
    pub sort_order: usize,
}

impl Block {
    /// Whether the block shows up when previewing at `viewport`
    pub fn is_visible_on(&self, viewport: Viewport) -> bool {
        self.is_visible && self.visible_on.get(viewport)
    }

    /// Copy of this block's data without its identity or position
    pub fn to_seed(&self) -> BlockSeed {
        BlockSeed {
            block_type: self.block_type.clone(),
            content: self.content.clone(),
            settings: self.settings.clone(),
            layout: self.layout.clone(),
            is_visible: self.is_visible,
            visible_on: self.visible_on,
        }
    }
}

/// Block data waiting for an id: template entries, clipboard contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSeed {
    pub block_type: String,
    #[serde(default)]
    pub content: DataMap,
    #[serde(default)]
    pub settings: DataMap,
    #[serde(default)]
    pub layout: DataMap,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub visible_on: ViewportVisibility,
}

impl BlockSeed {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            content: DataMap::new(),
            settings: DataMap::new(),
            layout: DataMap::new(),
            is_visible: true,
            visible_on: ViewportVisibility::default(),
        }
    }

    pub fn with_content(mut self, content: DataMap) -> Self {
        self.content = content;
        self
    }

    pub fn with_settings(mut self, settings: DataMap) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_layout(mut self, layout: DataMap) -> Self {
        self.layout = layout;
        self
    }

    /// Materialize into a block with the given id. Sort order is assigned by the page.
    pub fn into_block(self, id: BlockId) -> Block {
        Block {
            id,
            block_type: self.block_type,
            content: self.content,
            settings: self.settings,
            layout: self.layout,
            is_visible: self.is_visible,
            visible_on: self.visible_on,
            sort_order: 0,
        }
    }
}

/// Partial update of a block. Present maps are merged shallowly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<DataMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<DataMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<DataMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_on: Option<ViewportVisibility>,
}

impl BlockPatch {
    pub fn content(content: DataMap) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn settings(settings: DataMap) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    pub fn visibility(is_visible: bool) -> Self {
        Self {
            is_visible: Some(is_visible),
            ..Self::default()
        }
    }

    pub fn with_settings(mut self, settings: DataMap) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_layout(mut self, layout: DataMap) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_visible_on(mut self, visible_on: ViewportVisibility) -> Self {
        self.visible_on = Some(visible_on);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.settings.is_none()
            && self.layout.is_none()
            && self.is_visible.is_none()
            && self.visible_on.is_none()
    }

    pub fn apply_to(&self, block: &mut Block) {
        if let Some(content) = &self.content {
            merge_shallow(&mut block.content, content);
        }
        if let Some(settings) = &self.settings {
            merge_shallow(&mut block.settings, settings);
        }
        if let Some(layout) = &self.layout {
            merge_shallow(&mut block.layout, layout);
        }
        if let Some(is_visible) = self.is_visible {
            block.is_visible = is_visible;
        }
        if let Some(visible_on) = self.visible_on {
            block.visible_on = visible_on;
        }
    }
}
