//! # Block Registry
//!
//! Catalog of block types: type tag → metadata and default data.
//!
//! The registry is a plain value. Build one per process or session, wrap it
//! in an `Arc` and hand it to whatever needs defaults or validation.
//!
//! ```rust,ignore
//! let registry = Arc::new(BlockRegistry::with_builtins());
//! let hero = registry.get("hero").unwrap();
//! assert_eq!(hero.category, BlockCategory::Layout);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::{Block, DataMap};
use crate::builtin::{self, BlockData};

/// Grouping used by the block palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Layout,
    Content,
    Media,
    Interactive,
    Portfolio,
}

/// Metadata and defaults for one block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTypeDefinition {
    pub block_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: BlockCategory,
    #[serde(default)]
    pub default_content: DataMap,
    #[serde(default)]
    pub default_settings: DataMap,
    #[serde(default)]
    pub default_layout: DataMap,
    /// Content keys that must be present for the content to validate
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl BlockTypeDefinition {
    pub fn new(block_type: impl Into<String>, name: impl Into<String>, category: BlockCategory) -> Self {
        Self {
            block_type: block_type.into(),
            name: name.into(),
            description: String::new(),
            category,
            default_content: DataMap::new(),
            default_settings: DataMap::new(),
            default_layout: DataMap::new(),
            required_fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_default_content(mut self, content: DataMap) -> Self {
        self.default_content = content;
        self
    }

    pub fn with_default_settings(mut self, settings: DataMap) -> Self {
        self.default_settings = settings;
        self
    }

    pub fn with_default_layout(mut self, layout: DataMap) -> Self {
        self.default_layout = layout;
        self
    }

    pub fn with_required_fields(mut self, fields: &[&str]) -> Self {
        self.required_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Unknown block type: {0}")]
    UnknownType(String),

    #[error("Block type '{block_type}' requires content field '{field}'")]
    MissingField { block_type: String, field: String },

    #[error("Invalid content for block type '{block_type}': {message}")]
    InvalidContent { block_type: String, message: String },
}

/// Registry of block type definitions, iterated in registration order
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    entries: IndexMap<String, BlockTypeDefinition>,
}

impl BlockRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Registry pre-populated with the builtin block catalog
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for definition in builtin::builtin_definitions() {
            registry.register(definition);
        }
        registry
    }

    /// Register a block type. Re-registering a tag replaces the old entry
    /// (keeping its position) and returns it.
    pub fn register(&mut self, definition: BlockTypeDefinition) -> Option<BlockTypeDefinition> {
        let replaced = self.entries.insert(definition.block_type.clone(), definition);
        if let Some(old) = &replaced {
            tracing::debug!("Replaced block type definition: {}", old.block_type);
        }
        replaced
    }

    pub fn get(&self, block_type: &str) -> Option<&BlockTypeDefinition> {
        self.entries.get(block_type)
    }

    pub fn has(&self, block_type: &str) -> bool {
        self.entries.contains_key(block_type)
    }

    /// All definitions in registration order
    pub fn all(&self) -> Vec<&BlockTypeDefinition> {
        self.entries.values().collect()
    }

    pub fn types(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn by_category(&self, category: BlockCategory) -> Vec<&BlockTypeDefinition> {
        self.entries
            .values()
            .filter(|definition| definition.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Default content, or an empty map for unknown types
    pub fn default_content(&self, block_type: &str) -> DataMap {
        self.get(block_type)
            .map(|d| d.default_content.clone())
            .unwrap_or_default()
    }

    /// Default settings, or an empty map for unknown types
    pub fn default_settings(&self, block_type: &str) -> DataMap {
        self.get(block_type)
            .map(|d| d.default_settings.clone())
            .unwrap_or_default()
    }

    /// Default layout, or an empty map for unknown types
    pub fn default_layout(&self, block_type: &str) -> DataMap {
        self.get(block_type)
            .map(|d| d.default_layout.clone())
            .unwrap_or_default()
    }

    /// Check content against a registered type
    pub fn validate(&self, block_type: &str, content: &DataMap) -> Result<(), RegistryError> {
        let definition = self
            .get(block_type)
            .ok_or_else(|| RegistryError::UnknownType(block_type.to_string()))?;

        for field in &definition.required_fields {
            if !content.contains_key(field) {
                return Err(RegistryError::MissingField {
                    block_type: block_type.to_string(),
                    field: field.clone(),
                });
            }
        }

        BlockData::decode(block_type, content).map(|_| ())
    }

    /// Typed view of a block's content.
    ///
    /// Blocks whose type is not registered come back as `BlockData::Unknown`
    /// with their content untouched; they are never an error here.
    pub fn decode(&self, block: &Block) -> Result<BlockData, RegistryError> {
        if !self.has(&block.block_type) {
            tracing::warn!("Unknown block type: {} ({})", block.block_type, block.id);
            return Ok(BlockData::Unknown {
                block_type: block.block_type.clone(),
                content: block.content.clone(),
            });
        }
        BlockData::decode(&block.block_type, &block.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockId, BlockSeed};
    use serde_json::json;

    fn map(value: serde_json::Value) -> DataMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = BlockRegistry::new();
        assert!(registry.is_empty());

        let previous = registry.register(
            BlockTypeDefinition::new("quote", "Quote", BlockCategory::Content)
                .with_default_content(map(json!({ "text": "" }))),
        );
        assert!(previous.is_none());

        let quote = registry.get("quote").unwrap();
        assert_eq!(quote.name, "Quote");
        assert_eq!(registry.default_content("quote"), map(json!({ "text": "" })));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_reregistration_replaces_in_place() {
        let mut registry = BlockRegistry::new();
        registry.register(BlockTypeDefinition::new("a", "A", BlockCategory::Content));
        registry.register(BlockTypeDefinition::new("b", "B", BlockCategory::Media));

        let previous = registry.register(BlockTypeDefinition::new("a", "A2", BlockCategory::Content));
        assert_eq!(previous.unwrap().name, "A");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.types(), vec!["a", "b"]);
        assert_eq!(registry.get("a").unwrap().name, "A2");
    }

    #[test]
    fn test_unknown_type_defaults_are_empty() {
        let registry = BlockRegistry::with_builtins();
        assert!(registry.default_content("nope").is_empty());
        assert!(registry.default_settings("nope").is_empty());
        assert!(registry.default_layout("nope").is_empty());
    }

    #[test]
    fn test_builtins_by_category() {
        let registry = BlockRegistry::with_builtins();
        assert!(registry.has("hero"));
        assert!(registry.has("text"));

        let media: Vec<_> = registry
            .by_category(BlockCategory::Media)
            .into_iter()
            .map(|d| d.block_type.as_str())
            .collect();
        assert!(media.contains(&"gallery"));
        assert!(!media.contains(&"hero"));
    }

    #[test]
    fn test_validate() {
        let registry = BlockRegistry::with_builtins();

        assert!(registry.validate("text", &map(json!({ "text": "Hello" }))).is_ok());
        assert_eq!(
            registry.validate("text", &map(json!({ "title": "No body" }))),
            Err(RegistryError::MissingField {
                block_type: "text".to_string(),
                field: "text".to_string(),
            })
        );
        assert!(matches!(
            registry.validate("text", &map(json!({ "text": 42 }))),
            Err(RegistryError::InvalidContent { .. })
        ));
        assert_eq!(
            registry.validate("hologram", &DataMap::new()),
            Err(RegistryError::UnknownType("hologram".to_string()))
        );
    }

    #[test]
    fn test_decode_unknown_block_keeps_content() {
        let registry = BlockRegistry::with_builtins();
        let content = map(json!({ "beam": "blue", "intensity": 3 }));
        let block = BlockSeed::new("hologram")
            .with_content(content.clone())
            .into_block(BlockId::from("hologram-1"));

        match registry.decode(&block).unwrap() {
            BlockData::Unknown { block_type, content: raw } => {
                assert_eq!(block_type, "hologram");
                assert_eq!(raw, content);
            }
            other => panic!("Expected unknown block data, got {:?}", other),
        }
    }
}
