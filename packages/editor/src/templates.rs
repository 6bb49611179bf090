//! # Page Templates
//!
//! Static starting points for a new page. Instantiating a template copies its
//! block list into a fresh page with its own block ids; the template itself
//! is never touched, so every instantiation is independent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::block::{BlockSeed, DataMap};
use crate::document::{Page, PageId};
use crate::registry::BlockRegistry;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template {template} uses unregistered block type: {block_type}")]
    UnknownBlockType { template: String, block_type: String },
}

/// A named, reusable block list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub page_title: String,
    pub page_slug: String,
    pub blocks: Vec<BlockSeed>,
}

impl Template {
    /// Fresh page built from this template's blocks.
    ///
    /// Blocks without a layout of their own get the registry's default layout.
    pub fn instantiate(&self, registry: &BlockRegistry, page_id: PageId) -> Page {
        let seeds = self.blocks.iter().map(|seed| {
            let mut seed = seed.clone();
            if seed.layout.is_empty() {
                seed.layout = registry.default_layout(&seed.block_type);
            }
            seed
        });

        let page = Page::from_seeds(page_id, &self.page_title, &self.page_slug, seeds);
        tracing::debug!("Instantiated template {} ({} blocks)", self.id, page.len());
        page
    }

    /// Every block type used is known to `registry`
    pub fn check(&self, registry: &BlockRegistry) -> Result<(), TemplateError> {
        match self.blocks.iter().find(|seed| !registry.has(&seed.block_type)) {
            Some(seed) => Err(TemplateError::UnknownBlockType {
                template: self.id.clone(),
                block_type: seed.block_type.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Somewhere templates can be listed and instantiated from
pub trait TemplateSource {
    fn list(&self) -> Vec<&Template>;

    fn get(&self, id: &str) -> Option<&Template>;

    fn instantiate(&self, id: &str, registry: &BlockRegistry, page_id: PageId) -> Result<Page, TemplateError> {
        let template = self
            .get(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;
        Ok(template.instantiate(registry, page_id))
    }
}

/// In-memory template collection, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: IndexMap<String, Template>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the builtin templates
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for template in builtin_templates() {
            catalog.add(template);
        }
        catalog
    }

    /// Add or replace a template
    pub fn add(&mut self, template: Template) -> Option<Template> {
        self.templates.insert(template.id.clone(), template)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateSource for TemplateCatalog {
    fn list(&self) -> Vec<&Template> {
        self.templates.values().collect()
    }

    fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }
}

fn map(value: Value) -> DataMap {
    match value {
        Value::Object(map) => map,
        _ => DataMap::new(),
    }
}

fn seed(block_type: &str, content: Value) -> BlockSeed {
    BlockSeed::new(block_type).with_content(map(content))
}

pub fn builtin_templates() -> Vec<Template> {
    vec![
        Template {
            id: "editorial-minimal".into(),
            name: "Editorial Minimal".into(),
            description: "Clean, typography-focused layout for thinkers and writers.".into(),
            category: Some("portfolio".into()),
            page_title: "My Portfolio".into(),
            page_slug: "home".into(),
            blocks: vec![
                seed(
                    "hero",
                    json!({
                        "headline": "Thinker & Creator",
                        "subheadline": "Crafting digital experiences with precision.",
                    }),
                )
                .with_settings(map(json!({ "alignment": "left", "background": "solid" }))),
                seed(
                    "text",
                    json!({
                        "text": "I am a designer focused on creating minimalist digital solutions that solve complex problems.",
                    }),
                ),
                seed(
                    "features",
                    json!({
                        "title": "Selected Works",
                        "features": [
                            { "title": "Project One", "description": "A brief overview of the first project." },
                            { "title": "Project Two", "description": "A brief overview of the second project." },
                        ],
                    }),
                )
                .with_settings(map(json!({ "layout": "list", "columns": 1 }))),
                seed(
                    "form",
                    json!({
                        "title": "Get in Touch",
                        "fields": [
                            { "name": "email", "type": "email", "label": "Email", "required": true },
                            { "name": "message", "type": "textarea", "label": "Message", "required": true },
                        ],
                        "submit_text": "Send",
                    }),
                ),
            ],
        },
        Template {
            id: "playful-pop".into(),
            name: "Playful Pop".into(),
            description: "Bold colors and dynamic shapes for creative explorers.".into(),
            category: Some("portfolio".into()),
            page_title: "Hello World".into(),
            page_slug: "home".into(),
            blocks: vec![
                seed(
                    "hero",
                    json!({
                        "headline": "Let's Play!",
                        "subheadline": "Bright ideas for bright people.",
                    }),
                )
                .with_settings(map(json!({ "alignment": "center", "background": "gradient", "height": "large" }))),
                seed(
                    "features",
                    json!({
                        "title": "Experiments",
                        "features": [
                            { "title": "Pop Art", "description": "Vibrant colors and bold lines." },
                        ],
                    }),
                ),
            ],
        },
    ]
}
