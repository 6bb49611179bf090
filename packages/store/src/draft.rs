//! Legacy whole-site draft configs.
//!
//! Before pages were stored as block lists, a site was a single draft config
//! holding theme, assets and a `sections` table. Such documents are still
//! readable: each entry of `sections.order` becomes one block. They are never
//! written back in this shape.

use std::collections::HashSet;

use indexmap::IndexMap;
use pagecraft_editor::{Block, BlockId, BlockRegistry, Page, PageId, ViewportVisibility};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Slug given to pages converted from a draft config
pub const DRAFT_PAGE_SLUG: &str = "home";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default)]
    pub theme: DraftTheme,

    pub sections: DraftSections,

    #[serde(
        default,
        rename = "custom_css",
        alias = "customCss",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_css: Option<String>,

    #[serde(default)]
    pub assets: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftTheme {
    #[serde(default)]
    pub palette: IndexMap<String, String>,

    /// Font families plus sizing numbers (`baseSize`, `scale`, ...)
    #[serde(default)]
    pub fonts: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftSections {
    pub order: Vec<String>,

    #[serde(default)]
    pub content: IndexMap<String, Value>,

    /// Missing entries mean visible
    #[serde(default)]
    pub visibility: IndexMap<String, bool>,
}

impl DraftConfig {
    /// Parse a stored body, reporting a shape mismatch as a validation issue
    pub fn from_value(page_id: &PageId, body: &Value) -> Result<Self, ValidationError> {
        serde_json::from_value(body.clone()).map_err(|e| {
            let mut errors = ValidationError::new(page_id.as_str());
            errors.push("$", e.to_string());
            errors
        })
    }

    /// Convert into a page. Deterministic: the same config always gives the
    /// same blocks, with section ids kept as block ids.
    pub fn to_page(&self, page_id: &PageId, registry: &BlockRegistry) -> Result<Page, ValidationError> {
        let mut errors = ValidationError::new(page_id.as_str());
        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(self.sections.order.len());

        for (index, section_id) in self.sections.order.iter().enumerate() {
            let path = format!("$.sections.order[{}]", index);
            let id = BlockId::new(section_id.as_str());
            let block_type = id.type_prefix();

            if block_type.is_empty() {
                errors.push(path, format!("section id {:?} has no type prefix", section_id));
                continue;
            }
            if !seen.insert(section_id.as_str()) {
                errors.push(path, format!("duplicate section id {}", section_id));
                continue;
            }

            let content = match self.sections.content.get(section_id) {
                None | Some(Value::Null) => Default::default(),
                Some(Value::Object(map)) => map.clone(),
                Some(_) => {
                    errors.push(format!("$.sections.content.{}", section_id), "expected an object");
                    continue;
                }
            };

            if !registry.has(block_type) {
                tracing::warn!("Draft section {} has unregistered type {}", section_id, block_type);
            }

            let block_type = block_type.to_string();
            blocks.push(Block {
                settings: registry.default_settings(&block_type),
                layout: registry.default_layout(&block_type),
                block_type,
                id,
                content,
                is_visible: self.sections.visibility.get(section_id).copied().unwrap_or(true),
                visible_on: ViewportVisibility::default(),
                sort_order: index,
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let title = self.site_title.clone().unwrap_or_else(|| page_id.to_string());
        Page::from_blocks(page_id.clone(), title, DRAFT_PAGE_SLUG, blocks).map_err(|e| {
            errors.push("$.sections.order", e.to_string());
            errors
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> Value {
        json!({
            "templateId": "editorial-minimal",
            "siteTitle": "Ada's Portfolio",
            "theme": {
                "palette": { "primary": "#1a1a1a", "background": "#ffffff" },
                "fonts": { "headingFont": "Playfair Display", "baseSize": 16 }
            },
            "sections": {
                "order": ["hero-1", "about", "gallery-main"],
                "content": {
                    "hero-1": { "headline": "Thinker & Creator" },
                    "gallery-main": { "images": [] }
                },
                "visibility": { "about": false }
            },
            "assets": { "avatar": "", "projectImages": [] }
        })
    }

    #[test]
    fn test_section_without_type_prefix_is_rejected() {
        let registry = BlockRegistry::with_builtins();
        let page_id = PageId::from("site");
        let config = DraftConfig::from_value(
            &page_id,
            &json!({
                "templateId": "editorial-minimal",
                "sections": { "order": ["-x", "text-a-b"], "content": {}, "visibility": {} }
            }),
        )
        .unwrap();

        let err = config.to_page(&page_id, &registry).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path, "$.sections.order[0]");
    }

    #[test]
    fn test_converts_sections_to_blocks() {
        let registry = BlockRegistry::with_builtins();
        let page_id = PageId::from("site");
        let config = DraftConfig::from_value(&page_id, &draft()).unwrap();

        let page = config.to_page(&page_id, &registry).unwrap();

        assert_eq!(page.title, "Ada's Portfolio");
        assert_eq!(page.slug, DRAFT_PAGE_SLUG);
        let ids: Vec<&str> = page.blocks().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["hero-1", "about", "gallery-main"]);
        let types: Vec<&str> = page.blocks().map(|b| b.block_type.as_str()).collect();
        assert_eq!(types, vec!["hero", "about", "gallery"]);

        let hero = page.block_at(0).unwrap();
        assert_eq!(hero.content["headline"], json!("Thinker & Creator"));
        assert_eq!(hero.settings, registry.default_settings("hero"));
        assert!(hero.is_visible);

        let about = page.block_at(1).unwrap();
        assert!(about.content.is_empty());
        assert!(!about.is_visible);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let registry = BlockRegistry::with_builtins();
        let page_id = PageId::from("site");
        let config = DraftConfig::from_value(&page_id, &draft()).unwrap();

        assert_eq!(
            config.to_page(&page_id, &registry).unwrap(),
            config.to_page(&page_id, &registry).unwrap()
        );
    }

    #[test]
    fn test_bad_sections_collect_issues() {
        let registry = BlockRegistry::with_builtins();
        let page_id = PageId::from("site");
        let body = json!({
            "sections": {
                "order": ["hero", "hero", "-odd", "text-1"],
                "content": { "text-1": "just a string" }
            }
        });
        let config = DraftConfig::from_value(&page_id, &body).unwrap();

        let err = config.to_page(&page_id, &registry).unwrap_err();
        let paths: Vec<&str> = err.issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "$.sections.order[1]",
                "$.sections.order[2]",
                "$.sections.content.text-1"
            ]
        );
    }

    #[test]
    fn test_missing_sections_is_rejected() {
        let page_id = PageId::from("site");
        let err = DraftConfig::from_value(&page_id, &json!({ "siteTitle": "x" })).unwrap_err();
        assert_eq!(err.issues.len(), 1);
    }
}
