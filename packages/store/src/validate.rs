//! Strict structural checks for stored pages.
//!
//! A stored page is only hydrated when every check passes; otherwise all
//! issues are reported together in one [`ValidationError`].
//!
//! Blocks are ordered by their stored `sort_order` (array position when it
//! is absent) and then renumbered to `0..n`.

use std::collections::HashSet;

use pagecraft_editor::{Block, Page, PageId};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Which shape a stored document has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `{ id, title, slug, blocks: [...] }`
    Page,
    /// Legacy whole-site draft config: `{ siteTitle, theme, sections, ... }`
    DraftConfig,
}

impl DocumentFormat {
    /// Sniff the shape of `body`. `None` when it is neither.
    pub fn detect(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        if object.contains_key("blocks") {
            Some(DocumentFormat::Page)
        } else if object.contains_key("sections") {
            Some(DocumentFormat::DraftConfig)
        } else {
            None
        }
    }
}

/// Validate a stored page body and hydrate it
pub fn page_from_value(page_id: &PageId, body: &Value) -> Result<Page, ValidationError> {
    let mut errors = ValidationError::new(page_id.as_str());

    let Some(object) = body.as_object() else {
        errors.push("$", "expected an object");
        return Err(errors);
    };

    let title = expect_string(object, "title", "$.title", &mut errors);
    let slug = expect_string(object, "slug", "$.slug", &mut errors);
    if let Some(id) = object.get("id") {
        if id.as_str() != Some(page_id.as_str()) {
            errors.push("$.id", format!("does not match page id {}", page_id));
        }
    }

    let mut ordered = Vec::new();
    match object.get("blocks") {
        Some(Value::Array(items)) => {
            let mut seen = HashSet::new();
            for (index, item) in items.iter().enumerate() {
                if let Some(block) = check_block(index, item, &mut seen, &mut errors) {
                    let stored = item.get("sort_order").and_then(Value::as_u64);
                    ordered.push((stored.unwrap_or(index as u64), block));
                }
            }
        }
        Some(_) => errors.push("$.blocks", "expected an array"),
        None => errors.push("$.blocks", "missing"),
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Stable, so equal sort orders keep array order
    ordered.sort_by_key(|(order, _)| *order);
    let blocks: Vec<Block> = ordered.into_iter().map(|(_, block)| block).collect();

    Page::from_blocks(page_id.clone(), title.unwrap_or_default(), slug.unwrap_or_default(), blocks).map_err(|e| {
        errors.push("$.blocks", e.to_string());
        errors
    })
}

fn expect_string(object: &Map<String, Value>, key: &str, path: &str, errors: &mut ValidationError) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(path, "expected a string");
            None
        }
        None => {
            errors.push(path, "missing");
            None
        }
    }
}

fn check_block(index: usize, item: &Value, seen: &mut HashSet<String>, errors: &mut ValidationError) -> Option<Block> {
    let path = format!("$.blocks[{}]", index);
    let Some(object) = item.as_object() else {
        errors.push(path, "expected an object");
        return None;
    };
    let before = errors.issues.len();

    match object.get("id").and_then(Value::as_str) {
        Some("") => errors.push(format!("{}.id", path), "is empty"),
        Some(id) => {
            if !seen.insert(id.to_string()) {
                errors.push(format!("{}.id", path), format!("duplicate block id {}", id));
            }
        }
        None => errors.push(format!("{}.id", path), "expected a string"),
    }

    match object.get("block_type").and_then(Value::as_str) {
        Some("") => errors.push(format!("{}.block_type", path), "is empty"),
        Some(_) => {}
        None => errors.push(format!("{}.block_type", path), "expected a string"),
    }

    match object.get("content") {
        Some(Value::Object(_)) => {}
        Some(_) => errors.push(format!("{}.content", path), "expected an object"),
        None => errors.push(format!("{}.content", path), "missing"),
    }

    for key in ["settings", "layout", "visible_on"] {
        if let Some(value) = object.get(key) {
            if !value.is_object() {
                errors.push(format!("{}.{}", path, key), "expected an object");
            }
        }
    }
    if let Some(value) = object.get("is_visible") {
        if !value.is_boolean() {
            errors.push(format!("{}.is_visible", path), "expected a boolean");
        }
    }
    if let Some(value) = object.get("sort_order") {
        if !value.is_u64() {
            errors.push(format!("{}.sort_order", path), "expected a non-negative integer");
        }
    }

    if errors.issues.len() > before {
        return None;
    }

    // Shape is right; remaining type errors (e.g. inside visible_on) surface here
    match serde_json::from_value::<Block>(item.clone()) {
        Ok(block) => Some(block),
        Err(e) => {
            errors.push(path, e.to_string());
            None
        }
    }
}
