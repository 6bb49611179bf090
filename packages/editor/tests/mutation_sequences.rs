//! Tests for longer mutation sequences
//!
//! This tests:
//! - Add / move / delete chains
//! - Undo/redo sequences
//! - Batched mutations
//! - Page integrity after operations

use std::sync::Arc;

use pagecraft_editor::{BlockPatch, BlockRegistry, EditSession, KeyMove, Page, PageId, DEFAULT_MAX_LEVELS};
use serde_json::json;

fn session() -> EditSession {
    EditSession::new(
        Page::new(PageId::from("home"), "Home", "home"),
        Arc::new(BlockRegistry::with_builtins()),
    )
}

fn assert_contiguous(page: &Page) {
    let orders: Vec<usize> = page.blocks().map(|b| b.sort_order).collect();
    let expected: Vec<usize> = (0..page.len()).collect();
    assert_eq!(orders, expected);
}

fn patch(value: serde_json::Value) -> BlockPatch {
    BlockPatch::content(value.as_object().cloned().unwrap())
}

#[test]
fn test_move_then_delete_sequence() {
    let mut session = session();
    let hero = session.add_block("hero", None).unwrap();
    let text = session.add_block("text", None).unwrap();
    let form = session.add_block("form", None).unwrap();

    session.move_block(&form, 0).unwrap();
    assert_contiguous(session.page());
    session.delete_block(&hero).unwrap();
    assert_contiguous(session.page());

    assert_eq!(session.page().block_ids(), vec![form.clone(), text.clone()]);

    // Undo delete, then undo move
    session.undo();
    assert_eq!(session.page().block_ids(), vec![form.clone(), hero.clone(), text.clone()]);
    session.undo();
    assert_eq!(session.page().block_ids(), vec![hero, text, form]);
    assert_contiguous(session.page());
}

#[test]
fn test_successive_updates_merge() {
    let mut session = session();
    let text = session.add_block("text", None).unwrap();

    session.update_block(&text, patch(json!({ "a": 1 }))).unwrap();
    session.update_block(&text, patch(json!({ "b": 2 }))).unwrap();

    let content = &session.page().get(&text).unwrap().content;
    assert_eq!(content["a"], json!(1));
    assert_eq!(content["b"], json!(2));
    assert_eq!(content["text"], json!("Start typing your content here..."));
}

#[test]
fn test_undo_all_then_redo_all() {
    let mut session = session();
    let mut pages = vec![session.page().clone()];

    let hero = session.add_block("hero", None).unwrap();
    pages.push(session.page().clone());
    session.add_block("text", Some(&hero)).unwrap();
    pages.push(session.page().clone());
    session.update_block(&hero, patch(json!({ "headline": "Hello" }))).unwrap();
    pages.push(session.page().clone());
    session.key_move(&hero, KeyMove::Bottom).unwrap();
    pages.push(session.page().clone());

    for expected in pages.iter().rev().skip(1) {
        assert!(session.undo());
        assert_eq!(session.page(), expected);
    }
    assert!(!session.undo());

    for expected in pages.iter().skip(1) {
        assert!(session.redo());
        assert_eq!(session.page(), expected);
    }
    assert!(!session.redo());
}

#[test]
fn test_new_edit_after_undo_drops_redo() {
    let mut session = session();
    session.add_block("hero", None).unwrap();
    session.add_block("text", None).unwrap();

    session.undo();
    assert!(session.can_redo());

    session.add_block("gallery", None).unwrap();
    assert!(!session.can_redo());
    let types: Vec<&str> = session.page().blocks().map(|b| b.block_type.as_str()).collect();
    assert_eq!(types, vec!["hero", "gallery"]);
}

#[test]
fn test_batched_mutations_undo_together() {
    let mut session = session();
    session.begin_batch("Build page");
    let hero = session.add_block("hero", None).unwrap();
    session.add_block("text", Some(&hero)).unwrap();
    session.add_block("form", None).unwrap();
    session.end_batch();

    assert_eq!(session.history().undo_levels(), 1);
    assert_eq!(session.history().undo_description(), Some("Build page"));

    session.undo();
    assert!(session.page().is_empty());
    session.redo();
    assert_eq!(session.page().len(), 3);
}

#[test]
fn test_history_depth_is_bounded() {
    let mut session = session();
    for _ in 0..(DEFAULT_MAX_LEVELS + 10) {
        session.add_block("text", None).unwrap();
    }

    assert_eq!(session.history().undo_levels(), DEFAULT_MAX_LEVELS);
    while session.undo() {}

    // The oldest ten states were dropped
    assert_eq!(session.page().len(), 10);
}

#[test]
fn test_delete_only_block_scenario() {
    let mut session = session();
    let hero = session.add_block("hero", None).unwrap();
    session.hover(Some(hero.clone()));

    session.delete_block(&hero).unwrap();

    assert!(session.page().is_empty());
    assert_eq!(session.selected(), None);
    assert_eq!(session.hovered(), None);

    // Undo brings it back but not the selection
    session.undo();
    assert!(session.page().contains(&hero));
    assert_eq!(session.selected(), None);
}
