//! Property-based tests for page ordering.
//!
//! Verifies, for arbitrary sequences of operations:
//! - Sort orders are always exactly 0..N-1 in list order
//! - Block ids stay unique
//! - Moving a block away and back restores the order
//! - Undo right after any operation restores the previous page

use std::collections::HashSet;
use std::sync::Arc;

use pagecraft_editor::{BlockRegistry, EditSession, Page, PageId};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(&'static str),
    AddAfter(usize, &'static str),
    Delete(usize),
    Move(usize, usize),
    Duplicate(usize),
}

fn block_type_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["hero", "text", "image", "gallery", "form", "carousel"])
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        block_type_strategy().prop_map(Op::Add),
        (any::<usize>(), block_type_strategy()).prop_map(|(i, t)| Op::AddAfter(i, t)),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), 0usize..20).prop_map(|(i, to)| Op::Move(i, to)),
        any::<usize>().prop_map(Op::Duplicate),
    ]
}

fn new_session() -> EditSession {
    EditSession::new(
        Page::new(PageId::from("prop"), "Prop", "prop"),
        Arc::new(BlockRegistry::with_builtins()),
    )
}

/// Apply `op`, picking existing blocks by index modulo the page length
fn run(session: &mut EditSession, op: &Op) {
    let ids = session.page().block_ids();
    let pick = |i: usize| ids.get(i % ids.len().max(1)).cloned();

    match op {
        Op::Add(block_type) => {
            session.add_block(block_type, None).unwrap();
        }
        Op::AddAfter(i, block_type) => {
            let anchor = pick(*i);
            session.add_block(block_type, anchor.as_ref()).unwrap();
        }
        Op::Delete(i) => {
            if let Some(id) = pick(*i) {
                session.delete_block(&id).unwrap();
            }
        }
        Op::Move(i, to) => {
            if let Some(id) = pick(*i) {
                session.move_block(&id, *to).unwrap();
            }
        }
        Op::Duplicate(i) => {
            if let Some(id) = pick(*i) {
                session.duplicate_block(&id).unwrap();
            }
        }
    }
}

// =============================================================================
// ORDERING PROPERTIES
// =============================================================================

mod ordering_properties {
    use super::*;

    proptest! {
        /// Sort orders are contiguous and ids unique after any sequence
        #[test]
        fn sort_orders_stay_contiguous(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut session = new_session();
            for op in &ops {
                run(&mut session, op);

                let page = session.page();
                let orders: Vec<usize> = page.blocks().map(|b| b.sort_order).collect();
                prop_assert_eq!(orders, (0..page.len()).collect::<Vec<_>>());

                let unique: HashSet<_> = page.block_ids().into_iter().collect();
                prop_assert_eq!(unique.len(), page.len());
            }
        }

        /// move(id, i) then move(id, original) restores the order
        #[test]
        fn move_and_back_restores_order(
            count in 1usize..12,
            pick in any::<usize>(),
            to in 0usize..12,
        ) {
            let mut session = new_session();
            for _ in 0..count {
                session.add_block("text", None).unwrap();
            }
            let before = session.page().block_ids();
            let id = before[pick % count].clone();
            let original = session.page().index_of(&id).unwrap();

            session.move_block(&id, to).unwrap();
            session.move_block(&id, original).unwrap();

            prop_assert_eq!(session.page().block_ids(), before);
        }

        /// Undo right after an operation restores the prior page exactly
        #[test]
        fn undo_restores_prior_page(
            setup in prop::collection::vec(op_strategy(), 0..15),
            last in op_strategy(),
        ) {
            let mut session = new_session();
            for op in &setup {
                run(&mut session, op);
            }
            let before = session.page().clone();
            let levels = session.history().undo_levels();

            run(&mut session, &last);
            let after = session.page().clone();

            if session.history().undo_levels() > levels || after != before {
                prop_assert!(session.undo());
                prop_assert_eq!(session.page(), &before);
                prop_assert!(session.redo());
                prop_assert_eq!(session.page(), &after);
            }
        }
    }
}
