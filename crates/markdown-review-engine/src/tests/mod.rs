//! Cross-module properties of diffing, rendering and the document store.


use rstest::rstest;

use crate::changes::{DocumentStore, InsertOptions};
use crate::diff::DiffEngine;
use crate::models::{Element, ElementMetadata, InsertPosition};

const PAIRS: &[(&str, &str)] = &[
    ("- Alpha\n- Beta\n- Gamma\n", "- Alpha\n- Beta2\n- Gamma\n"),
    ("Hello wrld", "Hello world"),
    ("The quick brown fox.\n", "A quick red fox jumped.\n"),
    ("one\ntwo\nthree\n", "zero\none\nthree\nfour\n"),
    ("- a\n  - nested\n- b\n", "- a\n  - nested, edited\n- b\n- c\n"),
    ("| h1 | h2 |\n|----|----|\n| x | y |\n", "| h1 | h2 |\n|----|----|\n| x | z |\n"),
    ("naïve café\n", "naive café au lait\n"),
    ("1. first\n2. second\n", "1. first\n2. second\n3. third\n"),
    ("", "Brand new paragraph.\n"),
    ("Going away.\n", ""),
    ("# Heading\n\nBody.\n", "## Heading\n\nBody text.\n"),
    ("line one\r\nline two\r\n", "line one\r\nline 2\r\n"),
];

#[test]
fn replaying_changes_reconstructs_new_text() {
    for (old, new) in PAIRS {
        invariants::check_replay(old, new);
        invariants::check_replay(new, old);
    }
}

#[test]
fn rendering_round_trips() {
    for (old, new) in PAIRS {
        invariants::check_round_trip(old, new);
        invariants::check_round_trip(new, old);
    }
}

#[rstest]
#[case(DiffEngine::chars())]
#[case(DiffEngine::words())]
#[case(DiffEngine::lines())]
fn diffing_against_itself_is_one_common_run(#[case] engine: DiffEngine) {
    for (old, _) in PAIRS.iter().filter(|(old, _)| !old.is_empty()) {
        invariants::check_identity(&engine, old);
    }
}

#[rstest]
#[case(DiffEngine::chars())]
#[case(DiffEngine::words())]
#[case(DiffEngine::lines())]
fn stepped_search_matches_one_shot(#[case] engine: DiffEngine) {
    for (old, new) in PAIRS {
        invariants::check_stepping(&engine, old, new);
    }
}

#[rstest]
#[case("a b c\n", "a  b   c\n")]
#[case("text\n", "text  \n")]
#[case("- item\n", "-   item\n")]
#[case("end of line  \n", "end of line\n")]
fn whitespace_only_edits_render_plain(#[case] old: &str, #[case] new: &str) {
    invariants::check_whitespace_only(old, new);
}

#[test]
fn undoing_everything_restores_the_original() {
    let original = vec![
        Element::new("h1", "# Title", ElementMetadata::heading(1)),
        Element::new("p1", "Body.", ElementMetadata::paragraph()),
        Element::new("p2", "More body.", ElementMetadata::paragraph()),
    ];
    let mut store = DocumentStore::new(original.clone()).unwrap();

    store.edit("p1", "Body, edited.", None, None).unwrap();
    let inserted = store
        .insert(
            "Inserted.",
            ElementMetadata::paragraph(),
            InsertPosition::after("p1"),
            None,
            InsertOptions::default(),
        )
        .unwrap();
    store.move_element("h1", 0, 3, None).unwrap();
    store.delete("p2", None).unwrap();
    store
        .edit(&inserted, "Inserted, then edited.", None, None)
        .unwrap();

    let operations = store.operations().len();
    assert_eq!(operations, 5);
    for _ in 0..operations {
        assert!(store.undo());
    }
    assert!(!store.undo());
    assert_eq!(store.current_state(), original);

    for _ in 0..operations {
        assert!(store.redo());
    }
    let ids: Vec<String> = store.current_state().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["p1".to_string(), inserted, "h1".to_string()]);
}

#[test]
fn new_operation_after_undo_discards_redo() {
    let mut store =
        DocumentStore::new(vec![Element::new("p1", "Body.", ElementMetadata::paragraph())])
            .unwrap();
    store.edit("p1", "One.", None, None).unwrap();
    store.edit("p1", "Two.", None, None).unwrap();
    store.edit("p1", "Three.", None, None).unwrap();

    store.undo();
    store.undo();
    store.edit("p1", "Branch.", None, None).unwrap();

    assert!(!store.can_redo());
    assert_eq!(store.operations().len(), 2);
    assert_eq!(store.element_content("p1").unwrap(), "Branch.");
}
