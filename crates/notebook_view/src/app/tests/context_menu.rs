//! Context-menu actions routed through delegates into the edit queue.

use super::*;

#[test]
fn menus_differ_by_cell_kind() {
    let mut harness = make_editor();
    harness.load(document(vec![markdown(&["m\n"]), code(&["c\n"])]));
    let ids = harness.ids();

    let md_actions = harness.editor.open_context_menu(ids[0]).expect("markdown menu");
    let code_actions = harness.editor.open_context_menu(ids[1]).expect("code menu");
    for actions in [&md_actions, &code_actions] {
        assert!(actions.contains(&ContextAction::Delete));
        for kind in [CellKind::Markdown, CellKind::Code] {
            for direction in [InsertDirection::Above, InsertDirection::Below] {
                assert!(actions.contains(&ContextAction::Insert { kind, direction }));
            }
        }
    }
    assert!(md_actions.contains(&ContextAction::ToggleEditing));
    assert!(!code_actions.contains(&ContextAction::ToggleEditing));
    assert_eq!(
        ContextAction::Insert {
            kind: CellKind::Code,
            direction: InsertDirection::Below
        }
        .label(),
        "Insert code cell below"
    );
}

#[test]
fn chosen_actions_apply_on_the_next_frame() {
    let mut harness = make_editor();
    harness.load(numbered_code_cells(2));
    let ids = harness.ids();

    harness
        .editor
        .choose_context_action(
            ids[1],
            ContextAction::Insert {
                kind: CellKind::Markdown,
                direction: InsertDirection::Above,
            },
        )
        .expect("choose insert");
    assert_eq!(harness.editor.cells().len(), 2, "edits are queued, not inline");

    let report = harness.editor.pump();
    assert_eq!(report.edits_applied, 1);
    let now = harness.ids();
    assert_eq!(now.len(), 3);
    assert_eq!(now[0], ids[0]);
    assert_eq!(now[2], ids[1]);
    assert!(harness.editor.cells()[1].is_editing());
    assert_ordering(&harness.editor);

    harness
        .editor
        .choose_context_action(ids[0], ContextAction::Delete)
        .expect("choose delete");
    let report = harness.editor.pump();
    assert_eq!(report.edits_applied, 1);
    assert_eq!(harness.ids(), vec![now[1], ids[1]]);
}

#[test]
fn queued_action_for_a_cell_deleted_meanwhile_fails_quietly() {
    let mut harness = make_editor();
    harness.load(numbered_code_cells(2));
    let ids = harness.ids();

    harness
        .editor
        .choose_context_action(
            ids[0],
            ContextAction::Insert {
                kind: CellKind::Code,
                direction: InsertDirection::Below,
            },
        )
        .expect("choose");
    harness.editor.delete_cell(ids[0]).expect("delete");

    let report = harness.editor.pump();
    assert_eq!(report.edits_failed, 1);
    assert_eq!(report.edits_applied, 0);
    assert_eq!(harness.ids(), vec![ids[1]]);
    assert_ordering(&harness.editor);
}

#[test]
fn toggle_editing_round_trips_through_the_queue() {
    let mut harness = make_editor();
    harness.load(document(vec![markdown(&["text\n"])]));
    let id = harness.ids()[0];

    harness
        .editor
        .choose_context_action(id, ContextAction::ToggleEditing)
        .expect("toggle on");
    harness.editor.pump();
    assert!(harness.editor.cell(id).expect("cell").is_editing());

    harness
        .editor
        .choose_context_action(id, ContextAction::ToggleEditing)
        .expect("toggle off");
    harness.editor.pump();
    assert!(!harness.editor.cell(id).expect("cell").is_editing());
}
