//! Measured heights flow back into the list one frame later.

use super::*;

fn code_editor_node(editor: &NotebookEditor, cell: CellId) -> crate::host::NodeId {
    match editor.list().slot_for(cell).expect("bound").content() {
        SlotContent::Code(content) => content.editor_node,
        other => panic!("expected a code slot, got {:?}", other),
    }
}

#[test]
fn heuristic_height_until_measurement_then_latched() {
    let mut harness = make_editor();
    let source: Vec<String> = (0..10).map(|line| format!("x{line} = {line}\n")).collect();
    harness.load(document(vec![CellRecord::new(CellKind::Code, source, Vec::new())]));
    let id = harness.ids()[0];

    let cell = harness.editor.cell(id).expect("cell");
    assert_eq!(cell.height(18.0), 214.0);
    assert!(cell.has_pending_measurement());
    assert_eq!(harness.editor.list().item_height(0), Some(214.0));

    let node = code_editor_node(&harness.editor, id);
    harness.editor.report_node_size(node, 284.0);
    let report = harness.editor.pump();
    assert_eq!(report.heights_scheduled, 1);
    assert_eq!(report.heights_applied, 0);
    assert!(harness.editor.cell(id).expect("cell").has_pending_measurement());
    assert_eq!(harness.editor.pending_height_updates(), 1);

    let report = harness.editor.pump();
    assert_eq!(report.heights_applied, 1);
    let cell = harness.editor.cell(id).expect("cell");
    assert!(!cell.has_pending_measurement());
    assert_eq!(cell.height(18.0), 300.0);
    assert_eq!(cell.height(40.0), 300.0);
    assert_eq!(harness.editor.list().item_height(0), Some(300.0));
    assert!(!harness.editor.list().items()[0].pending_measurement);
}

#[test]
fn deferred_update_for_a_deleted_cell_is_dropped() {
    let mut harness = make_editor();
    harness.load(numbered_code_cells(3));
    let ids = harness.ids();

    let node = code_editor_node(&harness.editor, ids[1]);
    harness.editor.report_node_size(node, 400.0);
    let report = harness.editor.pump();
    assert_eq!(report.heights_scheduled, 1);

    harness.editor.delete_cell(ids[1]).expect("delete");
    let heights_before: Vec<f32> = harness
        .editor
        .list()
        .items()
        .iter()
        .map(|item| item.height)
        .collect();
    let total_before = harness.editor.list().total_height();

    let report = harness.editor.pump();
    assert_eq!(report.heights_dropped, 1);
    assert_eq!(report.heights_applied, 0);
    let heights_after: Vec<f32> = harness
        .editor
        .list()
        .items()
        .iter()
        .map(|item| item.height)
        .collect();
    assert_eq!(heights_after, heights_before);
    assert_eq!(harness.editor.list().total_height(), total_before);
    assert_ordering(&harness.editor);
}

#[test]
fn deferred_update_follows_a_cell_shifted_by_an_insert() {
    let mut harness = make_editor();
    harness.load(numbered_code_cells(2));
    let ids = harness.ids();

    let node = code_editor_node(&harness.editor, ids[1]);
    harness.editor.report_node_size(node, 150.0);
    harness.editor.pump();
    harness
        .editor
        .insert_empty_cell(ids[0], CellKind::Code, InsertDirection::Above)
        .expect("insert");

    let report = harness.editor.pump();
    assert_eq!(report.heights_applied, 1);
    assert_eq!(harness.editor.list().cell_at(2), Some(ids[1]));
    assert_eq!(harness.editor.list().item_height(2), Some(166.0));
}

#[test]
fn settled_layout_reports_each_cell_once() {
    let mut harness = make_editor();
    let mut records = vec![markdown(&["# Title\n", "\n", "Some prose.\n"])];
    let mut with_output = code(&["for i in range(3):\n", "    print(i)\n"]);
    with_output.outputs.push(stream_output("0\n1\n2\n"));
    records.push(with_output);
    harness.load(document(records));

    let frames = harness
        .editor
        .run_until_settled(&HeadlessMeasurer::new(18.0), 16);
    assert!(frames < 16, "layout never settled");
    for cell in harness.editor.cells() {
        assert!(!cell.has_pending_measurement());
    }
    // Markdown: two text rows plus chrome. Code: two editor rows, three output rows, chrome.
    assert_eq!(harness.editor.list().item_height(0), Some(2.0 * 18.0 + 16.0));
    assert_eq!(harness.editor.list().item_height(1), Some(5.0 * 18.0 + 16.0));

    assert_eq!(harness.measure(), 3);
    let report = harness.editor.pump();
    assert!(report.is_quiet(), "unchanged sizes must not re-report: {:?}", report);
}

#[test]
fn scrolling_recycles_slots_without_leaking_observers() {
    let mut harness = make_editor();
    harness.editor.layout(800.0, 300.0);
    harness.load(numbered_code_cells(40));
    let mut peak_rows = harness.editor.list().rows().len();

    for top in [600.0, 1800.0, 300.0, 5000.0, 0.0] {
        harness.editor.scroll_to(top);
        harness.editor.pump();
        assert_no_leaked_observers(&harness.editor);
        for row in harness.editor.list().rows() {
            assert_eq!(row.slot().bound_cell(), Some(row.cell()));
        }
        peak_rows = peak_rows.max(harness.editor.list().rows().len());
    }
    assert!(peak_rows < 40);
    let total_slots = harness.editor.list().rows().len() + harness.editor.list().pooled_slots();
    assert_eq!(total_slots, peak_rows, "slots are recycled, not reallocated");
}
