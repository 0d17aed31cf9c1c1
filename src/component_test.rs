#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::ShapeElement;
use crate::editor::EditInput;
use crate::geometry::Rect;
use crate::overlay::OverlayState;
use crate::shape::{GeometryShape, TableCell, TableShape};

fn corners(x: f64, y: f64, w: f64, h: f64) -> [Point; 2] {
    [Point::new(x, y), Point::new(x + w, y + h)]
}

fn table_with_vertical_cell() -> TableShape {
    let mut side = TableCell::new("side", corners(0.0, 0.0, 40.0, 100.0), Some(TextElement::plain("v")));
    side.vertical = true;
    let body = TableCell::new("body", corners(40.0, 0.0, 100.0, 100.0), Some(TextElement::plain("h")));
    TableShape::new(corners(0.0, 0.0, 140.0, 100.0), vec![side, body])
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_draws_into_element_group_under_root() {
    let mut board = Board::new();
    let shape = GeometryShape::new(corners(0.0, 0.0, 100.0, 30.0), Some(TextElement::plain("Hi")));
    let component = ShapeTextComponent::new(&mut board, shape);
    let root = board.surface.scene.root();
    assert_eq!(board.surface.scene.parent(component.element_group()), Some(root));
    let managers = component.generator().managers(&board);
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0].state(), OverlayState::Mounted);
    assert_eq!(board.surface.scene.parent(managers[0].group().unwrap()), Some(component.element_group()));
}

#[test]
fn vertical_cells_are_rotated_and_marked() {
    let mut board = Board::new();
    let table = table_with_vertical_cell();
    let component = ShapeTextComponent::new(&mut board, table);
    let managers = component.generator().managers(&board);

    let side = managers[0].group().unwrap();
    assert!(board.surface.scene.has_class(side, VERTICAL_CELL_TEXT_CLASS));
    let rotation = board.surface.scene.get(side).unwrap().rotation.unwrap();
    assert_eq!(rotation.angle, VERTICAL_TEXT_ANGLE);
    // Render box is (6, 6, 20, 88); rotation turns it around its center.
    assert_eq!(rotation.center, Point::new(16.0, 50.0));

    let body = managers[1].group().unwrap();
    assert!(!board.surface.scene.has_class(body, VERTICAL_CELL_TEXT_CLASS));
    assert!(board.surface.scene.get(body).unwrap().rotation.is_none());
}

#[test]
fn vertical_rotation_survives_update() {
    let mut board = Board::new();
    let table = table_with_vertical_cell();
    let mut component = ShapeTextComponent::new(&mut board, table.clone());
    let mut changed = table;
    if let Some(cell) = changed.cell_mut("side") {
        cell.text = Some(TextElement::plain("new"));
    }
    component.on_context_changed(&mut board, changed);
    let side = component.generator().managers(&board)[0].group().unwrap();
    assert!(board.surface.scene.get(side).unwrap().rotation.is_some());
}

// =============================================================
// Edit round trip through the document
// =============================================================

#[test]
fn edit_commits_to_doc_and_flows_back() {
    let mut board = Board::new();
    board.surface.viewport.zoom = 2.0;
    let mut doc = DocStore::new();
    let table = TableShape::new(
        corners(0.0, 0.0, 100.0, 40.0),
        vec![TableCell::new("c1", corners(0.0, 0.0, 100.0, 40.0), Some(TextElement::plain("ab")))],
    );
    let id = table.id;
    doc.insert(table.clone());
    let mut component = ShapeTextComponent::new(&mut board, ShapeElement::from(table));

    component.enter_edit(&mut board, "c1", None).unwrap();
    component.handle_editor_event(&mut board, "c1", EditorEvent::Input(EditInput::InsertText("c".into())));

    let queued = component.take_changes();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].key, "c1");
    assert_eq!(queued[0].shape_id, id);
    assert_eq!((queued[0].width, queued[0].height), (21.0, 20.0));

    // Re-queue by editing again, then commit.
    component.handle_editor_event(&mut board, "c1", EditorEvent::Input(EditInput::InsertText("d".into())));
    assert_eq!(component.apply_changes(&mut doc), 1);
    let stored = doc.get(&id).unwrap().clone();
    assert_eq!(stored.text_regions()[0].content, Some(TextElement::plain("abcd")));
    // Both measured dimensions land on the cell, in document units.
    let ShapeElement::Table(ref table) = stored else {
        panic!("stored shape is not a table");
    };
    let cell = table.cell("c1").unwrap();
    assert_eq!((cell.text_width, cell.text_height), (28.0, 20.0));

    component.on_context_changed(&mut board, stored);
    let manager = component.generator().managers(&board)[0];
    assert!(manager.is_editing());
    assert_eq!(manager.plain_content().unwrap().plain_text(), "abcd");
}

#[test]
fn size_only_report_updates_height() {
    let mut board = Board::new();
    let mut doc = DocStore::new();
    let mut shape = GeometryShape::new(corners(0.0, 0.0, 100.0, 30.0), Some(TextElement::plain("abc")));
    shape.text_height = 50.0;
    let id = shape.id;
    let key = id.to_string();
    doc.insert(shape.clone());
    let component = ShapeTextComponent::new(&mut board, ShapeElement::from(shape));

    component.enter_edit(&mut board, &key, None).unwrap();
    component.handle_editor_event(&mut board, &key, EditorEvent::CompositionStart);
    component.handle_editor_event(&mut board, &key, EditorEvent::CompositionUpdate("X".into()));
    let queued = component.take_changes();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].new_text, None);

    component.handle_editor_event(&mut board, &key, EditorEvent::CompositionUpdate("Y".into()));
    assert_eq!(component.apply_changes(&mut doc), 1);
    let regions = doc.get(&id).unwrap().text_regions();
    assert_eq!(regions[0].content, Some(TextElement::plain("abc")));
    assert_eq!(regions[0].text_height, 20.0);
    // Caret sits at the end, so the preview measured "abcY".
    assert!(matches!(doc.get(&id), Some(ShapeElement::Geometry(g)) if g.text_width == 28.0));
}

#[test]
fn outside_click_exit_through_board() {
    let mut board = Board::new();
    let shape = GeometryShape::new(corners(0.0, 0.0, 100.0, 30.0), Some(TextElement::plain("Hi")));
    let key = shape.id.to_string();
    let component = ShapeTextComponent::new(&mut board, shape);
    component.enter_edit(&mut board, &key, None).unwrap();

    let fo = component.generator().managers(&board)[0].foreign_object().unwrap();
    assert_eq!(board.surface.scene.foreign_object_rect(fo), Some(Rect::new(6.0, 5.0, 88.0, 20.0)));

    assert_eq!(board.on_pointer_down(&crate::input::PointerEvent::at(Point::new(300.0, 300.0))), 1);
    assert_eq!(board.run_deferred(), 1);
    assert!(!component.generator().managers(&board)[0].is_editing());
}

// =============================================================
// Destroy
// =============================================================

#[test]
fn destroy_removes_group_and_managers() {
    let mut board = Board::new();
    let mut component = ShapeTextComponent::new(&mut board, table_with_vertical_cell());
    component.destroy(&mut board);
    assert!(board.texts.is_empty());
    assert_eq!(board.surface.scene.len(), 1);
    assert!(component.take_changes().is_empty());
}
