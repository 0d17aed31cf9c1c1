#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::geometry::Point;
use crate::shape::TableCell;

fn corners(w: f64, h: f64) -> [Point; 2] {
    [Point::new(0.0, 0.0), Point::new(w, h)]
}

fn geometry() -> GeometryShape {
    GeometryShape::new(corners(100.0, 30.0), Some(TextElement::plain("Hi")))
}

// =============================================================
// ShapeElement serde
// =============================================================

#[test]
fn shape_element_is_tagged_by_kind() {
    let id = Uuid::new_v4();
    let value: ShapeElement = serde_json::from_value(json!({
        "kind": "table",
        "id": id,
        "points": [{ "x": 0.0, "y": 0.0 }, { "x": 10.0, "y": 10.0 }],
        "cells": []
    }))
    .unwrap();
    assert!(matches!(value, ShapeElement::Table(_)));
    assert_eq!(value.id(), id);
    assert!(value.is_multi_text());
}

#[test]
fn geometry_serializes_with_snake_case_tag() {
    let json = serde_json::to_value(ShapeElement::from(geometry())).unwrap();
    assert_eq!(json["kind"], json!("geometry"));
    assert_eq!(json["text"], json!({ "children": [{ "text": "Hi" }] }));
}

#[test]
fn element_delegates_to_shape() {
    let shape = geometry();
    let key = shape.id.to_string();
    let element = ShapeElement::from(shape.clone());
    assert_eq!(element.rectangle(), shape.rectangle());
    assert_eq!(element.text_rectangle(&key, 4.0), shape.text_rectangle(&key, 4.0));
    assert_eq!(element.text_regions(), shape.text_regions());
}

// =============================================================
// DocStore
// =============================================================

#[test]
fn insert_get_remove() {
    let mut doc = DocStore::new();
    let shape = geometry();
    let id = shape.id;
    doc.insert(shape);
    assert_eq!(doc.len(), 1);
    assert!(doc.get(&id).is_some());
    assert!(doc.remove(&id).is_some());
    assert!(doc.is_empty());
}

#[test]
fn set_text_updates_region_content_and_size() {
    let mut doc = DocStore::new();
    let shape = geometry();
    let id = shape.id;
    doc.insert(shape);
    assert!(doc.set_text(&id, &id.to_string(), TextElement::plain("Hello"), 35.0, 40.0));
    let regions = doc.get(&id).unwrap().text_regions();
    assert_eq!(regions[0].content, Some(TextElement::plain("Hello")));
    assert_eq!(regions[0].text_height, 40.0);
    assert!(matches!(doc.get(&id), Some(ShapeElement::Geometry(g)) if g.text_width == 35.0));
}

#[test]
fn set_text_size_keeps_content() {
    let mut doc = DocStore::new();
    let cell = TableCell::new("c1", corners(100.0, 40.0), Some(TextElement::plain("a")));
    let table = TableShape::new(corners(100.0, 40.0), vec![cell]);
    let id = table.id;
    doc.insert(table);
    assert!(doc.set_text_size(&id, "c1", 12.0, 33.0));
    let regions = doc.get(&id).unwrap().text_regions();
    assert_eq!(regions[0].content, Some(TextElement::plain("a")));
    assert_eq!(regions[0].text_height, 33.0);
    assert!(matches!(doc.get(&id), Some(ShapeElement::Table(t)) if t.cell("c1").unwrap().text_width == 12.0));
}

#[test]
fn set_text_on_missing_target_returns_false() {
    let mut doc = DocStore::new();
    assert!(!doc.set_text(&Uuid::new_v4(), "k", TextElement::plain("x"), 1.0, 1.0));
    let shape = geometry();
    let id = shape.id;
    doc.insert(shape);
    assert!(!doc.set_text_size(&id, "not-a-region", 1.0, 1.0));
}

#[test]
fn load_snapshot_replaces_everything() {
    let mut doc = DocStore::new();
    doc.insert(geometry());
    let kept = geometry();
    let id = kept.id;
    doc.load_snapshot(vec![kept.into()]);
    assert_eq!(doc.len(), 1);
    assert!(doc.get(&id).is_some());
}
