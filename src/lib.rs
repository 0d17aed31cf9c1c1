//! Editable text overlays for whiteboard shapes.
//!
//! Every text-bearing shape region (a geometry label, a table cell) gets a
//! [`overlay::TextManager`] that mounts a foreign-object overlay into the
//! scene, keeps it sized to the region, runs the edit session, and reports
//! measured sizes back to the owner. A [`generator::TextGenerator`] keeps the
//! set of managers for one shape reconciled with the shape's current regions,
//! and [`component::ShapeTextComponent`] commits the reports into the
//! [`doc::DocStore`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`board`] | Board context: scene, viewport, flags, deferred queue, registry |
//! | [`overlay`] | Per-region overlay manager and edit session lifecycle |
//! | [`registry`] | Key to manager map and shape to keys table |
//! | [`generator`] | Reconciles a shape's regions with its managers |
//! | [`component`] | Shape-level wrapper; queues and commits text changes |
//! | [`shape`] | Shape model and the [`shape::TextShape`] region contract |
//! | [`doc`] | In-memory document store of shape elements |
//! | [`content`] | Rich-text value, selections, composition shadow |
//! | [`editor`] | Editable text model driven by [`editor::EditInput`] |
//! | [`measure`] | Glyph metrics and text measurement |
//! | [`scene`] | Retained element tree the overlays are mounted into |
//! | [`input`] | Pointer and editor events, listeners, deferred tasks |
//! | [`geometry`] | Points, rectangles, viewport conversions |
//! | [`config`] | Text defaults and environment overrides |
//! | [`consts`] | Shared class names and numeric constants |

pub mod board;
pub mod component;
pub mod config;
pub mod consts;
pub mod content;
pub mod doc;
pub mod editor;
pub mod generator;
pub mod geometry;
pub mod input;
pub mod measure;
pub mod overlay;
pub mod registry;
pub mod scene;
pub mod shape;
