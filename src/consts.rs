//! Shared numeric and string constants for the text layer.

// ── Layout ──────────────────────────────────────────────────────

/// Max-width sentinel used when the caller imposes no wrap limit.
pub const DEFAULT_MAX_WIDTH: f64 = 999.0;

/// Gap between a shape's outline and its text box, in document units.
pub const SHAPE_TEXT_PADDING: f64 = 4.0;

/// Default stroke width for shapes that don't carry one.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Default text height for a freshly created region.
pub const DEFAULT_TEXT_HEIGHT: f64 = 20.0;

// ── Typography ──────────────────────────────────────────────────

/// Default font size in CSS pixels.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

/// Default font stack for overlay text.
pub const DEFAULT_FONT_FAMILY: &str = "PingFangSC-Regular, \"PingFang SC\", -apple-system, sans-serif";

/// Line-height multiplier for font sizes without a fixed entry.
pub const LINE_HEIGHT_RATIO: f64 = 1.5;

/// Horizontal advance per display column, as a fraction of the font size.
pub const ADVANCE_PER_COLUMN_EM: f64 = 0.5;

// ── Editing ─────────────────────────────────────────────────────

/// Class marking companion UI (toolbars, popovers) whose clicks must not end editing.
pub const ATTACHED_CLASS: &str = "board-attached";

/// Class on every overlay container group.
pub const TEXT_GROUP_CLASS: &str = "text";

/// Class added to table cells whose text runs vertically.
pub const VERTICAL_CELL_TEXT_CLASS: &str = "vertical-cell-text";

/// Characters to the right of the caret at which an IME candidate is spliced
/// into the shadow document. Matches the rendered caret position of the editor.
pub const COMPOSITION_CARET_SHIFT: usize = 1;

// ── Math ────────────────────────────────────────────────────────

/// Rotation applied to vertical table-cell text (−90°), in radians.
pub const VERTICAL_TEXT_ANGLE: f64 = -std::f64::consts::FRAC_PI_2;
