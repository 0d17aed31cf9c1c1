//! Text measurement: how big a fragment renders at a given style and width.
//!
//! Measurement is a pure function of `(content, style, max_width, metrics)`.
//! It is called both for the live editor's content and for synthesized
//! fragments (IME composition previews), so it must not depend on any editor
//! or overlay state.
//!
//! Line breaking follows the browser's rules closely enough that the overlay
//! box matches rendered content:
//! - every logical line (block or `\n`) starts a new visual line,
//! - words wrap greedily at whitespace and around wide (CJK) characters,
//! - trailing whitespace hangs past the wrap edge and is not counted,
//! - a word wider than the limit breaks between characters.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use crate::consts::{ADVANCE_PER_COLUMN_EM, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, LINE_HEIGHT_RATIO};
use crate::content::TextElement;

/// Float slack when comparing accumulated widths against the limit.
const WRAP_EPSILON: f64 = 1e-9;

/// Resolved font parameters for a text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
}

impl TextStyle {
    /// Style with the board's line height for `font_size`.
    #[must_use]
    pub fn new(font_family: impl Into<String>, font_size: f64) -> Self {
        Self { font_family: font_family.into(), font_size, line_height: line_height_for(font_size) }
    }

    /// Same family and line-height ratio, every length multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            font_family: self.font_family.clone(),
            font_size: self.font_size * factor,
            line_height: self.line_height * factor,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE)
    }
}

/// Line height the board uses for a font size.
#[must_use]
pub fn line_height_for(font_size: f64) -> f64 {
    if (font_size - 14.0).abs() < f64::EPSILON {
        20.0
    } else if (font_size - 18.0).abs() < f64::EPSILON {
        25.0
    } else {
        font_size * LINE_HEIGHT_RATIO
    }
}

/// Laid-out size of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self { width: self.width * factor, height: self.height * factor }
    }
}

/// Per-character horizontal advances for a style.
///
/// Hosts with real font shaping plug in their own implementation; the
/// default is [`HeuristicMetrics`].
pub trait GlyphMetrics {
    /// Advance width of `ch` in the same units as `style.font_size`.
    fn advance(&self, ch: char, style: &TextStyle) -> f64;
}

/// Advance derived from Unicode display width: half an em per column, so
/// Latin glyphs are 0.5em and CJK ideographs a full em. Control and
/// combining characters are zero-width.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMetrics;

impl GlyphMetrics for HeuristicMetrics {
    fn advance(&self, ch: char, style: &TextStyle) -> f64 {
        let columns = UnicodeWidthChar::width(ch).map_or(0.0, |w| f64::from(u32::try_from(w).unwrap_or(0)));
        columns * ADVANCE_PER_COLUMN_EM * style.font_size
    }
}

/// Measure how `content` lays out at `max_width`.
///
/// Width is the widest visual line rounded up to a whole unit; height is the
/// visual line count times the style's line height. An empty fragment is zero
/// wide and one line tall.
#[must_use]
pub fn measure_element(content: &TextElement, style: &TextStyle, max_width: f64, metrics: &dyn GlyphMetrics) -> Size {
    let mut widest = 0.0_f64;
    let mut line_count = 0_usize;
    for line in content.lines() {
        for width in wrap_line(&line, style, max_width, metrics) {
            widest = widest.max(width);
            line_count += 1;
        }
    }
    let lines = u32::try_from(line_count.max(1)).unwrap_or(u32::MAX);
    let height = f64::from(lines) * style.line_height;
    Size { width: widest.ceil(), height }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SegmentKind {
    Space,
    Word,
    Wide,
}

struct Segment<'a> {
    kind: SegmentKind,
    text: &'a str,
    width: f64,
}

/// Split a logical line into break opportunities: whitespace runs, word runs,
/// and single wide characters.
fn segments<'a>(line: &'a str, style: &TextStyle, metrics: &dyn GlyphMetrics) -> Vec<Segment<'a>> {
    let mut out: Vec<Segment<'a>> = Vec::new();
    let mut start = 0;
    let mut current: Option<(SegmentKind, f64)> = None;
    for (idx, ch) in line.char_indices() {
        let kind = if ch.is_whitespace() {
            SegmentKind::Space
        } else if UnicodeWidthChar::width(ch).unwrap_or(0) > 1 {
            SegmentKind::Wide
        } else {
            SegmentKind::Word
        };
        let advance = metrics.advance(ch, style);
        match current {
            Some((k, w)) if k == kind && kind != SegmentKind::Wide => current = Some((k, w + advance)),
            Some((k, w)) => {
                out.push(Segment { kind: k, text: &line[start..idx], width: w });
                start = idx;
                current = Some((kind, advance));
            }
            None => current = Some((kind, advance)),
        }
    }
    if let Some((kind, width)) = current {
        out.push(Segment { kind, text: &line[start..], width });
    }
    out
}

/// Visual line widths for one logical line, excluding hanging whitespace.
fn wrap_line(line: &str, style: &TextStyle, max_width: f64, metrics: &dyn GlyphMetrics) -> Vec<f64> {
    let limit = max_width + WRAP_EPSILON;
    let mut widths = Vec::new();
    let mut width = 0.0;
    let mut inked = 0.0;
    let mut has_ink = false;

    for seg in segments(line, style, metrics) {
        if seg.kind == SegmentKind::Space {
            width += seg.width;
            continue;
        }
        if has_ink && width + seg.width > limit {
            widths.push(inked);
            width = 0.0;
            inked = 0.0;
            has_ink = false;
        }
        if width + seg.width <= limit {
            width += seg.width;
            inked = width;
            has_ink = true;
            continue;
        }
        // Word wider than the whole line: break between characters.
        for ch in seg.text.chars() {
            let advance = metrics.advance(ch, style);
            if has_ink && width + advance > limit {
                widths.push(inked);
                width = 0.0;
            }
            width += advance;
            inked = width;
            has_ink = true;
        }
    }
    widths.push(inked);
    widths
}
