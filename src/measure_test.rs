#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::consts::DEFAULT_MAX_WIDTH;

fn style() -> TextStyle {
    TextStyle::new("sans-serif", 14.0)
}

fn measure(text: &str, max_width: f64) -> Size {
    measure_element(&TextElement::plain(text), &style(), max_width, &HeuristicMetrics)
}

struct FixedMetrics(f64);

impl GlyphMetrics for FixedMetrics {
    fn advance(&self, _ch: char, _style: &TextStyle) -> f64 {
        self.0
    }
}

// --- line height ---

#[test]
fn line_height_fixed_table() {
    assert_eq!(line_height_for(14.0), 20.0);
    assert_eq!(line_height_for(18.0), 25.0);
    assert_eq!(line_height_for(16.0), 24.0);
}

#[test]
fn style_scaled_multiplies_lengths() {
    let s = style().scaled(2.0);
    assert_eq!(s.font_size, 28.0);
    assert_eq!(s.line_height, 40.0);
    assert_eq!(s.font_family, "sans-serif");
}

// --- heuristic metrics ---

#[test]
fn heuristic_latin_is_half_em() {
    assert_eq!(HeuristicMetrics.advance('a', &style()), 7.0);
}

#[test]
fn heuristic_cjk_is_full_em() {
    assert_eq!(HeuristicMetrics.advance('中', &style()), 14.0);
}

#[test]
fn heuristic_combining_mark_is_zero() {
    assert_eq!(HeuristicMetrics.advance('\u{0301}', &style()), 0.0);
}

// --- single line ---

#[test]
fn measure_short_text_unbounded() {
    assert_eq!(measure("Hi", DEFAULT_MAX_WIDTH), Size::new(14.0, 20.0));
}

#[test]
fn measure_empty_is_one_line_tall() {
    assert_eq!(measure("", DEFAULT_MAX_WIDTH), Size::new(0.0, 20.0));
}

#[test]
fn measure_counts_inner_spaces() {
    assert_eq!(measure("hello world", DEFAULT_MAX_WIDTH).width, 77.0);
}

#[test]
fn trailing_whitespace_hangs() {
    assert_eq!(measure("ab   ", DEFAULT_MAX_WIDTH).width, 14.0);
}

#[test]
fn width_rounds_up() {
    let size = measure_element(&TextElement::plain("ab"), &style(), DEFAULT_MAX_WIDTH, &FixedMetrics(3.3));
    assert_eq!(size.width, 7.0);
}

// --- wrapping ---

#[test]
fn wraps_at_whitespace() {
    assert_eq!(measure("hello world", 40.0), Size::new(35.0, 40.0));
}

#[test]
fn breaks_overlong_word_between_characters() {
    assert_eq!(measure("aaaaaaaaaa", 30.0), Size::new(28.0, 60.0));
}

#[test]
fn wraps_between_wide_characters() {
    assert_eq!(measure("你好世界", 30.0), Size::new(28.0, 40.0));
}

#[test]
fn exact_fit_does_not_wrap() {
    assert_eq!(measure("abcd", 28.0), Size::new(28.0, 20.0));
}

#[test]
fn zero_width_limit_puts_each_char_on_a_line() {
    assert_eq!(measure("abc", 0.0), Size::new(7.0, 60.0));
}

// --- multi-line ---

#[test]
fn newline_starts_new_line() {
    assert_eq!(measure("ab\nabcd", DEFAULT_MAX_WIDTH), Size::new(28.0, 40.0));
}

#[test]
fn nested_blocks_measure_as_lines() {
    let value: TextElement = serde_json::from_value(json!({
        "children": [
            { "type": "paragraph", "children": [{ "text": "one" }] },
            { "type": "paragraph", "children": [{ "text": "three" }] }
        ]
    }))
    .unwrap();
    let size = measure_element(&value, &style(), DEFAULT_MAX_WIDTH, &HeuristicMetrics);
    assert_eq!(size, Size::new(35.0, 40.0));
}

#[test]
fn larger_style_scales_output() {
    let big = style().scaled(2.0);
    let size = measure_element(&TextElement::plain("Hi"), &big, DEFAULT_MAX_WIDTH, &HeuristicMetrics);
    assert_eq!(size, Size::new(28.0, 40.0));
}

#[test]
fn measurement_is_pure() {
    let value = TextElement::plain("hello world again");
    let before = value.clone();
    let a = measure_element(&value, &style(), 50.0, &HeuristicMetrics);
    let b = measure_element(&value, &style(), 50.0, &HeuristicMetrics);
    assert_eq!(a, b);
    assert_eq!(value, before);
}

#[test]
fn size_scaled() {
    assert_eq!(Size::new(10.0, 4.0).scaled(0.5), Size::new(5.0, 2.0));
}
