#![allow(clippy::float_cmp)]

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers hold `env_lock()` so no other test touches the environment.
unsafe fn clear_textlayer_env() {
    unsafe {
        std::env::remove_var("TEXTLAYER_FONT_FAMILY");
        std::env::remove_var("TEXTLAYER_FONT_SIZE");
        std::env::remove_var("TEXTLAYER_LINE_HEIGHT");
        std::env::remove_var("TEXTLAYER_MAX_WIDTH");
        std::env::remove_var("TEXTLAYER_SHAPE_PADDING");
    }
}

#[test]
fn from_env_defaults() {
    let _guard = env_lock();
    unsafe { clear_textlayer_env() };

    let cfg = TextConfig::from_env().unwrap();
    assert_eq!(cfg, TextConfig::default());
    assert_eq!(cfg.max_width, 999.0);
    assert_eq!(cfg.style().line_height, 20.0);
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_lock();
    unsafe {
        clear_textlayer_env();
        std::env::set_var("TEXTLAYER_FONT_FAMILY", "Inter");
        std::env::set_var("TEXTLAYER_FONT_SIZE", "18");
        std::env::set_var("TEXTLAYER_MAX_WIDTH", " 320 ");
        std::env::set_var("TEXTLAYER_SHAPE_PADDING", "0");
    }

    let cfg = TextConfig::from_env().unwrap();
    assert_eq!(cfg.font_family, "Inter");
    assert_eq!(cfg.font_size, 18.0);
    assert_eq!(cfg.max_width, 320.0);
    assert_eq!(cfg.shape_padding, 0.0);
    assert_eq!(cfg.style().line_height, 25.0);

    unsafe { clear_textlayer_env() };
}

#[test]
fn explicit_line_height_wins() {
    let _guard = env_lock();
    unsafe {
        clear_textlayer_env();
        std::env::set_var("TEXTLAYER_LINE_HEIGHT", "30");
    }

    let cfg = TextConfig::from_env().unwrap();
    assert_eq!(cfg.line_height, Some(30.0));
    assert_eq!(cfg.style().line_height, 30.0);

    unsafe { clear_textlayer_env() };
}

#[test]
fn from_env_rejects_garbage() {
    let _guard = env_lock();
    unsafe {
        clear_textlayer_env();
        std::env::set_var("TEXTLAYER_FONT_SIZE", "big");
    }

    let err = TextConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::NotANumber { var: "TEXTLAYER_FONT_SIZE".into(), value: "big".into() });

    unsafe { clear_textlayer_env() };
}

#[test]
fn from_env_rejects_zero_font_size() {
    let _guard = env_lock();
    unsafe {
        clear_textlayer_env();
        std::env::set_var("TEXTLAYER_FONT_SIZE", "0");
    }

    let err = TextConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("must be positive"));

    unsafe { clear_textlayer_env() };
}

#[test]
fn deserialize_partial_json_fills_defaults() {
    let cfg: TextConfig = serde_json::from_str(r#"{ "font_size": 18 }"#).unwrap();
    assert_eq!(cfg.font_size, 18.0);
    assert_eq!(cfg.max_width, 999.0);
    assert_eq!(cfg.line_height, None);
}
