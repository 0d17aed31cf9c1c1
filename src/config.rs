//! Text layer configuration parsed from environment variables.

use serde::Deserialize;

use crate::consts::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_MAX_WIDTH, SHAPE_TEXT_PADDING};
use crate::measure::{TextStyle, line_height_for};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a number")]
    NotANumber { var: String, value: String },
    #[error("invalid {var}: {value} must be positive")]
    NotPositive { var: String, value: String },
}

/// Board-wide text defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub font_family: String,
    pub font_size: f64,
    /// Explicit line height. Derived from the font size when absent.
    pub line_height: Option<f64>,
    /// Wrap limit for regions whose owner imposes none.
    pub max_width: f64,
    /// Inset between a shape's edge and its text rectangle.
    pub shape_padding: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: None,
            max_width: DEFAULT_MAX_WIDTH,
            shape_padding: SHAPE_TEXT_PADDING,
        }
    }
}

impl TextConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `TEXTLAYER_FONT_FAMILY`
    /// - `TEXTLAYER_FONT_SIZE`: default 14
    /// - `TEXTLAYER_LINE_HEIGHT`: derived from the font size when absent
    /// - `TEXTLAYER_MAX_WIDTH`: default 999
    /// - `TEXTLAYER_SHAPE_PADDING`: default 4
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a numeric variable does not parse or
    /// is not positive (padding may be zero).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let font_family = std::env::var("TEXTLAYER_FONT_FAMILY").unwrap_or(defaults.font_family);
        let font_size = env_f64("TEXTLAYER_FONT_SIZE", defaults.font_size, false)?;
        let line_height = match std::env::var("TEXTLAYER_LINE_HEIGHT") {
            Ok(raw) => Some(parse_f64("TEXTLAYER_LINE_HEIGHT", &raw, false)?),
            Err(_) => None,
        };
        let max_width = env_f64("TEXTLAYER_MAX_WIDTH", defaults.max_width, false)?;
        let shape_padding = env_f64("TEXTLAYER_SHAPE_PADDING", defaults.shape_padding, true)?;
        Ok(Self { font_family, font_size, line_height, max_width, shape_padding })
    }

    /// Measurement style for this config.
    #[must_use]
    pub fn style(&self) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            line_height: self.line_height.unwrap_or_else(|| line_height_for(self.font_size)),
        }
    }
}

fn env_f64(var: &str, default: f64, allow_zero: bool) -> Result<f64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => parse_f64(var, &raw, allow_zero),
        Err(_) => Ok(default),
    }
}

fn parse_f64(var: &str, raw: &str, allow_zero: bool) -> Result<f64, ConfigError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::NotANumber { var: var.to_string(), value: raw.to_string() })?;
    let in_range = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !value.is_finite() || !in_range {
        return Err(ConfigError::NotPositive { var: var.to_string(), value: raw.to_string() });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
