use std::str::FromStr;

use ratatui::style::Color;

use crate::CandleType;

pub const DEFAULT_UP: Color = Color::Rgb(0x30, 0xe0, 0x7a);
pub const DEFAULT_DOWN: Color = Color::Rgb(0xff, 0x4a, 0x5c);

/// Up/down colors of every candle and bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub up: Color,
    pub down: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            up: DEFAULT_UP,
            down: DEFAULT_DOWN,
        }
    }
}

impl Theme {
    pub fn new(up: Color, down: Color) -> Self {
        Self { up, down }
    }

    /// Builds a theme from user supplied color strings such as `#30e07a`.
    ///
    /// Missing, blank or unparseable values fall back to [`DEFAULT_UP`] and
    /// [`DEFAULT_DOWN`].
    pub fn from_vars(up: Option<&str>, down: Option<&str>) -> Self {
        Self {
            up: parse_or("up", up, DEFAULT_UP),
            down: parse_or("down", down, DEFAULT_DOWN),
        }
    }

    pub fn color(&self, candle_type: CandleType) -> Color {
        match candle_type {
            CandleType::Bullish => self.up,
            CandleType::Bearish => self.down,
        }
    }
}

fn parse_or(role: &str, value: Option<&str>, fallback: Color) -> Color {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return fallback;
    };

    match Color::from_str(value) {
        Ok(color) => color,
        Err(_) => {
            tracing::warn!(role, value, "unparseable theme color, using fallback");
            fallback
        }
    }
}
