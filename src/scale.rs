use itertools::{Itertools, MinMaxResult};

use crate::{Float, Ohlc};

/// Smallest value range the scale divides by.
pub const MIN_RANGE: f64 = 1e-9;

/// Fixed-width number formatting, as used by the hover panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numeric {
    precision: usize,
    scale: usize,
}

impl Default for Numeric {
    fn default() -> Self {
        Self::new(0, 2)
    }
}

impl Numeric {
    pub fn new(precision: usize, scale: usize) -> Self {
        Self { precision, scale }
    }

    pub fn format(&self, value: f64) -> String {
        let precision = self.precision;
        let scale = self.scale;
        format!("{0:>precision$.scale$}", value)
    }
}

/// Maps values onto the vertical pixel axis of a surface.
///
/// Larger values land closer to the top. `pad` pixels are kept free at both
/// the top and the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    height: f64,
    pad: f64,
    min: f64,
    max: f64,
}

impl ValueScale {
    pub fn new(height: f64, pad: f64, min: f64, max: f64) -> Self {
        let (min, max) = if !min.is_finite() || !max.is_finite() {
            (0.0, MIN_RANGE)
        } else if max - min < MIN_RANGE {
            let mid = (min + max) / 2.0;
            (mid - MIN_RANGE / 2.0, mid + MIN_RANGE / 2.0)
        } else {
            (min, max)
        };

        Self {
            height,
            pad,
            min,
            max,
        }
    }

    /// Scale spanning the lowest low and highest high of `candles`.
    pub fn fit<'a>(height: f64, pad: f64, candles: impl IntoIterator<Item = &'a Ohlc>) -> Self {
        let (min, max) = match candles
            .into_iter()
            .flat_map(|c| [c.low, c.high])
            .minmax()
        {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(v) => (*v, *v),
            MinMaxResult::MinMax(min, max) => (*min, *max),
        };

        Self::new(height, pad, min, max)
    }

    /// Scale spanning every finite value of `values`.
    pub fn fit_values(height: f64, pad: f64, values: &[f64]) -> Self {
        let (min, max) = match values
            .iter()
            .filter(|v| v.is_finite())
            .map(|&v| Float::from(v))
            .minmax()
        {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(v) => (*v, *v),
            MinMaxResult::MinMax(min, max) => (*min, *max),
        };

        Self::new(height, pad, min, max)
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn calc_y(&self, value: f64) -> f64 {
        let unit = (value - self.min) / (self.max - self.min);
        self.height - unit * (self.height - 2.0 * self.pad) - self.pad
    }
}
