use std::cmp::{max, min};

use ordered_float::OrderedFloat;

use crate::Float;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bearish,
    Bullish,
}

/// One synthetic trading period.
///
/// `high` is never below the body and `low` never above it; [`Ohlc::new`] is
/// the only way to build one from raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ohlc {
    pub(crate) open: Float,
    pub(crate) high: Float,
    pub(crate) low: Float,
    pub(crate) close: Float,
}

impl Ohlc {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Option<Self> {
        let finite = [open, high, low, close].iter().all(|v| v.is_finite());
        if finite && high >= open.max(close) && low <= open.min(close) {
            Some(Self {
                open: OrderedFloat::from(open),
                high: OrderedFloat::from(high),
                low: OrderedFloat::from(low),
                close: OrderedFloat::from(close),
            })
        } else {
            None
        }
    }

    /// A point where all four values are equal.
    pub fn flat(value: f64) -> Option<Self> {
        Self::new(value, value, value, value)
    }

    pub fn open(&self) -> f64 {
        *self.open
    }

    pub fn high(&self) -> f64 {
        *self.high
    }

    pub fn low(&self) -> f64 {
        *self.low
    }

    pub fn close(&self) -> f64 {
        *self.close
    }

    pub fn body_top(&self) -> f64 {
        *max(self.open, self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        *min(self.open, self.close)
    }

    /// A tie counts as bullish.
    pub fn candle_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }
}
