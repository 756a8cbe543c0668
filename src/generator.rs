use ordered_float::OrderedFloat;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::Ohlc;

/// Limits applied to every generated close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CloseBounds {
    /// Close never drops below this value.
    Floor(f64),
    /// Close stays inside `[min, max]`. An inverted range pins the close to
    /// its midpoint.
    Range { min: f64, max: f64 },
}

impl CloseBounds {
    pub fn apply(&self, close: f64) -> f64 {
        match *self {
            CloseBounds::Floor(floor) => close.max(floor),
            CloseBounds::Range { min, max } if min <= max => close.clamp(min, max),
            CloseBounds::Range { min, max } => (min + max) / 2.0,
        }
    }

    /// Value used when a walk has nothing sensible to continue from.
    fn neutral(&self) -> f64 {
        match *self {
            CloseBounds::Floor(floor) => floor,
            CloseBounds::Range { min, max } => (min + max) / 2.0,
        }
    }
}

/// Shape of the random walk.
///
/// The close moves by up to `volatility * body_scale` in either direction,
/// plus an independent jitter of up to `volatility * jitter_scale`; each wick
/// extends by up to `volatility * wick_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    pub body_scale: f64,
    pub jitter_scale: f64,
    pub wick_scale: f64,
    pub bounds: CloseBounds,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self::ticker()
    }
}

impl WalkParams {
    /// Full screen background, values are device pixels measured from the
    /// bottom edge and stay one glyph away from the top and bottom.
    pub fn background(height: f64, glyph_width: f64) -> Self {
        Self {
            body_scale: height * 0.03,
            jitter_scale: 0.0,
            wick_scale: height * 0.04,
            bounds: CloseBounds::Range {
                min: glyph_width,
                max: height - glyph_width,
            },
        }
    }

    /// Reactive ticker, values are prices floored at 1.
    pub fn ticker() -> Self {
        Self {
            body_scale: 0.5,
            jitter_scale: 0.0,
            wick_scale: 1.2,
            bounds: CloseBounds::Floor(1.0),
        }
    }

    /// Static chart data: a drift and a smaller jitter summed, so steps
    /// reach `0.8 * volatility` but cluster around zero.
    pub fn chart() -> Self {
        Self {
            jitter_scale: 0.3,
            ..Self::ticker()
        }
    }

    pub fn body_scale(mut self, body_scale: f64) -> Self {
        self.body_scale = body_scale;
        self
    }

    pub fn jitter_scale(mut self, jitter_scale: f64) -> Self {
        self.jitter_scale = jitter_scale;
        self
    }

    pub fn wick_scale(mut self, wick_scale: f64) -> Self {
        self.wick_scale = wick_scale;
        self
    }

    pub fn bounds(mut self, bounds: CloseBounds) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Produces synthetic OHLC points, each one opening at the previous close.
#[derive(Debug, Clone)]
pub struct SeriesGenerator<R = StdRng> {
    rng: R,
    params: WalkParams,
}

impl SeriesGenerator<StdRng> {
    pub fn new(params: WalkParams) -> Self {
        Self::with_rng(StdRng::from_os_rng(), params)
    }

    /// Reproducible generator for tests and snapshots.
    pub fn seeded(seed: u64, params: WalkParams) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), params)
    }
}

impl<R: Rng> SeriesGenerator<R> {
    pub fn with_rng(rng: R, params: WalkParams) -> Self {
        Self { rng, params }
    }

    pub fn params(&self) -> WalkParams {
        self.params
    }

    pub fn set_params(&mut self, params: WalkParams) {
        self.params = params;
    }

    pub fn next(&mut self, previous_close: f64, volatility: f64) -> Ohlc {
        let open = if previous_close.is_finite() {
            previous_close
        } else {
            tracing::error!(previous_close, "non-finite close, restarting walk");
            self.params.bounds.neutral()
        };
        let volatility = if volatility.is_finite() {
            volatility.abs()
        } else {
            0.0
        };

        let body = volatility * self.params.body_scale.abs();
        let wick = volatility * self.params.wick_scale.abs();
        let jitter = volatility * self.params.jitter_scale.abs();

        let mut delta = (self.rng.random::<f64>() * 2.0 - 1.0) * body;
        if jitter > 0.0 {
            delta += (self.rng.random::<f64>() * 2.0 - 1.0) * jitter;
        }
        let close = self.params.bounds.apply(open + delta);
        let high = open.max(close) + self.rng.random::<f64>() * wick;
        let low = open.min(close) - self.rng.random::<f64>() * wick;

        Ohlc {
            open: OrderedFloat::from(open),
            high: OrderedFloat::from(high),
            low: OrderedFloat::from(low),
            close: OrderedFloat::from(close),
        }
    }

    /// `len` points chained from `start`.
    pub fn series(&mut self, start: f64, len: usize, volatility: f64) -> Vec<Ohlc> {
        let mut close = start;
        (0..len)
            .map(|_| {
                let candle = self.next(close, volatility);
                close = candle.close();
                candle
            })
            .collect()
    }
}

/// Scalar walk with an upward drift, used by the equity curve.
///
/// Each step adds `(u - bias) * step` with `u` uniform on `[0, 1)`; emitted
/// samples never go below `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquityWalk {
    pub bias: f64,
    pub step: f64,
    pub floor: f64,
}

impl Default for EquityWalk {
    fn default() -> Self {
        Self {
            bias: 0.35,
            step: 1.4,
            floor: -10.0,
        }
    }
}

impl EquityWalk {
    pub fn generate<R: Rng>(&self, rng: &mut R, points: usize) -> Vec<f64> {
        let mut value = 0.0;
        (0..points)
            .map(|_| {
                value += (rng.random::<f64>() - self.bias) * self.step;
                value.max(self.floor)
            })
            .collect()
    }
}
