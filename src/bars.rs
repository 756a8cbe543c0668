use std::f64::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::style::Color;

use crate::{
    animation::{Animation, Viewport},
    surface::{draw_grid, Region, Surface},
    CandleType, Theme,
};

const SLOT: f64 = 14.0;
const SLOT_OFFSET: f64 = 6.0;
const BAR_WIDTH: f64 = 8.0;
const BASE_HEIGHT: f64 = 20.0;
const BOTTOM_MARGIN: f64 = 10.0;

/// A single decorative bar; its height follows a sine wave, not data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseBar {
    pub x: f64,
    pub width: f64,
    pub amplitude: f64,
    pub speed: f64,
    pub phase: f64,
    pub direction: CandleType,
}

impl PulseBar {
    /// Height in logical pixels at `t` milliseconds.
    pub fn height_at(&self, t: f64) -> f64 {
        let pulse = ((t * 0.001 * self.speed + self.phase).sin() + 1.0) / 2.0;
        BASE_HEIGHT + pulse * self.amplitude
    }

    fn flip(&mut self) {
        self.direction = match self.direction {
            CandleType::Bullish => CandleType::Bearish,
            CandleType::Bearish => CandleType::Bullish,
        };
    }
}

/// Row of pulsing red/green bars on black.
#[derive(Debug, Clone)]
pub struct PulsingBars<R = StdRng> {
    rng: R,
    bars: Vec<PulseBar>,
    theme: Theme,
    flip_probability: f64,
    grid_spacing: f64,
    grid_color: Color,
    now: f64,
}

impl PulsingBars<StdRng> {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_rng(viewport, StdRng::from_os_rng())
    }
}

impl<R: Rng> PulsingBars<R> {
    pub fn with_rng(viewport: Viewport, rng: R) -> Self {
        let mut bars = Self {
            rng,
            bars: Vec::new(),
            theme: Theme::default(),
            flip_probability: 0.003,
            grid_spacing: 40.0,
            grid_color: Color::Rgb(15, 15, 15),
            now: 0.0,
        };
        bars.build(viewport);
        bars
    }

    pub fn flip_probability(mut self, flip_probability: f64) -> Self {
        self.flip_probability = if flip_probability.is_nan() {
            0.0
        } else {
            flip_probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn bars(&self) -> &[PulseBar] {
        &self.bars
    }

    fn build(&mut self, viewport: Viewport) {
        let count = (viewport.width() / SLOT).floor() as usize;
        let rng = &mut self.rng;
        self.bars = (0..count)
            .map(|i| PulseBar {
                x: i as f64 * SLOT + SLOT_OFFSET,
                width: BAR_WIDTH,
                amplitude: rng.random::<f64>() * 120.0 + 20.0,
                speed: rng.random::<f64>() * 0.6 + 0.2,
                phase: rng.random::<f64>() * TAU,
                direction: if rng.random_bool(0.5) {
                    CandleType::Bullish
                } else {
                    CandleType::Bearish
                },
            })
            .collect();

        tracing::trace!(count, "pulse bars built");
    }
}

impl<R: Rng> Animation for PulsingBars<R> {
    fn resize(&mut self, viewport: Viewport) {
        self.build(viewport);
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    fn update(&mut self, _elapsed_ms: f64, now_ms: f64) {
        if now_ms.is_finite() {
            self.now = now_ms;
        }
        // occasional flips mimic ticks
        for bar in &mut self.bars {
            if self.rng.random_bool(self.flip_probability) {
                bar.flip();
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (width, height) = (surface.width(), surface.height());
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let ratio = surface.pixel_ratio();

        surface.clear(Region::new(0.0, 0.0, width, height));
        surface.set_fill(Color::Black);
        surface.fill_rect(Region::new(0.0, 0.0, width, height));

        surface.set_stroke(self.grid_color, ratio);
        draw_grid(surface, self.grid_spacing * ratio, self.grid_spacing * ratio);

        for bar in &self.bars {
            let bar_height = bar.height_at(self.now) * ratio;
            surface.set_fill(self.theme.color(bar.direction));
            surface.fill_rect(Region::new(
                bar.x * ratio,
                height - bar_height - BOTTOM_MARGIN * ratio,
                bar.width * ratio,
                bar_height,
            ));
        }
    }
}
