use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::style::Color;

use crate::{
    animation::{Animation, Viewport},
    generator::EquityWalk,
    scale::ValueScale,
    surface::{draw_grid, Point, Region, Surface},
};

pub const DEFAULT_EQUITY_COLOR: Color = Color::Rgb(0x42, 0xff, 0xc2);

/// Synthetic equity curve drawn as a single polyline.
///
/// The samples are regenerated on every resize and stay fixed otherwise.
#[derive(Debug, Clone)]
pub struct EquityCurve<R = StdRng> {
    rng: R,
    walk: EquityWalk,
    points: usize,
    samples: Vec<f64>,
    color: Color,
    line_width: f64,
    pad: f64,
    grid_color: Color,
}

impl EquityCurve<StdRng> {
    pub fn new(points: usize) -> Self {
        Self::with_rng(points, StdRng::from_os_rng())
    }
}

impl<R: Rng> EquityCurve<R> {
    pub fn with_rng(points: usize, rng: R) -> Self {
        let mut curve = Self {
            rng,
            walk: EquityWalk::default(),
            points,
            samples: Vec::new(),
            color: DEFAULT_EQUITY_COLOR,
            line_width: 2.0,
            pad: 10.0,
            grid_color: Color::Rgb(20, 20, 20),
        };
        curve.regenerate();
        curve
    }

    pub fn walk(mut self, walk: EquityWalk) -> Self {
        self.walk = walk;
        self.regenerate();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn regenerate(&mut self) {
        self.samples = self.walk.generate(&mut self.rng, self.points);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let (width, height) = (surface.width(), surface.height());
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let ratio = surface.pixel_ratio();

        surface.clear(Region::new(0.0, 0.0, width, height));
        surface.set_stroke(self.grid_color, ratio);
        draw_grid(
            surface,
            (24.0 * ratio).max(width / 20.0),
            (24.0 * ratio).max(height / 8.0),
        );

        if self.samples.len() < 2 {
            return;
        }

        let scale = ValueScale::fit_values(height, self.pad * ratio, &self.samples);
        let step = width / self.samples.len() as f64;
        let vertices = self.samples.iter().enumerate().map(|(i, &value)| {
            // keep the first vertex off the left edge
            let nudge = if i == 0 { ratio } else { 0.0 };
            Point::new(i as f64 * step + nudge, scale.calc_y(value))
        });

        surface.set_stroke(self.color, self.line_width * ratio);
        for (from, to) in vertices.tuple_windows() {
            if from.is_finite() && to.is_finite() {
                surface.line(from, to);
            }
        }
    }
}

impl<R: Rng> Animation for EquityCurve<R> {
    fn resize(&mut self, _viewport: Viewport) {
        self.regenerate();
    }

    fn update(&mut self, _elapsed_ms: f64, _now_ms: f64) {}

    fn draw(&self, surface: &mut dyn Surface) {
        self.render(surface);
    }
}
