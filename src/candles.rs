use ratatui::style::Color;

use crate::{
    scale::{Numeric, ValueScale},
    surface::{draw_grid, Point, Region, Surface},
    Ohlc, Theme,
};

/// Horizontal placement of candles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// The whole surface width is split evenly between the candles.
    Fit,
    /// Fixed slots of `glyph_width` device pixels, shifted left by `offset`.
    Scroll { glyph_width: f64, offset: f64 },
}

/// Vertical placement of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueMapping {
    /// Visible lows and highs span the surface height minus `pad` logical
    /// pixels at each edge.
    Fit { pad: f64 },
    /// Values already are device pixels measured from the bottom edge.
    Pixels,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyWidth {
    /// Share of the slot, centred.
    Fraction(f64),
    /// Slot minus this many logical pixels on both sides.
    Inset(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grid {
    /// Square cells of this many logical pixels.
    Fixed(f64),
    /// Roughly 20 columns and 8 rows, cells no smaller than 24 logical
    /// pixels.
    Adaptive,
}

const PANEL_WIDTH: f64 = 140.0;
const PANEL_HEIGHT: f64 = 60.0;
const PANEL_MARGIN: f64 = 8.0;

/// Candlestick renderer.
///
/// Lengths in the style are logical pixels and get multiplied by the
/// surface pixel ratio while drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleStickChart {
    theme: Theme,
    body: BodyWidth,
    wick_width: f64,
    min_body_height: f64,
    mapping: ValueMapping,
    grid: Option<Grid>,
    grid_color: Color,
    background: Option<Color>,
    crosshair_color: Color,
    panel_color: Color,
    panel_text_color: Color,
    numeric: Numeric,
}

impl Default for CandleStickChart {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            body: BodyWidth::Fraction(0.55),
            wick_width: 1.5,
            min_body_height: 1.0,
            mapping: ValueMapping::Fit { pad: 10.0 },
            grid: None,
            grid_color: Color::Rgb(20, 20, 20),
            background: None,
            crosshair_color: Color::Rgb(89, 89, 89),
            panel_color: Color::Black,
            panel_text_color: Color::Rgb(0xd9, 0xfa, 0xff),
            numeric: Numeric::default(),
        }
    }
}

impl CandleStickChart {
    /// Static chart with hover support.
    pub fn chart() -> Self {
        Self::default().theme(Theme::new(
            Color::Rgb(0x3a, 0xf0, 0xc3),
            Color::Rgb(0xff, 0x65, 0x74),
        ))
    }

    /// Full screen scrolling background drawn straight in device pixels.
    pub fn background() -> Self {
        Self::default()
            .body(BodyWidth::Inset(2.0))
            .wick_width(1.0)
            .min_body_height(0.0)
            .mapping(ValueMapping::Pixels)
            .grid(Some(Grid::Fixed(100.0)))
            .grid_color(Color::Rgb(13, 13, 13))
    }

    /// Reactive ticker on black.
    pub fn ticker() -> Self {
        Self::default()
            .body(BodyWidth::Inset(2.0))
            .wick_width(1.3)
            .grid(Some(Grid::Fixed(40.0)))
            .grid_color(Color::Rgb(15, 15, 15))
            .background_color(Some(Color::Black))
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn body(mut self, body: BodyWidth) -> Self {
        self.body = body;
        self
    }

    pub fn wick_width(mut self, wick_width: f64) -> Self {
        self.wick_width = wick_width;
        self
    }

    pub fn min_body_height(mut self, min_body_height: f64) -> Self {
        self.min_body_height = min_body_height;
        self
    }

    pub fn mapping(mut self, mapping: ValueMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn grid(mut self, grid: Option<Grid>) -> Self {
        self.grid = grid;
        self
    }

    pub fn grid_color(mut self, grid_color: Color) -> Self {
        self.grid_color = grid_color;
        self
    }

    pub fn background_color(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    pub fn numeric(mut self, numeric: Numeric) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn current_theme(&self) -> Theme {
        self.theme
    }

    /// Swaps the colors used from the next render on.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Clears the surface and paints background, grid and candles.
    pub fn render<'a, I>(&self, surface: &mut dyn Surface, candles: I, layout: Layout)
    where
        I: IntoIterator<Item = &'a Ohlc>,
        I::IntoIter: ExactSizeIterator + Clone,
    {
        let (width, height) = (surface.width(), surface.height());
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let ratio = surface.pixel_ratio();

        surface.clear(Region::new(0.0, 0.0, width, height));
        if let Some(background) = self.background {
            surface.set_fill(background);
            surface.fill_rect(Region::new(0.0, 0.0, width, height));
        }
        self.render_grid(surface);

        let candles = candles.into_iter();
        let len = candles.len();
        if len == 0 {
            return;
        }

        let scale = match self.mapping {
            ValueMapping::Fit { pad } => Some(ValueScale::fit(height, pad * ratio, candles.clone())),
            ValueMapping::Pixels => None,
        };
        let value_to_y = |v: f64| match &scale {
            Some(scale) => scale.calc_y(v),
            None => height - v,
        };
        let (step, shift) = match layout {
            Layout::Fit => (width / len as f64, 0.0),
            Layout::Scroll {
                glyph_width,
                offset,
            } => (glyph_width, offset),
        };

        for (i, candle) in candles.enumerate() {
            let left = i as f64 * step - shift;
            let centre = left + step / 2.0;
            let (body_x, body_width) = match self.body {
                BodyWidth::Fraction(fraction) => {
                    let body_width = (step * fraction).max(1.0);
                    (centre - body_width / 2.0, body_width)
                }
                BodyWidth::Inset(inset) => {
                    let inset = inset * ratio;
                    (left + inset, (step - 2.0 * inset).max(1.0))
                }
            };

            let high = Point::new(centre, value_to_y(candle.high()));
            let low = Point::new(centre, value_to_y(candle.low()));
            let top = value_to_y(candle.body_top());
            let bottom = value_to_y(candle.body_bottom());
            let body = Region::new(
                body_x,
                top,
                body_width,
                (bottom - top).max(self.min_body_height * ratio),
            );

            if !(high.is_finite() && low.is_finite() && body.is_finite()) {
                tracing::error!(index = i, ?candle, "candle geometry is not finite, skipped");
                continue;
            }

            let color = self.theme.color(candle.candle_type());
            surface.set_stroke(color, self.wick_width * ratio);
            surface.line(high, low);
            surface.set_fill(color);
            surface.fill_rect(body);
        }
    }

    /// Index of the candle under horizontal pixel `x` in a [`Layout::Fit`]
    /// chart of `len` candles, clamped to the existing candles.
    pub fn hover_index(x: f64, width: f64, len: usize) -> Option<usize> {
        if len == 0 || !(width > 0.0) {
            return None;
        }
        let step = width / len as f64;
        let index = (x / step).floor().max(0.0) as usize;
        Some(index.min(len - 1))
    }

    /// Renders a [`Layout::Fit`] chart with a crosshair and OHLC panel for
    /// the candle under `pointer_x`.
    pub fn render_hover(&self, surface: &mut dyn Surface, candles: &[Ohlc], pointer_x: f64) {
        self.render(surface, candles, Layout::Fit);

        let (width, height) = (surface.width(), surface.height());
        let Some(index) = Self::hover_index(pointer_x, width, candles.len()) else {
            return;
        };
        let candle = &candles[index];
        let ratio = surface.pixel_ratio();
        let step = width / candles.len() as f64;
        let x = index as f64 * step + step / 2.0;

        surface.set_stroke(self.crosshair_color, ratio);
        surface.line(Point::new(x, 0.0), Point::new(x, height));

        let (panel_width, panel_height) = (PANEL_WIDTH * ratio, PANEL_HEIGHT * ratio);
        let margin = PANEL_MARGIN * ratio;
        let panel_x = (index as f64 * step)
            .max(margin)
            .min(width - panel_width - margin)
            .max(0.0);
        let panel_y = margin.min(height - panel_height - margin).max(0.0);
        surface.set_fill(self.panel_color);
        surface.fill_rect(Region::new(panel_x, panel_y, panel_width, panel_height));

        surface.set_fill(self.panel_text_color);
        let rows = [
            ("O", candle.open(), 8.0, 18.0),
            ("H", candle.high(), 8.0, 32.0),
            ("L", candle.low(), 8.0, 46.0),
            ("C", candle.close(), 70.0, 18.0),
        ];
        for (label, value, dx, dy) in rows {
            surface.text(
                Point::new(panel_x + dx * ratio, panel_y + dy * ratio),
                &format!("{label}: {}", self.numeric.format(value)),
            );
        }
    }

    fn render_grid(&self, surface: &mut dyn Surface) {
        let Some(grid) = self.grid else {
            return;
        };
        let ratio = surface.pixel_ratio();
        let (spacing_x, spacing_y) = match grid {
            Grid::Fixed(spacing) => (spacing * ratio, spacing * ratio),
            Grid::Adaptive => (
                (24.0 * ratio).max(surface.width() / 20.0),
                (24.0 * ratio).max(surface.height() / 8.0),
            ),
        };

        surface.set_stroke(self.grid_color, ratio);
        draw_grid(surface, spacing_x, spacing_y);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::{BodyWidth, CandleStickChart, Grid, Layout, ValueMapping};
    use crate::{
        surface::{DrawCall, Point, Recorder, Region},
        Ohlc, SeriesGenerator, Theme, WalkParams,
    };

    fn sample() -> Vec<Ohlc> {
        vec![
            Ohlc::new(1.0, 4.0, 0.0, 3.0).unwrap(),
            Ohlc::new(3.0, 3.5, 2.0, 2.5).unwrap(),
        ]
    }

    #[test]
    fn simple_candles() {
        let chart = CandleStickChart::default()
            .theme(Theme::new(Color::Green, Color::Red))
            .body(BodyWidth::Fraction(0.5))
            .mapping(ValueMapping::Fit { pad: 0.0 });
        let mut surface = Recorder::new(20.0, 40.0);
        chart.render(&mut surface, &sample(), Layout::Fit);

        assert_eq!(
            surface.calls(),
            &[
                DrawCall::Clear(Region::new(0.0, 0.0, 20.0, 40.0)),
                DrawCall::Stroke {
                    color: Color::Green,
                    width: 1.5
                },
                DrawCall::Line(Point::new(5.0, 0.0), Point::new(5.0, 40.0)),
                DrawCall::Fill(Color::Green),
                DrawCall::FillRect(Region::new(2.5, 10.0, 5.0, 20.0)),
                DrawCall::Stroke {
                    color: Color::Red,
                    width: 1.5
                },
                DrawCall::Line(Point::new(15.0, 5.0), Point::new(15.0, 20.0)),
                DrawCall::Fill(Color::Red),
                DrawCall::FillRect(Region::new(12.5, 10.0, 5.0, 5.0)),
            ]
        );
    }

    #[test]
    fn render_is_repeatable() {
        let candles = SeriesGenerator::seeded(1, WalkParams::ticker()).series(100.0, 40, 1.5);
        let chart = CandleStickChart::chart().grid(Some(Grid::Adaptive));

        let mut first = Recorder::new(640.0, 360.0).with_pixel_ratio(2.0);
        let mut second = first.clone();
        chart.render(&mut first, &candles, Layout::Fit);
        chart.render(&mut second, &candles, Layout::Fit);
        assert_eq!(first.calls(), second.calls());
    }

    #[test]
    fn flat_series_is_finite() {
        let candles = vec![Ohlc::flat(5.0).unwrap(); 10];
        let mut surface = Recorder::new(200.0, 100.0);
        CandleStickChart::chart().render(&mut surface, &candles, Layout::Fit);

        assert_eq!(surface.lines().count(), 10);
        assert_eq!(surface.rects().count(), 10);
        for (from, to) in surface.lines() {
            assert!(from.is_finite() && to.is_finite());
        }
        for rect in surface.rects() {
            assert!(rect.is_finite());
            assert_eq!(rect.height, 1.0);
        }
    }

    #[test]
    fn nothing_to_draw() {
        let mut surface = Recorder::new(0.0, 100.0);
        CandleStickChart::chart().render(&mut surface, &sample(), Layout::Fit);
        assert!(surface.calls().is_empty());

        let mut surface = Recorder::new(100.0, 100.0);
        CandleStickChart::chart().render(&mut surface, &[] as &[Ohlc], Layout::Fit);
        assert_eq!(surface.calls().len(), 1);
    }

    #[test]
    fn scroll_layout_uses_offset_and_inset() {
        let candles = vec![Ohlc::new(100.0, 120.0, 90.0, 110.0).unwrap(); 3];
        let mut surface = Recorder::new(100.0, 200.0);
        CandleStickChart::background().render(
            &mut surface,
            &candles,
            Layout::Scroll {
                glyph_width: 40.0,
                offset: 10.0,
            },
        );

        let lines = surface.lines().collect::<Vec<_>>();
        // grid: x = 0, y = 0, 100; then one wick per candle
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], (Point::new(10.0, 80.0), Point::new(10.0, 110.0)));
        assert_eq!(lines[4].0.x, 50.0);

        let rects = surface.rects().collect::<Vec<_>>();
        assert_eq!(rects[0], Region::new(-8.0, 90.0, 36.0, 10.0));
    }

    #[test]
    fn hover_clamps_index() {
        assert_eq!(CandleStickChart::hover_index(5.0, 100.0, 10), Some(0));
        assert_eq!(CandleStickChart::hover_index(55.0, 100.0, 10), Some(5));
        assert_eq!(CandleStickChart::hover_index(1000.0, 100.0, 10), Some(9));
        assert_eq!(CandleStickChart::hover_index(-20.0, 100.0, 10), Some(0));
        assert_eq!(CandleStickChart::hover_index(50.0, 100.0, 0), None);
    }

    #[test]
    fn hover_panel() {
        let candles = sample();
        let mut surface = Recorder::new(250.0, 200.0);
        CandleStickChart::chart().render_hover(&mut surface, &candles, 10_000.0);

        assert_eq!(
            surface.texts().collect::<Vec<_>>(),
            vec!["O: 3.00", "H: 3.50", "L: 2.00", "C: 2.50"]
        );
        assert!(surface
            .lines()
            .any(|line| line == (Point::new(187.5, 0.0), Point::new(187.5, 200.0))));

        // panel kept inside the right edge
        let panel = surface.rects().last().unwrap();
        assert_eq!(panel, Region::new(102.0, 8.0, 140.0, 60.0));
    }

    #[test]
    fn hover_panel_on_narrow_surface() {
        let mut surface = Recorder::new(100.0, 200.0);
        CandleStickChart::chart().render_hover(&mut surface, &sample(), 0.0);
        let panel = surface.rects().last().unwrap();
        assert_eq!(panel.x, 0.0);
    }

    #[test]
    fn hover_panel_on_short_surface() {
        let mut surface = Recorder::new(250.0, 72.0);
        CandleStickChart::chart().render_hover(&mut surface, &sample(), 0.0);
        let panel = surface.rects().last().unwrap();
        assert_eq!(panel, Region::new(8.0, 4.0, 140.0, 60.0));
        assert!(panel.y + panel.height <= 72.0);

        let mut surface = Recorder::new(250.0, 64.0);
        CandleStickChart::chart().render_hover(&mut surface, &sample(), 0.0);
        assert_eq!(surface.rects().last().unwrap().y, 0.0);
    }
}
