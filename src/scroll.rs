use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    animation::{Animation, LinearRange, Pointer, Viewport},
    candles::{CandleStickChart, Layout},
    generator::{SeriesGenerator, WalkParams},
    surface::Surface,
    Ohlc, Theme,
};

/// Fraction of a glyph below which the offset is considered on a boundary.
const SNAP: f64 = 1e-9;

/// Close the first candle opens at after a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedClose {
    /// Half the device height, for walks measured in pixels.
    Midpoint,
    Value(f64),
}

/// How the walk step sizes are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkScale {
    /// Proportional to the viewport, see [`WalkParams::background`].
    Viewport,
    Fixed(WalkParams),
}

/// Tunables of a scrolling candle stream.
///
/// `speed` is in logical pixels per `time_unit_ms` of elapsed time. The
/// pointer's horizontal position picks the speed from `speed_range`, the
/// vertical position picks the volatility from `volatility_range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    pub glyph_width: f64,
    pub buffer: usize,
    pub speed_range: LinearRange,
    pub volatility_range: LinearRange,
    pub initial_speed: f64,
    pub initial_volatility: f64,
    pub time_unit_ms: f64,
    pub seed: SeedClose,
    pub walk: WalkScale,
}

impl ScrollConfig {
    /// Wide candles drifting behind a landing page, speed measured per
    /// ~60 Hz frame.
    pub fn background() -> Self {
        Self {
            glyph_width: 40.0,
            buffer: 6,
            speed_range: LinearRange::new(0.5, 2.5),
            volatility_range: LinearRange::new(0.3, 2.0),
            initial_speed: 0.8,
            initial_volatility: 0.5,
            time_unit_ms: 16.7,
            seed: SeedClose::Midpoint,
            walk: WalkScale::Viewport,
        }
    }

    /// Narrow price candles, speed measured in pixels per second.
    pub fn ticker() -> Self {
        let speed_range = LinearRange::new(22.0, 110.0);
        let volatility_range = LinearRange::new(0.8, 3.0);
        let centre = Pointer::default();

        Self {
            glyph_width: 16.0,
            buffer: 20,
            speed_range,
            volatility_range,
            initial_speed: speed_range.lerp(centre.x()),
            initial_volatility: volatility_range.lerp(centre.y()),
            time_unit_ms: 1000.0,
            seed: SeedClose::Value(100.0),
            walk: WalkScale::Fixed(WalkParams::ticker()),
        }
    }
}

/// Endless stream of candles scrolling to the left.
///
/// Whenever the scroll offset passes a full glyph the oldest candle is
/// dropped and a new one generated from the newest close, so the number of
/// candles only changes on resize.
#[derive(Debug, Clone)]
pub struct ScrollLoop<R = StdRng> {
    config: ScrollConfig,
    chart: CandleStickChart,
    generator: SeriesGenerator<R>,
    viewport: Viewport,
    candles: VecDeque<Ohlc>,
    offset: f64,
    speed: f64,
    volatility: f64,
}

impl ScrollLoop<StdRng> {
    pub fn background(viewport: Viewport) -> Self {
        Self::new(
            ScrollConfig::background(),
            CandleStickChart::background(),
            viewport,
            StdRng::from_os_rng(),
        )
    }

    pub fn ticker(viewport: Viewport) -> Self {
        Self::new(
            ScrollConfig::ticker(),
            CandleStickChart::ticker(),
            viewport,
            StdRng::from_os_rng(),
        )
    }
}

impl<R: Rng> ScrollLoop<R> {
    pub fn new(config: ScrollConfig, chart: CandleStickChart, viewport: Viewport, rng: R) -> Self {
        let mut this = Self {
            config,
            chart,
            generator: SeriesGenerator::with_rng(rng, WalkParams::default()),
            viewport,
            candles: VecDeque::new(),
            offset: 0.0,
            speed: config.initial_speed,
            volatility: config.initial_volatility,
        };
        this.regenerate();
        this
    }

    pub fn candles(&self) -> &VecDeque<Ohlc> {
        &self.candles
    }

    /// Scroll offset in device pixels, always below [`Self::glyph_width`].
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Glyph width in device pixels.
    pub fn glyph_width(&self) -> f64 {
        self.config.glyph_width * self.viewport.pixel_ratio()
    }

    /// Scrolls by `speed * dt` logical pixels and recycles every candle that
    /// left the screen. Returns the number of recycled candles.
    pub fn advance(&mut self, dt: f64) -> usize {
        let glyph = self.glyph_width();
        if !(dt.is_finite() && dt > 0.0) || !(glyph > 0.0) {
            return 0;
        }

        self.offset += self.speed * dt * self.viewport.pixel_ratio();

        // rounding noise around a glyph boundary counts as the boundary
        let mut passed = (self.offset / glyph).floor();
        let mut rest = self.offset - passed * glyph;
        if glyph - rest <= glyph * SNAP {
            passed += 1.0;
            rest = 0.0;
        } else if rest <= glyph * SNAP {
            rest = 0.0;
        }
        self.offset = rest;
        if passed < 1.0 {
            return 0;
        }

        // a long stall replaces at most the whole window
        let recycles = (passed as usize).min(self.candles.len());
        for _ in 0..recycles {
            self.candles.pop_front();
            let previous = self
                .candles
                .back()
                .map(Ohlc::close)
                .unwrap_or_else(|| self.seed_close());
            let candle = self.generator.next(previous, self.volatility);
            self.candles.push_back(candle);
        }

        tracing::trace!(recycles, offset = self.offset, "candles recycled");
        recycles
    }

    fn seed_close(&self) -> f64 {
        match self.config.seed {
            SeedClose::Midpoint => self.viewport.device_height() / 2.0,
            SeedClose::Value(value) => value,
        }
    }

    fn regenerate(&mut self) {
        let glyph = self.glyph_width();
        let params = match self.config.walk {
            WalkScale::Viewport => WalkParams::background(self.viewport.device_height(), glyph),
            WalkScale::Fixed(params) => params,
        };
        self.generator.set_params(params);

        let count = if self.viewport.is_empty() || !(glyph > 0.0) {
            0
        } else {
            (self.viewport.device_width() / glyph).ceil() as usize + self.config.buffer
        };
        let seed = self.seed_close();
        self.candles = self.generator.series(seed, count, self.volatility).into();
        self.offset = 0.0;

        tracing::trace!(count, seed, "series regenerated");
    }
}

impl<R: Rng> Animation for ScrollLoop<R> {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.regenerate();
    }

    fn set_theme(&mut self, theme: Theme) {
        self.chart.set_theme(theme);
    }

    fn pointer_moved(&mut self, pointer: Pointer) {
        self.speed = self.config.speed_range.lerp(pointer.x());
        self.volatility = self.config.volatility_range.lerp(pointer.y());
    }

    fn update(&mut self, elapsed_ms: f64, _now_ms: f64) {
        self.advance(elapsed_ms / self.config.time_unit_ms);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.chart.render(
            surface,
            &self.candles,
            Layout::Scroll {
                glyph_width: self.glyph_width(),
                offset: self.offset,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use ratatui::style::Color;

    use super::{ScrollConfig, ScrollLoop};
    use crate::{
        animation::{Animation, Driver, Pointer, Viewport},
        candles::CandleStickChart,
        surface::{DrawCall, Recorder},
        Theme,
    };

    fn background(width: f64, height: f64, ratio: f64) -> ScrollLoop {
        ScrollLoop::new(
            ScrollConfig::background(),
            CandleStickChart::background(),
            Viewport::new(width, height, ratio).unwrap(),
            StdRng::seed_from_u64(21),
        )
    }

    fn ticker(width: f64, height: f64) -> ScrollLoop {
        ScrollLoop::new(
            ScrollConfig::ticker(),
            CandleStickChart::ticker(),
            Viewport::new(width, height, 1.0).unwrap(),
            StdRng::seed_from_u64(21),
        )
    }

    #[test]
    fn fills_the_viewport() {
        let stream = background(800.0, 600.0, 1.0);
        assert_eq!(stream.candles().len(), 20 + 6);
        assert_eq!(stream.candles()[0].open(), 300.0);

        let stream = background(810.0, 600.0, 2.0);
        assert_eq!(stream.glyph_width(), 80.0);
        assert_eq!(stream.candles().len(), 21 + 6);

        let stream = ticker(800.0, 600.0);
        assert_eq!(stream.candles().len(), 50 + 20);
        assert_eq!(stream.candles()[0].open(), 100.0);
    }

    #[test]
    fn one_glyph_recycles_once() {
        let mut stream = background(800.0, 600.0, 1.0);
        stream.pointer_moved(Pointer::new(0.75, 0.5));
        assert_eq!(stream.speed(), 2.0);

        let before = stream.candles().clone();
        let recycled = stream.advance(stream.glyph_width() / stream.speed());

        assert_eq!(recycled, 1);
        assert_eq!(stream.offset(), 0.0);
        assert_eq!(stream.candles().len(), before.len());
        assert_eq!(stream.candles()[0], before[1]);
        assert_eq!(
            stream.candles().back().unwrap().open(),
            before.back().unwrap().close()
        );
    }

    #[test]
    fn exact_glyph_recycles_once_at_any_speed() {
        for ratio in [1.0, 1.5, 2.0, 3.0] {
            let mut stream = background(800.0, 600.0, ratio);
            for i in 0..=100 {
                let x = f64::from(i) / 100.0;
                stream.pointer_moved(Pointer::new(x, 0.5));
                let recycled = stream.advance(40.0 / stream.speed());
                assert_eq!((ratio, x, recycled), (ratio, x, 1));
                assert_eq!((ratio, x, stream.offset()), (ratio, x, 0.0));
            }
        }
    }

    #[test]
    fn partial_glyph_only_moves() {
        let mut stream = background(800.0, 600.0, 1.0);
        stream.pointer_moved(Pointer::new(0.75, 0.5));
        let before = stream.candles().clone();

        assert_eq!(stream.advance(5.0), 0);
        assert_eq!(stream.offset(), 10.0);
        assert_eq!(stream.candles(), &before);

        assert_eq!(stream.advance(0.0), 0);
        assert_eq!(stream.advance(f64::NAN), 0);
        assert_eq!(stream.offset(), 10.0);
    }

    #[test]
    fn elapsed_time_uses_time_unit() {
        let mut stream = ticker(800.0, 600.0);
        assert_eq!(stream.speed(), 66.0);
        let len = stream.candles().len();

        stream.update(1000.0, 1000.0);
        assert_eq!(stream.offset(), 2.0);
        assert_eq!(stream.candles().len(), len);
    }

    #[test]
    fn long_stall_is_bounded() {
        let mut stream = ticker(160.0, 100.0);
        let len = stream.candles().len();
        let recycled = stream.advance(1e6);
        assert_eq!(recycled, len);
        assert_eq!(stream.candles().len(), len);
        assert!(stream.offset() < stream.glyph_width());
    }

    #[test]
    fn pointer_maps_to_speed_and_volatility() {
        let mut stream = background(800.0, 600.0, 1.0);
        assert_eq!((stream.speed(), stream.volatility()), (0.8, 0.5));
        stream.pointer_moved(Pointer::new(1.0, 1.0));
        assert_eq!((stream.speed(), stream.volatility()), (2.5, 2.0));

        let mut stream = ticker(800.0, 600.0);
        stream.pointer_moved(Pointer::new(0.0, 0.0));
        assert_eq!((stream.speed(), stream.volatility()), (22.0, 0.8));
    }

    #[test]
    fn resize_regenerates() {
        let mut stream = background(800.0, 600.0, 1.0);
        stream.pointer_moved(Pointer::new(0.75, 0.5));
        stream.advance(5.0);

        stream.resize(Viewport::new(400.0, 200.0, 1.0).unwrap());
        assert_eq!(stream.offset(), 0.0);
        assert_eq!(stream.candles().len(), 10 + 6);
        assert_eq!(stream.candles()[0].open(), 100.0);
        assert!(stream
            .candles()
            .iter()
            .all(|c| (40.0..=160.0).contains(&c.close())));
    }

    #[test]
    fn empty_viewport_is_inert() {
        let mut stream = background(0.0, 0.0, 1.0);
        assert!(stream.candles().is_empty());
        assert_eq!(stream.advance(100.0), 0);

        let mut surface = Recorder::new(0.0, 0.0);
        stream.draw(&mut surface);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn draws_every_candle() {
        let stream = ticker(320.0, 200.0);
        let mut surface = Recorder::new(320.0, 200.0);
        stream.draw(&mut surface);
        // black backdrop plus one body per candle
        assert_eq!(surface.rects().count(), 1 + stream.candles().len());

        let mut again = Recorder::new(320.0, 200.0);
        stream.draw(&mut again);
        assert_eq!(surface, again);
    }

    #[test]
    fn theme_reaches_boxed_stream() {
        let stream: Box<dyn Animation> = Box::new(ticker(320.0, 200.0));
        let mut driver = Driver::new(stream);
        driver.set_theme(Theme::new(Color::Blue, Color::Yellow));
        driver.start();

        let mut surface = Recorder::new(320.0, 200.0);
        assert!(driver.frame(0.0, &mut surface));
        let fills = surface
            .calls()
            .iter()
            .filter_map(|call| match call {
                DrawCall::Fill(color) => Some(*color),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(fills.len() > 1);
        assert!(fills
            .iter()
            .all(|color| [Color::Black, Color::Blue, Color::Yellow].contains(color)));
    }
}
