use crate::{surface::Surface, Theme};

/// Size of the hosting area in logical pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Option<Self> {
        let valid = width.is_finite()
            && height.is_finite()
            && width >= 0.0
            && height >= 0.0
            && pixel_ratio.is_finite()
            && pixel_ratio > 0.0;

        valid.then_some(Self {
            width,
            height,
            pixel_ratio,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    pub fn device_width(&self) -> f64 {
        (self.width * self.pixel_ratio).floor()
    }

    pub fn device_height(&self) -> f64 {
        (self.height * self.pixel_ratio).floor()
    }

    pub fn is_empty(&self) -> bool {
        self.device_width() < 1.0 || self.device_height() < 1.0
    }
}

/// Pointer position relative to the viewport, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    x: f64,
    y: f64,
}

impl Default for Pointer {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl Pointer {
    /// Out of range coordinates are clamped, NaN becomes the centre.
    pub fn new(x: f64, y: f64) -> Self {
        let clamp = |v: f64| if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) };
        Self {
            x: clamp(x),
            y: clamp(y),
        }
    }

    /// Pointer at pixel `(x, y)` inside a `width` x `height` area.
    pub fn from_pixels(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x / width, y / height)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// Linear map from `[0, 1]` onto `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRange {
    pub min: f64,
    pub max: f64,
}

impl LinearRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    Running,
    #[default]
    Stopped,
}

/// Something redrawn on every display refresh.
pub trait Animation {
    /// The hosting area changed size; state may be rebuilt from scratch.
    fn resize(&mut self, viewport: Viewport);

    fn pointer_moved(&mut self, _pointer: Pointer) {}

    /// The page theme changed; animations without up/down colours ignore it.
    fn set_theme(&mut self, _theme: Theme) {}

    /// Advances state by `elapsed_ms`, `now_ms` is the frame timestamp.
    fn update(&mut self, elapsed_ms: f64, now_ms: f64);

    fn draw(&self, surface: &mut dyn Surface);
}

impl<A: Animation + ?Sized> Animation for Box<A> {
    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport);
    }

    fn pointer_moved(&mut self, pointer: Pointer) {
        (**self).pointer_moved(pointer);
    }

    fn set_theme(&mut self, theme: Theme) {
        (**self).set_theme(theme);
    }

    fn update(&mut self, elapsed_ms: f64, now_ms: f64) {
        (**self).update(elapsed_ms, now_ms);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        (**self).draw(surface);
    }
}

/// Owns the lifecycle of one animation and turns refresh timestamps into
/// elapsed time.
#[derive(Debug, Clone)]
pub struct Driver<A> {
    animation: A,
    state: LoopState,
    last_frame: Option<f64>,
}

impl<A: Animation> Driver<A> {
    /// The driver starts stopped.
    pub fn new(animation: A) -> Self {
        Self {
            animation,
            state: LoopState::Stopped,
            last_frame: None,
        }
    }

    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        tracing::debug!("animation started");
        self.state = LoopState::Running;
        self.last_frame = None;
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        tracing::debug!("animation stopped");
        self.state = LoopState::Stopped;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }

    pub fn into_inner(self) -> A {
        self.animation
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.animation.resize(viewport);
    }

    pub fn pointer_moved(&mut self, pointer: Pointer) {
        self.animation.pointer_moved(pointer);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.animation.set_theme(theme);
    }

    /// Runs one refresh. Returns whether another frame should be scheduled.
    ///
    /// The first frame after [`Driver::start`] has no elapsed time, as does
    /// any frame whose timestamp goes backwards.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }

        let elapsed = match self.last_frame {
            Some(last) if now_ms.is_finite() => (now_ms - last).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_frame = Some(now_ms);
        }

        self.animation.update(elapsed, now_ms);
        self.animation.draw(surface);
        true
    }
}
