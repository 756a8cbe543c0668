use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis aligned rectangle in surface coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Immediate-mode 2D drawing target.
///
/// Coordinates are device pixels with the origin in the top-left corner and
/// y growing downwards. Stroke and fill settings stay in effect until they
/// are changed again.
pub trait Surface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Device pixels per logical pixel.
    fn pixel_ratio(&self) -> f64 {
        1.0
    }

    fn clear(&mut self, region: Region);

    fn set_stroke(&mut self, color: Color, width: f64);

    fn set_fill(&mut self, color: Color);

    fn line(&mut self, from: Point, to: Point);

    fn fill_rect(&mut self, region: Region);

    fn text(&mut self, at: Point, text: &str);
}

/// A single call made against a [`Surface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Region),
    Stroke { color: Color, width: f64 },
    Fill(Color),
    Line(Point, Point),
    FillRect(Region),
    Text(Point, String),
}

/// Surface that keeps every call it receives.
///
/// Used to compare frames in tests and to replay a frame onto another
/// backend, see [`crate::terminal::SurfaceWidget`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorder {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            calls: Vec::new(),
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drops the recorded calls and keeps the size.
    pub fn take(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Line(from, to) => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = Region> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::FillRect(region) => Some(*region),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text(_, text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn clear(&mut self, region: Region) {
        self.calls.push(DrawCall::Clear(region));
    }

    fn set_stroke(&mut self, color: Color, width: f64) {
        self.calls.push(DrawCall::Stroke { color, width });
    }

    fn set_fill(&mut self, color: Color) {
        self.calls.push(DrawCall::Fill(color));
    }

    fn line(&mut self, from: Point, to: Point) {
        self.calls.push(DrawCall::Line(from, to));
    }

    fn fill_rect(&mut self, region: Region) {
        self.calls.push(DrawCall::FillRect(region));
    }

    fn text(&mut self, at: Point, text: &str) {
        self.calls.push(DrawCall::Text(at, text.to_owned()));
    }
}

const MIN_GRID_SPACING: f64 = 1.0;

/// Draws grid lines every `spacing_x` / `spacing_y` pixels starting at the
/// origin, vertical lines first. Spacing is at least one device pixel.
pub(crate) fn draw_grid(surface: &mut dyn Surface, spacing_x: f64, spacing_y: f64) {
    let (width, height) = (surface.width(), surface.height());
    if spacing_x <= 0.0 || spacing_y <= 0.0 || !spacing_x.is_finite() || !spacing_y.is_finite() {
        return;
    }
    if !(width.is_finite() && height.is_finite()) {
        return;
    }
    let spacing_x = spacing_x.max(MIN_GRID_SPACING);
    let spacing_y = spacing_y.max(MIN_GRID_SPACING);

    let columns = (width / spacing_x).ceil().max(0.0) as usize;
    for i in 0..columns {
        let x = i as f64 * spacing_x;
        surface.line(Point::new(x, 0.0), Point::new(x, height));
    }

    let rows = (height / spacing_y).ceil().max(0.0) as usize;
    for i in 0..rows {
        let y = i as f64 * spacing_y;
        surface.line(Point::new(0.0, y), Point::new(width, y));
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::{draw_grid, DrawCall, Point, Recorder, Region, Surface};

    #[test]
    fn records_in_order() {
        let mut recorder = Recorder::new(10.0, 10.0);
        recorder.set_fill(Color::Red);
        recorder.fill_rect(Region::new(1.0, 1.0, 2.0, 2.0));
        recorder.text(Point::new(0.0, 0.0), "hi");

        assert_eq!(
            recorder.calls(),
            &[
                DrawCall::Fill(Color::Red),
                DrawCall::FillRect(Region::new(1.0, 1.0, 2.0, 2.0)),
                DrawCall::Text(Point::new(0.0, 0.0), String::from("hi")),
            ]
        );
        assert_eq!(recorder.texts().collect::<Vec<_>>(), vec!["hi"]);

        let taken = recorder.take();
        assert_eq!(taken.len(), 3);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn grid_covers_surface() {
        let mut recorder = Recorder::new(100.0, 50.0);
        draw_grid(&mut recorder, 40.0, 40.0);
        let lines = recorder.lines().collect::<Vec<_>>();
        // x = 0, 40, 80 and y = 0, 40
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], (Point::new(80.0, 0.0), Point::new(80.0, 50.0)));
        assert_eq!(lines[4], (Point::new(0.0, 40.0), Point::new(100.0, 40.0)));
    }

    #[test]
    fn grid_ignores_bad_spacing() {
        let mut recorder = Recorder::new(100.0, 50.0);
        draw_grid(&mut recorder, 0.0, 40.0);
        draw_grid(&mut recorder, f64::NAN, 40.0);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn grid_spacing_is_at_least_one_pixel() {
        let mut recorder = Recorder::new(100.0, 50.0);
        draw_grid(&mut recorder, 1e-7, 1e-300);
        assert_eq!(recorder.lines().count(), 100 + 50);

        // tiny pixel ratios shrink the spacing, not the line budget
        let mut recorder = Recorder::new(100.0, 50.0).with_pixel_ratio(1e-9);
        let spacing = 100.0 * recorder.pixel_ratio();
        draw_grid(&mut recorder, spacing, 40.0);
        assert_eq!(recorder.lines().count(), 100 + 2);
    }
}
