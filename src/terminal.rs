use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Line as TextLine,
    widgets::{
        canvas::{Canvas, Context, Line, Painter, Shape},
        Widget,
    },
};

use crate::surface::{DrawCall, Recorder, Region, Surface};

/// Solid rectangle in canvas coordinates, bottom-left origin.
struct FilledRect {
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
    color: Color,
}

impl Shape for FilledRect {
    fn draw(&self, painter: &mut Painter) {
        let (Some((x1, y1)), Some((x2, y2))) = (
            painter.get_point(self.left, self.bottom),
            painter.get_point(self.right, self.top),
        ) else {
            return;
        };

        // painter rows grow downwards
        for x in x1.min(x2)..=x1.max(x2) {
            for y in y1.min(y2)..=y1.max(y2) {
                painter.paint(x, y, self.color);
            }
        }
    }
}

/// Replays the frame captured by a [`Recorder`] onto a terminal canvas.
///
/// One surface pixel maps onto one canvas unit, so sizing the recorder at
/// twice the columns and four times the rows of the target area gives one
/// pixel per braille dot.
pub struct SurfaceWidget<'a> {
    calls: &'a [DrawCall],
    width: f64,
    height: f64,
    marker: Marker,
}

impl<'a> SurfaceWidget<'a> {
    pub fn new(recorder: &'a Recorder) -> Self {
        Self {
            calls: recorder.calls(),
            width: recorder.width(),
            height: recorder.height(),
            marker: Marker::Braille,
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    fn replay(&self, ctx: &mut Context) {
        let mut stroke = Color::Reset;
        let mut fill = Color::Reset;

        for call in self.calls {
            match call {
                // the buffer is fresh on every terminal draw
                DrawCall::Clear(_) => {}
                DrawCall::Stroke { color, .. } => stroke = *color,
                DrawCall::Fill(color) => fill = *color,
                DrawCall::Line(from, to) => ctx.draw(&Line {
                    x1: from.x,
                    y1: self.height - from.y,
                    x2: to.x,
                    y2: self.height - to.y,
                    color: stroke,
                }),
                DrawCall::FillRect(region) => {
                    if let Some(rect) = self.clip(region, fill) {
                        ctx.draw(&rect);
                    }
                }
                DrawCall::Text(at, text) => ctx.print(
                    at.x,
                    self.height - at.y,
                    TextLine::styled(text.clone(), Style::default().fg(fill)),
                ),
            }
        }
    }

    fn clip(&self, region: &Region, color: Color) -> Option<FilledRect> {
        let left = region.x.max(0.0);
        let right = (region.x + region.width).min(self.width);
        let top = (self.height - region.y).min(self.height);
        let bottom = (self.height - region.y - region.height).max(0.0);

        (left <= right && bottom <= top).then_some(FilledRect {
            left,
            bottom,
            right,
            top,
            color,
        })
    }
}

impl Widget for SurfaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !(self.width > 0.0 && self.height > 0.0) {
            return;
        }

        Canvas::default()
            .marker(self.marker)
            .x_bounds([0.0, self.width])
            .y_bounds([0.0, self.height])
            .paint(|ctx| self.replay(ctx))
            .render(area, buf);
    }
}
