use crate::surface::{Point, Region};

/// Largest rotation in degrees, reached at the element edges.
pub const MAX_TILT: f64 = 6.0;

/// 3D rotation that leans an element towards the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    pub const REST: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Tilt for a pointer at `pointer` over `element`, both in the same
    /// coordinate space. Degenerate or non-finite input yields [`Tilt::REST`].
    pub fn towards(element: Region, pointer: Point) -> Self {
        if !(element.width > 0.0 && element.height > 0.0)
            || !element.is_finite()
            || !pointer.is_finite()
        {
            return Self::REST;
        }

        let x = pointer.x - element.x;
        let y = pointer.y - element.y;
        let dx = (x - element.width / 2.0) / element.width;
        let dy = (y - element.height / 2.0) / element.height;

        Self {
            rotate_x: dy * -MAX_TILT,
            rotate_y: dx * MAX_TILT,
        }
    }

    /// CSS `transform` value.
    pub fn css_transform(&self) -> String {
        format!("rotateX({}deg) rotateY({}deg)", self.rotate_x, self.rotate_y)
    }
}
