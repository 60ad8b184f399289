use crate::types::Point2D;
use serde::{Deserialize, Serialize};

/// Axis-aligned border around the pieces to cut, used to square the stock.
///
/// "Bottom" is the side nearest to the x axis (`y_min`), "top" is `y_max`.
/// When no input point exists every bound is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Border {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Border {
    /// Build the bounding box of all non-empty `paths`, grown outward by `margin` on every side.
    pub fn new<P: AsRef<[Point2D]>>(paths: &[P], margin: f64) -> Self {
        let mut aabb: Option<(f64, f64, f64, f64)> = None;

        for path in paths {
            for &(x, y) in path.as_ref() {
                aabb = Some(match aabb {
                    Some((x_min, x_max, y_min, y_max)) => {
                        (x_min.min(x), x_max.max(x), y_min.min(y), y_max.max(y))
                    }
                    None => (x, x, y, y),
                });
            }
        }

        match aabb {
            Some((x_min, x_max, y_min, y_max)) => Self {
                x_min: x_min - margin,
                x_max: x_max + margin,
                y_min: y_min - margin,
                y_max: y_max + margin,
            },
            None => Self::default(),
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn left(&self) -> f64 {
        self.x_min
    }

    pub fn right(&self) -> f64 {
        self.x_max
    }

    pub fn top(&self) -> f64 {
        self.y_max
    }

    pub fn bottom(&self) -> f64 {
        self.y_min
    }

    pub fn bottom_left(&self) -> Point2D {
        (self.x_min, self.y_min)
    }

    pub fn bottom_right(&self) -> Point2D {
        (self.x_max, self.y_min)
    }

    pub fn top_right(&self) -> Point2D {
        (self.x_max, self.y_max)
    }

    pub fn top_left(&self) -> Point2D {
        (self.x_min, self.y_max)
    }
}
