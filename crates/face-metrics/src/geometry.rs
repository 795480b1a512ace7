//! Point types and distance helpers

use serde::{Deserialize, Serialize};

/// Landmark position as emitted by the detector, in [0, 1] image units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale into pixel space
    pub fn to_pixel(self, width: u32, height: u32) -> PixelPoint {
        PixelPoint {
            x: self.x * width as f64,
            y: self.y * height as f64,
        }
    }
}

/// Landmark position in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Euclidean distance between two pixel points
pub fn distance(a: PixelPoint, b: PixelPoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_pythagorean() {
        let a = PixelPoint { x: 0.0, y: 0.0 };
        let b = PixelPoint { x: 3.0, y: 4.0 };
        assert!((distance(a, b) - 5.0).abs() < 1e-12);
        assert!((distance(b, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_pixel_scales_axes_independently() {
        let p = NormalizedPoint::new(0.5, 0.25).to_pixel(640, 480);
        assert_eq!(p, PixelPoint { x: 320.0, y: 120.0 });
    }

    #[test]
    fn test_zero_sized_frame_collapses_points() {
        let a = NormalizedPoint::new(0.1, 0.9).to_pixel(0, 0);
        let b = NormalizedPoint::new(0.7, 0.2).to_pixel(0, 0);
        assert_eq!(distance(a, b), 0.0);
    }
}
