//! Landmark frames and the face mesh index map

use crate::geometry::{NormalizedPoint, PixelPoint};
use crate::LandmarkError;

/// Landmark count of the face mesh model (iris refinement adds 10 more)
pub const FACE_MESH_LANDMARKS: usize = 468;

/// Vertical pairs and corners used for the mouth ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouthIndices {
    pub left_corner: usize,
    pub right_corner: usize,
    pub upper_center: usize,
    pub lower_center: usize,
    pub upper_left: usize,
    pub lower_left: usize,
    pub upper_right: usize,
    pub lower_right: usize,
}

/// Named groupings of landmark indices that feed each ratio.
///
/// Eye rings are ordered `[outer, upper-far, upper-near, inner, lower-near, lower-far]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkIndexSet {
    pub left_eye: [usize; 6],
    pub right_eye: [usize; 6],
    pub mouth: MouthIndices,
    pub nose_tip: usize,
    pub chin: usize,
    pub left_eye_corner: usize,
    pub right_eye_corner: usize,
}

/// Index map for the 468-point face mesh
pub const FACE_MESH: LandmarkIndexSet = LandmarkIndexSet {
    left_eye: [362, 385, 387, 263, 373, 380],
    right_eye: [33, 160, 158, 133, 153, 144],
    mouth: MouthIndices {
        left_corner: 61,
        right_corner: 291,
        upper_center: 13,
        lower_center: 14,
        upper_left: 82,
        lower_left: 87,
        upper_right: 312,
        lower_right: 317,
    },
    nose_tip: 1,
    chin: 152,
    left_eye_corner: 33,
    right_eye_corner: 263,
};

/// One detector output: every landmark of a single face plus the
/// pixel size of the image it was detected in.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: Vec<NormalizedPoint>,
    width: u32,
    height: u32,
}

impl LandmarkFrame {
    /// Build a frame, rejecting zero-sized images, partial landmark sets and
    /// NaN/inf coordinates
    pub fn new(points: Vec<NormalizedPoint>, width: u32, height: u32) -> Result<Self, LandmarkError> {
        if width == 0 || height == 0 {
            return Err(LandmarkError::EmptyFrame { width, height });
        }

        if points.len() < FACE_MESH_LANDMARKS {
            return Err(LandmarkError::TooFewLandmarks {
                expected: FACE_MESH_LANDMARKS,
                actual: points.len(),
            });
        }

        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(LandmarkError::NonFiniteCoordinate { index });
        }

        Ok(Self {
            points,
            width,
            height,
        })
    }

    /// Build a frame from `[x, y]` pairs (the wire representation)
    pub fn from_pairs(pairs: &[[f64; 2]], width: u32, height: u32) -> Result<Self, LandmarkError> {
        let points = pairs
            .iter()
            .map(|&[x, y]| NormalizedPoint::new(x, y))
            .collect();
        Self::new(points, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NormalizedPoint> {
        self.points.get(index).copied()
    }

    /// Pixel position of a face mesh landmark.
    ///
    /// Every index in [`FACE_MESH`] is below [`FACE_MESH_LANDMARKS`], which
    /// the constructor guarantees is in bounds.
    pub(crate) fn pixel(&self, index: usize) -> PixelPoint {
        self.points[index].to_pixel(self.width, self.height)
    }

    /// The six normalized points of an eye ring, in ring order
    pub fn eye_ring(&self, ring: &[usize; 6]) -> [NormalizedPoint; 6] {
        ring.map(|i| self.points[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_index(set: &LandmarkIndexSet) -> usize {
        let m = set.mouth;
        set.left_eye
            .iter()
            .chain(set.right_eye.iter())
            .chain(
                [
                    m.left_corner,
                    m.right_corner,
                    m.upper_center,
                    m.lower_center,
                    m.upper_left,
                    m.lower_left,
                    m.upper_right,
                    m.lower_right,
                    set.nose_tip,
                    set.chin,
                    set.left_eye_corner,
                    set.right_eye_corner,
                ]
                .iter(),
            )
            .copied()
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_face_mesh_indices_fit_model() {
        assert!(max_index(&FACE_MESH) < FACE_MESH_LANDMARKS);
    }

    #[test]
    fn test_rejects_partial_frame() {
        let points = vec![NormalizedPoint::new(0.5, 0.5); 100];
        let err = LandmarkFrame::new(points, 640, 480).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::TooFewLandmarks {
                expected: FACE_MESH_LANDMARKS,
                actual: 100
            }
        );
    }

    #[test]
    fn test_rejects_non_finite_coordinate() {
        let mut points = vec![NormalizedPoint::new(0.5, 0.5); FACE_MESH_LANDMARKS];
        points[42].y = f64::NAN;
        let err = LandmarkFrame::new(points, 640, 480).unwrap_err();
        assert_eq!(err, LandmarkError::NonFiniteCoordinate { index: 42 });
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let points = vec![NormalizedPoint::new(0.5, 0.5); FACE_MESH_LANDMARKS];
        for (width, height) in [(0, 0), (0, 480), (640, 0)] {
            let err = LandmarkFrame::new(points.clone(), width, height).unwrap_err();
            assert_eq!(err, LandmarkError::EmptyFrame { width, height });
        }
    }

    #[test]
    fn test_accepts_refined_mesh() {
        let pairs = vec![[0.25, 0.75]; 478];
        let frame = LandmarkFrame::from_pairs(&pairs, 320, 240).unwrap();
        assert_eq!(frame.len(), 478);
        assert_eq!(frame.get(477), Some(NormalizedPoint::new(0.25, 0.75)));
        assert_eq!(frame.get(478), None);
        assert_eq!(frame.pixel(0), PixelPoint { x: 80.0, y: 180.0 });
    }
}
