//! Eye, mouth, and head-yaw ratios
//!
//! All ratios are computed in pixel space so that non-square frames do not
//! skew the vertical/horizontal comparison.

use crate::geometry::{distance, NormalizedPoint};
use crate::landmarks::{LandmarkFrame, FACE_MESH};

/// Nose offset (fraction of face width) beyond which the head counts as turned
pub const DEFAULT_YAW_OFFSET_THRESHOLD: f64 = 0.30;

/// Eye Aspect Ratio of a six-point eye ring.
///
/// `EAR = (|p2 - p6| + |p3 - p5|) / (2 * |p1 - p4|)`
///
/// Open eyes sit around 0.25-0.35, closed eyes below 0.20. A zero-width eye
/// yields exactly 0.0.
pub fn eye_aspect_ratio(eye: &[NormalizedPoint; 6], width: u32, height: u32) -> f64 {
    let [p1, p2, p3, p4, p5, p6] = eye.map(|p| p.to_pixel(width, height));

    let horizontal = distance(p1, p4);
    if horizontal == 0.0 {
        return 0.0;
    }

    (distance(p2, p6) + distance(p3, p5)) / (2.0 * horizontal)
}

/// Mouth Aspect Ratio: mean of three lip separations over mouth width.
///
/// Closed mouth is roughly 0.1-0.3, a yawn exceeds 0.6.
pub fn mouth_aspect_ratio(frame: &LandmarkFrame) -> f64 {
    let m = FACE_MESH.mouth;

    let horizontal = distance(frame.pixel(m.left_corner), frame.pixel(m.right_corner));
    if horizontal == 0.0 {
        return 0.0;
    }

    let center = distance(frame.pixel(m.upper_center), frame.pixel(m.lower_center));
    let left = distance(frame.pixel(m.upper_left), frame.pixel(m.lower_left));
    let right = distance(frame.pixel(m.upper_right), frame.pixel(m.lower_right));

    (center + left + right) / (3.0 * horizontal)
}

/// Horizontal nose offset from the eye-corner midpoint, as a fraction of
/// the eye-corner span. `None` when the span is zero.
pub fn head_yaw_offset(frame: &LandmarkFrame) -> Option<f64> {
    let nose = frame.pixel(FACE_MESH.nose_tip);
    let left = frame.pixel(FACE_MESH.left_eye_corner);
    let right = frame.pixel(FACE_MESH.right_eye_corner);

    let face_width = (right.x - left.x).abs();
    if face_width == 0.0 {
        return None;
    }

    let eye_center_x = (left.x + right.x) / 2.0;
    Some((nose.x - eye_center_x).abs() / face_width)
}

/// Whether the head is turned far enough to count as looking away.
/// A degenerate face width cannot be assessed and reports `false`.
pub fn estimate_distraction(frame: &LandmarkFrame, threshold: f64) -> bool {
    head_yaw_offset(frame).is_some_and(|offset| offset > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::FACE_MESH_LANDMARKS;
    use proptest::prelude::*;

    const W: u32 = 640;
    const H: u32 = 480;

    /// Ring with a given horizontal span and lid gap, centered at (cx, cy)
    fn eye(cx: f64, cy: f64, span: f64, gap: f64) -> [NormalizedPoint; 6] {
        let half = span / 2.0;
        let third = span / 6.0;
        [
            NormalizedPoint::new(cx - half, cy),
            NormalizedPoint::new(cx - third, cy - gap / 2.0),
            NormalizedPoint::new(cx + third, cy - gap / 2.0),
            NormalizedPoint::new(cx + half, cy),
            NormalizedPoint::new(cx + third, cy + gap / 2.0),
            NormalizedPoint::new(cx - third, cy + gap / 2.0),
        ]
    }

    fn frame_with(overrides: &[(usize, NormalizedPoint)], width: u32, height: u32) -> LandmarkFrame {
        let mut points = vec![NormalizedPoint::new(0.5, 0.5); FACE_MESH_LANDMARKS];
        for &(i, p) in overrides {
            points[i] = p;
        }
        LandmarkFrame::new(points, width, height).unwrap()
    }

    fn mouth_frame(open: f64, width: u32, height: u32) -> LandmarkFrame {
        mouth_frame_at(0.50, 0.70, open, width, height)
    }

    /// Mouth 0.2 wide centered at (cx, cy), every lip pair `open` apart
    fn mouth_frame_at(cx: f64, cy: f64, open: f64, width: u32, height: u32) -> LandmarkFrame {
        let m = FACE_MESH.mouth;
        let upper = cy - open / 2.0;
        let lower = cy + open / 2.0;
        frame_with(
            &[
                (m.left_corner, NormalizedPoint::new(cx - 0.10, cy)),
                (m.right_corner, NormalizedPoint::new(cx + 0.10, cy)),
                (m.upper_center, NormalizedPoint::new(cx, upper)),
                (m.lower_center, NormalizedPoint::new(cx, lower)),
                (m.upper_left, NormalizedPoint::new(cx - 0.05, upper)),
                (m.lower_left, NormalizedPoint::new(cx - 0.05, lower)),
                (m.upper_right, NormalizedPoint::new(cx + 0.05, upper)),
                (m.lower_right, NormalizedPoint::new(cx + 0.05, lower)),
            ],
            width,
            height,
        )
    }

    fn yaw_frame(nose_x: f64, left_x: f64, right_x: f64) -> LandmarkFrame {
        frame_with(
            &[
                (FACE_MESH.nose_tip, NormalizedPoint::new(nose_x, 0.55)),
                (FACE_MESH.left_eye_corner, NormalizedPoint::new(left_x, 0.40)),
                (FACE_MESH.right_eye_corner, NormalizedPoint::new(right_x, 0.40)),
            ],
            W,
            H,
        )
    }

    #[test]
    fn test_ear_known_value() {
        // Square frame keeps the arithmetic obvious: gap 0.03 over span 0.1
        let ear = eye_aspect_ratio(&eye(0.5, 0.4, 0.1, 0.03), 100, 100);
        assert!((ear - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_ear_closed_eye_is_low() {
        let open = eye_aspect_ratio(&eye(0.3, 0.4, 0.08, 0.03), W, H);
        let closed = eye_aspect_ratio(&eye(0.3, 0.4, 0.08, 0.004), W, H);
        assert!(open > 0.22);
        assert!(closed < 0.20);
    }

    #[test]
    fn test_ear_zero_width_eye() {
        let p = NormalizedPoint::new(0.3, 0.4);
        let mut ring = [p; 6];
        ring[1].y = 0.35;
        ring[5].y = 0.45;
        assert_eq!(eye_aspect_ratio(&ring, W, H), 0.0);
    }

    #[test]
    fn test_ear_zero_sized_frame() {
        assert_eq!(eye_aspect_ratio(&eye(0.5, 0.5, 0.1, 0.05), 0, 0), 0.0);
    }

    #[test]
    fn test_mar_known_value() {
        // Mouth width 0.2, every pair separated by 0.1 => 0.3 / 0.6 = 0.5
        let mar = mouth_aspect_ratio(&mouth_frame(0.1, 100, 100));
        assert!((mar - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_mar_yawn_exceeds_threshold() {
        assert!(mouth_aspect_ratio(&mouth_frame(0.15, 100, 100)) > 0.6);
        assert!(mouth_aspect_ratio(&mouth_frame(0.02, 100, 100)) < 0.3);
    }

    #[test]
    fn test_mar_degenerate_corners() {
        // Default frame has every point at the center
        let frame = frame_with(&[], W, H);
        assert_eq!(mouth_aspect_ratio(&frame), 0.0);
    }

    #[test]
    fn test_distraction_facing_forward() {
        let frame = yaw_frame(0.50, 0.40, 0.60);
        assert!(head_yaw_offset(&frame).unwrap() < 1e-9);
        assert!(!estimate_distraction(&frame, DEFAULT_YAW_OFFSET_THRESHOLD));
    }

    #[test]
    fn test_distraction_head_turned() {
        // Offset 0.07 over width 0.2 = 0.35
        let frame = yaw_frame(0.57, 0.40, 0.60);
        assert!(estimate_distraction(&frame, DEFAULT_YAW_OFFSET_THRESHOLD));
    }

    #[test]
    fn test_distraction_slight_turn_is_tolerated() {
        let frame = yaw_frame(0.55, 0.40, 0.60);
        assert!(!estimate_distraction(&frame, DEFAULT_YAW_OFFSET_THRESHOLD));
    }

    #[test]
    fn test_distraction_zero_face_width() {
        let frame = yaw_frame(0.9, 0.5, 0.5);
        assert_eq!(head_yaw_offset(&frame), None);
        assert!(!estimate_distraction(&frame, DEFAULT_YAW_OFFSET_THRESHOLD));
    }

    proptest! {
        #[test]
        fn prop_flat_eye_is_zero(
            y in 0.0f64..1.0,
            xs in proptest::array::uniform4(0.0f64..1.0),
        ) {
            // Lids collapsed onto one line: each upper point meets its lower partner
            let [outer, far, near, inner] = xs.map(|x| NormalizedPoint::new(x, y));
            let ring = [outer, far, near, inner, near, far];
            prop_assert_eq!(eye_aspect_ratio(&ring, W, H), 0.0);
        }

        #[test]
        fn prop_zero_width_eye_is_zero(
            corner in proptest::array::uniform2(0.0f64..1.0),
            lids in proptest::array::uniform4(0.0f64..1.0),
        ) {
            let c = NormalizedPoint::new(corner[0], corner[1]);
            let ring = [
                c,
                NormalizedPoint::new(lids[0], lids[1]),
                NormalizedPoint::new(lids[2], lids[3]),
                c,
                NormalizedPoint::new(lids[2], 1.0 - lids[3]),
                NormalizedPoint::new(lids[0], 1.0 - lids[1]),
            ];
            prop_assert_eq!(eye_aspect_ratio(&ring, W, H), 0.0);
        }

        #[test]
        fn prop_ear_translation_invariant(
            cx in 0.2f64..0.8,
            cy in 0.2f64..0.8,
            span in 0.02f64..0.15,
            gap in 0.0f64..0.06,
            dx in -0.1f64..0.1,
            dy in -0.1f64..0.1,
        ) {
            let base = eye_aspect_ratio(&eye(cx, cy, span, gap), W, H);
            let shifted = eye_aspect_ratio(&eye(cx + dx, cy + dy, span, gap), W, H);
            prop_assert!((base - shifted).abs() < 1e-9);
        }

        #[test]
        fn prop_ear_scale_invariant(
            span in 0.02f64..0.15,
            gap in 0.0f64..0.06,
            k in 1u32..8,
        ) {
            let ring = eye(0.5, 0.5, span, gap);
            let base = eye_aspect_ratio(&ring, W, H);
            let scaled = eye_aspect_ratio(&ring, W * k, H * k);
            prop_assert!((base - scaled).abs() < 1e-9);
        }

        #[test]
        fn prop_mar_translation_invariant(
            open in 0.0f64..0.2,
            dx in -0.2f64..0.2,
            dy in -0.2f64..0.2,
        ) {
            let base = mouth_aspect_ratio(&mouth_frame(open, W, H));
            let shifted = mouth_aspect_ratio(&mouth_frame_at(0.50 + dx, 0.70 + dy, open, W, H));
            prop_assert!((base - shifted).abs() < 1e-9);
        }

        #[test]
        fn prop_mar_scale_invariant(open in 0.0f64..0.2, k in 1u32..8) {
            let base = mouth_aspect_ratio(&mouth_frame(open, W, H));
            let scaled = mouth_aspect_ratio(&mouth_frame(open, W * k, H * k));
            prop_assert!(base >= 0.0);
            prop_assert!((base - scaled).abs() < 1e-9);
        }

        #[test]
        fn prop_distraction_mirror_symmetric(
            nose_x in 0.2f64..0.8,
            left_x in 0.2f64..0.45,
            right_x in 0.55f64..0.8,
        ) {
            let frame = yaw_frame(nose_x, left_x, right_x);
            // Mirror the image: corners swap roles, nose offset flips sign
            let mirrored = yaw_frame(1.0 - nose_x, 1.0 - right_x, 1.0 - left_x);

            let offset = head_yaw_offset(&frame).unwrap();
            prop_assume!((offset - DEFAULT_YAW_OFFSET_THRESHOLD).abs() > 1e-9);

            prop_assert_eq!(
                estimate_distraction(&frame, DEFAULT_YAW_OFFSET_THRESHOLD),
                estimate_distraction(&mirrored, DEFAULT_YAW_OFFSET_THRESHOLD)
            );
        }
    }
}
