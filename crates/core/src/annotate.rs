//! Skeleton overlay rendering.
//!
//! Draws the simplified skeleton onto a frame: red segments between
//! visible joint pairs, green dots on visible key joints. Matches the
//! original overlay colors (red connections, green landmarks).

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::pose::{Keypoint, KEY_LANDMARKS, SKELETON_CONNECTIONS};

/// Connection segment color.
const CONNECTION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Joint dot color.
const JOINT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Joint dot radius in pixels.
const JOINT_RADIUS: i32 = 3;

/// Draw the skeleton overlay in place.
///
/// `keypoints` is the full landmark vector in topology order; segments
/// and dots are skipped when either endpoint is missing or below the
/// visibility threshold.
pub fn draw_pose(image: &mut RgbImage, keypoints: &[Keypoint]) {
    for (from, to) in SKELETON_CONNECTIONS {
        let (Some(a), Some(b)) = (keypoints.get(from.index()), keypoints.get(to.index())) else {
            continue;
        };
        if a.visible() && b.visible() {
            draw_line_segment_mut(
                image,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                CONNECTION_COLOR,
            );
        }
    }

    for joint in KEY_LANDMARKS {
        let Some(kp) = keypoints.get(joint.index()) else {
            continue;
        };
        if kp.visible() {
            draw_filled_circle_mut(
                image,
                (kp.x as i32, kp.y as i32),
                JOINT_RADIUS,
                JOINT_COLOR,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, NormalizedLandmark};

    /// Full landmark vector with every joint at the frame center.
    fn centered_keypoints(width: u32, height: u32, visibility: f64) -> Vec<Keypoint> {
        let lm = NormalizedLandmark {
            x: 0.5,
            y: 0.5,
            z: 0.0,
            visibility,
        };
        (0..Landmark::COUNT)
            .map(|_| Keypoint::from_normalized(&lm, width, height))
            .collect()
    }

    #[test]
    fn overlay_preserves_dimensions() {
        let mut img = RgbImage::from_pixel(64, 48, Rgb([10, 10, 10]));
        draw_pose(&mut img, &centered_keypoints(64, 48, 0.9));
        assert_eq!(img.dimensions(), (64, 48));
    }

    #[test]
    fn visible_joints_paint_green() {
        let mut img = RgbImage::from_pixel(64, 48, Rgb([10, 10, 10]));
        draw_pose(&mut img, &centered_keypoints(64, 48, 0.9));
        // All joints sit at the center, so the center pixel is a dot.
        assert_eq!(*img.get_pixel(32, 24), Rgb([0, 255, 0]));
    }

    #[test]
    fn low_visibility_draws_nothing() {
        let background = Rgb([10, 10, 10]);
        let mut img = RgbImage::from_pixel(64, 48, background);
        draw_pose(&mut img, &centered_keypoints(64, 48, 0.1));
        assert!(img.pixels().all(|p| *p == background));
    }

    #[test]
    fn empty_keypoints_draw_nothing() {
        let background = Rgb([10, 10, 10]);
        let mut img = RgbImage::from_pixel(32, 32, background);
        draw_pose(&mut img, &[]);
        assert!(img.pixels().all(|p| *p == background));
    }
}
