//! Pose landmark topology and keypoint types.
//!
//! The external estimator reports the standard 33-landmark body
//! topology in normalized image coordinates. The annotated overlay uses
//! a simplified skeleton: 13 key joints connected by 14 segments, drawn
//! only when both endpoints clear the visibility threshold.

use serde::Serialize;

/// Minimum landmark visibility for a joint or segment to be drawn.
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

/// The 33 body landmarks, in estimator output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Landmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl Landmark {
    /// Number of landmarks in the topology.
    pub const COUNT: usize = 33;

    /// Index into an estimator output vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Simplified skeleton: segments between key joints only.
pub const SKELETON_CONNECTIONS: [(Landmark, Landmark); 14] = [
    // Head to shoulders
    (Landmark::Nose, Landmark::LeftShoulder),
    (Landmark::Nose, Landmark::RightShoulder),
    // Torso
    (Landmark::LeftShoulder, Landmark::RightShoulder),
    (Landmark::LeftShoulder, Landmark::LeftHip),
    (Landmark::RightShoulder, Landmark::RightHip),
    (Landmark::LeftHip, Landmark::RightHip),
    // Left arm
    (Landmark::LeftShoulder, Landmark::LeftElbow),
    (Landmark::LeftElbow, Landmark::LeftWrist),
    // Right arm
    (Landmark::RightShoulder, Landmark::RightElbow),
    (Landmark::RightElbow, Landmark::RightWrist),
    // Left leg
    (Landmark::LeftHip, Landmark::LeftKnee),
    (Landmark::LeftKnee, Landmark::LeftAnkle),
    // Right leg
    (Landmark::RightHip, Landmark::RightKnee),
    (Landmark::RightKnee, Landmark::RightAnkle),
];

/// Joints drawn as dots on the overlay.
pub const KEY_LANDMARKS: [Landmark; 13] = [
    Landmark::Nose,
    Landmark::LeftShoulder,
    Landmark::RightShoulder,
    Landmark::LeftElbow,
    Landmark::RightElbow,
    Landmark::LeftWrist,
    Landmark::RightWrist,
    Landmark::LeftHip,
    Landmark::RightHip,
    Landmark::LeftKnee,
    Landmark::RightKnee,
    Landmark::LeftAnkle,
    Landmark::RightAnkle,
];

/// A landmark as reported by the estimator: normalized `[0,1]` image
/// coordinates, depth relative to hip midpoint, and visibility score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedLandmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

/// A landmark scaled to pixel space.
///
/// `x`/`y` are pixel coordinates; `z` is scaled by image width so depth
/// shares the horizontal unit, as the upstream estimator documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub visibility: f64,
}

impl Keypoint {
    /// Scale a normalized landmark into a `width` x `height` frame.
    pub fn from_normalized(lm: &NormalizedLandmark, width: u32, height: u32) -> Self {
        Self {
            x: lm.x * width as f64,
            y: lm.y * height as f64,
            z: lm.z * width as f64,
            visibility: lm.visibility,
        }
    }

    /// Whether this keypoint clears the drawing threshold.
    pub fn visible(&self) -> bool {
        self.visibility > VISIBILITY_THRESHOLD
    }
}
