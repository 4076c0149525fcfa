//! Canonical synthetic hands.
//!
//! Used by the keyboard simulator in place of a real detector, and by
//! tests that need a believable hand rather than a flat grid of points.
//! Coordinates follow detector conventions (normalised, `y` down), palm
//! facing the camera.

use crate::landmarks::{
    Landmark, LandmarkSnapshot, LANDMARK_COUNT, THUMB_TIP, PINKY_DIP, PINKY_TIP,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandPose {
    /// All five fingers spread upward.
    Open,
    /// Every finger curled, thumb tucked.
    Fist,
    /// Fist with the pinky pointing left.
    PinkyOut,
    /// Fist with the thumb pointing right.
    ThumbOut,
}

const fn lm(x: f32, y: f32) -> Landmark {
    Landmark::new(x, y, 0.0)
}

const OPEN: [Landmark; LANDMARK_COUNT] = [
    lm(0.50, 0.85),
    lm(0.42, 0.80), lm(0.37, 0.74), lm(0.34, 0.68), lm(0.31, 0.62),
    lm(0.43, 0.60), lm(0.42, 0.48), lm(0.42, 0.41), lm(0.42, 0.35),
    lm(0.50, 0.58), lm(0.50, 0.45), lm(0.50, 0.38), lm(0.50, 0.31),
    lm(0.57, 0.60), lm(0.58, 0.48), lm(0.58, 0.42), lm(0.59, 0.36),
    lm(0.63, 0.64), lm(0.65, 0.55), lm(0.66, 0.50), lm(0.67, 0.45),
];

const FIST: [Landmark; LANDMARK_COUNT] = [
    lm(0.50, 0.85),
    lm(0.42, 0.80), lm(0.40, 0.74), lm(0.44, 0.70), lm(0.43, 0.73),
    lm(0.43, 0.60), lm(0.43, 0.56), lm(0.44, 0.63), lm(0.44, 0.66),
    lm(0.50, 0.58), lm(0.50, 0.54), lm(0.51, 0.62), lm(0.51, 0.65),
    lm(0.57, 0.60), lm(0.57, 0.57), lm(0.57, 0.64), lm(0.57, 0.67),
    lm(0.63, 0.64), lm(0.64, 0.60), lm(0.64, 0.66), lm(0.65, 0.68),
];

impl HandPose {
    pub const ALL: [HandPose; 4] = [
        HandPose::Open, HandPose::Fist, HandPose::PinkyOut, HandPose::ThumbOut,
    ];

    pub fn snapshot(&self) -> LandmarkSnapshot {
        let points = match self {
            HandPose::Open => OPEN,
            HandPose::Fist => FIST,
            HandPose::PinkyOut => {
                let mut p = FIST;
                p[PINKY_DIP] = lm(0.66, 0.64);
                p[PINKY_TIP] = lm(0.61, 0.65);
                p
            }
            HandPose::ThumbOut => {
                let mut p = FIST;
                p[THUMB_TIP] = lm(0.52, 0.69);
                p
            }
        };
        LandmarkSnapshot::from_finite(points)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandPose::Open     => "open",
            HandPose::Fist     => "fist",
            HandPose::PinkyOut => "pinky-out",
            HandPose::ThumbOut => "thumb-out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, Gesture};

    #[test]
    fn poses_classify_as_intended() {
        let expected = [
            (HandPose::Open,     Gesture::Open),
            (HandPose::Fist,     Gesture::Neutral),
            (HandPose::PinkyOut, Gesture::Left),
            (HandPose::ThumbOut, Gesture::Right),
        ];
        for (pose, gesture) in expected {
            assert_eq!(classify(Some(&pose.snapshot())), gesture, "{}", pose.as_str());
        }
    }

    #[test]
    fn mirrored_open_hand_is_still_open() {
        let s = HandPose::Open.snapshot().mirrored();
        assert_eq!(classify(Some(&s)), Gesture::Open);
    }

    #[test]
    fn poses_stay_inside_the_frame() {
        for pose in HandPose::ALL {
            for p in pose.snapshot().points() {
                assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
            }
        }
    }
}
