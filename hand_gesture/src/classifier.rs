//! Landmark geometry → discrete [`Gesture`].
//!
//! # Algorithm
//!
//! * A finger is **extended** when its tip sits higher in the frame than its
//!   reference joint (`tip.y < joint.y`, since `y` grows downward).
//! * All five extended → [`Gesture::Open`].  This is checked first so an
//!   open hand never also registers as a lateral move.
//! * Pinky tip left of its lower joint → [`Gesture::Left`].
//! * Thumb tip right of its lower joint → [`Gesture::Right`].
//! * Anything else, including no hand at all → [`Gesture::Neutral`].
//!
//! Classification looks at the current snapshot only; there is no history.

use tracing::trace;

use crate::landmarks::{
    LandmarkSnapshot,
    THUMB_IP, THUMB_TIP, INDEX_MCP, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP,
    RING_MCP, RING_TIP, PINKY_MCP, PINKY_TIP, PINKY_DIP,
};

/// `(tip, reference joint)` per finger: thumb, index, middle, ring, pinky.
pub const FINGER_PAIRS: [(usize, usize); 5] = [
    (THUMB_TIP,  THUMB_IP),
    (INDEX_TIP,  INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_MCP),
    (RING_TIP,   RING_MCP),
    (PINKY_TIP,  PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// All five fingers extended.
    Open,
    /// Pinky pointing left.
    Left,
    /// Thumb pointing right.
    Right,
    /// No recognised gesture, or no hand.
    Neutral,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Open    => "open",
            Gesture::Left    => "left",
            Gesture::Right   => "right",
            Gesture::Neutral => "neutral",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

/// Number of fingers whose tip is above its reference joint.
pub fn extended_fingers(hand: &LandmarkSnapshot) -> usize {
    FINGER_PAIRS.iter()
        .filter(|&&(tip, joint)| hand.point(tip).y < hand.point(joint).y)
        .count()
}

/// Classify one snapshot.  `None` (no hand detected) is `Neutral`.
pub fn classify(snapshot: Option<&LandmarkSnapshot>) -> Gesture {
    let hand = match snapshot {
        Some(h) => h,
        None    => return Gesture::Neutral,
    };

    let gesture = if extended_fingers(hand) == FINGER_PAIRS.len() {
        Gesture::Open
    } else if hand.point(PINKY_TIP).x < hand.point(PINKY_DIP).x {
        Gesture::Left
    } else if hand.point(THUMB_TIP).x > hand.point(THUMB_IP).x {
        Gesture::Right
    } else {
        Gesture::Neutral
    };

    trace!(gesture = gesture.as_str(), "classified hand");
    gesture
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT};

    /// Every point at (0.5, 0.5); tweak individual points per test.
    fn hand(edit: impl FnOnce(&mut [Landmark; LANDMARK_COUNT])) -> LandmarkSnapshot {
        let mut pts = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        edit(&mut pts);
        LandmarkSnapshot::new(pts).unwrap()
    }

    fn all_extended(pts: &mut [Landmark; LANDMARK_COUNT]) {
        for &(tip, joint) in FINGER_PAIRS.iter() {
            pts[tip].y   = 0.1;
            pts[joint].y = 0.5;
        }
    }

    #[test]
    fn no_hand_is_neutral() {
        assert_eq!(classify(None), Gesture::Neutral);
    }

    #[test]
    fn open_hand_wins_over_pinky_left() {
        let h = hand(|p| {
            all_extended(p);
            p[PINKY_TIP].x = 0.2;
            p[PINKY_DIP].x = 0.4;
        });
        assert_eq!(classify(Some(&h)), Gesture::Open);
    }

    #[test]
    fn open_hand_wins_over_thumb_right() {
        let h = hand(|p| {
            all_extended(p);
            p[THUMB_TIP].x = 0.9;
            p[THUMB_IP].x  = 0.6;
        });
        assert_eq!(classify(Some(&h)), Gesture::Open);
    }

    #[test]
    fn four_fingers_is_not_open() {
        let h = hand(|p| {
            all_extended(p);
            p[RING_TIP].y = 0.7;
        });
        assert_eq!(extended_fingers(&h), 4);
        assert_eq!(classify(Some(&h)), Gesture::Neutral);
    }

    #[test]
    fn tip_level_with_joint_is_not_extended() {
        let h = hand(|_| {});
        assert_eq!(extended_fingers(&h), 0);
    }

    #[test]
    fn pinky_left() {
        let h = hand(|p| {
            p[PINKY_TIP].x = 0.3;
            p[PINKY_DIP].x = 0.4;
        });
        assert_eq!(classify(Some(&h)), Gesture::Left);
    }

    #[test]
    fn pinky_check_precedes_thumb_check() {
        let h = hand(|p| {
            p[PINKY_TIP].x = 0.3;
            p[PINKY_DIP].x = 0.4;
            p[THUMB_TIP].x = 0.9;
            p[THUMB_IP].x  = 0.6;
        });
        assert_eq!(classify(Some(&h)), Gesture::Left);
    }

    #[test]
    fn thumb_right() {
        let h = hand(|p| {
            p[THUMB_TIP].x = 0.7;
            p[THUMB_IP].x  = 0.6;
        });
        assert_eq!(classify(Some(&h)), Gesture::Right);
    }

    #[test]
    fn closed_fist_is_neutral() {
        let h = hand(|p| {
            p[THUMB_TIP].x = 0.55;
            p[THUMB_IP].x  = 0.6;
            p[PINKY_TIP].x = 0.45;
            p[PINKY_DIP].x = 0.4;
        });
        assert_eq!(classify(Some(&h)), Gesture::Neutral);
    }

    #[test]
    fn classification_is_deterministic() {
        let h = hand(|p| {
            p[THUMB_TIP].x = 0.7;
            p[INDEX_TIP].y = 0.2;
        });
        assert_eq!(classify(Some(&h)), classify(Some(&h)));
    }
}
