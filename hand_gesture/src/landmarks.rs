//! Per-frame hand observations.
//!
//! A [`LandmarkSnapshot`] is the 21-point output of the external hand
//! detector for one tracked hand in one frame.  Coordinates are normalised
//! to the frame: `x` grows to the right, `y` grows *downward*, both in
//! `[0, 1]`.  `z` is a relative depth and is carried along untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Skeleton edges, for drawing only.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

// ════════════════════════════════════════════════════════════════════════════
// LandmarkError
// ════════════════════════════════════════════════════════════════════════════

/// Why a list of points could not become a [`LandmarkSnapshot`].
#[derive(Clone, Debug, PartialEq)]
pub enum LandmarkError {
    /// The detector delivered a hand with the wrong number of points.
    WrongCount { found: usize },
    /// A coordinate was NaN or infinite.
    NonFinite { index: usize },
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkError::WrongCount { found } => write!(
                f, "expected {} landmarks per hand, found {}", LANDMARK_COUNT, found
            ),
            LandmarkError::NonFinite { index } => write!(
                f, "landmark {} has a non-finite coordinate", index
            ),
        }
    }
}

impl std::error::Error for LandmarkError {}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single tracked keypoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth; not used for classification.
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// The complete set of landmarks for one hand in one frame.
///
/// Always exactly [`LANDMARK_COUNT`] finite points; index identity is fixed
/// (see the constants above).  Serialises as `[[x, y, z], …]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f32; 3]>", into = "Vec<[f32; 3]>")]
pub struct LandmarkSnapshot {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSnapshot {
    /// Build a snapshot from exactly 21 points.
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self, LandmarkError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(LandmarkSnapshot { points })
    }

    /// For point tables known to be finite at compile time.
    pub(crate) const fn from_finite(points: [Landmark; LANDMARK_COUNT]) -> Self {
        LandmarkSnapshot { points }
    }

    /// Build a snapshot from an arbitrary-length slice, as detectors report it.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount { found: points.len() });
        }
        let mut arr = [Landmark::default(); LANDMARK_COUNT];
        arr.copy_from_slice(points);
        Self::new(arr)
    }

    /// Landmark at a fixed index (see the `*_TIP` / `*_MCP` constants).
    ///
    /// # Panics
    /// If `index >= LANDMARK_COUNT`.
    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// The same hand seen in a horizontally flipped frame (`x → 1 − x`).
    pub fn mirrored(&self) -> Self {
        let mut points = self.points;
        for p in points.iter_mut() {
            p.x = 1.0 - p.x;
        }
        LandmarkSnapshot { points }
    }
}

impl TryFrom<Vec<[f32; 3]>> for LandmarkSnapshot {
    type Error = LandmarkError;

    fn try_from(raw: Vec<[f32; 3]>) -> Result<Self, Self::Error> {
        let points: Vec<Landmark> = raw.iter()
            .map(|&[x, y, z]| Landmark::new(x, y, z))
            .collect();
        Self::from_slice(&points)
    }
}

impl From<LandmarkSnapshot> for Vec<[f32; 3]> {
    fn from(s: LandmarkSnapshot) -> Self {
        s.points.iter().map(|p| [p.x, p.y, p.z]).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
