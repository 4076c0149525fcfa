//! # hand_gesture
//!
//! Turns one hand's landmark geometry into a discrete gesture, and a gesture
//! into a control command.  Everything here is pure and per-frame: no
//! detector, no camera, no timing.
//!
//! ## Gesture → Command mapping
//!
//! | Hand shape | Gesture | Command |
//! |---|---|---|
//! | All five fingers extended | `Open` | `Jump` |
//! | Pinky tip left of its lower joint | `Left` | `MoveLeft` |
//! | Thumb tip right of its lower joint | `Right` | `MoveRight` |
//! | Anything else, or no hand | `Neutral` | `None` |
//!
//! The rows are checked top to bottom; the first match wins.

pub mod landmarks;
pub mod classifier;
pub mod action;
pub mod dwell;
pub mod pose;

pub use landmarks::{Landmark, LandmarkError, LandmarkSnapshot, LANDMARK_COUNT};
pub use classifier::{classify, Gesture};
pub use action::{map, Command};
pub use dwell::DwellFilter;
pub use pose::HandPose;
