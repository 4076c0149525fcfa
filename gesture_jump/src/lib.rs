//! # gesture_jump
//!
//! A single on-screen entity driven by hand gestures.  Each tick one hand
//! snapshot is classified by [`hand_gesture`], mapped to a command, applied
//! to the entity, and the entity's physics advance by one step.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Command | Action |
//! |---|---|---|
//! | Open palm (all five fingers up) | `Jump` | Leave the ground; ignored while airborne |
//! | Pinky pointing left | `MoveLeft` | Step left, clamped to the field |
//! | Thumb pointing right | `MoveRight` | Step right, clamped to the field |
//! | Anything else / no hand | `None` | Nothing; a jump in progress still completes |
//!
//! ## Input modes
//!
//! * (default) — **Simulation mode**: keys held in the game window pose a
//!   synthetic hand.
//! * `--replay FILE` — **Replay mode**: recorded detector output, one JSON
//!   frame per line.  Add `--headless` to run without windows.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Hand |
//! |---|---|
//! | `O` / hold | Open palm |
//! | `A` / hold | Pinky out |
//! | `D` / hold | Thumb out |
//! | `H` | Hide / show the hand |
//! | `Q`, `Escape` | Quit |

pub mod entity;
pub mod camera;
pub mod clock;
pub mod signal;
pub mod visualizer;
pub mod app;
