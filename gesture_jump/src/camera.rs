//! Frame acquisition and hand detection: the two external collaborators.
//!
//! The control loop only sees the [`Camera`] and [`HandDetector`] traits.
//! Two pairs of implementations are provided:
//!
//! * [`SimCamera`] / [`SimDetector`] — **simulation mode**.  Keys held in the
//!   game window pick a canonical [`HandPose`]; the "detector" returns its
//!   landmarks.  Key state reaches the camera over a `mpsc` channel, the same
//!   way a real capture device hands over frames.
//! * [`ReplayCamera`] / [`ReplayDetector`] — **replay mode**.  A JSON Lines
//!   recording of detector output, one frame per line:
//!   `{"hands": [[[x, y, z], …21 points]]}`.  End of file ends the session.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::Context;
use hand_gesture::{HandPose, LandmarkSnapshot};
use serde::Deserialize;
use tracing::{debug, info};

// ════════════════════════════════════════════════════════════════════════════
// Traits
// ════════════════════════════════════════════════════════════════════════════

/// A source of raw frames.
pub trait Camera {
    type Frame;

    /// Next frame.  `Ok(None)` means no frame could be acquired, which ends
    /// the session; it is not retried.
    fn read(&mut self) -> anyhow::Result<Option<Self::Frame>>;

    /// Give the device back.  Must be safe to call more than once.
    fn release(&mut self);
}

/// Frame → zero or more hands.
///
/// Detectors are configured for a single tracked hand.  If one reports more
/// than [`max_hands`](HandDetector::max_hands) anyway, the control loop uses
/// the first and ignores the rest.
pub trait HandDetector<F> {
    fn max_hands(&self) -> usize { 1 }

    fn detect(&mut self, frame: &F) -> anyhow::Result<Vec<LandmarkSnapshot>>;
}

// ════════════════════════════════════════════════════════════════════════════
// Simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the game window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated hand keys (mapped from minifb keys).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    OpenPalm,   // O
    PinkyOut,   // A
    ThumbOut,   // D
    ToggleHand, // H
}

/// What the simulated camera "saw" this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimFrame {
    pub index: u64,
    /// `None` when the hand is hidden.
    pub pose:  Option<HandPose>,
}

pub struct SimCamera {
    rx:       Receiver<SimInput>,
    open:     bool,
    pinky:    bool,
    thumb:    bool,
    visible:  bool,
    frames:   u64,
    released: bool,
}

impl SimCamera {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimCamera {
            rx,
            open:     false,
            pinky:    false,
            thumb:    false,
            visible:  true,
            frames:   0,
            released: false,
        }
    }

    fn apply(&mut self, input: SimInput) {
        let (key, down) = match input {
            SimInput::KeyDown(k) => (k, true),
            SimInput::KeyUp(k)   => (k, false),
        };
        match key {
            SimKey::OpenPalm => self.open  = down,
            SimKey::PinkyOut => self.pinky = down,
            SimKey::ThumbOut => self.thumb = down,
            SimKey::ToggleHand if down => {
                self.visible = !self.visible;
                debug!(visible = self.visible, "simulated hand visibility toggled");
            }
            SimKey::ToggleHand => {}
        }
    }

    /// Held keys → pose.  Open palm beats pinky beats thumb.
    fn current_pose(&self) -> Option<HandPose> {
        if !self.visible {
            return None;
        }
        let pose = if self.open {
            HandPose::Open
        } else if self.pinky {
            HandPose::PinkyOut
        } else if self.thumb {
            HandPose::ThumbOut
        } else {
            HandPose::Fist
        };
        Some(pose)
    }
}

impl Camera for SimCamera {
    type Frame = SimFrame;

    fn read(&mut self) -> anyhow::Result<Option<SimFrame>> {
        if self.released {
            return Ok(None);
        }
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) => break,
                // The window that fed us is gone; nothing more to see.
                Err(TryRecvError::Disconnected) => return Ok(None),
            }
        }
        let frame = SimFrame { index: self.frames, pose: self.current_pose() };
        self.frames += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            info!(frames = self.frames, "simulated camera released");
        }
    }
}

/// Canonical landmarks for the simulated pose.
#[derive(Debug, Default)]
pub struct SimDetector;

impl HandDetector<SimFrame> for SimDetector {
    fn detect(&mut self, frame: &SimFrame) -> anyhow::Result<Vec<LandmarkSnapshot>> {
        Ok(frame.pose.iter().map(|p| p.snapshot()).collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Replay
// ════════════════════════════════════════════════════════════════════════════

/// One recorded frame: the detector output for that frame.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ReplayFrame {
    #[serde(default)]
    pub hands: Vec<LandmarkSnapshot>,
}

pub struct ReplayCamera<R> {
    lines:    Lines<R>,
    line_no:  usize,
    frames:   u64,
    released: bool,
}

impl ReplayCamera<BufReader<File>> {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening replay file {}", path.display()))?;
        info!(path = %path.display(), "replaying recorded landmarks");
        Ok(ReplayCamera::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayCamera<R> {
    pub fn new(reader: R) -> Self {
        ReplayCamera { lines: reader.lines(), line_no: 0, frames: 0, released: false }
    }
}

impl<R: BufRead> Camera for ReplayCamera<R> {
    type Frame = ReplayFrame;

    fn read(&mut self) -> anyhow::Result<Option<ReplayFrame>> {
        if self.released {
            return Ok(None);
        }
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.with_context(|| format!("reading replay line {}", self.line_no))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let frame: ReplayFrame = serde_json::from_str(trimmed)
                .with_context(|| format!("parsing replay line {}", self.line_no))?;
            self.frames += 1;
            return Ok(Some(frame));
        }
        Ok(None)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            info!(frames = self.frames, "replay source released");
        }
    }
}

/// Passes recorded hands through, optionally mirrored.
#[derive(Debug, Default)]
pub struct ReplayDetector {
    pub mirror: bool,
}

impl HandDetector<ReplayFrame> for ReplayDetector {
    fn detect(&mut self, frame: &ReplayFrame) -> anyhow::Result<Vec<LandmarkSnapshot>> {
        let hands = frame.hands.iter()
            .map(|h| if self.mirror { h.mirrored() } else { h.clone() })
            .collect();
        Ok(hands)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
