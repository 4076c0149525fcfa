//! The control loop.
//!
//! `ControlLoop` owns the camera, the detector, the presenter and the single
//! [`EntityState`].  Each tick runs, in order and to completion:
//!
//! 1. drain window events (quit ends the loop)
//! 2. read one frame (no frame ends the loop)
//! 3. detect hands, keep the first
//! 4. classify → (dwell filter) → map to a command
//! 5. apply the command, then advance physics by one tick
//! 6. present
//! 7. wait for the next tick
//!
//! The camera and windows are held by a [`Session`] guard and released on
//! every exit path: quit, end of frames, interrupt, error or panic.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use anyhow::{bail, ensure};
use hand_gesture::{classify, map, Command, DwellFilter, Gesture, LandmarkSnapshot};
use tracing::{debug, info, warn};

use crate::camera::{
    Camera, HandDetector, ReplayCamera, ReplayDetector, SimCamera, SimDetector, SimInput,
};
use crate::clock::TickClock;
use crate::entity::{EntityConfig, EntityState, FIXED_DT};
use crate::signal;
use crate::visualizer::{FrameView, NullPresenter, Presenter, UiEvent, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub entity:         EntityConfig,
    /// Target loop rate.
    pub tick_rate:      u32,
    /// Consecutive ticks a gesture must persist before it is acted on.
    /// 0 acts on every tick's gesture immediately.
    pub dwell_ticks:    u32,
    /// Recorded landmarks to replay instead of the keyboard simulator.
    pub replay:         Option<PathBuf>,
    /// Flip replayed hands horizontally.
    pub mirror:         bool,
    /// Show the diagnostic landmark window.
    pub show_landmarks: bool,
    /// No windows, unpaced.  Requires `replay`.
    pub headless:       bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            entity:         EntityConfig::default(),
            tick_rate:      30,
            dwell_ticks:    0,
            replay:         None,
            mirror:         false,
            show_landmarks: true,
            headless:       false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.entity.validate()?;
        ensure!((1..=240).contains(&self.tick_rate),
            "tick rate must be 1–240, got {}", self.tick_rate);
        ensure!(self.dwell_ticks <= 60,
            "dwell must be 0–60 ticks, got {}", self.dwell_ticks);
        if self.headless && self.replay.is_none() {
            bail!("headless mode needs a replay file");
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Shutdown bookkeeping
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Window closed or quit key.
    Quit,
    /// The camera produced no frame.
    CameraExhausted,
    /// SIGINT / SIGTERM.
    Interrupted,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit            => "quit",
            ShutdownReason::CameraExhausted => "no more frames",
            ShutdownReason::Interrupted     => "interrupted",
        }
    }
}

#[derive(Clone, Debug)]
pub struct LoopSummary {
    pub ticks:       u64,
    pub overruns:    u64,
    pub reason:      ShutdownReason,
    pub final_state: EntityState,
}

// ════════════════════════════════════════════════════════════════════════════
// Session — scoped ownership of the external resources
// ════════════════════════════════════════════════════════════════════════════

/// Camera + presenter, released together exactly once.
pub struct Session<C: Camera, P: Presenter> {
    pub camera:    C,
    pub presenter: P,
    released:      bool,
}

impl<C: Camera, P: Presenter> Session<C, P> {
    pub fn new(camera: C, presenter: P) -> Self {
        Session { camera, presenter, released: false }
    }

    pub fn release(&mut self) {
        if self.released { return; }
        self.released = true;
        self.camera.release();
        self.presenter.close();
    }
}

impl<C: Camera, P: Presenter> Drop for Session<C, P> {
    fn drop(&mut self) { self.release(); }
}

// ════════════════════════════════════════════════════════════════════════════
// ControlLoop
// ════════════════════════════════════════════════════════════════════════════

pub struct ControlLoop<C: Camera, D, P: Presenter> {
    session:   Session<C, P>,
    detector:  D,
    entity:    EntityState,
    dwell:     DwellFilter,
    clock:     TickClock,
    interrupt: &'static AtomicBool,
    ticks:     u64,
    gesture:   Gesture,
    command:   Command,
}

impl<C, D, P> ControlLoop<C, D, P>
where
    C: Camera,
    D: HandDetector<C::Frame>,
    P: Presenter,
{
    pub fn new(cfg: &AppConfig, camera: C, detector: D, presenter: P, clock: TickClock) -> Self {
        ControlLoop {
            session:   Session::new(camera, presenter),
            detector,
            entity:    EntityState::new(cfg.entity),
            dwell:     DwellFilter::new(cfg.dwell_ticks),
            clock,
            interrupt: &signal::INTERRUPTED,
            ticks:     0,
            gesture:   Gesture::Neutral,
            command:   Command::None,
        }
    }

    /// Observe a different interrupt flag than the process-wide one.
    pub fn with_interrupt(mut self, flag: &'static AtomicBool) -> Self {
        self.interrupt = flag;
        self
    }

    pub fn entity(&self) -> &EntityState { &self.entity }

    /// Run until quit, end of frames, or interrupt.
    pub fn run(mut self) -> anyhow::Result<LoopSummary> {
        let outcome = self.drive();
        self.session.release();
        let reason = outcome?;

        info!(
            reason = reason.as_str(),
            ticks = self.ticks,
            overruns = self.clock.overruns(),
            "control loop finished"
        );
        if self.clock.overruns() > 0 {
            warn!(
                "{} of {} ticks overran the tick budget",
                self.clock.overruns(), self.ticks
            );
        }

        Ok(LoopSummary {
            ticks:       self.ticks,
            overruns:    self.clock.overruns(),
            reason,
            final_state: self.entity.clone(),
        })
    }

    fn drive(&mut self) -> anyhow::Result<ShutdownReason> {
        loop {
            if let Some(reason) = self.step()? {
                return Ok(reason);
            }
        }
    }

    /// One full tick.  `Some(reason)` ends the loop.
    pub fn step(&mut self) -> anyhow::Result<Option<ShutdownReason>> {
        // ── 1. events / interrupt ─────────────────────────────────────────
        if self.interrupt.load(Ordering::SeqCst) {
            return Ok(Some(ShutdownReason::Interrupted));
        }
        let events = self.session.presenter.poll_events();
        if events.contains(&UiEvent::Quit) {
            return Ok(Some(ShutdownReason::Quit));
        }

        // ── 2. acquire ────────────────────────────────────────────────────
        let frame = match self.session.camera.read()? {
            Some(f) => f,
            None    => return Ok(Some(ShutdownReason::CameraExhausted)),
        };

        // ── 3. detect ─────────────────────────────────────────────────────
        let hands = self.detector.detect(&frame)?;
        if hands.len() > self.detector.max_hands() {
            debug!(
                reported = hands.len(),
                max = self.detector.max_hands(),
                "detector reported extra hands; using the first"
            );
        }
        let hand = hands.first();

        // ── 4–5. classify, map, apply, physics ────────────────────────────
        self.advance(hand);

        // ── 6. present ────────────────────────────────────────────────────
        self.session.presenter.present(&FrameView {
            tick:    self.ticks,
            entity:  &self.entity,
            gesture: self.gesture,
            command: self.command,
            hand,
        });

        // ── 7. cadence ────────────────────────────────────────────────────
        self.ticks += 1;
        self.clock.wait();
        Ok(None)
    }

    /// Classify this tick's hand and feed the resulting command through the
    /// entity.  Returns what was acted on.
    pub fn advance(&mut self, hand: Option<&LandmarkSnapshot>) -> (Gesture, Command) {
        let gesture = self.dwell.filter(classify(hand));
        let command = map(gesture);

        if gesture != self.gesture || command != self.command {
            debug!(
                tick = self.ticks,
                gesture = gesture.as_str(),
                command = command.as_str(),
                "input changed"
            );
        }
        self.gesture = gesture;
        self.command = command;

        if self.entity.apply(command) {
            debug!(tick = self.ticks, x = self.entity.x(), "jump started");
        }
        if self.entity.tick(FIXED_DT) {
            debug!(tick = self.ticks, x = self.entity.x(), "landed");
        }
        (gesture, command)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — pick the collaborators and drive the loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Entry point called from `main.rs`.  Replay mode reads recorded detector
/// output; otherwise the game window's keyboard drives a simulated hand.
pub fn run(cfg: AppConfig) -> anyhow::Result<LoopSummary> {
    cfg.validate()?;
    signal::install();

    info!(
        tick_rate = cfg.tick_rate,
        dwell = cfg.dwell_ticks,
        mirror = cfg.mirror,
        headless = cfg.headless,
        "starting control loop"
    );

    match (&cfg.replay, cfg.headless) {
        (Some(path), true) => {
            let camera = ReplayCamera::open(path)?;
            let detector = ReplayDetector { mirror: cfg.mirror };
            ControlLoop::new(&cfg, camera, detector, NullPresenter, TickClock::unpaced()).run()
        }
        (Some(path), false) => {
            let camera = ReplayCamera::open(path)?;
            let detector = ReplayDetector { mirror: cfg.mirror };
            let vis = Visualizer::new(&cfg.entity, cfg.show_landmarks, None)?;
            ControlLoop::new(&cfg, camera, detector, vis, TickClock::new(cfg.tick_rate)).run()
        }
        (None, _) => {
            let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
            let vis = Visualizer::new(&cfg.entity, cfg.show_landmarks, Some(sim_tx))?;
            let camera = SimCamera::new(sim_rx);
            ControlLoop::new(&cfg, camera, SimDetector, vis, TickClock::new(cfg.tick_rate)).run()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use hand_gesture::HandPose;

    use crate::entity::VerticalState;

    static NEVER: AtomicBool = AtomicBool::new(false);
    static RAISED: AtomicBool = AtomicBool::new(true);

    /// Each frame *is* the detector output.
    struct ScriptCamera {
        frames:   VecDeque<anyhow::Result<Vec<LandmarkSnapshot>>>,
        released: Rc<Cell<u32>>,
    }

    impl ScriptCamera {
        fn new(frames: Vec<Vec<LandmarkSnapshot>>, released: Rc<Cell<u32>>) -> Self {
            ScriptCamera { frames: frames.into_iter().map(Ok).collect(), released }
        }
    }

    impl Camera for ScriptCamera {
        type Frame = Vec<LandmarkSnapshot>;
        fn read(&mut self) -> anyhow::Result<Option<Self::Frame>> {
            self.frames.pop_front().transpose()
        }
        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    struct PassThrough;
    impl HandDetector<Vec<LandmarkSnapshot>> for PassThrough {
        fn detect(&mut self, frame: &Vec<LandmarkSnapshot>) -> anyhow::Result<Vec<LandmarkSnapshot>> {
            Ok(frame.clone())
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        quit_after: Option<u64>,
        presented:  Vec<(Gesture, Command, f32)>,
        closed:     Rc<Cell<u32>>,
    }

    impl Presenter for RecordingPresenter {
        fn poll_events(&mut self) -> Vec<UiEvent> {
            match self.quit_after {
                Some(n) if self.presented.len() as u64 >= n => vec![UiEvent::Quit],
                _ => Vec::new(),
            }
        }
        fn present(&mut self, view: &FrameView<'_>) {
            self.presented.push((view.gesture, view.command, view.entity.y()));
        }
        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    fn test_cfg() -> AppConfig {
        AppConfig { show_landmarks: false, ..AppConfig::default() }
    }

    fn make_loop(
        frames: Vec<Vec<LandmarkSnapshot>>,
        presenter: RecordingPresenter,
        released: Rc<Cell<u32>>,
    ) -> ControlLoop<ScriptCamera, PassThrough, RecordingPresenter> {
        ControlLoop::new(
            &test_cfg(),
            ScriptCamera::new(frames, released),
            PassThrough,
            presenter,
            TickClock::unpaced(),
        ).with_interrupt(&NEVER)
    }

    #[test]
    fn open_hand_jumps_then_gravity_lands() {
        let mut frames = vec![vec![HandPose::Open.snapshot()]];
        frames.extend(std::iter::repeat(Vec::new()).take(60));
        let released = Rc::new(Cell::new(0));
        let summary = make_loop(frames, RecordingPresenter::default(), released.clone())
            .run()
            .unwrap();

        assert_eq!(summary.reason, ShutdownReason::CameraExhausted);
        assert_eq!(summary.ticks, 61);
        assert_eq!(summary.final_state.vertical(), VerticalState::Idle);
        assert_eq!(summary.final_state.y(), summary.final_state.config().floor());
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn absent_hand_follows_pure_gravity() {
        let released = Rc::new(Cell::new(0));
        let mut cl = make_loop(Vec::new(), RecordingPresenter::default(), released);
        let cfg = EntityConfig::default();

        assert_eq!(cl.advance(Some(&HandPose::Open.snapshot())), (Gesture::Open, Command::Jump));
        let (mut y, mut vy) = (cfg.floor() + cfg.jump_velocity, cfg.jump_velocity + cfg.gravity);
        assert_eq!(cl.entity().y(), y);

        while cl.entity().is_jumping() {
            assert_eq!(cl.advance(None), (Gesture::Neutral, Command::None));
            y += vy;
            vy += cfg.gravity;
            assert_eq!(cl.entity().y(), y.min(cfg.floor()));
        }
        assert_eq!(cl.entity().y(), cfg.floor());
    }

    #[test]
    fn held_open_hand_does_not_double_jump() {
        let released = Rc::new(Cell::new(0));
        let mut cl = make_loop(Vec::new(), RecordingPresenter::default(), released);
        let open = HandPose::Open.snapshot();
        cl.advance(Some(&open));
        let vy_after_one = cl.entity().vertical_velocity();
        cl.advance(Some(&open));
        assert_eq!(cl.entity().vertical_velocity(), vy_after_one + 0.5);
    }

    #[test]
    fn only_first_hand_is_used() {
        let released = Rc::new(Cell::new(0));
        let frames = vec![vec![HandPose::PinkyOut.snapshot(), HandPose::ThumbOut.snapshot()]];
        let mut cl = make_loop(frames, RecordingPresenter::default(), released);
        assert_eq!(cl.step().unwrap(), None);
        assert_eq!(cl.entity().x(), 370.0);
    }

    #[test]
    fn quit_event_releases_resources() {
        let released = Rc::new(Cell::new(0));
        let closed = Rc::new(Cell::new(0));
        let frames = vec![vec![HandPose::ThumbOut.snapshot()]; 10];
        let presenter = RecordingPresenter {
            quit_after: Some(3),
            closed: closed.clone(),
            ..RecordingPresenter::default()
        };
        let summary = make_loop(frames, presenter, released.clone()).run().unwrap();
        assert_eq!(summary.reason, ShutdownReason::Quit);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.final_state.x(), 390.0);
        assert_eq!(released.get(), 1);
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn interrupt_stops_before_first_frame() {
        let released = Rc::new(Cell::new(0));
        let closed = Rc::new(Cell::new(0));
        let presenter = RecordingPresenter { closed: closed.clone(), ..RecordingPresenter::default() };
        let summary = make_loop(vec![vec![]; 5], presenter, released.clone())
            .with_interrupt(&RAISED)
            .run()
            .unwrap();
        assert_eq!(summary.reason, ShutdownReason::Interrupted);
        assert_eq!(summary.ticks, 0);
        assert_eq!((released.get(), closed.get()), (1, 1));
    }

    #[test]
    fn camera_error_still_releases() {
        let released = Rc::new(Cell::new(0));
        let closed = Rc::new(Cell::new(0));
        let mut camera = ScriptCamera::new(vec![vec![]], released.clone());
        camera.frames.push_back(Err(anyhow::anyhow!("device unplugged")));
        let presenter = RecordingPresenter { closed: closed.clone(), ..RecordingPresenter::default() };
        let result = ControlLoop::new(&test_cfg(), camera, PassThrough, presenter, TickClock::unpaced())
            .with_interrupt(&NEVER)
            .run();
        assert!(result.is_err());
        assert_eq!((released.get(), closed.get()), (1, 1));
    }

    #[test]
    fn dropping_loop_releases_once() {
        let released = Rc::new(Cell::new(0));
        let cl = make_loop(Vec::new(), RecordingPresenter::default(), released.clone());
        drop(cl);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn dwell_delays_action() {
        let released = Rc::new(Cell::new(0));
        let cfg = AppConfig { dwell_ticks: 3, ..test_cfg() };
        let mut cl = ControlLoop::new(
            &cfg,
            ScriptCamera::new(Vec::new(), released),
            PassThrough,
            RecordingPresenter::default(),
            TickClock::unpaced(),
        );
        let right = HandPose::ThumbOut.snapshot();
        assert_eq!(cl.advance(Some(&right)).1, Command::None);
        assert_eq!(cl.advance(Some(&right)).1, Command::None);
        assert_eq!(cl.advance(Some(&right)).1, Command::MoveRight);
        assert_eq!(cl.entity().x(), 380.0);
    }

    #[test]
    fn headless_replay_of_demo_recording() {
        let data = include_str!("../demos/jump_and_move.jsonl");
        let camera = ReplayCamera::new(std::io::Cursor::new(data));
        let summary = ControlLoop::new(
            &test_cfg(),
            camera,
            ReplayDetector::default(),
            NullPresenter,
            TickClock::unpaced(),
        )
        .with_interrupt(&NEVER)
        .run()
        .unwrap();

        // 5 fists, 1 open palm, 45 empty, 20 thumb-out, 8 pinky-out
        assert_eq!(summary.reason, ShutdownReason::CameraExhausted);
        assert_eq!(summary.ticks, 79);
        assert_eq!(summary.final_state.x(), 375.0 + 20.0 * 5.0 - 8.0 * 5.0);
        assert!(!summary.final_state.is_jumping());
    }

    #[test]
    fn config_validation() {
        assert!(AppConfig::default().validate().is_ok());
        assert!(AppConfig { tick_rate: 0, ..AppConfig::default() }.validate().is_err());
        assert!(AppConfig { dwell_ticks: 61, ..AppConfig::default() }.validate().is_err());
        assert!(AppConfig { headless: true, ..AppConfig::default() }.validate().is_err());
    }
}
