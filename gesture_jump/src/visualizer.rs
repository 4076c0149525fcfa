//! Software-rendered presentation using `minifb`.
//!
//! Two windows:
//!
//! ```text
//! ┌─ Gesture Jump (field size) ─────────────────┐   ┌─ Hand Landmarks ──────┐
//! │ status: tick / gesture / command / state    │   │        o o o          │
//! │ key legend                                  │   │       /|/|/ o         │
//! │                                             │   │   o  o-o-o-o          │
//! │                  ┌──┐                       │   │    \  \   /           │
//! │                  └──┘  entity               │   │     o--o-o            │
//! └─────────────────────────────────────────────┘   └───────────────────────┘
//! ```
//!
//! The landmark window is diagnostic only; closing it does not end the
//! session.  Closing the game window, `Q` or `Escape` does.

use std::sync::mpsc::Sender;

use hand_gesture::landmarks::HAND_CONNECTIONS;
use hand_gesture::{Command, Gesture, Landmark, LandmarkSnapshot};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::info;

use crate::camera::{SimInput, SimKey};
use crate::entity::{EntityConfig, EntityState};

// ════════════════════════════════════════════════════════════════════════════
// Presenter interface
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Window closed, `Q` or `Escape`.
    Quit,
}

/// Everything drawn for one tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub tick:    u64,
    pub entity:  &'a EntityState,
    pub gesture: Gesture,
    pub command: Command,
    pub hand:    Option<&'a LandmarkSnapshot>,
}

pub trait Presenter {
    /// Drain pending window events.
    fn poll_events(&mut self) -> Vec<UiEvent>;

    fn present(&mut self, view: &FrameView<'_>);

    /// Destroy all windows.  Must be safe to call more than once.
    fn close(&mut self);
}

/// Draws nothing; for headless replays.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn poll_events(&mut self) -> Vec<UiEvent> { Vec::new() }
    fn present(&mut self, _view: &FrameView<'_>) {}
    fn close(&mut self) {}
}

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const HAND_W:     usize = 480;
pub const HAND_H:     usize = 360;
const STATUS_H:       usize = 18;
const FONT_SCALE:     usize = 2;
const BG_COLOR:       u32   = 0xFF000000;
const HAND_BG:        u32   = 0xFF101820;
const TEXT_BG:        u32   = 0xFF0F3460;
const ENTITY_COLOR:   u32   = 0xFFFFFFFF;
const AIRBORNE_TINT:  u32   = 0xFF66CCFF;
const BONE_COLOR:     u32   = 0xFF00C800;  // skeleton edges
const JOINT_COLOR:    u32   = 0xFFFF3030;  // landmark dots
const PROJECT_MIN:    f32   = -1.0;
const PROJECT_MAX:    f32   = 2.0;

// ════════════════════════════════════════════════════════════════════════════
// Canvas — one framebuffer plus drawing primitives
// ════════════════════════════════════════════════════════════════════════════

struct Canvas {
    buf: Vec<u32>,
    w:   usize,
    h:   usize,
}

impl Canvas {
    fn new(w: usize, h: usize, color: u32) -> Self {
        Canvas { buf: vec![color; w * h], w, h }
    }

    fn clear(&mut self, color: u32) { self.buf.fill(color); }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    fn set_pixel_i(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    /// Bresenham.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel_i(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn draw_dot(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel_i(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Normalised landmark → pixel.  Detectors report points a little
    /// outside `[0, 1]`; anything further out is pinned to one frame-width
    /// past the edge so line lengths stay bounded.
    fn project(&self, p: Landmark) -> (isize, isize) {
        let x = p.x.clamp(PROJECT_MIN, PROJECT_MAX) * self.w as f32;
        let y = p.y.clamp(PROJECT_MIN, PROJECT_MAX) * self.h as f32;
        (x as isize, y as isize)
    }

    fn draw_skeleton(&mut self, hand: &LandmarkSnapshot) {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (x0, y0) = self.project(hand.point(a));
            let (x1, y1) = self.project(hand.point(b));
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }
        for &p in hand.points() {
            let (x, y) = self.project(p);
            self.draw_dot(x, y, 3, JOINT_COLOR);
        }
    }

    /// Minimal bitmap font: 3×5 glyphs, each pixel drawn `scale`×`scale`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.w { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    game:        Option<Window>,
    landmarks:   Option<Window>,
    game_canvas: Canvas,
    hand_canvas: Canvas,
    /// Present in simulation mode: held keys drive the simulated hand.
    sim_tx:      Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(
        field: &EntityConfig,
        show_landmarks: bool,
        sim_tx: Option<Sender<SimInput>>,
    ) -> anyhow::Result<Self> {
        let (w, h) = (field.field_width as usize, field.field_height as usize);
        let game = Window::new(
            "Gesture Jump",
            w, h,
            WindowOptions { resize: false, ..WindowOptions::default() },
        ).map_err(|e| anyhow::anyhow!("failed to open game window: {}", e))?;

        let landmarks = if show_landmarks {
            let win = Window::new(
                "Hand Landmarks",
                HAND_W, HAND_H,
                WindowOptions { resize: false, ..WindowOptions::default() },
            ).map_err(|e| anyhow::anyhow!("failed to open landmark window: {}", e))?;
            Some(win)
        } else {
            None
        };

        info!(width = w, height = h, landmarks = show_landmarks, "windows opened");

        Ok(Visualizer {
            game: Some(game),
            landmarks,
            game_canvas: Canvas::new(w, h, BG_COLOR),
            hand_canvas: Canvas::new(HAND_W, HAND_H, HAND_BG),
            sim_tx,
        })
    }

    fn forward_sim_keys(&self) {
        let (window, tx) = match (&self.game, &self.sim_tx) {
            (Some(w), Some(tx)) => (w, tx),
            _ => return,
        };
        const KEYS: [(Key, SimKey); 4] = [
            (Key::O, SimKey::OpenPalm),
            (Key::A, SimKey::PinkyOut),
            (Key::D, SimKey::ThumbOut),
            (Key::H, SimKey::ToggleHand),
        ];
        for (key, sim) in KEYS {
            if window.is_key_pressed(key, KeyRepeat::No) {
                let _ = tx.send(SimInput::KeyDown(sim));
            }
            if window.is_key_released(key) {
                let _ = tx.send(SimInput::KeyUp(sim));
            }
        }
    }

    fn draw_game(&mut self, view: &FrameView<'_>) {
        let cv = &mut self.game_canvas;
        cv.clear(BG_COLOR);

        // ── Entity ────────────────────────────────────────────────────────
        let e = view.entity;
        let cfg = e.config();
        let color = if e.is_jumping() {
            blend(ENTITY_COLOR, AIRBORNE_TINT, 0.35)
        } else {
            ENTITY_COLOR
        };
        cv.fill_rect(
            e.x().round() as usize, e.y().round() as usize,
            cfg.width as usize, cfg.height as usize,
            color,
        );

        // ── Status bar ────────────────────────────────────────────────────
        let status = format!(
            "tick {}  gesture {}  cmd {}  {}  x {:.0} y {:.0}",
            view.tick,
            view.gesture.as_str(),
            view.command.as_str(),
            if e.is_jumping() { "jumping" } else { "idle" },
            e.x(), e.y(),
        );
        let w = cv.w;
        cv.fill_rect(0, 0, w, STATUS_H, TEXT_BG);
        cv.draw_label(&status, 6, 4, FONT_SCALE, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        if self.sim_tx.is_some() {
            cv.draw_label(
                "O=open  A=pinky  D=thumb  H=hide hand  Q=quit",
                6, STATUS_H + 6, FONT_SCALE, 0xFF888888,
            );
        }
    }

    fn draw_hand(&mut self, view: &FrameView<'_>) {
        let cv = &mut self.hand_canvas;
        cv.clear(HAND_BG);

        match view.hand {
            Some(hand) => cv.draw_skeleton(hand),
            None => cv.draw_label("no hand", 8, HAND_H / 2, FONT_SCALE, 0xFF888888),
        }

        cv.draw_label(view.gesture.as_str(), 8, 8, FONT_SCALE, 0xFFFFD700);
        cv.draw_border(0, 0, HAND_W, HAND_H, 0xFF303840);
    }
}

impl Presenter for Visualizer {
    fn poll_events(&mut self) -> Vec<UiEvent> {
        let open = self.game.as_ref().map_or(false, |w| w.is_open());
        if !open {
            return vec![UiEvent::Quit];
        }

        if self.landmarks.as_ref().map_or(false, |w| !w.is_open()) {
            info!("landmark window closed");
            self.landmarks = None;
        }

        self.forward_sim_keys();

        let mut events = Vec::new();
        if let Some(win) = &self.game {
            if win.is_key_pressed(Key::Q, KeyRepeat::No)
                || win.is_key_pressed(Key::Escape, KeyRepeat::No)
            {
                events.push(UiEvent::Quit);
            }
        }
        events
    }

    fn present(&mut self, view: &FrameView<'_>) {
        self.draw_game(view);
        if let Some(win) = self.game.as_mut() {
            let cv = &self.game_canvas;
            win.update_with_buffer(&cv.buf, cv.w, cv.h).ok();
        }

        if self.landmarks.is_some() {
            self.draw_hand(view);
            if let Some(win) = self.landmarks.as_mut() {
                let cv = &self.hand_canvas;
                win.update_with_buffer(&cv.buf, cv.w, cv.h).ok();
            }
        }
    }

    fn close(&mut self) {
        let had_windows = self.game.is_some() || self.landmarks.is_some();
        self.landmarks = None;
        self.game = None;
        self.sim_tx = None;
        if had_windows {
            info!("windows closed");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b111, 0b001, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}
