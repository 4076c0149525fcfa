//! The controllable entity: position, vertical velocity, jump state.
//!
//! Units are pixels and ticks.  Velocities are pixels per tick, gravity is
//! pixels per tick², and [`EntityState::tick`] takes the elapsed time in
//! ticks (the control loop always passes [`FIXED_DT`]).
//!
//! `y` grows downward like the screen, so a jump starts with a negative
//! velocity and the floor is the *largest* legal `y`.

use anyhow::ensure;
use hand_gesture::Command;

/// Elapsed time per control-loop tick, in ticks.
pub const FIXED_DT: f32 = 1.0;

// ════════════════════════════════════════════════════════════════════════════
// EntityConfig
// ════════════════════════════════════════════════════════════════════════════

/// Playing-field geometry and motion constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityConfig {
    pub field_width:   f32,
    pub field_height:  f32,
    pub width:         f32,
    pub height:        f32,
    /// Horizontal distance per move command.
    pub step:          f32,
    /// Vertical velocity at take-off; negative is upward.
    pub jump_velocity: f32,
    /// Added to the vertical velocity every tick while airborne.
    pub gravity:       f32,
}

impl Default for EntityConfig {
    fn default() -> Self {
        EntityConfig {
            field_width:   800.0,
            field_height:  600.0,
            width:         50.0,
            height:        50.0,
            step:          5.0,
            jump_velocity: -10.0,
            gravity:       0.5,
        }
    }
}

impl EntityConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.width > 0.0 && self.width <= self.field_width,
            "entity width {} does not fit a field {} wide", self.width, self.field_width);
        ensure!(self.height > 0.0 && self.height <= self.field_height,
            "entity height {} does not fit a field {} high", self.height, self.field_height);
        ensure!(self.step >= 0.0, "move step must not be negative");
        ensure!(self.jump_velocity < 0.0, "jump velocity must point upward (negative)");
        ensure!(self.gravity > 0.0, "gravity must be positive or a jump never lands");
        Ok(())
    }

    /// Largest legal `x`.
    pub fn right_bound(&self) -> f32 { self.field_width - self.width }

    /// Largest legal `y`; standing on the ground.
    pub fn floor(&self) -> f32 { self.field_height - self.height }

    /// Upper bound on the ticks a jump spends airborne.
    pub fn max_airborne_ticks(&self) -> u32 {
        (2.0 * -self.jump_velocity / self.gravity).ceil() as u32 + 1
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EntityState
// ════════════════════════════════════════════════════════════════════════════

/// Vertical axis only; horizontal motion is available in both states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalState { Idle, Jumping }

#[derive(Clone, Debug, PartialEq)]
pub struct EntityState {
    cfg:      EntityConfig,
    x:        f32,
    y:        f32,
    vy:       f32,
    vertical: VerticalState,
}

impl EntityState {
    /// Idle, horizontally centred, standing on the floor.
    pub fn new(cfg: EntityConfig) -> Self {
        EntityState {
            cfg,
            x:        cfg.right_bound() / 2.0,
            y:        cfg.floor(),
            vy:       0.0,
            vertical: VerticalState::Idle,
        }
    }

    /// Apply one command.  Returns true if a jump started.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => {
                self.x = (self.x - self.cfg.step).max(0.0);
            }
            Command::MoveRight => {
                self.x = (self.x + self.cfg.step).min(self.cfg.right_bound());
            }
            Command::Jump => {
                if self.vertical == VerticalState::Idle {
                    self.vertical = VerticalState::Jumping;
                    self.vy = self.cfg.jump_velocity;
                    return true;
                }
            }
            Command::None => {}
        }
        false
    }

    /// Advance the physics by `dt` ticks.  Returns true on landing.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut landed = false;
        if self.vertical == VerticalState::Jumping {
            self.y += self.vy * dt;
            self.vy += self.cfg.gravity * dt;
            if self.y >= self.cfg.floor() {
                self.y = self.cfg.floor();
                self.vy = 0.0;
                self.vertical = VerticalState::Idle;
                landed = true;
            }
        }
        self.x = self.x.clamp(0.0, self.cfg.right_bound());
        self.y = self.y.clamp(0.0, self.cfg.floor());
        landed
    }

    pub fn x(&self)                 -> f32           { self.x }
    pub fn y(&self)                 -> f32           { self.y }
    pub fn vertical_velocity(&self) -> f32           { self.vy }
    pub fn vertical(&self)          -> VerticalState { self.vertical }
    pub fn is_jumping(&self)        -> bool          { self.vertical == VerticalState::Jumping }
    pub fn config(&self)            -> &EntityConfig { &self.cfg }
}

impl Default for EntityState {
    fn default() -> Self { EntityState::new(EntityConfig::default()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
