//! Meteor Dodge - dodge falling meteors in a fixed playfield
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, collisions, difficulty)
//! - `session`: Idle / Playing / GameOver state machine around the simulation
//! - `input`: Held keys and pointer target, snapshotted once per tick
//! - `driver`: Fixed-rate frame loop with cancellation
//! - `tuning`: Game balance values

pub mod driver;
pub mod input;
pub mod session;
pub mod sim;
pub mod tuning;

pub use driver::{
    CancelToken, ChannelInput, FrameDriver, InputSource, Renderer, RunSummary, StopReason,
};
pub use input::{Direction, HeldDirections, InputEvent, InputIntent, InputState, Key, Viewport};
pub use session::{GameSession, SessionError, SessionSnapshot, SessionState};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// All speeds are in pixels per frame; the simulation advances exactly one
/// frame per tick.
pub mod consts {
    /// Playfield dimensions (origin top-left)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Gap between the player's bottom edge and the bottom of the field at start
    pub const PLAYER_BOTTOM_INSET: f32 = 20.0;
    /// Fraction of the remaining pointer distance covered per frame
    pub const POINTER_EASING: f32 = 0.1;

    /// Meteor defaults
    pub const METEOR_SIZE: f32 = 30.0;
    /// Extra random size per axis, drawn from [0, jitter)
    pub const METEOR_SIZE_JITTER: f32 = 20.0;
    pub const METEOR_SPEED: f32 = 2.0;
    /// Extra random speed per spawn, drawn from [0, jitter)
    pub const METEOR_SPEED_JITTER: f32 = 1.0;

    /// Difficulty curve
    pub const SPAWN_RATE: f32 = 0.02;
    pub const SPAWN_RATE_STEP: f32 = 0.005;
    pub const SPEED_STEP: f32 = 0.5;
    pub const SCORE_PER_TIER: u64 = 500;
    pub const SCORE_PER_CLEAR: u64 = 10;

    /// Background star field
    pub const PARTICLE_COUNT: usize = 100;
    pub const PARTICLE_SIZE_MIN: f32 = 1.0;
    pub const PARTICLE_SIZE_SPAN: f32 = 2.0;
    pub const PARTICLE_SPEED_MIN: f32 = 0.5;
    pub const PARTICLE_SPEED_SPAN: f32 = 2.0;
    pub const PARTICLE_OPACITY_MIN: f32 = 0.2;
    pub const PARTICLE_OPACITY_SPAN: f32 = 0.8;

    /// Default frame rate of the tick driver
    pub const FRAMES_PER_SECOND: u32 = 60;
}
