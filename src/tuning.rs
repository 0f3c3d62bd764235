//! Game balance values
//!
//! A `Tuning` is fixed for the lifetime of a session. The default is exactly
//! the values in [`crate::consts`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Degenerate balance values, rejected when a session is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("playfield must be positive, got {width}x{height}")]
    EmptyField { width: f32, height: f32 },
    #[error("player of {size}px does not fit a {width}x{height} field")]
    PlayerTooLarge { size: f32, width: f32, height: f32 },
    #[error("meteor of {size}px does not fit a field {width}px wide")]
    MeteorTooLarge { size: f32, width: f32 },
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be a probability in [0, 1], got {value}")]
    NotProbability { name: &'static str, value: f32 },
    #[error("score per tier must be at least 1")]
    ZeroTier,
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    // === Playfield ===
    pub field_width: f32,
    pub field_height: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_bottom_inset: f32,
    pub pointer_easing: f32,

    // === Meteors ===
    pub meteor_size: f32,
    pub meteor_size_jitter: f32,
    pub meteor_speed: f32,
    pub meteor_speed_jitter: f32,

    // === Difficulty ===
    /// Spawn probability per frame at tier 1
    pub spawn_rate: f32,
    /// Added spawn probability per tier above 1
    pub spawn_rate_step: f32,
    /// Added meteor speed per tier above 1
    pub speed_step: f32,
    pub score_per_tier: u64,
    pub score_per_clear: u64,

    // === Star field ===
    pub particle_count: usize,
    pub particle_size_min: f32,
    pub particle_size_span: f32,
    pub particle_speed_min: f32,
    pub particle_speed_span: f32,
    pub particle_opacity_min: f32,
    pub particle_opacity_span: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_bottom_inset: PLAYER_BOTTOM_INSET,
            pointer_easing: POINTER_EASING,

            meteor_size: METEOR_SIZE,
            meteor_size_jitter: METEOR_SIZE_JITTER,
            meteor_speed: METEOR_SPEED,
            meteor_speed_jitter: METEOR_SPEED_JITTER,

            spawn_rate: SPAWN_RATE,
            spawn_rate_step: SPAWN_RATE_STEP,
            speed_step: SPEED_STEP,
            score_per_tier: SCORE_PER_TIER,
            score_per_clear: SCORE_PER_CLEAR,

            particle_count: PARTICLE_COUNT,
            particle_size_min: PARTICLE_SIZE_MIN,
            particle_size_span: PARTICLE_SIZE_SPAN,
            particle_speed_min: PARTICLE_SPEED_MIN,
            particle_speed_span: PARTICLE_SPEED_SPAN,
            particle_opacity_min: PARTICLE_OPACITY_MIN,
            particle_opacity_span: PARTICLE_OPACITY_SPAN,
        }
    }
}

impl Tuning {
    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        if not_positive(self.field_width) || not_positive(self.field_height) {
            return Err(TuningError::EmptyField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if not_positive(self.player_size)
            || self.player_size > self.field_width
            || self.player_size + self.player_bottom_inset > self.field_height
        {
            return Err(TuningError::PlayerTooLarge {
                size: self.player_size,
                width: self.field_width,
                height: self.field_height,
            });
        }
        if not_positive(self.meteor_size) || self.meteor_size > self.field_width {
            return Err(TuningError::MeteorTooLarge {
                size: self.meteor_size,
                width: self.field_width,
            });
        }

        let non_negative = [
            ("player_speed", self.player_speed),
            ("player_bottom_inset", self.player_bottom_inset),
            ("meteor_size_jitter", self.meteor_size_jitter),
            ("meteor_speed", self.meteor_speed),
            ("meteor_speed_jitter", self.meteor_speed_jitter),
            ("spawn_rate_step", self.spawn_rate_step),
            ("speed_step", self.speed_step),
            ("particle_size_span", self.particle_size_span),
            ("particle_speed_span", self.particle_speed_span),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(TuningError::Negative { name, value });
            }
        }

        // Stars always have a visible size and always drift
        let positive = [
            ("particle_size_min", self.particle_size_min),
            ("particle_speed_min", self.particle_speed_min),
        ];
        for (name, value) in positive {
            if not_positive(value) {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        let probabilities = [
            ("spawn_rate", self.spawn_rate),
            ("pointer_easing", self.pointer_easing),
            ("particle_opacity_min", self.particle_opacity_min),
            (
                "particle_opacity_max",
                self.particle_opacity_min + self.particle_opacity_span,
            ),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::NotProbability { name, value });
            }
        }

        if self.score_per_tier == 0 {
            return Err(TuningError::ZeroTier);
        }
        Ok(())
    }

    /// Spawn position of the player: horizontally centered, inset above the bottom edge
    pub fn player_start(&self) -> (f32, f32) {
        (
            self.field_width / 2.0 - self.player_size / 2.0,
            self.field_height - self.player_size - self.player_bottom_inset,
        )
    }
}

/// Zero, negative or NaN
#[inline]
fn not_positive(value: f32) -> bool {
    value.is_nan() || value <= 0.0
}
