//! Difficulty curve
//!
//! Difficulty rises one tier for every `score_per_tier` points (500 by
//! default). Each tier above the first adds a fixed step to the meteor spawn
//! probability and to the meteor base speed.

use crate::consts::SCORE_PER_TIER;
use crate::tuning::Tuning;

/// Tier for a score with the default tier size (tier 1 at score 0)
#[inline]
pub fn difficulty_tier(score: u64) -> u64 {
    tier_for(score, SCORE_PER_TIER)
}

/// Tier for a score with a custom tier size
#[inline]
pub fn tier_for(score: u64, score_per_tier: u64) -> u64 {
    score / score_per_tier.max(1) + 1
}

/// Spawn and speed parameters derived from the current score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub tier: u64,
    /// Chance of spawning one meteor this frame (may exceed 1 at high tiers)
    pub spawn_probability: f32,
    /// Meteor speed before the per-spawn random jitter
    pub base_speed: f32,
}

impl Difficulty {
    pub fn for_score(score: u64, tuning: &Tuning) -> Self {
        let tier = tier_for(score, tuning.score_per_tier);
        let steps = (tier - 1) as f32;
        Self {
            tier,
            spawn_probability: tuning.spawn_rate + steps * tuning.spawn_rate_step,
            base_speed: tuning.meteor_speed + steps * tuning.speed_step,
        }
    }
}
