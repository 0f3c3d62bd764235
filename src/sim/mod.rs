//! Per-frame simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (meteors in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod state;
pub mod tick;

pub use collision::overlaps;
pub use difficulty::{Difficulty, difficulty_tier, tier_for};
pub use state::{EntityStore, Particle, Rect};
pub use tick::{Engine, TickOutcome};
