//! Entity types and the entity store
//!
//! The store is owned by the simulation engine; everything outside `sim`
//! only ever sees it through a shared borrow.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// An axis-aligned box moving vertically at constant speed (player and meteors)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner in playfield coordinates
    pub pos: Vec2,
    /// Width and height (positive)
    pub size: Vec2,
    /// Vertical velocity in pixels per frame (for the player: top speed)
    pub speed: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            speed,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A background star (never collides)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub size: f32,
    /// Downward drift in pixels per frame
    pub speed: f32,
    /// 0-1
    pub opacity: f32,
}

impl Particle {
    /// A star at a uniformly random spot with random size, drift and opacity
    pub fn random<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * tuning.field_width,
                rng.random::<f32>() * tuning.field_height,
            ),
            size: rng.random::<f32>() * tuning.particle_size_span + tuning.particle_size_min,
            speed: rng.random::<f32>() * tuning.particle_speed_span + tuning.particle_speed_min,
            opacity: rng.random::<f32>() * tuning.particle_opacity_span
                + tuning.particle_opacity_min,
        }
    }
}

/// Player, meteors and stars
///
/// Meteors are kept in spawn order (oldest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub(crate) player: Rect,
    pub(crate) meteors: Vec<Rect>,
    pub(crate) particles: Vec<Particle>,
}

impl EntityStore {
    /// Player at its start position, no meteors, fresh star field
    pub fn new<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let mut store = Self {
            player: start_player(tuning),
            meteors: Vec::new(),
            particles: Vec::with_capacity(tuning.particle_count),
        };
        store.seed_particles(rng, tuning);
        store
    }

    pub fn player(&self) -> &Rect {
        &self.player
    }

    /// Active meteors, oldest first
    pub fn obstacles(&self) -> &[Rect] {
        &self.meteors
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn reset_player(&mut self, tuning: &Tuning) {
        self.player = start_player(tuning);
    }

    pub(crate) fn clear_obstacles(&mut self) {
        self.meteors.clear();
    }

    /// Replace the star field with `particle_count` new random stars
    pub(crate) fn seed_particles<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) {
        self.particles.clear();
        self.particles
            .extend((0..tuning.particle_count).map(|_| Particle::random(&mut *rng, tuning)));
    }
}

fn start_player(tuning: &Tuning) -> Rect {
    let (x, y) = tuning.player_start();
    Rect::new(
        x,
        y,
        tuning.player_size,
        tuning.player_size,
        tuning.player_speed,
    )
}
