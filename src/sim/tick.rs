//! Per-frame simulation step
//!
//! One call to [`Engine::advance`] moves the game forward by exactly one frame,
//! in a fixed order: player, stars, spawn, meteors.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::overlaps;
use super::difficulty::Difficulty;
use super::state::{EntityStore, Rect};
use crate::input::{HeldDirections, InputIntent};
use crate::tuning::Tuning;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Points earned by meteors leaving the bottom of the field
    pub score_delta: u64,
    /// The player was hit; the run is over
    pub terminal: bool,
}

/// Owns the entity store and the RNG that drives it
#[derive(Debug, Clone)]
pub struct Engine {
    tuning: Tuning,
    entities: EntityStore,
    rng: Pcg32,
}

impl Engine {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let entities = EntityStore::new(&mut rng, &tuning);
        Self {
            tuning,
            entities,
            rng,
        }
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    #[cfg(test)]
    pub(crate) fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    /// Player back to start, no meteors, new stars
    pub fn restart(&mut self) {
        self.entities.reset_player(&self.tuning);
        self.clear();
    }

    /// No meteors, new stars (player left where it is)
    pub fn clear(&mut self) {
        self.entities.clear_obstacles();
        self.entities.seed_particles(&mut self.rng, &self.tuning);
    }

    /// Advance one frame with the given input at the given score
    pub fn advance(&mut self, input: &InputIntent, score: u64) -> TickOutcome {
        match input {
            InputIntent::Pointer(target) => self.move_toward_pointer(*target),
            InputIntent::Keys(held) => self.move_with_keys(held),
        }

        self.drift_particles();

        let difficulty = Difficulty::for_score(score, &self.tuning);
        self.maybe_spawn(&difficulty);

        let outcome = self.advance_meteors();
        log::trace!(
            "tick: score={} tier={} meteors={} delta={} terminal={}",
            score,
            difficulty.tier,
            self.entities.meteors.len(),
            outcome.score_delta,
            outcome.terminal
        );
        outcome
    }

    /// Ease horizontally toward the pointer, capped at the player's top speed
    fn move_toward_pointer(&mut self, target: Vec2) {
        let player = &mut self.entities.player;
        let diff_x = target.x - player.size.x / 2.0 - player.pos.x;
        let step = (diff_x.abs() * self.tuning.pointer_easing).min(player.speed);
        player.pos.x += diff_x.signum() * step;

        let max_x = self.tuning.field_width - player.size.x;
        player.pos.x = player.pos.x.clamp(0.0, max_x);
    }

    /// Each held direction moves one axis by the full speed, clamped to the field.
    /// Diagonals are not normalized.
    fn move_with_keys(&mut self, held: &HeldDirections) {
        let player = &mut self.entities.player;
        let max_x = self.tuning.field_width - player.size.x;
        let max_y = self.tuning.field_height - player.size.y;

        if held.left {
            player.pos.x = (player.pos.x - player.speed).max(0.0);
        }
        if held.right {
            player.pos.x = (player.pos.x + player.speed).min(max_x);
        }
        if held.up {
            player.pos.y = (player.pos.y - player.speed).max(0.0);
        }
        if held.down {
            player.pos.y = (player.pos.y + player.speed).min(max_y);
        }
    }

    /// Stars fall and wrap back to the top at a new random column
    fn drift_particles(&mut self) {
        let width = self.tuning.field_width;
        let height = self.tuning.field_height;
        for particle in &mut self.entities.particles {
            particle.pos.y += particle.speed;
            if particle.pos.y > height {
                particle.pos.y = 0.0;
                particle.pos.x = self.rng.random::<f32>() * width;
            }
        }
    }

    /// At most one meteor per frame, fully above the visible field
    fn maybe_spawn(&mut self, difficulty: &Difficulty) {
        if self.rng.random::<f32>() >= difficulty.spawn_probability {
            return;
        }

        let t = &self.tuning;
        let x = self.rng.random::<f32>() * (t.field_width - t.meteor_size);
        let width = t.meteor_size + self.rng.random::<f32>() * t.meteor_size_jitter;
        let height = t.meteor_size + self.rng.random::<f32>() * t.meteor_size_jitter;
        let speed = difficulty.base_speed + self.rng.random::<f32>() * t.meteor_speed_jitter;

        self.entities
            .meteors
            .push(Rect::new(x, -t.meteor_size, width, height, speed));
    }

    /// Newest meteor first: move, cull below the field (scoring), then test
    /// against the player. The first hit ends the pass; older meteors are
    /// left untouched that frame.
    fn advance_meteors(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let field_height = self.tuning.field_height;
        let player = self.entities.player;
        let meteors = &mut self.entities.meteors;

        let mut i = meteors.len();
        while i > 0 {
            i -= 1;
            meteors[i].pos.y += meteors[i].speed;

            if meteors[i].pos.y > field_height {
                meteors.remove(i);
                outcome.score_delta += self.tuning.score_per_clear;
                continue;
            }

            if overlaps(&player, &meteors[i]) {
                outcome.terminal = true;
                break;
            }
        }

        outcome
    }
}
