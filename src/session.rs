//! Session state machine
//!
//! ```text
//! Idle --start--> Playing --collision--> GameOver --reset--> Idle
//!                    ^                       |
//!                    +--------start----------+
//! ```
//!
//! The session owns the score, the best score of the run and the engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::InputIntent;
use crate::sim::{Engine, EntityStore, Particle, Rect, TickOutcome, tier_for};
use crate::tuning::{Tuning, TuningError};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the first start
    Idle,
    /// Active gameplay, ticking every frame
    Playing,
    /// Run ended by a collision
    GameOver,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Playing => "Playing",
            SessionState::GameOver => "GameOver",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },
    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

/// A game session: lifecycle, score and the simulation it drives
#[derive(Debug, Clone)]
pub struct GameSession {
    engine: Engine,
    state: SessionState,
    score: u64,
    high_score: u64,
}

impl GameSession {
    /// Session with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_engine(Engine::new(Tuning::default(), seed))
    }

    /// Session with custom tuning, validated once here
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, SessionError> {
        tuning.validate()?;
        Ok(Self::from_engine(Engine::new(tuning, seed)))
    }

    fn from_engine(engine: Engine) -> Self {
        Self {
            engine,
            state: SessionState::Idle,
            score: 0,
            high_score: 0,
        }
    }

    /// Begin a run from Idle or GameOver
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle | SessionState::GameOver => {
                self.engine.restart();
                self.score = 0;
                self.state = SessionState::Playing;
                log::info!("Game started (high score {})", self.high_score);
                Ok(())
            }
            SessionState::Playing => Err(SessionError::InvalidTransition {
                from: self.state,
                action: "start",
            }),
        }
    }

    /// Return to Idle after a game over; the high score is kept
    pub fn reset(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::GameOver => {
                self.engine.clear();
                self.score = 0;
                self.state = SessionState::Idle;
                log::info!("Session reset");
                Ok(())
            }
            SessionState::Idle | SessionState::Playing => Err(SessionError::InvalidTransition {
                from: self.state,
                action: "reset",
            }),
        }
    }

    /// Advance one frame. Does nothing unless Playing.
    pub fn tick(&mut self, input: &InputIntent) -> TickOutcome {
        if self.state != SessionState::Playing {
            return TickOutcome::default();
        }

        let tier_before = self.tier();
        let outcome = self.engine.advance(input, self.score);
        self.score += outcome.score_delta;

        if outcome.terminal {
            self.state = SessionState::GameOver;
            self.high_score = self.high_score.max(self.score);
            log::info!(
                "Game over: score {}, high score {}",
                self.score,
                self.high_score
            );
        } else if self.tier() > tier_before {
            log::info!("Difficulty tier {} reached at score {}", self.tier(), self.score);
        }

        outcome
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    /// Current score (final score while in GameOver)
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Difficulty tier for the current score
    pub fn tier(&self) -> u64 {
        tier_for(self.score, self.engine.tuning().score_per_tier)
    }

    pub fn entities(&self) -> &EntityStore {
        self.engine.entities()
    }

    pub fn tuning(&self) -> &Tuning {
        self.engine.tuning()
    }

    /// Owned copy of everything a renderer draws
    pub fn snapshot(&self) -> SessionSnapshot {
        let entities = self.entities();
        SessionSnapshot {
            state: self.state,
            score: self.score,
            high_score: self.high_score,
            tier: self.tier(),
            player: *entities.player(),
            obstacles: entities.obstacles().to_vec(),
            particles: entities.particles().to_vec(),
        }
    }
}

/// Serializable view of a session at one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub score: u64,
    pub high_score: u64,
    pub tier: u64,
    pub player: Rect,
    pub obstacles: Vec<Rect>,
    pub particles: Vec<Particle>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Direction, HeldDirections};
    use glam::Vec2;

    fn quiet() -> Tuning {
        Tuning {
            spawn_rate: 0.0,
            spawn_rate_step: 0.0,
            ..Default::default()
        }
    }

    fn busy() -> Tuning {
        Tuning {
            spawn_rate: 0.5,
            ..Default::default()
        }
    }

    fn down() -> InputIntent {
        InputIntent::Keys([Direction::Down].into_iter().collect::<HeldDirections>())
    }

    /// Tick until the run ends, sitting still under the meteor shower
    fn play_until_game_over(session: &mut GameSession) {
        for _ in 0..100_000 {
            session.tick(&InputIntent::default());
            if session.is_game_over() {
                return;
            }
        }
        panic!("no collision after 100k ticks");
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new(1);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 0);
        assert_eq!(session.tier(), 1);
        assert_eq!(session.entities().particles().len(), 100);
    }

    #[test]
    fn test_start_from_idle() {
        let mut session = GameSession::new(1);
        session.start().unwrap();
        assert!(session.is_playing());
        assert_eq!(session.score(), 0);
        assert_eq!(session.entities().player().pos, Vec2::new(380.0, 540.0));
        assert!(session.entities().obstacles().is_empty());
    }

    #[test]
    fn test_start_while_playing_is_rejected() {
        let mut session = GameSession::new(1);
        session.start().unwrap();
        assert_eq!(
            session.start(),
            Err(SessionError::InvalidTransition {
                from: SessionState::Playing,
                action: "start"
            })
        );
        assert!(session.is_playing());
    }

    #[test]
    fn test_reset_outside_game_over_is_rejected() {
        let mut session = GameSession::new(1);
        assert!(session.reset().is_err());
        assert_eq!(session.state(), SessionState::Idle);

        session.start().unwrap();
        assert!(session.reset().is_err());
        assert!(session.is_playing());
    }

    #[test]
    fn test_tick_is_noop_unless_playing() {
        let mut session = GameSession::with_tuning(busy(), 1).unwrap();
        let before = session.snapshot();
        for _ in 0..50 {
            assert_eq!(session.tick(&down()), TickOutcome::default());
        }
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_collision_ends_run_and_sets_high_score() {
        let mut session = GameSession::with_tuning(busy(), 42).unwrap();
        session.start().unwrap();
        play_until_game_over(&mut session);

        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.high_score(), session.score());

        // Frozen: further ticks change nothing
        let frozen = session.snapshot();
        session.tick(&InputIntent::default());
        assert_eq!(session.snapshot(), frozen);
        // Meteors are left in place for the last frame
        assert!(!frozen.obstacles.is_empty());
    }

    #[test]
    fn test_start_always_zeroes_score() {
        let mut session = GameSession::with_tuning(busy(), 7).unwrap();
        session.start().unwrap();
        session.score = 5000;
        play_until_game_over(&mut session);
        assert!(session.score() >= 5000);

        session.start().unwrap();
        assert_eq!(session.score(), 0);
        assert_eq!(session.tier(), 1);
        assert!(session.high_score() >= 5000);
    }

    #[test]
    fn test_high_score_keeps_best() {
        let mut session = GameSession::with_tuning(busy(), 3).unwrap();
        session.start().unwrap();
        session.score = 900;
        play_until_game_over(&mut session);
        let best = session.high_score();
        assert!(best >= 900);

        session.start().unwrap();
        play_until_game_over(&mut session);
        assert_eq!(session.high_score(), best.max(session.score()));
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut session = GameSession::with_tuning(busy(), 9).unwrap();
        session.start().unwrap();
        session.score = 120;
        play_until_game_over(&mut session);
        let best = session.high_score();

        session.reset().unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), best);
        assert!(session.entities().obstacles().is_empty());
        assert_eq!(session.entities().particles().len(), 100);
    }

    #[test]
    fn test_reset_then_start_matches_first_start() {
        let mut session = GameSession::with_tuning(busy(), 11).unwrap();
        session.start().unwrap();
        let first = session.snapshot();

        // Move away from the start position, then lose
        for _ in 0..10 {
            session.tick(&down());
        }
        play_until_game_over(&mut session);
        session.reset().unwrap();
        session.start().unwrap();
        let again = session.snapshot();

        assert_eq!(again.state, SessionState::Playing);
        assert_eq!(again.player, first.player);
        assert!(again.obstacles.is_empty());
        assert_eq!(again.score, 0);
    }

    #[test]
    fn test_clears_add_score() {
        let mut session = GameSession::with_tuning(quiet(), 1).unwrap();
        session.start().unwrap();
        session
            .engine
            .entities_mut()
            .meteors
            .push(Rect::new(0.0, 599.0, 30.0, 30.0, 2.0));

        let outcome = session.tick(&InputIntent::default());
        assert_eq!(outcome.score_delta, 10);
        assert_eq!(session.score(), 10);
        assert!(session.is_playing());
    }

    #[test]
    fn test_tier_follows_score() {
        let mut session = GameSession::with_tuning(quiet(), 1).unwrap();
        session.start().unwrap();
        session.score = 490;
        session
            .engine
            .entities_mut()
            .meteors
            .push(Rect::new(0.0, 599.0, 30.0, 30.0, 2.0));

        assert_eq!(session.tier(), 1);
        session.tick(&InputIntent::default());
        assert_eq!(session.score(), 500);
        assert_eq!(session.tier(), 2);
    }

    #[test]
    fn test_score_is_monotonic() {
        let mut session = GameSession::with_tuning(busy(), 21).unwrap();
        session.start().unwrap();
        let right = InputIntent::Keys([Direction::Right].into_iter().collect());
        let mut last = 0;
        for _ in 0..2000 {
            session.tick(&right);
            assert!(session.score() >= last);
            assert_eq!(session.score() % 10, 0);
            last = session.score();
            if session.is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            field_height: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            GameSession::with_tuning(tuning, 1),
            Err(SessionError::Tuning(TuningError::EmptyField { .. }))
        ));
    }

    #[test]
    fn test_motionless_star_field_rejected() {
        let tuning = Tuning {
            particle_size_min: 0.0,
            particle_size_span: 0.0,
            particle_speed_min: 0.0,
            particle_speed_span: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            GameSession::with_tuning(tuning, 1),
            Err(SessionError::Tuning(TuningError::NotPositive { .. }))
        ));

        let session = GameSession::new(1);
        for p in session.entities().particles() {
            assert!(p.size > 0.0 && p.speed > 0.0);
        }
    }

    #[test]
    fn test_error_message() {
        let err = SessionError::InvalidTransition {
            from: SessionState::Idle,
            action: "reset",
        };
        assert_eq!(err.to_string(), "cannot reset while Idle");
    }
}
