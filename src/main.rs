//! Meteor Dodge headless entry point
//!
//! Plays one game with a simple dodging autopilot and prints the final state
//! as JSON. Drawing and real input devices live outside this crate.
//!
//! Usage: `meteor-dodge [seed] [--fast]`

use meteor_dodge::sim::Rect;
use meteor_dodge::{FrameDriver, GameSession, InputSource, InputState, Key, Renderer};

/// Frames before the autopilot run is cut short (five minutes at 60 fps)
const MAX_FRAMES: u64 = 60 * 60 * 5;

/// How far above the player a meteor counts as a threat
const LOOKAHEAD: f32 = 160.0;

/// Steers away from the nearest meteor falling into the player's column
struct Autopilot;

impl Autopilot {
    fn threat<'a>(player: &Rect, meteors: &'a [Rect]) -> Option<&'a Rect> {
        meteors
            .iter()
            .filter(|m| {
                m.right() > player.left() - 10.0
                    && m.left() < player.right() + 10.0
                    && m.bottom() <= player.bottom()
                    && player.top() - m.bottom() < LOOKAHEAD
            })
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
    }
}

impl InputSource for Autopilot {
    fn pump(&mut self, session: &GameSession, input: &mut InputState) {
        input.clear();

        let entities = session.entities();
        let player = entities.player();
        let Some(meteor) = Self::threat(player, entities.obstacles()) else {
            return;
        };

        let max_x = session.tuning().field_width - player.size.x;
        let go_left = if player.left() <= 0.0 {
            false
        } else if player.left() >= max_x {
            true
        } else {
            meteor.center().x >= player.center().x
        };
        input.press(if go_left { Key::ArrowLeft } else { Key::ArrowRight });
    }
}

/// Logs progress once per second of game time
struct LogRenderer {
    frame: u64,
}

impl Renderer for LogRenderer {
    fn render(&mut self, session: &GameSession) {
        self.frame += 1;
        if self.frame % 60 == 0 {
            log::debug!(
                "frame {}: score {} tier {} meteors {}",
                self.frame,
                session.score(),
                session.tier(),
                session.entities().obstacles().len()
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Meteor Dodge (headless) starting...");

    let mut seed = None;
    let mut fast = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--fast" => fast = true,
            other => match other.parse::<u64>() {
                Ok(value) => seed = Some(value),
                Err(_) => {
                    eprintln!("usage: meteor-dodge [seed] [--fast]");
                    std::process::exit(2);
                }
            },
        }
    }
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("Seed: {}", seed);

    let mut session = GameSession::new(seed);
    if let Err(err) = session.start() {
        eprintln!("failed to start: {err}");
        std::process::exit(1);
    }

    let driver = if fast {
        FrameDriver::unthrottled()
    } else {
        FrameDriver::default()
    };
    let mut driver = driver.with_frame_limit(MAX_FRAMES);

    let summary = driver.run(
        &mut session,
        &mut InputState::default(),
        &mut Autopilot,
        &mut LogRenderer { frame: 0 },
    );
    println!(
        "Stopped after {} frames ({:?}): score {}, high score {}",
        summary.frames,
        summary.stop,
        session.score(),
        session.high_score()
    );

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize snapshot: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive the library directly on the web
}
