//! Fixed-rate frame loop
//!
//! Each frame: pump input, snapshot it, tick the session, render. The loop
//! runs while the session is Playing and stops as soon as the cancel token is
//! set, before another tick is taken.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::consts::FRAMES_PER_SECOND;
use crate::input::{InputEvent, InputState};
use crate::session::{GameSession, SessionState};

/// Consumes the session once per frame, after the update
pub trait Renderer {
    fn render(&mut self, session: &GameSession);
}

impl<F: FnMut(&GameSession)> Renderer for F {
    fn render(&mut self, session: &GameSession) {
        self(session)
    }
}

/// Feeds pending input into the input state before each frame's snapshot
pub trait InputSource {
    fn pump(&mut self, session: &GameSession, input: &mut InputState);
}

impl<F: FnMut(&GameSession, &mut InputState)> InputSource for F {
    fn pump(&mut self, session: &GameSession, input: &mut InputState) {
        self(session, input)
    }
}

/// Input events delivered from other threads (window/event callbacks)
#[derive(Debug)]
pub struct ChannelInput {
    rx: Receiver<InputEvent>,
}

impl ChannelInput {
    pub fn channel() -> (Sender<InputEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl InputSource for ChannelInput {
    fn pump(&mut self, _session: &GameSession, input: &mut InputState) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => input.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Input channel closed");
                    break;
                }
            }
        }
    }
}

/// Shared stop flag for a running frame loop
///
/// Cancellation is sticky: once cancelled, every loop using this token stops.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a frame loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The player was hit
    GameOver,
    /// The cancel token was set
    Cancelled,
    /// The session was not Playing when the loop started
    NotPlaying,
    /// The configured frame limit was reached
    FrameLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames ticked and rendered
    pub frames: u64,
    pub stop: StopReason,
}

/// Drives a session at a fixed frame rate
#[derive(Debug, Clone)]
pub struct FrameDriver {
    frame_interval: Duration,
    frame_limit: Option<u64>,
    cancel: CancelToken,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(FRAMES_PER_SECOND)
    }
}

impl FrameDriver {
    pub fn new(frames_per_second: u32) -> Self {
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / frames_per_second.max(1) as f64),
            frame_limit: None,
            cancel: CancelToken::new(),
        }
    }

    /// No sleeping between frames (headless runs and tests)
    pub fn unthrottled() -> Self {
        Self {
            frame_interval: Duration::ZERO,
            frame_limit: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops this driver's loop from any thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Run frames until the session leaves Playing, the token is cancelled or
    /// the frame limit is hit
    pub fn run<S, R>(
        &mut self,
        session: &mut GameSession,
        input: &mut InputState,
        source: &mut S,
        renderer: &mut R,
    ) -> RunSummary
    where
        S: InputSource + ?Sized,
        R: Renderer + ?Sized,
    {
        log::info!(
            "Frame loop started ({:?} per frame, limit {:?})",
            self.frame_interval,
            self.frame_limit
        );

        let mut frames = 0u64;
        let mut deadline = Instant::now();

        let stop = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            match session.state() {
                SessionState::Playing => {}
                SessionState::GameOver if frames > 0 => break StopReason::GameOver,
                _ => break StopReason::NotPlaying,
            }
            if self.frame_limit.is_some_and(|limit| frames >= limit) {
                break StopReason::FrameLimit;
            }

            source.pump(session, input);
            let intent = input.snapshot();
            session.tick(&intent);
            renderer.render(session);
            frames += 1;

            if !self.frame_interval.is_zero() {
                deadline += self.frame_interval;
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                } else {
                    // Running behind: don't try to catch up with a burst of frames
                    deadline = now;
                }
            }
        };

        log::info!("Frame loop stopped after {} frames: {:?}", frames, stop);
        RunSummary { frames, stop }
    }
}
