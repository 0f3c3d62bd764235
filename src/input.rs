//! Player input
//!
//! Input collaborators feed key and pointer events into an [`InputState`] at
//! any time between ticks. Once per tick the driver takes a [`InputIntent`]
//! snapshot, which is all the simulation ever reads.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// A movement key, identified by its lowercase key name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    A,
    D,
    W,
    S,
}

impl Key {
    /// Parse a key identifier (`"ArrowLeft"`, `"a"`, ...), ignoring case
    pub fn from_identifier(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            "a" => Some(Key::A),
            "d" => Some(Key::D),
            "w" => Some(Key::W),
            "s" => Some(Key::S),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::ArrowLeft => "arrowleft",
            Key::ArrowRight => "arrowright",
            Key::ArrowUp => "arrowup",
            Key::ArrowDown => "arrowdown",
            Key::A => "a",
            Key::D => "d",
            Key::W => "w",
            Key::S => "s",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Key::ArrowLeft | Key::A => Direction::Left,
            Key::ArrowRight | Key::D => Direction::Right,
            Key::ArrowUp | Key::W => Direction::Up,
            Key::ArrowDown | Key::S => Direction::Down,
        }
    }
}

/// Directions held during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeldDirections {
    pub fn insert(&mut self, dir: Direction) {
        match dir {
            Direction::Left => self.left = true,
            Direction::Right => self.right = true,
            Direction::Up => self.up = true,
            Direction::Down => self.down = true,
        }
    }

    pub fn contains(&self, dir: Direction) -> bool {
        match dir {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

impl FromIterator<Direction> for HeldDirections {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut held = Self::default();
        for dir in iter {
            held.insert(dir);
        }
        held
    }
}

/// What the player wants this tick
///
/// A pointer target, when present, wins over held keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputIntent {
    Keys(HeldDirections),
    /// Pointer position in playfield coordinates
    Pointer(Vec2),
}

impl Default for InputIntent {
    fn default() -> Self {
        InputIntent::Keys(HeldDirections::default())
    }
}

/// Maps display coordinates (e.g. a scaled canvas on screen) into the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Display position of the playfield's top-left corner
    pub origin: Vec2,
    /// Displayed size of the playfield
    pub size: Vec2,
    /// Playfield size
    pub field: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        let field = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
        Self {
            origin: Vec2::ZERO,
            size: field,
            field,
        }
    }
}

impl Viewport {
    /// Convert a display position to playfield coordinates
    pub fn to_field(&self, display: Vec2) -> Vec2 {
        let scale = self.field / self.size.max(Vec2::splat(f32::EPSILON));
        (display - self.origin) * scale
    }
}

/// A raw input event, in display coordinates for pointer events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    /// Display geometry changed (resize)
    Resize(Viewport),
}

/// Currently held keys and pointer target
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pointer: Option<Vec2>,
    viewport: Viewport,
}

impl InputState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            held: HashSet::new(),
            pointer: None,
            viewport,
        }
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.press(key),
            InputEvent::KeyUp(key) => self.release(key),
            InputEvent::PointerDown(pos) => self.pointer_down(pos),
            InputEvent::PointerMove(pos) => self.pointer_move(pos),
            InputEvent::PointerUp => self.pointer_up(),
            InputEvent::Resize(viewport) => self.viewport = viewport,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Press by key identifier; unknown identifiers are ignored
    pub fn press_identifier(&mut self, id: &str) {
        if let Some(key) = Key::from_identifier(id) {
            self.press(key);
        }
    }

    /// Release by key identifier; unknown identifiers are ignored
    pub fn release_identifier(&mut self, id: &str) {
        if let Some(key) = Key::from_identifier(id) {
            self.release(key);
        }
    }

    pub fn pointer_down(&mut self, display: Vec2) {
        self.pointer = Some(self.viewport.to_field(display));
    }

    /// Move the pointer target; ignored unless a pointer is down
    pub fn pointer_move(&mut self, display: Vec2) {
        if self.pointer.is_some() {
            self.pointer = Some(self.viewport.to_field(display));
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer = None;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Release every key and the pointer
    pub fn clear(&mut self) {
        self.held.clear();
        self.pointer = None;
    }

    /// The intent for the coming tick
    pub fn snapshot(&self) -> InputIntent {
        match self.pointer {
            Some(target) => InputIntent::Pointer(target),
            None => InputIntent::Keys(self.held.iter().map(Key::direction).collect()),
        }
    }
}
