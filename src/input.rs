//! Input sampling contract and intent mapping
//!
//! The event source (window, terminal, replay file) lives outside the crate.
//! It only has to hand over one `InputSample` per tick: the discrete events
//! since the last tick plus the set of keys currently held.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

/// Physical key codes the games care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    R,
    Escape,
    /// Any other key, by the event source's raw code
    Other(u32),
}

/// Discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Window closed / source shut down
    Quit,
    KeyDown(KeyCode),
}

/// Everything the core reads from the input source for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Events since the previous sample, in arrival order
    pub events: Vec<InputEvent>,
    /// Keys held down right now
    pub pressed: HashSet<KeyCode>,
}

impl InputSample {
    /// A sample with no events and nothing held
    pub fn idle() -> Self {
        Self::default()
    }

    /// A single key-down event with the key also reported as held
    pub fn key_down(key: KeyCode) -> Self {
        Self {
            events: vec![InputEvent::KeyDown(key)],
            pressed: HashSet::from([key]),
        }
    }

    /// Keys held without any new events
    pub fn holding(keys: &[KeyCode]) -> Self {
        Self {
            events: Vec::new(),
            pressed: keys.iter().copied().collect(),
        }
    }

    pub fn quit() -> Self {
        Self {
            events: vec![InputEvent::Quit],
            pressed: HashSet::new(),
        }
    }

    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }
}

/// Source of input samples, polled once per tick
///
/// Implementations must not block: with nothing pending they return an empty
/// sample immediately.
pub trait InputSampler {
    fn sample(&mut self) -> InputSample;
}

/// Replays a fixed queue of samples, then reports idle forever
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    queue: VecDeque<InputSample>,
}

impl ScriptedSampler {
    pub fn new(samples: impl IntoIterator<Item = InputSample>) -> Self {
        Self {
            queue: samples.into_iter().collect(),
        }
    }

    pub fn push(&mut self, sample: InputSample) {
        self.queue.push_back(sample);
    }

    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}

impl InputSampler for ScriptedSampler {
    fn sample(&mut self) -> InputSample {
        self.queue.pop_front().unwrap_or_default()
    }
}

/// Cycles through a pattern of samples forever (demo autopilot)
#[derive(Debug, Clone)]
pub struct RepeatingSampler {
    pattern: Vec<InputSample>,
    cursor: usize,
}

impl RepeatingSampler {
    pub fn new(pattern: Vec<InputSample>) -> Self {
        Self { pattern, cursor: 0 }
    }
}

impl InputSampler for RepeatingSampler {
    fn sample(&mut self) -> InputSample {
        if self.pattern.is_empty() {
            return InputSample::idle();
        }
        let sample = self.pattern[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.pattern.len();
        sample
    }
}

/// Semantic role a key plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Jump,
    MoveLeft,
    MoveRight,
    Reset,
    Quit,
}

/// One key → role mapping. A key may appear in several bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub key: KeyCode,
    pub role: Role,
}

/// Key bindings for a game variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub bindings: Vec<Binding>,
}

impl KeyBindings {
    pub fn new(pairs: &[(KeyCode, Role)]) -> Self {
        Self {
            bindings: pairs
                .iter()
                .map(|&(key, role)| Binding { key, role })
                .collect(),
        }
    }

    /// Space flaps while flying and restarts after a crash
    pub fn flappy() -> Self {
        Self::new(&[
            (KeyCode::Space, Role::Jump),
            (KeyCode::Space, Role::Reset),
            (KeyCode::Escape, Role::Quit),
        ])
    }

    /// Arrows or WASD to move, Space/Up/W to jump, R to restart
    pub fn platformer() -> Self {
        Self::new(&[
            (KeyCode::Left, Role::MoveLeft),
            (KeyCode::A, Role::MoveLeft),
            (KeyCode::Right, Role::MoveRight),
            (KeyCode::D, Role::MoveRight),
            (KeyCode::Space, Role::Jump),
            (KeyCode::Up, Role::Jump),
            (KeyCode::W, Role::Jump),
            (KeyCode::R, Role::Reset),
            (KeyCode::Escape, Role::Quit),
        ])
    }

    pub fn has_role(&self, key: KeyCode, role: Role) -> bool {
        self.bindings.iter().any(|b| b.key == key && b.role == role)
    }

    fn any_held(&self, sample: &InputSample, role: Role) -> bool {
        self.bindings
            .iter()
            .any(|b| b.role == role && sample.is_pressed(b.key))
    }

    /// Translate a raw sample into intents
    pub fn intents(&self, sample: &InputSample) -> Intents {
        let mut intents = Intents::default();

        for event in &sample.events {
            match *event {
                InputEvent::Quit => intents.quit = true,
                InputEvent::KeyDown(key) => {
                    if self.has_role(key, Role::Quit) {
                        intents.quit = true;
                    }
                    if self.has_role(key, Role::Reset) {
                        intents.reset = true;
                    }
                    if self.has_role(key, Role::Jump) {
                        intents.jump_pressed = true;
                    }
                }
            }
        }

        intents.jump_held = self.any_held(sample, Role::Jump);
        // Left wins when both directions are held
        intents.move_dir = if self.any_held(sample, Role::MoveLeft) {
            -1
        } else if self.any_held(sample, Role::MoveRight) {
            1
        } else {
            0
        };

        intents
    }
}

/// Semantic actions derived from one input sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    /// Jump key went down this tick
    pub jump_pressed: bool,
    /// Jump key is held
    pub jump_held: bool,
    /// -1 left, 0 none, +1 right
    pub move_dir: i8,
    pub reset: bool,
    pub quit: bool,
}
