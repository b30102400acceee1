//! Tick observers
//!
//! Observers see `(pre, input, post)` for every simulated tick and may record,
//! log or export it. They only ever receive owned snapshots and a shared
//! reference to the input, so they cannot influence the simulation.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::input::InputSample;
use crate::sim::{Mode, StateView};

/// Receives every tick after it has been simulated
pub trait TickObserver {
    fn on_tick(&mut self, pre: &StateView, input: &InputSample, post: &StateView);
}

/// One recorded tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTick {
    pub input: InputSample,
    pub post: StateView,
}

/// Keeps the most recent ticks in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recorder {
    /// Oldest first
    pub frames: VecDeque<RecordedTick>,
    /// Maximum frames kept (None = unbounded)
    pub capacity: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Inputs in the order they were fed to the simulation
    pub fn inputs(&self) -> impl Iterator<Item = &InputSample> {
        self.frames.iter().map(|f| &f.input)
    }

    pub fn last(&self) -> Option<&RecordedTick> {
        self.frames.back()
    }
}

impl TickObserver for Recorder {
    fn on_tick(&mut self, _pre: &StateView, input: &InputSample, post: &StateView) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            if self.frames.len() >= capacity {
                self.frames.pop_front();
            }
        }
        self.frames.push_back(RecordedTick {
            input: input.clone(),
            post: post.clone(),
        });
    }
}

/// Logs mode changes, score changes and level clears
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    pub transitions: u32,
}

impl TickObserver for LogObserver {
    fn on_tick(&mut self, pre: &StateView, _input: &InputSample, post: &StateView) {
        if pre.mode != post.mode {
            self.transitions += 1;
            match post.mode {
                Mode::GameOver => log::info!("Run ended at tick {} (score {})", post.tick, pre.score),
                Mode::Active => log::info!("Run started at tick {}", post.tick),
            }
        }
        if post.score > pre.score {
            log::debug!("Score {} -> {}", pre.score, post.score);
        }
        if post.level_cleared && !pre.level_cleared {
            log::info!("Level cleared at tick {}", post.tick);
        }
    }
}
