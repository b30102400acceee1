//! World state and core simulation types
//!
//! Everything a tick reads or writes lives in `WorldState`. There is no other
//! mutable state in the simulation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::spawner::SpawnRule;
use crate::config::WorldConfig;

/// Lifecycle mode of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Simulation advancing every tick
    Active,
    /// Run ended, waiting for a reset
    GameOver,
}

/// The player-controlled body (bird or runner)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    pub size: Vec2,
    /// Resting on a surface (may jump)
    pub grounded: bool,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
            prev_pos: pos,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Platform,
    PipeTop,
    PipeBottom,
}

/// A solid axis-aligned obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
    /// The body has flown past this obstacle (survival scoring)
    #[serde(default)]
    pub passed: bool,
}

impl Obstacle {
    pub fn new(rect: Rect, kind: ObstacleKind) -> Self {
        Self {
            rect,
            kind,
            passed: false,
        }
    }

    pub fn platform(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Rect::new(x, y, w, h), ObstacleKind::Platform)
    }
}

/// A coin-style pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectable {
    /// Top-left corner of the pickup box
    pub pos: Vec2,
    /// Pickup box is 2r x 2r
    pub radius: f32,
    pub collected: bool,
}

impl Collectable {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            collected: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: Vec2::splat(self.radius * 2.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Constants this world was built from
    pub config: WorldConfig,
    pub mode: Mode,
    pub score: u64,
    /// Active ticks simulated since construction
    pub time_ticks: u64,
    pub body: Body,
    /// Spawn order: the most recent obstacle is last
    pub obstacles: Vec<Obstacle>,
    pub collectables: Vec<Collectable>,
    /// Seeded generator, only drawn from by the obstacle spawner
    pub rng: Pcg32,
}

impl WorldState {
    /// Build a fresh world from a configuration
    pub fn new(config: WorldConfig) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        let body = Body::new(config.body_spawn, config.body_size);
        let mut state = Self {
            config,
            mode: Mode::Active,
            score: 0,
            time_ticks: 0,
            body,
            obstacles: Vec::new(),
            collectables: Vec::new(),
            rng,
        };
        state.load_level();
        state
    }

    /// Place the configured static platforms and coins
    fn load_level(&mut self) {
        self.obstacles = self
            .config
            .platforms
            .iter()
            .map(|&rect| Obstacle::new(rect, ObstacleKind::Platform))
            .collect();
        self.collectables = self
            .config
            .coins
            .iter()
            .map(|&pos| Collectable::new(pos, self.config.coin_radius))
            .collect();
    }

    /// Start a new run: body back at spawn, score zeroed, level restored.
    ///
    /// Spawned obstacles are dropped and static ones rebuilt. The RNG stream is
    /// not reseeded, so consecutive runs see different pipes.
    pub fn reset(&mut self) {
        self.body = Body::new(self.config.body_spawn, self.config.body_size);
        self.score = 0;
        self.mode = Mode::Active;
        match self.config.spawn {
            SpawnRule::Static => {
                // Platforms never change; only the coins need restoring
                if self.obstacles.len() != self.config.platforms.len() {
                    self.load_level();
                }
                for coin in &mut self.collectables {
                    coin.collected = false;
                }
            }
            SpawnRule::PipePairs(_) => self.load_level(),
        }
        log::info!("World reset ({})", self.config.variant.as_str());
    }

    /// True once every collectable has been picked up (platformer win)
    pub fn level_cleared(&self) -> bool {
        !self.collectables.is_empty() && self.collectables.iter().all(|c| c.collected)
    }

    /// Read-only projection for renderers and observers
    pub fn snapshot(&self) -> StateView {
        StateView {
            tick: self.time_ticks,
            mode: self.mode,
            score: self.score,
            body: BodyView {
                pos: self.body.pos,
                vel: self.body.vel,
                size: self.body.size,
                grounded: self.body.grounded,
            },
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    rect: o.rect,
                    kind: o.kind,
                })
                .collect(),
            collectables: self
                .collectables
                .iter()
                .map(|c| CollectableView {
                    center: c.center(),
                    radius: c.radius,
                    collected: c.collected,
                })
                .collect(),
            level_cleared: self.level_cleared(),
        }
    }
}

/// Body fields exposed to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectableView {
    pub center: Vec2,
    pub radius: f32,
    pub collected: bool,
}

/// Owned snapshot of one tick's outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateView {
    pub tick: u64,
    pub mode: Mode,
    pub score: u64,
    pub body: BodyView,
    pub obstacles: Vec<ObstacleView>,
    pub collectables: Vec<CollectableView>,
    pub level_cleared: bool,
}
