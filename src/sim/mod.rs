//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call
//! - Seeded RNG only, owned by the world
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod rect;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{BlockedSides, CollisionOutcome, CollisionPolicy, Side, resolve};
pub use physics::integrate;
pub use rect::Rect;
pub use score::{collect, score_passed};
pub use spawner::{PipeRule, SpawnRule, advance_and_recycle, maybe_spawn};
pub use state::{
    Body, BodyView, Collectable, CollectableView, Mode, Obstacle, ObstacleKind, ObstacleView,
    StateView, WorldState,
};
pub use tick::{Flow, step, tick};
