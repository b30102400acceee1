//! Arcade Sim - fixed-step simulation core for two small 2D games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, scoring, game state)
//! - `input`: Input sampling contract and key bindings
//! - `observer`: Read-only taps on each simulated tick
//! - `runner`: Fixed-rate outer loop
//! - `config`: Per-variant world constants

pub mod config;
pub mod input;
pub mod observer;
pub mod runner;
pub mod sim;

pub use config::{ConfigError, Variant, WorldConfig};
pub use input::{InputEvent, InputSample, InputSampler, KeyCode};
pub use sim::{Flow, Mode, StateView, WorldState, step, tick};

/// Game configuration constants
pub mod consts {
    /// Simulation rate of both source games
    pub const TICK_RATE_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Flappy world
    pub const FLAPPY_WIDTH: f32 = 500.0;
    pub const FLAPPY_HEIGHT: f32 = 700.0;
    pub const FLAPPY_GRAVITY: f32 = 0.6;
    pub const FLAPPY_JUMP_IMPULSE: f32 = -7.0;
    pub const BIRD_SIZE: f32 = 40.0;
    pub const FLAPPY_SEED: u64 = 42;

    /// Pipes
    pub const PIPE_WIDTH: f32 = 100.0;
    pub const PIPE_GAP: f32 = 250.0;
    pub const PIPE_SPEED: f32 = 3.0;
    pub const PIPE_SPAWN_THRESHOLD: f32 = 300.0;
    /// Distance kept between the gap center and the top/bottom of the world
    pub const PIPE_GAP_MARGIN: i32 = 200;
    /// Points for flying through a pipe pair
    pub const PIPE_PASS_REWARD: u64 = 1;

    /// Platformer world
    pub const PLATFORMER_WIDTH: f32 = 800.0;
    pub const PLATFORMER_HEIGHT: f32 = 600.0;
    pub const PLATFORMER_GRAVITY: f32 = 0.8;
    pub const PLATFORMER_JUMP_IMPULSE: f32 = -14.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;

    /// Coins
    pub const COIN_RADIUS: f32 = 10.0;
    pub const COIN_REWARD: u64 = 10;
}
