//! World configuration
//!
//! Every tunable constant of a game variant in one serializable struct. The
//! built-in presets describe the two games; a JSON file can override
//! any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::input::KeyBindings;
use crate::sim::{CollisionPolicy, PipeRule, Rect, SpawnRule};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "ARCADE_SIM_CONFIG";

/// Game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    #[default]
    Flappy,
    Platformer,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Flappy => "flappy",
            Variant::Platformer => "platformer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flappy" | "bird" => Some(Variant::Flappy),
            "platformer" | "mario" => Some(Variant::Platformer),
            _ => None,
        }
    }
}

/// Which key event fires a jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpTrigger {
    /// On the key-down event
    KeyDown,
    /// Whenever the key is held
    Held,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config io error: {e}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// World constants for one game variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub variant: Variant,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Seed for the obstacle RNG
    pub seed: u64,

    // === Body ===
    pub body_spawn: Vec2,
    pub body_size: Vec2,

    // === Motion (units per tick) ===
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f32,
    pub jump_trigger: JumpTrigger,
    pub jump_requires_ground: bool,
    /// Horizontal speed while a move key is held
    pub move_speed: f32,

    // === Obstacles ===
    pub collision: CollisionPolicy,
    pub spawn: SpawnRule,
    /// Leftward scroll per tick
    pub obstacle_speed: f32,
    /// Fixed level geometry
    pub platforms: Vec<Rect>,

    // === Scoring ===
    /// Top-left corners of the coins
    pub coins: Vec<Vec2>,
    pub coin_radius: f32,
    pub coin_reward: u64,
    /// Points per pipe pair flown through
    pub pass_reward: u64,

    // === Input ===
    pub bindings: KeyBindings,
    /// Reset key also restarts a run that is still going
    pub reset_while_active: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::flappy()
    }
}

impl WorldConfig {
    /// Flappy bird: falling bird, scrolling pipe pairs, any contact is fatal
    pub fn flappy() -> Self {
        Self {
            variant: Variant::Flappy,
            world_width: FLAPPY_WIDTH,
            world_height: FLAPPY_HEIGHT,
            seed: FLAPPY_SEED,
            body_spawn: Vec2::new(
                (FLAPPY_WIDTH / 3.0).floor(),
                (FLAPPY_HEIGHT / 2.0).floor(),
            ),
            body_size: Vec2::splat(BIRD_SIZE),
            gravity: FLAPPY_GRAVITY,
            jump_impulse: FLAPPY_JUMP_IMPULSE,
            jump_trigger: JumpTrigger::KeyDown,
            jump_requires_ground: false,
            move_speed: 0.0,
            collision: CollisionPolicy::Terminal,
            spawn: SpawnRule::PipePairs(PipeRule {
                threshold: PIPE_SPAWN_THRESHOLD,
                gap: PIPE_GAP,
                pipe_width: PIPE_WIDTH,
                gap_center_min: PIPE_GAP_MARGIN,
                gap_center_max: FLAPPY_HEIGHT as i32 - PIPE_GAP_MARGIN,
            }),
            obstacle_speed: PIPE_SPEED,
            platforms: Vec::new(),
            coins: Vec::new(),
            coin_radius: COIN_RADIUS,
            coin_reward: COIN_REWARD,
            pass_reward: PIPE_PASS_REWARD,
            bindings: KeyBindings::flappy(),
            reset_while_active: false,
        }
    }

    /// Platformer: static platforms, five coins, solid floor
    pub fn platformer() -> Self {
        let platforms = [
            (200.0, 500.0, 150.0),
            (400.0, 400.0, 150.0),
            (600.0, 300.0, 120.0),
            (100.0, 350.0, 80.0),
            (550.0, 500.0, 100.0),
            (300.0, 200.0, 150.0),
            (0.0, 250.0, 80.0),
            (700.0, 450.0, 100.0),
        ]
        .iter()
        .map(|&(x, y, w)| Rect::new(x, y, w, PLATFORM_HEIGHT))
        .collect();

        let coins = [
            (225.0, 470.0),
            (430.0, 370.0),
            (630.0, 270.0),
            (330.0, 170.0),
            (580.0, 470.0),
        ]
        .iter()
        .map(|&(x, y)| Vec2::new(x, y))
        .collect();

        Self {
            variant: Variant::Platformer,
            world_width: PLATFORMER_WIDTH,
            world_height: PLATFORMER_HEIGHT,
            seed: 0,
            body_spawn: Vec2::new(50.0, PLATFORMER_HEIGHT - 100.0),
            body_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            gravity: PLATFORMER_GRAVITY,
            jump_impulse: PLATFORMER_JUMP_IMPULSE,
            jump_trigger: JumpTrigger::Held,
            jump_requires_ground: true,
            move_speed: PLAYER_SPEED,
            collision: CollisionPolicy::Solid,
            spawn: SpawnRule::Static,
            obstacle_speed: 0.0,
            platforms,
            coins,
            coin_radius: COIN_RADIUS,
            coin_reward: COIN_REWARD,
            pass_reward: 0,
            bindings: KeyBindings::platformer(),
            reset_while_active: true,
        }
    }

    /// Built-in preset for a variant
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Flappy => Self::flappy(),
            Variant::Platformer => Self::platformer(),
        }
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Parse JSON on top of the variant's preset: missing fields keep preset values
    pub fn from_json(json: &str, variant: Variant) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(ConfigError::Parse("expected a JSON object".to_string()));
        };

        let mut merged = serde_json::to_value(Self::preset(variant))
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let serde_json::Value::Object(ref mut base) = merged {
            base.extend(overrides);
        }

        let config: Self =
            serde_json::from_value(merged).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file
    pub fn load_from_path(path: impl AsRef<Path>, variant: Variant) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&content, variant)
    }

    /// Load the file named by `ARCADE_SIM_CONFIG`, falling back to the preset
    /// if it is unset, missing or unparseable.
    pub fn load(variant: Variant) -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Self::preset(variant);
        };
        match Self::load_from_path(&path, variant) {
            Ok(config) => {
                log::info!("Loaded {} config from {path}", variant.as_str());
                config
            }
            Err(e) => {
                log::warn!("Failed to load {path}: {e}, using defaults");
                Self::preset(variant)
            }
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reject constants that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return invalid(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            ));
        }
        if !(self.body_size.x > 0.0 && self.body_size.y > 0.0) {
            return invalid("body size must be positive".to_string());
        }
        if self.body_size.x > self.world_width || self.body_size.y > self.world_height {
            return invalid("body does not fit in the world".to_string());
        }
        let motion = [
            self.gravity,
            self.jump_impulse,
            self.move_speed,
            self.obstacle_speed,
        ];
        if motion.iter().any(|v| !v.is_finite()) {
            return invalid("motion constants must be finite".to_string());
        }
        if self.obstacle_speed < 0.0 {
            return invalid("obstacle speed must not be negative".to_string());
        }

        if let SpawnRule::PipePairs(rule) = &self.spawn {
            if !(rule.gap > 0.0 && rule.gap < self.world_height) {
                return invalid(format!("pipe gap {} does not fit the world", rule.gap));
            }
            if !(rule.pipe_width > 0.0) {
                return invalid("pipe width must be positive".to_string());
            }
            if rule.gap_center_min > rule.gap_center_max {
                return invalid(format!(
                    "gap range {}..={} is empty",
                    rule.gap_center_min, rule.gap_center_max
                ));
            }
            let half_gap = rule.gap / 2.0;
            if (rule.gap_center_min as f32) - half_gap < 0.0
                || (rule.gap_center_max as f32) + half_gap > self.world_height
            {
                return invalid("gap range pushes a pipe outside the world".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(WorldConfig::flappy().validate().is_ok());
        assert!(WorldConfig::platformer().validate().is_ok());
    }

    #[test]
    fn test_flappy_preset_constants() {
        let config = WorldConfig::flappy();
        assert_eq!(config.world_size(), Vec2::new(500.0, 700.0));
        assert_eq!(config.body_spawn, Vec2::new(166.0, 350.0));
        let SpawnRule::PipePairs(rule) = config.spawn else {
            panic!("flappy should spawn pipes");
        };
        assert_eq!(rule.gap_center_min, 200);
        assert_eq!(rule.gap_center_max, 500);
        assert_eq!(rule.threshold, 300.0);
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(Variant::from_str("Flappy"), Some(Variant::Flappy));
        assert_eq!(Variant::from_str("mario"), Some(Variant::Platformer));
        assert_eq!(Variant::from_str("tetris"), None);
        assert_eq!(Variant::from_str(Variant::Platformer.as_str()), Some(Variant::Platformer));
    }

    #[test]
    fn test_partial_json_keeps_preset() {
        let config = WorldConfig::from_json(r#"{ "gravity": 0.7, "seed": 7 }"#, Variant::Flappy)
            .expect("valid config");
        assert_eq!(config.gravity, 0.7);
        assert_eq!(config.seed, 7);
        assert_eq!(config.jump_impulse, FLAPPY_JUMP_IMPULSE);
        assert_eq!(config.bindings, KeyBindings::flappy());
    }

    #[test]
    fn test_json_roundtrip_of_preset() {
        let original = WorldConfig::platformer();
        let json = original.to_json().expect("serialize");
        let parsed = WorldConfig::from_json(&json, Variant::Flappy).expect("parse");
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            WorldConfig::from_json("not json", Variant::Flappy),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            WorldConfig::from_json("[1, 2]", Variant::Flappy),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            WorldConfig::from_json(r#"{ "gravity": "heavy" }"#, Variant::Flappy),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_worlds() {
        let mut config = WorldConfig::flappy();
        config.world_width = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = WorldConfig::flappy();
        config.spawn = SpawnRule::PipePairs(PipeRule {
            threshold: 300.0,
            gap: 250.0,
            pipe_width: 100.0,
            gap_center_min: 500,
            gap_center_max: 200,
        });
        assert!(config.validate().is_err());

        let mut config = WorldConfig::flappy();
        config.spawn = SpawnRule::PipePairs(PipeRule {
            threshold: 300.0,
            gap: 250.0,
            pipe_width: 100.0,
            gap_center_min: 50,
            gap_center_max: 500,
        });
        assert!(config.validate().is_err());

        let mut config = WorldConfig::platformer();
        config.gravity = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = WorldConfig::load_from_path("/nonexistent/arcade.json", Variant::Flappy)
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().contains("/nonexistent/arcade.json"));
    }
}
