//! Obstacle spawning and recycling
//!
//! Pipes enter at the right edge of the world in top/bottom pairs, scroll
//! left at a fixed speed and are dropped once fully off-screen. A static level
//! uses the same entry points with a rule that never spawns and a speed of 0.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Obstacle, ObstacleKind};

/// Pipe pair generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeRule {
    /// Spawn once the newest pipe is further than this from the right edge
    pub threshold: f32,
    /// Vertical opening between the two pipes
    pub gap: f32,
    pub pipe_width: f32,
    /// Inclusive range the gap center is drawn from
    pub gap_center_min: i32,
    pub gap_center_max: i32,
}

/// How new obstacles enter the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnRule {
    /// Fixed level, nothing ever spawns
    Static,
    PipePairs(PipeRule),
}

/// Append a pipe pair if the rule says it is time. Returns true if one was spawned.
pub fn maybe_spawn<R: Rng>(
    obstacles: &mut Vec<Obstacle>,
    rng: &mut R,
    world: Vec2,
    rule: &SpawnRule,
) -> bool {
    let SpawnRule::PipePairs(rule) = rule else {
        return false;
    };

    let due = match obstacles.last() {
        None => true,
        Some(last) => last.rect.left() < world.x - rule.threshold,
    };
    if !due {
        return false;
    }

    let gap_center = rng.random_range(rule.gap_center_min..=rule.gap_center_max) as f32;
    let (bottom, top) = pipe_pair(gap_center, world, rule);
    log::debug!(
        "Spawned pipe pair at x={} gap_center={}",
        world.x,
        gap_center
    );
    // Bottom first, then top: the top pipe is always the newest
    obstacles.push(bottom);
    obstacles.push(top);
    true
}

/// Build the bottom and top pipes around a gap center
fn pipe_pair(gap_center: f32, world: Vec2, rule: &PipeRule) -> (Obstacle, Obstacle) {
    let half_gap = rule.gap / 2.0;
    let bottom_y = gap_center + half_gap;
    let bottom = Obstacle::new(
        Rect::new(world.x, bottom_y, rule.pipe_width, world.y - bottom_y),
        ObstacleKind::PipeBottom,
    );
    let top = Obstacle::new(
        Rect::new(world.x, 0.0, rule.pipe_width, gap_center - half_gap),
        ObstacleKind::PipeTop,
    );
    (bottom, top)
}

/// Scroll every obstacle left by `speed`, then drop the ones fully off-screen.
/// Returns how many were removed.
pub fn advance_and_recycle(obstacles: &mut Vec<Obstacle>, speed: f32) -> usize {
    if speed != 0.0 {
        for obstacle in obstacles.iter_mut() {
            obstacle.rect.pos.x -= speed;
        }
    }

    let before = obstacles.len();
    obstacles.retain(|o| o.rect.right() >= 0.0);
    let removed = before - obstacles.len();
    if removed > 0 {
        log::debug!("Recycled {} obstacles", removed);
    }
    removed
}
