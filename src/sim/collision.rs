//! Collision detection and response against static geometry
//!
//! Both games test the body box against every obstacle in stored order. The
//! platformer resolves each overlap with a heuristic based on the direction of
//! travel and where the body started the tick; the flappy game simply dies.
//! When two obstacles overlap the body in the same tick, the later one sees
//! the position already corrected by the earlier one and its correction wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, Obstacle};

/// How the world reacts to the body touching boundaries and obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Any contact ends the run (flappy)
    Terminal,
    /// Obstacles are solid, the world floor is ground (platformer)
    Solid,
}

/// Side of the body that was pushed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    const fn bit(self) -> u8 {
        match self {
            Side::Left => 1,
            Side::Right => 1 << 1,
            Side::Top => 1 << 2,
            Side::Bottom => 1 << 3,
        }
    }
}

/// Set of blocked sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockedSides(u8);

impl BlockedSides {
    pub fn insert(&mut self, side: Side) {
        self.0 |= side.bit();
    }

    pub fn contains(&self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Result of resolving one tick of contacts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Body ended the tick resting on something
    pub grounded: bool,
    pub blocked: BlockedSides,
    /// The run is over
    pub terminal: bool,
}

/// Resolve the body against the world bounds and obstacles
///
/// Mutates the body in place and reports what happened. Never fails.
pub fn resolve(
    body: &mut Body,
    obstacles: &[Obstacle],
    world: Vec2,
    policy: CollisionPolicy,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    body.grounded = false;

    match policy {
        CollisionPolicy::Terminal => {
            if body.top() <= 0.0 || body.bottom() >= world.y {
                outcome.terminal = true;
            } else {
                let bounds = body.bounds();
                outcome.terminal = obstacles.iter().any(|o| bounds.overlaps(&o.rect));
            }
        }
        CollisionPolicy::Solid => {
            clamp_horizontal(body, world.x);

            for obstacle in obstacles {
                resolve_solid(body, obstacle, &mut outcome);
            }

            // Ground last, so no obstacle push can leave the body below it
            if body.bottom() >= world.y {
                body.pos.y = world.y - body.size.y;
                body.vel.y = 0.0;
                outcome.grounded = true;
                outcome.blocked.insert(Side::Bottom);
            }
            clamp_horizontal(body, world.x);
        }
    }

    body.grounded = outcome.grounded;
    outcome
}

/// Keep the body inside `[0, world_width]` horizontally
fn clamp_horizontal(body: &mut Body, world_width: f32) {
    if body.pos.x < 0.0 {
        body.pos.x = 0.0;
    } else if body.pos.x + body.size.x > world_width {
        body.pos.x = world_width - body.size.x;
    }
}

/// Push the body out of one solid obstacle
fn resolve_solid(body: &mut Body, obstacle: &Obstacle, outcome: &mut CollisionOutcome) {
    let rect = &obstacle.rect;
    if !body.bounds().overlaps(rect) {
        return;
    }

    let prev_top = body.prev_pos.y;

    if body.vel.y > 0.0 && prev_top < rect.top() {
        // Landing on top
        body.pos.y = rect.top() - body.size.y;
        body.vel.y = 0.0;
        outcome.grounded = true;
        outcome.blocked.insert(Side::Bottom);
    } else if body.vel.y < 0.0 && prev_top > rect.top() {
        // Head hit from below
        body.pos.y = rect.bottom();
        body.vel.y = 0.0;
        outcome.blocked.insert(Side::Top);
    } else if body.vel.x > 0.0 {
        body.pos.x = rect.left() - body.size.x;
        outcome.blocked.insert(Side::Right);
    } else if body.vel.x < 0.0 {
        body.pos.x = rect.right();
        outcome.blocked.insert(Side::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::integrate;
    use crate::sim::state::ObstacleKind;
    use crate::sim::Rect;

    const PLATFORMER_WORLD: Vec2 = Vec2::new(800.0, 600.0);
    const FLAPPY_WORLD: Vec2 = Vec2::new(500.0, 700.0);

    fn runner(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        let mut body = Body::new(Vec2::new(x, y), Vec2::new(30.0, 40.0));
        body.vel = Vec2::new(vx, vy);
        body
    }

    #[test]
    fn test_landing_on_platform() {
        // Short body falling onto a platform top at y=500
        let mut body = Body::new(Vec2::new(50.0, 478.0), Vec2::new(30.0, 20.0));
        body.vel.y = 5.0;
        let platforms = [Obstacle::platform(0.0, 500.0, 150.0, 20.0)];

        integrate(&mut body, 0.8);
        let outcome = resolve(&mut body, &platforms, PLATFORMER_WORLD, CollisionPolicy::Solid);

        assert_eq!(body.pos.y, 480.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.grounded);
        assert!(outcome.grounded);
        assert!(outcome.blocked.contains(Side::Bottom));
        assert!(!outcome.terminal);
    }

    #[test]
    fn test_resting_body_stays_grounded() {
        let platforms = [Obstacle::platform(200.0, 500.0, 150.0, 20.0)];
        let mut body = runner(250.0, 460.0, 0.0, 0.0);
        for _ in 0..10 {
            integrate(&mut body, 0.8);
            let outcome = resolve(&mut body, &platforms, PLATFORMER_WORLD, CollisionPolicy::Solid);
            assert!(outcome.grounded);
            assert_eq!(body.pos.y, 460.0);
        }
    }

    #[test]
    fn test_ceiling_hit() {
        let platforms = [Obstacle::platform(0.0, 300.0, 200.0, 20.0)];
        let mut body = runner(50.0, 325.0, 0.0, -10.0);

        integrate(&mut body, 0.8);
        let outcome = resolve(&mut body, &platforms, PLATFORMER_WORLD, CollisionPolicy::Solid);

        assert_eq!(body.pos.y, 320.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(outcome.blocked.contains(Side::Top));
        assert!(!outcome.grounded);
    }

    #[test]
    fn test_side_blocks() {
        let wall = [Obstacle::platform(100.0, 400.0, 50.0, 100.0)];

        // Moving right into the wall's left face, not falling into it
        let mut body = runner(75.0, 420.0, 5.0, -0.8);
        integrate(&mut body, 0.8);
        let outcome = resolve(&mut body, &wall, PLATFORMER_WORLD, CollisionPolicy::Solid);
        assert_eq!(body.pos.x, 70.0);
        assert!(outcome.blocked.contains(Side::Right));

        // Moving left into the wall's right face
        let mut body = runner(148.0, 420.0, -5.0, -0.8);
        integrate(&mut body, 0.8);
        let outcome = resolve(&mut body, &wall, PLATFORMER_WORLD, CollisionPolicy::Solid);
        assert_eq!(body.pos.x, 150.0);
        assert!(outcome.blocked.contains(Side::Left));
    }

    #[test]
    fn test_floor_is_ground() {
        let mut body = runner(50.0, 559.0, 0.0, 3.0);
        integrate(&mut body, 0.8);
        let outcome = resolve(&mut body, &[], PLATFORMER_WORLD, CollisionPolicy::Solid);
        assert_eq!(body.pos.y, 560.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(outcome.grounded);
        assert!(!outcome.terminal);
    }

    #[test]
    fn test_ceiling_push_never_sinks_below_floor() {
        // Platform bottom at 570 is less than a body height above the floor
        let platforms = [Obstacle::platform(0.0, 540.0, 200.0, 30.0)];
        let mut body = runner(50.0, 560.0, 0.0, -14.0);

        integrate(&mut body, 0.8);
        let outcome = resolve(&mut body, &platforms, PLATFORMER_WORLD, CollisionPolicy::Solid);

        assert_eq!(body.bottom(), 600.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.grounded);
        assert!(outcome.blocked.contains(Side::Top));
        assert!(outcome.blocked.contains(Side::Bottom));
    }

    #[test]
    fn test_horizontal_clamp() {
        let mut body = runner(2.0, 100.0, -5.0, 0.0);
        integrate(&mut body, 0.8);
        resolve(&mut body, &[], PLATFORMER_WORLD, CollisionPolicy::Solid);
        assert_eq!(body.pos.x, 0.0);

        let mut body = runner(768.0, 100.0, 5.0, 0.0);
        integrate(&mut body, 0.8);
        resolve(&mut body, &[], PLATFORMER_WORLD, CollisionPolicy::Solid);
        assert_eq!(body.pos.x, 770.0);
    }

    #[test]
    fn test_resolution_depends_on_obstacle_order() {
        let low = Obstacle::platform(0.0, 500.0, 200.0, 20.0);
        let high = Obstacle::platform(0.0, 490.0, 200.0, 20.0);

        // Falls deep enough to overlap both in one tick
        let mut body = runner(50.0, 445.0, 0.0, 20.0);
        integrate(&mut body, 0.8);
        let outcome = resolve(
            &mut body,
            &[low.clone(), high.clone()],
            PLATFORMER_WORLD,
            CollisionPolicy::Solid,
        );
        // Lands on the low one first; the high one still overlaps but vy is
        // already zero so no rule applies and the body is left inside it.
        assert_eq!(body.pos.y, 460.0);
        assert!(outcome.grounded);

        let mut body = runner(50.0, 445.0, 0.0, 20.0);
        integrate(&mut body, 0.8);
        resolve(&mut body, &[high, low], PLATFORMER_WORLD, CollisionPolicy::Solid);
        assert_eq!(body.pos.y, 450.0);
    }

    #[test]
    fn test_flappy_ceiling_is_terminal() {
        let mut bird = Body::new(Vec2::new(166.0, 3.0), Vec2::splat(40.0));
        bird.vel.y = -7.0;
        integrate(&mut bird, 0.6);
        assert!(bird.top() <= 0.0);
        let outcome = resolve(&mut bird, &[], FLAPPY_WORLD, CollisionPolicy::Terminal);
        assert!(outcome.terminal);
    }

    #[test]
    fn test_flappy_floor_is_terminal() {
        let mut bird = Body::new(Vec2::new(166.0, 655.0), Vec2::splat(40.0));
        bird.vel.y = 5.0;
        integrate(&mut bird, 0.6);
        let outcome = resolve(&mut bird, &[], FLAPPY_WORLD, CollisionPolicy::Terminal);
        assert!(outcome.terminal);
    }

    #[test]
    fn test_flappy_pipe_is_terminal() {
        let pipe = Obstacle::new(Rect::new(180.0, 0.0, 100.0, 300.0), ObstacleKind::PipeTop);
        let mut bird = Body::new(Vec2::new(166.0, 280.0), Vec2::splat(40.0));
        let outcome = resolve(&mut bird, &[pipe.clone()], FLAPPY_WORLD, CollisionPolicy::Terminal);
        assert!(outcome.terminal);

        // Same pipe, bird below it
        let mut bird = Body::new(Vec2::new(166.0, 350.0), Vec2::splat(40.0));
        let outcome = resolve(&mut bird, &[pipe], FLAPPY_WORLD, CollisionPolicy::Terminal);
        assert!(!outcome.terminal);
        // Terminal policy never moves the body
        assert_eq!(bird.pos, Vec2::new(166.0, 350.0));
    }

    #[test]
    fn test_blocked_sides_set() {
        let mut sides = BlockedSides::default();
        assert!(sides.is_empty());
        sides.insert(Side::Left);
        sides.insert(Side::Bottom);
        assert!(sides.contains(Side::Left));
        assert!(sides.contains(Side::Bottom));
        assert!(!sides.contains(Side::Right));
        assert!(!sides.contains(Side::Top));
    }
}
