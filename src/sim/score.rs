//! Score sources: coin pickups and flying past pipes

use super::state::{Body, Collectable, Obstacle, ObstacleKind};

/// Collect every untouched pickup overlapping the body.
/// Returns the points earned (each pickup pays out once until reset).
pub fn collect(body: &Body, collectables: &mut [Collectable], reward: u64) -> u64 {
    let bounds = body.bounds();
    let mut earned = 0;
    for coin in collectables.iter_mut().filter(|c| !c.collected) {
        if bounds.overlaps(&coin.bounds()) {
            coin.collected = true;
            earned += reward;
        }
    }
    earned
}

/// Award survival points for pipe pairs the body has cleared.
///
/// Only the bottom member of a pair counts, so each pair pays once.
pub fn score_passed(body: &Body, obstacles: &mut [Obstacle], reward: u64) -> u64 {
    let mut earned = 0;
    for pipe in obstacles
        .iter_mut()
        .filter(|o| o.kind == ObstacleKind::PipeBottom && !o.passed)
    {
        if pipe.rect.right() < body.pos.x {
            pipe.passed = true;
            earned += reward;
        }
    }
    earned
}
