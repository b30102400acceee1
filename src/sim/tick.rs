//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically, one tick per call.

use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::physics::{integrate, jump, steer};
use super::score::{collect, score_passed};
use super::spawner::{advance_and_recycle, maybe_spawn};
use super::state::{Mode, WorldState};
use crate::config::JumpTrigger;
use crate::input::{InputSample, Intents};

/// Whether the outer loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    Continue,
    /// Quit requested; distinct from game over
    Quit,
}

impl Flow {
    pub fn is_continue(self) -> bool {
        self == Flow::Continue
    }
}

/// Advance the world by one tick
pub fn tick(state: &mut WorldState, input: &InputSample) -> Flow {
    let intents = state.config.bindings.intents(input);

    if intents.quit {
        log::info!("Quit requested at tick {}", state.time_ticks);
        return Flow::Quit;
    }

    let mut did_reset = false;
    match state.mode {
        Mode::GameOver if intents.reset => {
            state.reset();
            did_reset = true;
        }
        // Nothing else runs while the run is over
        Mode::GameOver => return Flow::Continue,
        Mode::Active if intents.reset && state.config.reset_while_active => {
            state.reset();
            did_reset = true;
        }
        Mode::Active => {}
    }

    state.time_ticks += 1;
    active_tick(state, &intents, did_reset);
    log::trace!(
        "tick {} pos=({:.1}, {:.1}) vel=({:.1}, {:.1}) score={}",
        state.time_ticks,
        state.body.pos.x,
        state.body.pos.y,
        state.body.vel.x,
        state.body.vel.y,
        state.score
    );
    Flow::Continue
}

/// By-value form of `tick`: consumes the world and hands back the next one
pub fn step(mut state: WorldState, input: &InputSample) -> (WorldState, Flow) {
    let flow = tick(&mut state, input);
    (state, flow)
}

/// Controls, physics, collision, spawning, scoring, end conditions
fn active_tick(state: &mut WorldState, intents: &Intents, did_reset: bool) {
    let config = &state.config;
    let world = config.world_size();

    // Controls. A key press that restarted the run does not also jump.
    steer(&mut state.body, intents.move_dir, config.move_speed);
    let wants_jump = !did_reset
        && match config.jump_trigger {
            JumpTrigger::KeyDown => intents.jump_pressed,
            JumpTrigger::Held => intents.jump_held,
        };
    if wants_jump {
        jump(
            &mut state.body,
            config.jump_impulse,
            config.jump_requires_ground,
        );
    }

    integrate(&mut state.body, config.gravity);

    let outcome = resolve(
        &mut state.body,
        &state.obstacles,
        world,
        config.collision,
    );

    maybe_spawn(&mut state.obstacles, &mut state.rng, world, &config.spawn);
    advance_and_recycle(&mut state.obstacles, config.obstacle_speed);

    let earned = collect(&state.body, &mut state.collectables, config.coin_reward)
        + score_passed(&state.body, &mut state.obstacles, config.pass_reward);
    if earned > 0 {
        state.score += earned;
        log::debug!("Scored {} (total {})", earned, state.score);
        if state.level_cleared() {
            log::info!("Level cleared with score {}", state.score);
        }
    }

    if outcome.terminal {
        state.mode = Mode::GameOver;
        log::info!(
            "Game over at tick {} with score {}",
            state.time_ticks,
            state.score
        );
    }
}
