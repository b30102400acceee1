//! Fixed-rate outer loop
//!
//! Polls the input sampler, advances the world and notifies observers. The
//! headless mode runs ticks back to back; the real-time mode paces them with a
//! fixed-timestep accumulator.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::input::InputSampler;
use crate::observer::TickObserver;
use crate::sim::{Flow, Mode, StateView, WorldState, tick};

/// Frame-time accumulator that converts wall time into whole ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    pub dt: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add elapsed seconds and return how many ticks are due now.
    ///
    /// Large stalls are clamped so a slow frame cannot trigger a spiral of death.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let elapsed = elapsed.clamp(0.0, 0.1);
        self.accumulator += elapsed;

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < self.max_substeps {
            self.accumulator -= self.dt;
            steps += 1;
        }
        // Drop backlog beyond the substep cap
        if steps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        steps
    }

    /// Seconds until the next tick is due
    pub fn remaining(&self) -> f32 {
        (self.dt - self.accumulator).max(0.0)
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Ticks fed to the simulation (including ticks spent in game over)
    pub ticks: u64,
    pub quit: bool,
    /// Number of runs that ended in game over
    pub game_overs: u32,
    pub final_state: StateView,
}

/// Drives a world from an input sampler
pub struct Runner<S: InputSampler> {
    pub state: WorldState,
    pub sampler: S,
    observers: Vec<Box<dyn TickObserver>>,
    ticks: u64,
    game_overs: u32,
}

impl<S: InputSampler> Runner<S> {
    pub fn new(state: WorldState, sampler: S) -> Self {
        Self {
            state,
            sampler,
            observers: Vec::new(),
            ticks: 0,
            game_overs: 0,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn TickObserver>) {
        self.observers.push(observer);
    }

    /// Sample input, advance one tick, notify observers
    pub fn step_once(&mut self) -> Flow {
        let input = self.sampler.sample();
        let pre = self.state.snapshot();
        let flow = tick(&mut self.state, &input);
        if flow == Flow::Quit {
            return flow;
        }
        self.ticks += 1;

        let post = self.state.snapshot();
        if pre.mode != post.mode && post.mode == Mode::GameOver {
            self.game_overs += 1;
        }
        for observer in &mut self.observers {
            observer.on_tick(&pre, &input, &post);
        }
        flow
    }

    /// Run ticks back to back until quit or `max_ticks`
    pub fn run_headless(&mut self, max_ticks: u64) -> RunSummary {
        let mut quit = false;
        while self.ticks < max_ticks {
            if !self.step_once().is_continue() {
                quit = true;
                break;
            }
        }
        self.summary(quit)
    }

    /// Run at the fixed tick rate against the wall clock until quit or `max_ticks`
    pub fn run_realtime(&mut self, max_ticks: u64) -> RunSummary {
        let mut clock = FixedTimestep::default();
        let mut last = Instant::now();
        let mut quit = false;

        'outer: while self.ticks < max_ticks {
            let now = Instant::now();
            let due = clock.advance(now.duration_since(last).as_secs_f32());
            last = now;

            for _ in 0..due {
                if !self.step_once().is_continue() {
                    quit = true;
                    break 'outer;
                }
                if self.ticks >= max_ticks {
                    break 'outer;
                }
            }
            std::thread::sleep(Duration::from_secs_f32(clock.remaining()));
        }
        self.summary(quit)
    }

    fn summary(&self, quit: bool) -> RunSummary {
        log::info!(
            "Run finished after {} ticks ({} game overs, quit={})",
            self.ticks,
            self.game_overs,
            quit
        );
        RunSummary {
            ticks: self.ticks,
            quit,
            game_overs: self.game_overs,
            final_state: self.state.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::input::{InputSample, KeyCode, ScriptedSampler};
    use crate::observer::Recorder;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_timestep_accumulates() {
        let mut clock = FixedTimestep::new(0.01, 8);
        assert_eq!(clock.advance(0.005), 0);
        assert_eq!(clock.advance(0.006), 1);
        assert_eq!(clock.advance(0.025), 2);
    }

    #[test]
    fn test_timestep_caps_substeps() {
        let mut clock = FixedTimestep::new(0.01, 4);
        assert_eq!(clock.advance(0.09), 4);
        // Backlog dropped, at most one more tick pending
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_timestep_ignores_negative_time() {
        let mut clock = FixedTimestep::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert!(clock.remaining() > 0.0);
    }

    #[test]
    fn test_headless_stops_at_max_ticks() {
        let state = WorldState::new(WorldConfig::platformer());
        let mut runner = Runner::new(state, ScriptedSampler::default());
        let summary = runner.run_headless(50);
        assert_eq!(summary.ticks, 50);
        assert!(!summary.quit);
        assert_eq!(summary.final_state.tick, 50);
        assert_eq!(summary.final_state.mode, Mode::Active);
    }

    #[test]
    fn test_headless_stops_on_quit() {
        let state = WorldState::new(WorldConfig::flappy());
        let mut samples = vec![InputSample::idle(); 10];
        samples.push(InputSample::quit());
        let mut runner = Runner::new(state, ScriptedSampler::new(samples));
        let summary = runner.run_headless(1_000);
        assert!(summary.quit);
        assert_eq!(summary.ticks, 10);
    }

    #[test]
    fn test_headless_counts_game_overs_and_ticks_in_game_over() {
        let state = WorldState::new(WorldConfig::flappy());
        let mut runner = Runner::new(state, ScriptedSampler::default());
        let summary = runner.run_headless(200);
        assert_eq!(summary.ticks, 200);
        assert_eq!(summary.game_overs, 1);
        assert_eq!(summary.final_state.mode, Mode::GameOver);
    }

    /// Forwards to a shared recorder so the test can inspect it afterwards
    struct SharedRecorder(Rc<RefCell<Recorder>>);

    impl TickObserver for SharedRecorder {
        fn on_tick(&mut self, pre: &StateView, input: &InputSample, post: &StateView) {
            self.0.borrow_mut().on_tick(pre, input, post);
        }
    }

    #[test]
    fn test_observers_see_every_tick() {
        let recorder = Rc::new(RefCell::new(Recorder::new()));
        let state = WorldState::new(WorldConfig::flappy());
        let sampler = ScriptedSampler::new([
            InputSample::key_down(KeyCode::Space),
            InputSample::idle(),
            InputSample::quit(),
        ]);
        let mut runner = Runner::new(state, sampler);
        runner.add_observer(Box::new(SharedRecorder(Rc::clone(&recorder))));
        runner.run_headless(100);

        let recorder = recorder.borrow();
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.frames[0].input, InputSample::key_down(KeyCode::Space));
    }

    #[test]
    fn test_realtime_runs_requested_ticks() {
        let state = WorldState::new(WorldConfig::platformer());
        let mut runner = Runner::new(state, ScriptedSampler::default());
        let summary = runner.run_realtime(3);
        assert_eq!(summary.ticks, 3);
    }
}
