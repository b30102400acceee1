//! Arcade Sim entry point
//!
//! Runs one game variant headless with a scripted autopilot and prints a JSON
//! summary of the final state.
//!
//! Usage: arcade-sim [flappy|platformer] [--ticks N] [--seed S] [--config PATH] [--realtime]

use std::process::ExitCode;

use arcade_sim::config::{Variant, WorldConfig};
use arcade_sim::input::{InputSample, KeyCode, RepeatingSampler};
use arcade_sim::observer::LogObserver;
use arcade_sim::runner::Runner;
use arcade_sim::sim::WorldState;

/// Parsed command line
struct Args {
    variant: Variant,
    ticks: u64,
    seed: Option<u64>,
    config: Option<String>,
    realtime: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        variant: Variant::Flappy,
        ticks: 600,
        seed: None,
        config: None,
        realtime: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a value")?;
                args.ticks = value
                    .parse()
                    .map_err(|e| format!("bad --ticks {value}: {e}"))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = Some(
                    value
                        .parse()
                        .map_err(|e| format!("bad --seed {value}: {e}"))?,
                );
            }
            "--config" => {
                args.config = Some(iter.next().ok_or("--config needs a path")?);
            }
            "--realtime" => args.realtime = true,
            other => {
                args.variant =
                    Variant::from_str(other).ok_or_else(|| format!("unknown argument: {other}"))?;
            }
        }
    }
    Ok(args)
}

/// Input pattern standing in for a player
fn autopilot(variant: Variant) -> RepeatingSampler {
    match variant {
        Variant::Flappy => {
            // One flap roughly every third of a second
            let mut pattern = vec![InputSample::key_down(KeyCode::Space)];
            pattern.extend(std::iter::repeat_n(InputSample::idle(), 19));
            RepeatingSampler::new(pattern)
        }
        Variant::Platformer => {
            let mut pattern = Vec::new();
            pattern.extend(std::iter::repeat_n(
                InputSample::holding(&[KeyCode::Right, KeyCode::Up]),
                90,
            ));
            pattern.extend(std::iter::repeat_n(
                InputSample::holding(&[KeyCode::Left]),
                60,
            ));
            RepeatingSampler::new(pattern)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!(
                "usage: arcade-sim [flappy|platformer] [--ticks N] [--seed S] [--config PATH] [--realtime]"
            );
            return ExitCode::from(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => match WorldConfig::load_from_path(path, args.variant) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => WorldConfig::load(args.variant),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    log::info!(
        "Arcade Sim ({}) starting, {} ticks",
        config.variant.as_str(),
        args.ticks
    );

    let mut runner = Runner::new(WorldState::new(config), autopilot(args.variant));
    runner.add_observer(Box::new(LogObserver::default()));
    let summary = if args.realtime {
        runner.run_realtime(args.ticks)
    } else {
        runner.run_headless(args.ticks)
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize summary: {e}");
            ExitCode::FAILURE
        }
    }
}
