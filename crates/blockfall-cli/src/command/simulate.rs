use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Command, Engine, EngineSnapshot, TickOutcome};

use crate::{engine_arg::EngineArg, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    engine: EngineArg,
    /// Steps to play: `L`/`R` move, `U` rotate, `D`/`d` soft drop on/off,
    /// `.` tick, `N` restart. Whitespace is ignored.
    trace: String,
    /// Output file path (defaults to stdout)
    #[clap(long)]
    output: Option<PathBuf>,
    /// Print the final board to stderr
    #[clap(long)]
    show_board: bool,
}

/// One step of a command trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Tick,
    Restart,
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unexpected {ch:?} at position {position} in trace")]
pub(crate) struct TraceError {
    ch: char,
    position: usize,
}

pub(crate) fn parse_trace(trace: &str) -> Result<Vec<Step>, TraceError> {
    trace
        .chars()
        .enumerate()
        .filter(|(_, ch)| !ch.is_whitespace())
        .map(|(position, ch)| {
            let step = match ch {
                '.' => Step::Tick,
                'N' => Step::Restart,
                'L' => Step::Command(Command::MoveLeft),
                'R' => Step::Command(Command::MoveRight),
                'U' => Step::Command(Command::RotateCw),
                'D' => Step::Command(Command::SoftDropOn),
                'd' => Step::Command(Command::SoftDropOff),
                ch => return Err(TraceError { ch, position }),
            };
            Ok(step)
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TraceSummary {
    pub ticks: usize,
    pub locks: usize,
    pub games_over: usize,
}

/// Starts the engine and applies every step in order.
pub(crate) fn play_trace(engine: &mut Engine, steps: &[Step]) -> TraceSummary {
    let mut summary = TraceSummary::default();
    engine.start();
    for step in steps {
        match step {
            Step::Tick => {
                summary.ticks += 1;
                match engine.tick() {
                    TickOutcome::Locked { .. } => summary.locks += 1,
                    TickOutcome::GameOver { .. } => {
                        summary.locks += 1;
                        summary.games_over += 1;
                    }
                    TickOutcome::Moved | TickOutcome::Idle => {}
                }
            }
            Step::Restart => engine.restart(),
            Step::Command(command) => _ = engine.command(*command),
        }
    }
    summary
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        engine,
        trace,
        output,
        show_board,
    } = arg;

    let steps = parse_trace(trace).context("Failed to parse command trace")?;
    let mut engine = engine.build_engine()?;

    eprintln!("Simulating {} steps with seed {}...", steps.len(), engine.seed());
    let summary = play_trace(&mut engine, &steps);
    eprintln!(
        "Done: {} ticks, {} pieces locked, {} game(s) over",
        summary.ticks, summary.locks, summary.games_over
    );
    if *show_board {
        eprintln!("{}", engine.render_grid());
    }

    let snapshot: EngineSnapshot = engine.snapshot();
    Output::save_json(&snapshot, output.clone())?;
    Ok(())
}
