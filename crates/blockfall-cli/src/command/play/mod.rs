use blockfall_runtime::Runtime;

use crate::engine_arg::EngineArg;

use self::app::PlayApp;

mod app;
mod keymap;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    engine: EngineArg,
    /// Maximum screen refresh rate
    #[clap(long, default_value_t = 60.0)]
    fps: f64,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            engine: EngineArg::default(),
            fps: 60.0,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { engine, fps } = arg;

    let engine = engine.build_engine()?;
    let seed = engine.seed();
    let mut app = PlayApp::new(engine, *fps);

    Runtime::new().run(&mut app)?;

    let stats = app.engine().stats();
    eprintln!(
        "Seed {seed}: score {}, level {}, {} lines, {} pieces",
        stats.score(),
        stats.level(),
        stats.cleared_lines(),
        stats.completed_pieces()
    );
    Ok(())
}
