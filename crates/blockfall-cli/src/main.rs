mod command;
mod engine_arg;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
