mod app;
mod commands;
mod effects;
mod logging;
mod render;

use logging::LogDestination;

fn main() -> anyhow::Result<()> {
    logging::initialize(LogDestination::from_env());
    app::run()
}
