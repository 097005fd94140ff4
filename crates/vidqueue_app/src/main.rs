mod cli;
mod config;
mod terminal;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let config = config::ClientConfig::load(&cli)?;
    engine_logging::initialize(config.log_destination(), config.log_level());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(terminal::app::run_app(config, cli.dir))
}
