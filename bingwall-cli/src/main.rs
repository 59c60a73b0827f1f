use anyhow::Result;
use bingwall_cli::{BingWallApp, Cli};
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over the verbosity flag.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let app = BingWallApp::new(&cli)?;
    log::debug!("Using {:?}", app.config());
    app.run(cli.command.as_ref())
}
