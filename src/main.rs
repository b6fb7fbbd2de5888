use anyhow::Result;
use clap::Parser;
use log::info;

use outchan::cli::Cli;
use outchan::{Config, OutputChannel};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.debug |= cli.debug;

    let output = OutputChannel::new(&config)?;
    info!("Starting outchan (debug: {})", output.is_debug_enabled());

    if let Err(err) = cli.execute(&output).await {
        output.pretty_error(&err);
        std::process::exit(1);
    }

    Ok(())
}
