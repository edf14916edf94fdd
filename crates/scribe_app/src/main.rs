mod app;
mod cli;
mod effects;
mod logging;
mod render;

use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::CliArgs::parse();
    let destination = args
        .log
        .parse()
        .map_err(anyhow::Error::msg)
        .context("--log expects file, terminal or both")?;
    logging::initialize(destination);

    let exit_code = app::run(args)?;
    std::process::exit(exit_code);
}
