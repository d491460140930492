use anyhow::Context;
use clap::Parser;
use weather_wrangler::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("weather-wrangler failed")
}
