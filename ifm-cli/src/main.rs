//! IFM CLI - Command line tool for the sewershed influent flow model.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ifm-cli",
    version,
    about = "Sewershed influent flow model: seasonal groundwater signal and daily influent"
)]
struct Cli {
    #[command(subcommand)]
    command: ifm_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ifm_cmd::run(cli.command)
}
