//! Command implementations for the influent flow model CLI.
//!
//! Provides subcommands for deriving the seasonal groundwater signal,
//! computing daily influent from rainfall and that signal, or doing both
//! in one pass.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use ifm_utils::dates::parse_date;

pub mod alpha;
pub mod config;
pub mod influent;
pub mod io;
pub mod pipeline;

use config::Config;

/// Options shared by every modelling subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// TOML file with model constants (defaults apply when omitted)
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// First day of the daily alpha output (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the daily alpha output (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,
}

impl ModelArgs {
    /// Load the configuration file and apply command line overrides.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(start) = self.start {
            config.seasonal.start = Some(start);
        }
        if let Some(end) = self.end {
            config.seasonal.end = Some(end);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Derive the daily seasonal groundwater signal (alpha) from water levels
    Alpha {
        /// Input CSV of daily water levels: date,water_level
        #[arg(short = 'w', long)]
        water_level_csv: String,

        /// Output CSV of daily alpha: date,alpha
        #[arg(short = 'a', long)]
        alpha_csv: String,

        /// Optional output CSV of the retained monthly means and transforms
        #[arg(short = 'm', long)]
        monthly_csv: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Compute daily influent from rainfall and a previously derived alpha
    Influent {
        /// Input CSV of daily rainfall: date,rainfall_mm[,alpha]
        #[arg(short = 'r', long)]
        rainfall_csv: String,

        /// Input CSV of daily alpha (needed unless the rainfall CSV has an alpha column)
        #[arg(short = 'a', long)]
        alpha_csv: Option<String>,

        /// Output CSV of flow components and total influent
        #[arg(short = 'o', long)]
        influent_csv: String,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Derive alpha over the rainfall period and compute influent in one pass
    Run {
        /// Input CSV of daily water levels: date,water_level
        #[arg(short = 'w', long)]
        water_level_csv: String,

        /// Input CSV of daily rainfall: date,rainfall_mm
        #[arg(short = 'r', long)]
        rainfall_csv: String,

        /// Output CSV of flow components and total influent
        #[arg(short = 'o', long)]
        influent_csv: String,

        /// Optional output CSV of the daily alpha used
        #[arg(short = 'a', long)]
        alpha_csv: Option<String>,

        /// Optional output CSV of the retained monthly means and transforms
        #[arg(short = 'm', long)]
        monthly_csv: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Print the default configuration as TOML
    Defaults,
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Alpha {
            water_level_csv,
            alpha_csv,
            monthly_csv,
            model,
        } => {
            let config = model.load_config()?;
            alpha::run_alpha(&water_level_csv, &alpha_csv, monthly_csv.as_deref(), &config)
        }
        Command::Influent {
            rainfall_csv,
            alpha_csv,
            influent_csv,
            model,
        } => {
            let config = model.load_config()?;
            influent::run_influent(&rainfall_csv, alpha_csv.as_deref(), &influent_csv, &config)
        }
        Command::Run {
            water_level_csv,
            rainfall_csv,
            influent_csv,
            alpha_csv,
            monthly_csv,
            model,
        } => {
            let config = model.load_config()?;
            pipeline::run_pipeline(
                &pipeline::PipelinePaths {
                    water_level_csv: &water_level_csv,
                    rainfall_csv: &rainfall_csv,
                    influent_csv: &influent_csv,
                    alpha_csv: alpha_csv.as_deref(),
                    monthly_csv: monthly_csv.as_deref(),
                },
                &config,
            )
        }
        Command::Defaults => {
            print!("{}", Config::default().to_toml_string()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn alpha_accepts_monthly_report_flag() {
        let cli = TestCli::try_parse_from([
            "ifm-cli",
            "alpha",
            "--water-level-csv",
            "wl.csv",
            "--alpha-csv",
            "alpha.csv",
            "--monthly-csv",
            "monthly.csv",
            "--start",
            "2023-01-01",
        ])
        .unwrap();
        match cli.command {
            Command::Alpha {
                monthly_csv, model, ..
            } => {
                assert_eq!(monthly_csv.as_deref(), Some("monthly.csv"));
                assert_eq!(model.start, NaiveDate::from_ymd_opt(2023, 1, 1));
            }
            _ => panic!("expected the alpha subcommand"),
        }
    }
}
