//! Seasonal signal stage: water levels in, daily alpha out.

use crate::{config::Config, io};
use anyhow::Context;
use ifm_core::observation::WaterLevelReading;
use ifm_data::{SeasonalParams, SeasonalSignal, SeasonalSignalBuilder};

/// Run the seasonal signal stage in memory.
pub fn build_signal(
    readings: &[WaterLevelReading],
    params: &SeasonalParams,
) -> anyhow::Result<SeasonalSignal> {
    let builder = SeasonalSignalBuilder::new(params.clone()).context("seasonal signal stage")?;
    builder.build(readings).context("seasonal signal stage")
}

/// Derive alpha from `water_level_csv` and write it to `alpha_csv`.
///
/// Nothing is written unless the whole stage succeeds.
pub fn run_alpha(
    water_level_csv: &str,
    alpha_csv: &str,
    monthly_csv: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let readings = io::read_water_levels(water_level_csv)?;
    let signal = build_signal(&readings, &config.seasonal)?;

    let mut outputs = vec![io::stage_alpha(alpha_csv, &signal.alpha)?];
    if let Some(path) = monthly_csv {
        outputs.push(io::stage_monthly(path, &signal.months)?);
    }
    io::commit(outputs)
}
