//! Both stages in one pass.
//!
//! Unless the configuration pins a target range, alpha is interpolated over
//! exactly the rainfall period so the two series line up by construction.

use crate::{alpha::build_signal, config::Config, influent::compute_influent, io};
use anyhow::Context;
use ifm_core::observation::rainfall_series;
use log::{info, warn};

pub struct PipelinePaths<'a> {
    pub water_level_csv: &'a str,
    pub rainfall_csv: &'a str,
    pub influent_csv: &'a str,
    pub alpha_csv: Option<&'a str>,
    pub monthly_csv: Option<&'a str>,
}

/// Compute everything first, then write the requested outputs as one batch.
pub fn run_pipeline(paths: &PipelinePaths<'_>, config: &Config) -> anyhow::Result<()> {
    let levels = io::read_water_levels(paths.water_level_csv)?;
    let rainfall_rows = io::read_rainfall(paths.rainfall_csv)?;
    let (rainfall, inline_alpha) = rainfall_series(&rainfall_rows)
        .with_context(|| format!("rainfall series {}", paths.rainfall_csv))?;
    if inline_alpha.is_some() {
        warn!(
            "{} has an alpha column; it is replaced by the alpha derived from {}",
            paths.rainfall_csv, paths.water_level_csv
        );
    }

    let mut seasonal = config.seasonal.clone();
    seasonal.start.get_or_insert(rainfall.start());
    seasonal.end.get_or_insert(rainfall.end());
    info!(
        "pipeline target range {:?}..={:?}",
        seasonal.start, seasonal.end
    );

    let signal = build_signal(&levels, &seasonal)?;
    let (components, records) = compute_influent(&rainfall, &signal.alpha, config)?;

    let mut outputs = Vec::with_capacity(3);
    if let Some(path) = paths.alpha_csv {
        outputs.push(io::stage_alpha(path, &signal.alpha)?);
    }
    if let Some(path) = paths.monthly_csv {
        outputs.push(io::stage_monthly(path, &signal.months)?);
    }
    outputs.push(io::stage_influent(
        paths.influent_csv,
        &components,
        &records,
    )?);
    io::commit(outputs)
}
