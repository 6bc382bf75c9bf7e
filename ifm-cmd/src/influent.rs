//! Influent stage: rainfall and alpha in, flow components and totals out.

use crate::{config::Config, io};
use anyhow::Context;
use ifm_core::{
    error::ModelError,
    observation::{alpha_series, rainfall_series},
    series::{DailyAlphaSeries, DailyRainfallSeries},
};
use ifm_flow::{FlowComponentCalculator, FlowComponents, InfluentAggregator, InfluentRecord};
use log::warn;

/// Run the flow component and aggregation stages in memory.
pub fn compute_influent(
    rainfall: &DailyRainfallSeries,
    alpha: &DailyAlphaSeries,
    config: &Config,
) -> anyhow::Result<(Vec<FlowComponents>, Vec<InfluentRecord>)> {
    let calculator =
        FlowComponentCalculator::new(config.flow.clone()).context("flow component stage")?;
    let components = calculator
        .compute(rainfall, alpha)
        .context("flow component stage")?;
    let aggregator =
        InfluentAggregator::new(config.output.m3_per_mgd).context("influent aggregation stage")?;
    let records = aggregator.aggregate(&components);
    Ok((components, records))
}

/// Read rainfall (and alpha), compute influent, write `influent_csv`.
///
/// Alpha comes from `alpha_csv` when given, otherwise from an `alpha`
/// column in the rainfall file.
pub fn run_influent(
    rainfall_csv: &str,
    alpha_csv: Option<&str>,
    influent_csv: &str,
    config: &Config,
) -> anyhow::Result<()> {
    let rainfall_rows = io::read_rainfall(rainfall_csv)?;
    let (rainfall, inline_alpha) =
        rainfall_series(&rainfall_rows).with_context(|| format!("rainfall series {rainfall_csv}"))?;

    let alpha = match (alpha_csv, inline_alpha) {
        (Some(path), inline) => {
            if inline.is_some() {
                warn!("{rainfall_csv} has an alpha column; using {path} instead");
            }
            alpha_series(&io::read_alpha(path)?).with_context(|| format!("alpha series {path}"))?
        }
        (None, Some(inline)) => inline,
        (None, None) => {
            return Err(ModelError::MissingConfiguration(
                "alpha series: pass --alpha-csv or add an alpha column to the rainfall CSV".into(),
            )
            .into())
        }
    };

    let (components, records) = compute_influent(&rainfall, &alpha, config)?;
    io::commit(vec![io::stage_influent(influent_csv, &components, &records)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RAINFALL_WITH_ALPHA: &str = "Date,Rainfall (mm/day),alpha
2024-01-01,10.0,0.4
2024-01-02,0.0,0.4
2024-01-03,0.0,0.4
";

    #[test]
    fn inline_alpha_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let rain = dir.path().join("rain.csv");
        let out = dir.path().join("influent.csv");
        fs::write(&rain, RAINFALL_WITH_ALPHA).unwrap();

        run_influent(
            rain.to_str().unwrap(),
            None,
            out.to_str().unwrap(),
            &Config::default(),
        )
        .unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[1].starts_with("2024-01-01,Mon,10.0,0.4,"));
        assert!(rows[3].starts_with("2024-01-03,Wed,0.0,0.4,"));
    }

    #[test]
    fn separate_alpha_must_align() {
        let dir = tempfile::tempdir().unwrap();
        let rain = dir.path().join("rain.csv");
        let alpha = dir.path().join("alpha.csv");
        let out = dir.path().join("influent.csv");
        fs::write(&rain, "date,rainfall_mm\n2024-01-01,1.0\n2024-01-02,0.0\n").unwrap();
        fs::write(&alpha, "date,alpha\n2024-01-02,0.3\n2024-01-03,0.3\n").unwrap();

        let err = run_influent(
            rain.to_str().unwrap(),
            alpha.to_str(),
            out.to_str().unwrap(),
            &Config::default(),
        )
        .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("flow component stage"));
        assert!(message.contains("range mismatch"));
        assert!(!out.exists());
    }

    #[test]
    fn missing_alpha_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let rain = dir.path().join("rain.csv");
        let out = dir.path().join("influent.csv");
        fs::write(&rain, "date,rainfall_mm\n2024-01-01,1.0\n").unwrap();

        let err = run_influent(
            rain.to_str().unwrap(),
            None,
            out.to_str().unwrap(),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing configuration"));
    }

    #[test]
    fn totals_add_up() {
        let rainfall = DailyRainfallSeries::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            vec![0.0, 25.0, 3.0, 0.0],
        );
        let alpha = DailyAlphaSeries::new(rainfall.start(), vec![0.2, 0.25, 0.3, 0.35]);
        let (components, records) =
            compute_influent(&rainfall, &alpha, &Config::default()).unwrap();
        for (c, r) in components.iter().zip(&records) {
            let total = c.q_domestic + c.q_industrial + c.q_rdi + c.q_gwi + c.q_rii.unwrap();
            assert_eq!(r.total_m3_per_day, Some(total));
            assert_eq!(r.total_mgd, Some(total / 3785.41));
        }
    }
}
