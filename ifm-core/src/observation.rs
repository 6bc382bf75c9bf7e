//! Tabular records exchanged with the outside world.
//!
//! Column names follow the workspace convention (`date`, `water_level`,
//! `rainfall_mm`, `alpha`) and also accept the headers used by the
//! spreadsheets the model was first calibrated with.

use crate::{error::ModelError, series::DailySeries};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Read;

/// One raw groundwater level reading. Blank cells are kept as `None` and
/// ignored when months are averaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterLevelReading {
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    #[serde(alias = "WL")]
    pub water_level: Option<f64>,
}

/// Daily rainfall, optionally carrying an alpha value computed earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallReading {
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    #[serde(alias = "Rainfall (mm/day)")]
    pub rainfall_mm: f64,
    #[serde(default)]
    pub alpha: Option<f64>,
}

/// Daily alpha as written by the seasonal signal stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaReading {
    #[serde(alias = "Date")]
    pub date: NaiveDate,
    #[serde(alias = "Power_Transformed_Normalized_WL")]
    pub alpha: f64,
}

/// Deserialize every row of a headed CSV stream.
pub fn read_records<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect()
}

/// Split rainfall rows into a rainfall series and, when every row carries
/// one, an alpha series over the same days.
pub fn rainfall_series(
    readings: &[RainfallReading],
) -> Result<(DailySeries, Option<DailySeries>), ModelError> {
    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.date);
    let rainfall = DailySeries::from_points(sorted.iter().map(|r| (r.date, r.rainfall_mm)))?;

    let with_alpha = sorted.iter().filter(|r| r.alpha.is_some()).count();
    let alpha = if with_alpha == 0 {
        None
    } else if with_alpha == sorted.len() {
        Some(DailySeries::from_points(
            sorted.iter().filter_map(|r| r.alpha.map(|a| (r.date, a))),
        )?)
    } else {
        return Err(ModelError::RangeMismatch {
            detail: format!(
                "alpha column present on {with_alpha} of {} rainfall rows",
                sorted.len()
            ),
        });
    };
    log::debug!(
        "rainfall rows {}..={} ({} days, alpha column: {})",
        rainfall.start(),
        rainfall.end(),
        rainfall.len(),
        alpha.is_some()
    );
    Ok((rainfall, alpha))
}

pub fn alpha_series(readings: &[AlphaReading]) -> Result<DailySeries, ModelError> {
    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.date);
    DailySeries::from_points(sorted.into_iter().map(|r| (r.date, r.alpha)))
}
