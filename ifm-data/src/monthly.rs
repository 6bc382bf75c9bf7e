//! Monthly aggregation and normalization of groundwater level readings.

use chrono::NaiveDate;
use ifm_core::{error::ModelError, observation::WaterLevelReading};
use ifm_utils::dates::{month_anchor, month_start, next_month_start};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean water level of one calendar month, keyed by its first day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyObservation {
    pub period_start: NaiveDate,
    pub mean_water_level: f64,
    /// Number of readings averaged.
    pub samples: usize,
}

/// A month after min-max normalization and the power transform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSignal {
    pub period_start: NaiveDate,
    pub mean_water_level: f64,
    /// In [0, 1]: 0 for the lowest month of the series, 1 for the highest.
    pub normalized: f64,
    /// `normalized.powf(beta)`.
    pub transformed: f64,
}

impl NormalizedSignal {
    /// Representative date of the month (the 15th).
    pub fn anchor(&self) -> NaiveDate {
        month_anchor(&self.period_start)
    }
}

/// Average readings per calendar month.
///
/// Every month between the first and last reading must hold at least one
/// non-blank value; an empty month fails with [`ModelError::MonthGap`]
/// rather than yielding an undefined mean.
pub fn aggregate_monthly(
    readings: &[WaterLevelReading],
) -> Result<Vec<MonthlyObservation>, ModelError> {
    let (first, last) = match (
        readings.iter().map(|r| r.date).min(),
        readings.iter().map(|r| r.date).max(),
    ) {
        (Some(first), Some(last)) => (month_start(&first), month_start(&last)),
        _ => {
            return Err(ModelError::InsufficientData {
                what: "water level readings",
                required: 1,
                found: 0,
            })
        }
    };

    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for reading in readings {
        let value = match reading.water_level {
            Some(v) => v,
            None => continue,
        };
        if !value.is_finite() {
            return Err(ModelError::invalid(
                "water_level",
                format!("{value} on {}", reading.date),
            ));
        }
        let entry = sums.entry(month_start(&reading.date)).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let mut months = Vec::with_capacity(sums.len());
    let mut month = first;
    while month <= last {
        match sums.get(&month) {
            Some(&(sum, count)) => months.push(MonthlyObservation {
                period_start: month,
                mean_water_level: sum / count as f64,
                samples: count,
            }),
            None => return Err(ModelError::MonthGap { month }),
        }
        month = next_month_start(&month)
            .ok_or_else(|| ModelError::invalid("month", format!("no month follows {month}")))?;
    }
    debug!(
        "aggregated {} readings into {} months ({}..={})",
        readings.len(),
        months.len(),
        first,
        last
    );
    Ok(months)
}

/// Min-max normalize over the whole series, then raise to `beta`.
///
/// A constant series has no range to normalize over and fails with
/// [`ModelError::DegenerateRange`].
pub fn normalize(
    months: &[MonthlyObservation],
    beta: f64,
) -> Result<Vec<NormalizedSignal>, ModelError> {
    if months.is_empty() {
        return Err(ModelError::InsufficientData {
            what: "monthly means",
            required: 1,
            found: 0,
        });
    }
    let min_val = months
        .iter()
        .map(|m| m.mean_water_level)
        .fold(f64::INFINITY, f64::min);
    let max_val = months
        .iter()
        .map(|m| m.mean_water_level)
        .fold(f64::NEG_INFINITY, f64::max);
    if max_val <= min_val {
        return Err(ModelError::DegenerateRange { value: min_val });
    }

    let range = max_val - min_val;
    Ok(months
        .iter()
        .map(|m| {
            let normalized = (m.mean_water_level - min_val) / range;
            NormalizedSignal {
                period_start: m.period_start,
                mean_water_level: m.mean_water_level,
                normalized,
                transformed: normalized.powf(beta),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reading(date: NaiveDate, value: f64) -> WaterLevelReading {
        WaterLevelReading {
            date,
            water_level: Some(value),
        }
    }

    fn months_from(values: &[f64]) -> Vec<MonthlyObservation> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| MonthlyObservation {
                period_start: ymd(2023, i as u32 + 1, 1),
                mean_water_level: v,
                samples: 1,
            })
            .collect()
    }

    #[test]
    fn averages_each_month_and_skips_blanks() {
        let readings = vec![
            reading(ymd(2023, 1, 3), 2.0),
            reading(ymd(2023, 1, 20), 4.0),
            WaterLevelReading {
                date: ymd(2023, 1, 21),
                water_level: None,
            },
            reading(ymd(2023, 2, 1), 5.0),
        ];
        let months = aggregate_monthly(&readings).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].period_start, ymd(2023, 1, 1));
        assert_eq!(months[0].mean_water_level, 3.0);
        assert_eq!(months[0].samples, 2);
        assert_eq!(months[1].mean_water_level, 5.0);
    }

    #[test]
    fn unordered_readings_are_grouped() {
        let readings = vec![
            reading(ymd(2023, 2, 10), 6.0),
            reading(ymd(2023, 1, 10), 1.0),
            reading(ymd(2023, 2, 11), 8.0),
        ];
        let months = aggregate_monthly(&readings).unwrap();
        assert_eq!(months[0].mean_water_level, 1.0);
        assert_eq!(months[1].mean_water_level, 7.0);
    }

    #[test]
    fn empty_month_is_a_gap() {
        let readings = vec![reading(ymd(2023, 1, 5), 1.0), reading(ymd(2023, 3, 5), 2.0)];
        let err = aggregate_monthly(&readings).unwrap_err();
        assert_eq!(err, ModelError::MonthGap { month: ymd(2023, 2, 1) });
    }

    #[test]
    fn month_of_only_blanks_is_a_gap() {
        let readings = vec![
            WaterLevelReading {
                date: ymd(2023, 1, 5),
                water_level: None,
            },
            reading(ymd(2023, 2, 5), 2.0),
        ];
        let err = aggregate_monthly(&readings).unwrap_err();
        assert_eq!(err, ModelError::MonthGap { month: ymd(2023, 1, 1) });
    }

    #[test]
    fn rejects_non_finite_reading() {
        let readings = vec![reading(ymd(2023, 1, 5), f64::NAN)];
        assert!(matches!(
            aggregate_monthly(&readings),
            Err(ModelError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn normalization_hits_both_bounds() {
        let signal = normalize(&months_from(&[4.2, 3.1, 5.9, 4.0, 3.6]), 0.33).unwrap();
        let normalized: Vec<f64> = signal.iter().map(|s| s.normalized).collect();
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 1.0);
        assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(signal[1].transformed, 0.0);
        assert_eq!(signal[2].transformed, 1.0);
    }

    #[test]
    fn power_transform_is_strictly_increasing() {
        let signal = normalize(&months_from(&[1.0, 1.1, 1.5, 2.2, 2.3, 3.0]), 0.33).unwrap();
        for w in signal.windows(2) {
            assert!(w[0].normalized < w[1].normalized);
            assert!(w[0].transformed < w[1].transformed);
        }
        // low values are lifted more than high ones
        assert!(signal[1].transformed > signal[1].normalized);
    }

    #[test]
    fn rise_and_fall_scenario() {
        let signal = normalize(&months_from(&[1.0, 2.0, 3.0, 2.0, 1.0]), 0.5).unwrap();
        let expected_norm = [0.0, 0.5, 1.0, 0.5, 0.0];
        let expected_trans = [0.0, 0.707, 1.0, 0.707, 0.0];
        for (s, (n, t)) in signal.iter().zip(expected_norm.iter().zip(expected_trans)) {
            assert_abs_diff_eq!(s.normalized, *n, epsilon = 1e-12);
            assert_abs_diff_eq!(s.transformed, t, epsilon = 1e-3);
        }
        assert_eq!(signal[0].anchor(), ymd(2023, 1, 15));
    }

    #[test]
    fn constant_series_is_degenerate() {
        let err = normalize(&months_from(&[2.5, 2.5, 2.5]), 0.33).unwrap_err();
        assert_eq!(err, ModelError::DegenerateRange { value: 2.5 });
    }
}
