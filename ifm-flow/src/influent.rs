//! Total daily influent from the flow components.

use crate::components::FlowComponents;
use chrono::NaiveDate;
use ifm_core::error::ModelError;
use log::info;

/// Cubic metres in one million US gallons.
pub const M3_PER_MILLION_GALLONS: f64 = 3785.41;

#[derive(Debug, Clone, PartialEq)]
pub struct InfluentRecord {
    pub date: NaiveDate,
    pub total_m3_per_day: Option<f64>,
    pub total_mgd: Option<f64>,
}

/// Mean and extremes of total influent in MGD over the defined days.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluentSummary {
    pub days: usize,
    pub undefined_days: usize,
    pub mean_mgd: f64,
    pub min_mgd: f64,
    pub max_mgd: f64,
}

pub struct InfluentAggregator {
    m3_per_mgd: f64,
}

impl Default for InfluentAggregator {
    fn default() -> Self {
        Self {
            m3_per_mgd: M3_PER_MILLION_GALLONS,
        }
    }
}

impl InfluentAggregator {
    pub fn new(m3_per_mgd: f64) -> Result<Self, ModelError> {
        if !(m3_per_mgd.is_finite() && m3_per_mgd > 0.0) {
            return Err(ModelError::invalid("m3_per_mgd", m3_per_mgd));
        }
        Ok(Self { m3_per_mgd })
    }

    /// One record per input day, in the same order.
    pub fn aggregate(&self, components: &[FlowComponents]) -> Vec<InfluentRecord> {
        let records: Vec<InfluentRecord> = components
            .iter()
            .map(|c| {
                let total = c.total();
                InfluentRecord {
                    date: c.date,
                    total_m3_per_day: total,
                    total_mgd: total.map(|t| t / self.m3_per_mgd),
                }
            })
            .collect();
        if let Some(summary) = summarize(&records) {
            info!(
                "influent over {} days: mean {:.2} MGD, min {:.2}, max {:.2} ({} undefined)",
                summary.days,
                summary.mean_mgd,
                summary.min_mgd,
                summary.max_mgd,
                summary.undefined_days
            );
        }
        records
    }
}

/// `None` when no day has a defined total.
pub fn summarize(records: &[InfluentRecord]) -> Option<InfluentSummary> {
    let defined: Vec<f64> = records.iter().filter_map(|r| r.total_mgd).collect();
    if defined.is_empty() {
        return None;
    }
    Some(InfluentSummary {
        days: records.len(),
        undefined_days: records.len() - defined.len(),
        mean_mgd: defined.iter().sum::<f64>() / defined.len() as f64,
        min_mgd: defined.iter().cloned().fold(f64::INFINITY, f64::min),
        max_mgd: defined.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn day(d: u32, q_rii: Option<f64>) -> FlowComponents {
        FlowComponents {
            date: NaiveDate::from_ymd_opt(2024, 5, d).unwrap(),
            rainfall_mm: 0.0,
            alpha: 0.5,
            q_domestic: 150_000.0,
            q_industrial: 2_400.0,
            q_rdi: 1_100.0,
            q_gwi: 27_360.0,
            delayed_rain: 0.0,
            q_rii,
        }
    }

    #[test]
    fn totals_and_unit_conversion() {
        let records = InfluentAggregator::default().aggregate(&[day(1, Some(500.0))]);
        assert_eq!(records.len(), 1);
        let total = records[0].total_m3_per_day.unwrap();
        assert_eq!(total, 150_000.0 + 2_400.0 + 1_100.0 + 27_360.0 + 500.0);
        assert_abs_diff_eq!(records[0].total_mgd.unwrap(), total / 3785.41, epsilon = 1e-12);
    }

    #[test]
    fn undefined_days_propagate() {
        let records = InfluentAggregator::default().aggregate(&[day(1, Some(0.0)), day(2, None)]);
        assert!(records[0].total_mgd.is_some());
        assert_eq!(records[1].total_m3_per_day, None);
        assert_eq!(records[1].total_mgd, None);
        let summary = summarize(&records).unwrap();
        assert_eq!(summary.days, 2);
        assert_eq!(summary.undefined_days, 1);
    }

    #[test]
    fn summary_statistics() {
        let aggregator = InfluentAggregator::new(1.0).unwrap();
        let records = aggregator.aggregate(&[day(1, Some(0.0)), day(2, Some(200.0))]);
        let summary = summarize(&records).unwrap();
        let base = 150_000.0 + 2_400.0 + 1_100.0 + 27_360.0;
        assert_eq!(summary.min_mgd, base);
        assert_eq!(summary.max_mgd, base + 200.0);
        assert_abs_diff_eq!(summary.mean_mgd, base + 100.0, epsilon = 1e-9);
    }

    #[test]
    fn summary_of_nothing() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn rejects_bad_conversion() {
        assert!(InfluentAggregator::new(0.0).is_err());
        assert!(InfluentAggregator::new(f64::NAN).is_err());
    }
}
