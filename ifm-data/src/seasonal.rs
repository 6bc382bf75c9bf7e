//! Daily seasonal groundwater signal ("alpha") from raw water levels.

use crate::{
    interpolation::{DataPoint, Pchip, MIN_INTERPOLATION_POINTS},
    monthly::{aggregate_monthly, normalize, NormalizedSignal},
};
use chrono::NaiveDate;
use ifm_core::{
    date_range::DateRange, error::ModelError, observation::WaterLevelReading,
    series::DailyAlphaSeries,
};
use ifm_utils::dates::month_end;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Power transform exponent; values below 1 stretch the low-water months.
pub const DEFAULT_BETA: f64 = 0.33;

/// Months kept for interpolation.
pub const DEFAULT_MONTH_WINDOW: usize = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalParams {
    pub beta: f64,
    pub month_window: usize,
    /// First day of the daily output. Defaults to the first retained month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Last day of the daily output. Defaults to the end of the last retained month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl Default for SeasonalParams {
    fn default() -> Self {
        Self {
            beta: DEFAULT_BETA,
            month_window: DEFAULT_MONTH_WINDOW,
            start: None,
            end: None,
        }
    }
}

impl SeasonalParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(ModelError::invalid("beta", self.beta));
        }
        if self.month_window == 0 {
            return Err(ModelError::invalid("month_window", self.month_window));
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ModelError::invalid(
                    "target range",
                    format!("start {start} is after end {end}"),
                ));
            }
        }
        Ok(())
    }
}

/// Output of the seasonal stage: the retained months and the daily signal.
#[derive(Debug, Clone)]
pub struct SeasonalSignal {
    pub months: Vec<NormalizedSignal>,
    pub alpha: DailyAlphaSeries,
}

impl SeasonalSignal {
    /// Anchor dates of the first and last retained months.
    pub fn anchor_span(&self) -> Option<DateRange> {
        match (self.months.first(), self.months.last()) {
            (Some(first), Some(last)) => Some(DateRange(first.anchor(), last.anchor())),
            _ => None,
        }
    }
}

pub struct SeasonalSignalBuilder {
    params: SeasonalParams,
}

impl SeasonalSignalBuilder {
    pub fn new(params: SeasonalParams) -> Result<Self, ModelError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SeasonalParams {
        &self.params
    }

    /// Aggregate, normalize, transform, window, anchor and interpolate.
    ///
    /// Normalization bounds come from every aggregated month; the window
    /// only limits which months become interpolation anchors.
    pub fn build(&self, readings: &[WaterLevelReading]) -> Result<SeasonalSignal, ModelError> {
        let monthly = aggregate_monthly(readings)?;
        let usable = monthly.len().min(self.params.month_window);
        if usable < MIN_INTERPOLATION_POINTS {
            return Err(ModelError::InsufficientData {
                what: "anchor months",
                required: MIN_INTERPOLATION_POINTS,
                found: usable,
            });
        }

        let mut months = normalize(&monthly, self.params.beta)?;
        if months.len() > self.params.month_window {
            info!(
                "keeping first {} of {} months for interpolation",
                self.params.month_window,
                months.len()
            );
            months.truncate(self.params.month_window);
        }

        let anchors: Vec<DataPoint> = months
            .iter()
            .map(|m| DataPoint {
                date: m.anchor(),
                value: m.transformed,
            })
            .collect();
        let pchip = Pchip::new(&anchors)?;
        let span = pchip.span();

        let target = self.target_range(&months)?;
        if !target.overlaps(&span) {
            return Err(ModelError::DateRangeMismatch {
                target_start: target.0,
                target_end: target.1,
                anchor_start: span.0,
                anchor_end: span.1,
            });
        }
        if target.0 < span.0 || target.1 > span.1 {
            warn!(
                "target range {}..={} extends past anchors {}..={}; those days are extrapolated",
                target.0, target.1, span.0, span.1
            );
        }

        let alpha = pchip.evaluate_range(target);
        info!(
            "seasonal signal: {} months (beta {}), {} daily values {}..={}",
            months.len(),
            self.params.beta,
            alpha.len(),
            alpha.start(),
            alpha.end()
        );
        Ok(SeasonalSignal { months, alpha })
    }

    fn target_range(&self, months: &[NormalizedSignal]) -> Result<DateRange, ModelError> {
        let start = match (self.params.start, months.first()) {
            (Some(start), _) => start,
            (None, Some(first)) => first.period_start,
            (None, None) => {
                return Err(ModelError::MissingConfiguration("target start date".into()))
            }
        };
        let end = match (self.params.end, months.last()) {
            (Some(end), _) => end,
            (None, Some(last)) => month_end(&last.period_start).ok_or_else(|| {
                ModelError::invalid(
                    "target end",
                    format!("no month end after {}", last.period_start),
                )
            })?,
            (None, None) => return Err(ModelError::MissingConfiguration("target end date".into())),
        };
        if start > end {
            return Err(ModelError::invalid(
                "target range",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(DateRange(start, end))
    }
}
