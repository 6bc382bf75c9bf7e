//! Per-day flow components.

use crate::{convolution::delayed_rainfall, weekday::WeekdayFractions};
use chrono::{Datelike, NaiveDate, Weekday};
use ifm_core::{
    error::ModelError,
    series::{DailyAlphaSeries, DailyRainfallSeries},
};
use ifm_utils::dates::format_date;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// What to do on days where alpha sits on the ground level threshold and
/// the RII denominator vanishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingularityPolicy {
    /// Abort the run, reporting every affected date.
    #[default]
    Fail,
    /// Leave RII (and the day's total) undefined and log the dates.
    Flag,
}

/// Sewershed constants. Flows are in m³/day, rainfall in mm/day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParameters {
    /// Population served.
    pub population: f64,
    /// Wastewater generated per person (m³/person/day).
    pub per_capita_rate: f64,
    /// Mean industrial discharge (m³/day).
    pub industrial_daily_flow: f64,
    /// Direct inflow per mm of same-day rainfall (m³/mm).
    pub k_rdi: f64,
    pub k_gwi: f64,
    /// Alpha below which the water table sits under the sewer invert.
    pub alpha_invert: f64,
    /// Decay rate of the rainfall memory (1/day).
    pub kd: f64,
    pub k_rii: f64,
    /// Alpha at which the water table reaches ground level.
    pub alpha_gl: f64,
    /// `|alpha_gl - alpha|` at or below this counts as singular.
    pub singularity_tolerance: f64,
    pub singularity_policy: SingularityPolicy,
    pub domestic_fractions: WeekdayFractions,
    pub industrial_fractions: WeekdayFractions,
}

impl Default for FlowParameters {
    fn default() -> Self {
        Self {
            population: 507_648.0,
            per_capita_rate: 0.31,
            industrial_daily_flow: 2400.0,
            k_rdi: 1100.0,
            k_gwi: 18.0 * 3800.0,
            alpha_invert: 0.1,
            kd: 0.15,
            k_rii: 800.0,
            alpha_gl: 1.2,
            singularity_tolerance: 1e-9,
            singularity_policy: SingularityPolicy::Fail,
            domestic_fractions: WeekdayFractions::domestic_default(),
            industrial_fractions: WeekdayFractions::industrial_default(),
        }
    }
}

impl FlowParameters {
    pub fn validate(&self) -> Result<(), ModelError> {
        let non_negative = [
            ("population", self.population),
            ("per_capita_rate", self.per_capita_rate),
            ("industrial_daily_flow", self.industrial_daily_flow),
            ("singularity_tolerance", self.singularity_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::invalid(name, value));
            }
        }
        let finite = [
            ("k_rdi", self.k_rdi),
            ("k_gwi", self.k_gwi),
            ("alpha_invert", self.alpha_invert),
            ("k_rii", self.k_rii),
            ("alpha_gl", self.alpha_gl),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ModelError::invalid(name, value));
            }
        }
        if !(self.kd.is_finite() && self.kd > 0.0) {
            return Err(ModelError::invalid("kd", self.kd));
        }
        Ok(())
    }
}

/// The five flow terms of one day plus the inputs that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowComponents {
    pub date: NaiveDate,
    pub rainfall_mm: f64,
    pub alpha: f64,
    pub q_domestic: f64,
    pub q_industrial: f64,
    pub q_rdi: f64,
    pub q_gwi: f64,
    pub delayed_rain: f64,
    /// `None` on singular days under [`SingularityPolicy::Flag`].
    pub q_rii: Option<f64>,
}

impl FlowComponents {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// BWF: domestic plus industrial.
    pub fn base_wastewater_flow(&self) -> f64 {
        self.q_domestic + self.q_industrial
    }

    /// Sum of all five terms (m³/day), undefined when RII is.
    pub fn total(&self) -> Option<f64> {
        self.q_rii
            .map(|q_rii| self.q_domestic + self.q_industrial + self.q_rdi + self.q_gwi + q_rii)
    }
}

pub struct FlowComponentCalculator {
    params: FlowParameters,
}

impl FlowComponentCalculator {
    pub fn new(params: FlowParameters) -> Result<Self, ModelError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &FlowParameters {
        &self.params
    }

    /// Compute every flow term for each day of the shared calendar range.
    pub fn compute(
        &self,
        rainfall: &DailyRainfallSeries,
        alpha: &DailyAlphaSeries,
    ) -> Result<Vec<FlowComponents>, ModelError> {
        rainfall.ensure_aligned(alpha, "rainfall vs alpha")?;
        if let Some((date, rain)) = rainfall.iter().find(|(_, r)| !r.is_finite() || *r < 0.0) {
            return Err(ModelError::invalid(
                "rainfall_mm",
                format!("{rain} on {}", format_date(&date)),
            ));
        }
        if let Some((date, a)) = alpha.iter().find(|(_, a)| !a.is_finite()) {
            return Err(ModelError::invalid(
                "alpha",
                format!("{a} on {}", format_date(&date)),
            ));
        }

        let p = &self.params;
        let domestic_mean = p.population * p.per_capita_rate;
        let delayed = delayed_rainfall(rainfall.values(), p.kd);

        let mut singular = Vec::new();
        let components: Vec<FlowComponents> = rainfall
            .iter()
            .zip(alpha.values())
            .zip(delayed)
            .map(|(((date, rain), &a), delayed_rain)| {
                let weekday = date.weekday();
                let headroom = p.alpha_gl - a;
                let q_rii = if headroom.abs() <= p.singularity_tolerance {
                    singular.push(date);
                    None
                } else {
                    Some(p.k_rii * delayed_rain / headroom)
                };
                FlowComponents {
                    date,
                    rainfall_mm: rain,
                    alpha: a,
                    q_domestic: domestic_mean * p.domestic_fractions.fraction(weekday),
                    q_industrial: p.industrial_daily_flow
                        * p.industrial_fractions.fraction(weekday),
                    q_rdi: p.k_rdi * rain,
                    q_gwi: p.k_gwi * (a - p.alpha_invert),
                    delayed_rain,
                    q_rii,
                }
            })
            .collect();

        if !singular.is_empty() {
            match p.singularity_policy {
                SingularityPolicy::Fail => {
                    return Err(ModelError::DivisionSingularity { dates: singular })
                }
                SingularityPolicy::Flag => {
                    let listed: Vec<String> = singular.iter().map(format_date).collect();
                    warn!(
                        "RII undefined on {} day(s) where alpha reaches {}: {}",
                        singular.len(),
                        p.alpha_gl,
                        listed.join(", ")
                    );
                }
            }
        }
        debug!(
            "computed flow components for {} days ({} singular)",
            components.len(),
            singular.len()
        );
        Ok(components)
    }
}
