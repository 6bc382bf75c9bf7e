use chrono::Weekday;
use ifm_core::error::ModelError;
use ifm_utils::dates::weekday_abbrev;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Day-of-week multipliers applied to a mean daily flow.
///
/// Always complete: construction fails unless all seven days are present.
/// In TOML it is written as a table keyed by day name, e.g.
/// `{ Mon = 1.0, Tue = 1.0, ..., Sun = 0.95 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeekdayFractions([f64; 7]);

impl WeekdayFractions {
    /// Monday-first fractions.
    pub fn new(fractions: [f64; 7]) -> Result<Self, ModelError> {
        for (day, value) in WEEK.iter().zip(fractions) {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::invalid(
                    "weekday fraction",
                    format!("{} = {value}", weekday_abbrev(*day)),
                ));
            }
        }
        Ok(Self(fractions))
    }

    /// Residential pattern: weekdays at the mean, weekends slightly lower.
    pub fn domestic_default() -> Self {
        Self([1.0, 1.0, 1.0, 1.0, 1.0, 0.95, 0.95])
    }

    /// Industrial pattern: Friday peak, plants mostly idle on weekends.
    pub fn industrial_default() -> Self {
        Self([1.0, 1.0, 1.0, 1.0, 1.2, 0.25, 0.25])
    }

    pub fn fraction(&self, weekday: Weekday) -> f64 {
        self.0[weekday.num_days_from_monday() as usize]
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeekdayFractions {
    type Error = ModelError;

    fn try_from(table: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut fractions: [Option<f64>; 7] = [None; 7];
        for (key, value) in &table {
            let day: Weekday = key
                .trim()
                .parse()
                .map_err(|_| ModelError::invalid("weekday", key))?;
            let slot = &mut fractions[day.num_days_from_monday() as usize];
            if slot.is_some() {
                return Err(ModelError::invalid(
                    "weekday",
                    format!("{key} repeats {}", weekday_abbrev(day)),
                ));
            }
            *slot = Some(*value);
        }
        let mut complete = [0.0; 7];
        for (day, slot) in WEEK.iter().zip(fractions) {
            complete[day.num_days_from_monday() as usize] = slot.ok_or_else(|| {
                ModelError::MissingConfiguration(format!(
                    "weekday fraction for {}",
                    weekday_abbrev(*day)
                ))
            })?;
        }
        Self::new(complete)
    }
}

impl From<WeekdayFractions> for BTreeMap<String, f64> {
    fn from(fractions: WeekdayFractions) -> Self {
        WEEK.iter()
            .map(|day| (weekday_abbrev(*day).to_string(), fractions.fraction(*day)))
            .collect()
    }
}
