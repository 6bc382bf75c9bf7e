use crate::{date_range::DateRange, error::ModelError};
use chrono::{NaiveDate, TimeDelta};

/// A gap-free daily series: one value per calendar day starting at `start`.
///
/// Used for both the interpolated alpha signal and daily rainfall. Values are
/// fixed once built; stages read them by reference and produce new series.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

/// Dimensionless seasonal groundwater signal at daily resolution.
pub type DailyAlphaSeries = DailySeries;

/// Daily rainfall depth in millimetres.
pub type DailyRainfallSeries = DailySeries;

impl DailySeries {
    pub fn new(start: NaiveDate, values: Vec<f64>) -> Self {
        Self { start, values }
    }

    /// Build a series from dated values that must be ordered and one day apart.
    pub fn from_points<I>(points: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut iter = points.into_iter();
        let (start, first) = match iter.next() {
            Some(p) => p,
            None => {
                return Err(ModelError::InsufficientData {
                    what: "daily values",
                    required: 1,
                    found: 0,
                })
            }
        };
        let mut values = vec![first];
        let mut expected = start + TimeDelta::days(1);
        for (date, value) in iter {
            if date != expected {
                return Err(ModelError::RangeMismatch {
                    detail: format!("daily series expected {expected} but found {date}"),
                });
            }
            values.push(value);
            expected = date + TimeDelta::days(1);
        }
        Ok(Self { start, values })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last covered date. Equal to `start` for a single-day series.
    pub fn end(&self) -> NaiveDate {
        self.start + TimeDelta::days(self.values.len().saturating_sub(1) as i64)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dates(&self) -> DateRange {
        if self.values.is_empty() {
            // inverted range yields nothing
            DateRange(self.start + TimeDelta::days(1), self.start)
        } else {
            DateRange(self.start, self.end())
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        let offset = (date - self.start).num_days();
        if offset < 0 {
            return None;
        }
        self.values.get(offset as usize).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates().zip(self.values.iter().copied())
    }

    /// Checks that both series cover exactly the same calendar days.
    pub fn ensure_aligned(&self, other: &DailySeries, label: &str) -> Result<(), ModelError> {
        if self.start != other.start || self.values.len() != other.values.len() {
            return Err(ModelError::RangeMismatch {
                detail: format!(
                    "{label}: {}..={} ({} days) vs {}..={} ({} days)",
                    self.start,
                    self.end(),
                    self.len(),
                    other.start,
                    other.end(),
                    other.len()
                ),
            });
        }
        Ok(())
    }
}
