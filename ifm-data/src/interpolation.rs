//! Piecewise cubic Hermite interpolation (PCHIP) over dated points.
//!
//! Slopes follow Fritsch–Carlson with the weighted harmonic mean of
//! Fritsch–Butland for interior points and the three-point shape-preserving
//! formula at the ends. Between two anchors the curve never leaves the
//! interval spanned by their values, so local extrema only occur at anchors.

use chrono::NaiveDate;
use ifm_core::{date_range::DateRange, error::ModelError, series::DailySeries};
use ifm_utils::dates::ordinal;

/// Fewest anchors accepted; two points would only give a straight line.
pub const MIN_INTERPOLATION_POINTS: usize = 3;

/// A single data point for interpolation
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Shape-preserving cubic interpolant through a strictly increasing set of
/// dated points. Dates outside the anchor span are extrapolated with the
/// nearest end polynomial.
#[derive(Debug, Clone)]
pub struct Pchip {
    first: NaiveDate,
    last: NaiveDate,
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl Pchip {
    pub fn new(points: &[DataPoint]) -> Result<Self, ModelError> {
        if points.len() < MIN_INTERPOLATION_POINTS {
            return Err(ModelError::InsufficientData {
                what: "interpolation points",
                required: MIN_INTERPOLATION_POINTS,
                found: points.len(),
            });
        }
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ModelError::invalid(
                    "anchor dates",
                    format!("{} is not after {}", pair[1].date, pair[0].date),
                ));
            }
        }
        if let Some(p) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ModelError::invalid(
                "anchor value",
                format!("{} on {}", p.value, p.date),
            ));
        }

        let x: Vec<f64> = points.iter().map(|p| ordinal(&p.date)).collect();
        let y: Vec<f64> = points.iter().map(|p| p.value).collect();
        let slopes = pchip_slopes(&x, &y);

        Ok(Self {
            first: points[0].date,
            last: points[points.len() - 1].date,
            x,
            y,
            slopes,
        })
    }

    /// Dates covered by the anchors, inclusive.
    pub fn span(&self) -> DateRange {
        DateRange(self.first, self.last)
    }

    pub fn evaluate(&self, date: &NaiveDate) -> f64 {
        self.value_at(ordinal(date))
    }

    /// Evaluate once per day across `range`.
    pub fn evaluate_range(&self, range: DateRange) -> DailySeries {
        let values = range.map(|d| self.evaluate(&d)).collect();
        DailySeries::new(range.0, values)
    }

    fn value_at(&self, x: f64) -> f64 {
        let n = self.x.len();
        let i = self
            .x
            .partition_point(|&xi| xi <= x)
            .saturating_sub(1)
            .min(n - 2);

        let h = self.x[i + 1] - self.x[i];
        let s = (x - self.x[i]) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * self.y[i]
            + h10 * h * self.slopes[i]
            + h01 * self.y[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}

/// Sign with zero kept distinct, unlike `f64::signum`.
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn pchip_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        let (m0, m1) = (delta[k - 1], delta[k]);
        if sign(m0) != sign(m1) || m0 == 0.0 || m1 == 0.0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / m0 + w2 / m1);
    }

    d[0] = edge_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = edge_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// One-sided three-point slope, limited so the end segment cannot overshoot.
fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}
