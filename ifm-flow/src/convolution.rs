//! Exponentially decayed rainfall history.
//!
//! `delayed[t] = Σ_{j<=t} rain[j] * exp(-kd * (t - j))`, evaluated with the
//! equivalent one-pass recurrence `delayed[t] = rain[t] + exp(-kd) * delayed[t-1]`.

/// Causal convolution of `rainfall` with an exponential kernel of rate `kd`
/// per day. Day 0 starts from an empty history.
pub fn delayed_rainfall(rainfall: &[f64], kd: f64) -> Vec<f64> {
    let decay = (-kd).exp();
    let mut carried = 0.0;
    rainfall
        .iter()
        .map(|&rain| {
            carried = rain + decay * carried;
            carried
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    /// Direct double sum, O(n²).
    fn delayed_rainfall_direct(rainfall: &[f64], kd: f64) -> Vec<f64> {
        (0..rainfall.len())
            .map(|t| {
                (0..=t)
                    .map(|j| rainfall[j] * (-kd * (t - j) as f64).exp())
                    .sum()
            })
            .collect()
    }

    #[test]
    fn single_storm_decays() {
        let delayed = delayed_rainfall(&[10.0, 0.0, 0.0], 0.15);
        assert_abs_diff_eq!(delayed[0], 10.0, epsilon = 1e-2);
        assert_abs_diff_eq!(delayed[1], 8.607, epsilon = 1e-2);
        assert_abs_diff_eq!(delayed[2], 7.408, epsilon = 1e-2);

        let direct = delayed_rainfall_direct(&[10.0, 0.0, 0.0], 0.15);
        for (a, b) in delayed.iter().zip(&direct) {
            assert_relative_eq!(*a, *b, max_relative = 1e-9);
        }
    }

    #[test]
    fn matches_direct_sum() {
        let mut rng = StdRng::seed_from_u64(7);
        for &kd in &[0.01, 0.15, 0.8, 3.0] {
            for &len in &[1usize, 2, 17, 365, 1000] {
                let rainfall: Vec<f64> = (0..len)
                    .map(|_| {
                        if rng.gen_bool(0.3) {
                            rng.gen_range(0.0..80.0)
                        } else {
                            0.0
                        }
                    })
                    .collect();
                let fast = delayed_rainfall(&rainfall, kd);
                let slow = delayed_rainfall_direct(&rainfall, kd);
                assert_eq!(fast.len(), len);
                for (t, (a, b)) in fast.iter().zip(&slow).enumerate() {
                    assert_relative_eq!(*a, *b, max_relative = 1e-9, epsilon = 1e-300);
                    assert!(a.is_finite(), "kd {kd} len {len} t {t}");
                }
            }
        }
    }

    #[test]
    fn no_rain_means_no_history() {
        assert!(delayed_rainfall(&[0.0; 30], 0.15).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn empty_input() {
        assert!(delayed_rainfall(&[], 0.15).is_empty());
    }
}
