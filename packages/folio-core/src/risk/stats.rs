//! Scalar statistics over return samples.
//!
//! Population estimators throughout (divide by N, not N-1), so every
//! statistic is defined as soon as a sample has one element.

/// Day-over-day log returns `ln(x_t / x_{t-1})`.
///
/// Pairs touching a non-positive value are skipped, so the result is
/// always finite for finite input.
pub(crate) fn log_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .collect()
}

/// Arithmetic mean; 0.0 for an empty sample.
pub(crate) fn mean(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    sample.iter().sum::<f64>() / sample.len() as f64
}

/// Population standard deviation; 0.0 for an empty sample.
pub(crate) fn std_dev(sample: &[f64]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let m = mean(sample);
    let variance = sample.iter().map(|x| (x - m).powi(2)).sum::<f64>() / sample.len() as f64;
    variance.sqrt()
}

/// Population covariance of two samples, truncated to the shorter length.
pub(crate) fn covariance(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let mx = mean(&xs[..n]);
    let my = mean(&ys[..n]);
    xs[..n]
        .iter()
        .zip(&ys[..n])
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / n as f64
}

/// Quantile by linear interpolation between order statistics, the
/// convention numpy's `percentile` defaults to.
///
/// `sorted` must be ascending and non-empty; `q` is clamped to [0, 1].
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] + weight * (sorted[upper] - sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_log_returns() {
        let returns = log_returns(&[100.0, 110.0, 121.0]);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], (1.1f64).ln(), epsilon = 1e-12);
        assert_relative_eq!(returns[1], (1.1f64).ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_log_returns_skips_non_positive_pairs() {
        let returns = log_returns(&[100.0, 0.0, 110.0]);
        assert!(returns.is_empty());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[3.0]), 3.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn test_std_dev_population() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[5.0, 5.0, 5.0]), 0.0);
        // Population variance of {2, 4}: ((2-3)^2 + (4-3)^2) / 2 = 1
        assert_relative_eq!(std_dev(&[2.0, 4.0]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_of_scaled_sample() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [2.0, 4.0, 6.0];
        // cov(x, 2x) = 2 var(x); population var of {1,2,3} is 2/3
        assert_relative_eq!(covariance(&xs, &ys), 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_covariance_with_self_is_variance() {
        let xs = [1.0, 2.0, 3.0];
        assert_relative_eq!(covariance(&xs, &xs), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
        assert_relative_eq!(quantile(&sorted, 0.5), 2.5, epsilon = 1e-12);
        // position = 0.25 * 3 = 0.75, between 1.0 and 2.0
        assert_relative_eq!(quantile(&sorted, 0.25), 1.75, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_single_element() {
        assert_eq!(quantile(&[7.0], 0.0), 7.0);
        assert_eq!(quantile(&[7.0], 0.5), 7.0);
        assert_eq!(quantile(&[7.0], 1.0), 7.0);
    }

    #[test]
    fn test_quantile_clamps_out_of_range() {
        let sorted = [1.0, 2.0];
        assert_eq!(quantile(&sorted, -0.5), 1.0);
        assert_eq!(quantile(&sorted, 1.5), 2.0);
    }
}
