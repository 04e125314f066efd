//! Pearson correlation
//!
//! Single-pass product-moment correlation over a dataset. Degenerate input
//! (fewer than two samples, or no variance on either axis) yields exactly 0.

use crate::types::Dataset;

/// First value and extremes of one axis
#[derive(Debug, Clone, Copy)]
struct Axis {
    anchor: f64,
    min: f64,
    max: f64,
}

impl Axis {
    fn new(anchor: f64) -> Self {
        Self {
            anchor,
            min: anchor,
            max: anchor,
        }
    }

    fn observe(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn is_constant(&self) -> bool {
        self.min == self.max
    }

    /// Largest distance from the anchor
    fn spread(&self) -> f64 {
        (self.max - self.anchor).max(self.anchor - self.min)
    }

    /// Map a value into `[-1, 1]` relative to the anchor
    fn reduce(&self, v: f64, spread: f64) -> f64 {
        (v - self.anchor) / spread
    }
}

/// Running sums for the single-pass Pearson formula
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    n: f64,
    sum_x: f64,
    sum_y: f64,
    sum_xy: f64,
    sum_x2: f64,
    sum_y2: f64,
}

impl Moments {
    fn push(&mut self, x: f64, y: f64) {
        self.n += 1.0;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xy += x * y;
        self.sum_x2 += x * x;
        self.sum_y2 += y * y;
    }

    fn coefficient(&self) -> f64 {
        if self.n < 2.0 {
            return 0.0;
        }

        let numerator = self.n * self.sum_xy - self.sum_x * self.sum_y;
        let var_x = self.n * self.sum_x2 - self.sum_x * self.sum_x;
        let var_y = self.n * self.sum_y2 - self.sum_y * self.sum_y;
        let denominator = (var_x * var_y).sqrt();

        // NaN when rounding drives the product below zero
        if denominator.is_nan() || denominator <= 0.0 {
            return 0.0;
        }

        let r = numerator / denominator;
        if r.is_nan() {
            return 0.0;
        }
        r.clamp(-1.0, 1.0)
    }
}

/// Pearson coefficient over paired values.
///
/// A first scan records each axis's anchor (its first value) and extremes.
/// The sums are then accumulated in one pass over values shifted by the
/// anchor and divided by the axis spread, so every term lies in `[-1, 1]`.
/// r is unchanged by that shift and positive scaling, and the sums neither
/// cancel on a large common offset nor overflow at large magnitudes.
fn pearson<I>(pairs: I) -> f64
where
    I: Iterator<Item = (f64, f64)> + Clone,
{
    let mut scan = pairs.clone();
    let Some((x0, y0)) = scan.next() else {
        return 0.0;
    };

    let mut x_axis = Axis::new(x0);
    let mut y_axis = Axis::new(y0);
    for (x, y) in scan {
        x_axis.observe(x);
        y_axis.observe(y);
    }

    // Also covers a single sample. Checked on the raw extremes because the
    // variance term may not cancel to exactly zero in floating point.
    if x_axis.is_constant() || y_axis.is_constant() {
        return 0.0;
    }

    let (spread_x, spread_y) = (x_axis.spread(), y_axis.spread());
    let mut moments = Moments::default();
    for (x, y) in pairs {
        moments.push(x_axis.reduce(x, spread_x), y_axis.reduce(y, spread_y));
    }
    moments.coefficient()
}

/// Compute the Pearson correlation coefficient of a dataset.
///
/// Returns exactly `0.0` when the dataset has fewer than two samples or when
/// either axis has zero variance.
pub fn compute_correlation(dataset: &Dataset) -> f64 {
    pearson(dataset.iter().map(|s| (s.x, s.y)))
}

/// Pearson correlation of two plain slices, paired by position.
///
/// Extra values in the longer slice are ignored.
pub fn correlation_of(xs: &[f64], ys: &[f64]) -> f64 {
    pearson(xs.iter().copied().zip(ys.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn pairs(xs: &[f64], ys: &[f64]) -> Dataset {
        let pairs: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        Dataset::from_pairs(&pairs)
    }

    #[test]
    fn test_fewer_than_two_samples() {
        assert_eq!(compute_correlation(&Dataset::default()), 0.0);
        assert_eq!(compute_correlation(&Dataset::from_pairs(&[(3.0, 9.0)])), 0.0);
    }

    #[test]
    fn test_zero_variance_is_exactly_zero() {
        let dataset = pairs(&[0.1, 0.1, 0.1, 0.1], &[1.0, 2.0, 3.0, 5.0]);
        assert_eq!(compute_correlation(&dataset), 0.0);

        let dataset = pairs(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]);
        assert_eq!(compute_correlation(&dataset), 0.0);
    }

    #[test]
    fn test_perfect_positive_line() {
        let dataset = pairs(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]);
        assert!((compute_correlation(&dataset) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_perfect_negative_line() {
        let dataset = pairs(&[1.0, 2.0, 3.0, 4.0], &[8.0, 6.0, 4.0, 2.0]);
        assert!((compute_correlation(&dataset) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_no_relationship() {
        let dataset = pairs(&[1.0, 2.0, 3.0, 4.0], &[5.0, 3.0, 3.0, 5.0]);
        assert!(compute_correlation(&dataset).abs() < EPS);
    }

    #[test]
    fn test_alternating_series() {
        // Alternating y against a rising x still leans negative: r = -8 / sqrt(320)
        let dataset = pairs(&[1.0, 2.0, 3.0, 4.0], &[5.0, 3.0, 5.0, 3.0]);
        let expected = -8.0 / 320.0_f64.sqrt();
        assert!((compute_correlation(&dataset) - expected).abs() < EPS);
    }

    #[test]
    fn test_symmetric_in_x_and_y() {
        let dataset = pairs(
            &[3.99, 1.25, 2.5, 5.0, 0.89, 4.2],
            &[4.5, 3.0, 3.75, 4.25, 2.0, 5.0],
        );
        assert_eq!(
            compute_correlation(&dataset),
            compute_correlation(&dataset.swapped())
        );
    }

    #[test]
    fn test_positive_scaling_invariance() {
        let xs = [18000.0, 19156.0, 20917.0, 17732.0, 21000.0];
        let ys = [17.0, 0.0, 6.0, 3.0, 1.0];
        let base = correlation_of(&xs, &ys);

        for k in [0.001, 0.5, 3.0, 1e6, 1e160, 1e-160] {
            let scaled: Vec<f64> = xs.iter().map(|x| x * k).collect();
            assert!((correlation_of(&scaled, &ys) - base).abs() < 1e-9);
        }
    }

    #[test]
    fn test_large_offset_keeps_precision() {
        // Unix-timestamp scale x values on a perfect line
        let xs: Vec<f64> = [1.0, 2.0, 3.0, 4.0].iter().map(|x| x + 1.7e9).collect();
        assert!((correlation_of(&xs, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < EPS);
        assert!((correlation_of(&xs, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < EPS);

        for offset in [1e8, 2.024e8, 1e12] {
            let shifted: Vec<f64> = [1.0, 2.0, 3.0, 4.0].iter().map(|x| x + offset).collect();
            let r = correlation_of(&shifted, &[5.0, 3.0, 5.0, 3.0]);
            assert!((r + 8.0 / 320.0_f64.sqrt()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_huge_magnitudes_do_not_overflow() {
        let xs: Vec<f64> = [1.0, 2.0, 3.0, 4.0].iter().map(|x| x * 1e160).collect();
        let ys: Vec<f64> = [2.0, 4.0, 6.0, 8.0].iter().map(|y| y * 1e200).collect();
        assert!((correlation_of(&xs, &ys) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_non_finite_input_reports_zero() {
        assert_eq!(correlation_of(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(correlation_of(&[1.0, f64::INFINITY, 3.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_result_within_bounds() {
        let xs = [1e-8, 2e-8, 3e-8];
        let ys = [1e8, 2e8, 3e8];
        let r = correlation_of(&xs, &ys);
        assert!((-1.0..=1.0).contains(&r));
        assert!((r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_correlation_of_uneven_lengths() {
        let r = correlation_of(&[1.0, 2.0, 3.0, 99.0], &[2.0, 4.0, 6.0]);
        assert!((r - 1.0).abs() < EPS);
    }
}
