/// Pearson correlation coefficient of paired observations
///
/// Returns a value in `[-1.0, 1.0]`. Inputs with fewer than two pairs, or
/// where either series has zero variance, carry no usable signal and yield
/// `0.0` instead of dividing by zero.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (covariance, var_x, var_y) =
        pairs
            .iter()
            .fold((0.0, 0.0, 0.0), |(cov, vx, vy), &(x, y)| {
                let dx = x - mean_x;
                let dy = y - mean_y;
                (cov + dx * dy, vx + dx * dx, vy + dy * dy)
            });

    // Flat series: all x equal or all y equal
    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (covariance / denominator).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_neutral() {
        assert_eq!(pearson(&[]), 0.0);
    }

    #[test]
    fn test_single_pair_is_neutral() {
        assert_eq!(pearson(&[(4.0, 2.0)]), 0.0);
    }

    #[test]
    fn test_perfect_positive() {
        let pairs = [(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)];
        assert_eq!(pearson(&pairs), 1.0);
    }

    #[test]
    fn test_perfect_negative() {
        let pairs = [(1.0, 5.0), (2.0, 4.0), (3.0, 3.0), (4.0, 2.0), (5.0, 1.0)];
        assert_eq!(pearson(&pairs), -1.0);
    }

    #[test]
    fn test_partial_correlation() {
        // cov = 1, var_x = var_y = 2
        let pairs = [(1.0, 1.0), (2.0, 3.0), (3.0, 2.0)];
        assert!((pearson(&pairs) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_returns_zero() {
        // Degenerate variance resolves to neutral, not NaN
        assert_eq!(pearson(&[(5.0, 1.0), (3.0, 1.0)]), 0.0);
        assert_eq!(pearson(&[(2.0, 1.0), (2.0, 4.0), (2.0, 5.0)]), 0.0);
        assert_eq!(pearson(&[(3.0, 3.0), (3.0, 3.0)]), 0.0);
    }

    #[test]
    fn test_order_independent() {
        let forward = [(1.0, 2.0), (4.0, 3.0), (2.0, 5.0), (5.0, 5.0)];
        let mut backward = forward;
        backward.reverse();
        assert!((pearson(&forward) - pearson(&backward)).abs() < 1e-12);
    }

    #[test]
    fn test_swapping_series_is_identical() {
        let pairs = [(1.0, 2.0), (4.0, 3.0), (2.0, 5.0), (5.0, 5.0)];
        let swapped: Vec<(f64, f64)> = pairs.iter().map(|&(x, y)| (y, x)).collect();
        assert_eq!(pearson(&pairs).to_bits(), pearson(&swapped).to_bits());
    }

    #[test]
    fn test_deterministic() {
        let pairs = [(1.0, 2.0), (4.0, 3.0), (2.0, 5.0)];
        assert_eq!(pearson(&pairs).to_bits(), pearson(&pairs).to_bits());
    }
}
