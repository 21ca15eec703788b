/// Linear-interpolation percentile over an unsorted sample, p in 0..=100.
/// None for an empty sample; a single value is its own percentile.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (sorted.len() - 1) as f64 * (p / 100.0);
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    if lower == upper {
        return Some(sorted[lower]);
    }

    let below = sorted[lower] * (upper as f64 - rank);
    let above = sorted[upper] * (rank - lower as f64);
    Some(below + above)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[42.0], 95.0), Some(42.0));
    }

    #[test]
    fn test_percentile_median_interpolates() {
        let values = vec![4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(percentile(&values, 50.0).unwrap(), 2.5);
    }

    #[test]
    fn test_percentile_p95() {
        let values: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        assert_relative_eq!(percentile(&values, 95.0).unwrap(), 95.05);
    }

    #[test]
    fn test_mean_and_std() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values).unwrap();
        assert_relative_eq!(m, 5.0);
        assert_relative_eq!(std_dev(&values, m), 2.0);
    }
}
