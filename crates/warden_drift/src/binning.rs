use crate::error::DriftError;
use std::collections::HashMap;
use warden_types::baseline::OTHER_BUCKET;

/// Equal-width bin edges covering min..max of the sample, length n_bins + 1.
///
/// An all-equal sample is widened by 0.5 on each side so bins exist. The
/// last edge is set to the exact maximum rather than the accumulated
/// lo + n * width, which can land below it.
pub fn equal_width_edges(values: &[f64], n_bins: usize) -> Result<Vec<f64>, DriftError> {
    if values.is_empty() {
        return Err(DriftError::InvalidInput("No values to bin".to_string()));
    }
    if n_bins < 2 {
        return Err(DriftError::InvalidInput(format!(
            "At least 2 bins are required, got {n_bins}"
        )));
    }

    let mut lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / n_bins as f64;
    let mut edges: Vec<f64> = (0..n_bins).map(|i| lo + i as f64 * width).collect();
    edges.push(hi);
    Ok(edges)
}

fn bin_index(x: f64, edges: &[f64]) -> usize {
    let n_bins = edges.len() - 1;

    // out-of-range values clamp to the nearest edge bin; dropping them
    // would understate drift for shifted distributions
    if x < edges[0] {
        return 0;
    }
    if x > edges[n_bins] {
        return n_bins - 1;
    }

    for i in 0..n_bins {
        if i == n_bins - 1 {
            if edges[i] <= x && x <= edges[i + 1] {
                return i;
            }
        } else if edges[i] <= x && x < edges[i + 1] {
            return i;
        }
    }
    n_bins - 1
}

/// Histogram probabilities of a sample over explicit bin edges
/// (|edges| = n_bins + 1). The last bin is closed on the right; everything
/// outside the range clamps into the first or last bin. An empty sample
/// yields a zero vector of the correct length.
pub fn histogram_probs(values: &[f64], edges: &[f64]) -> Vec<f64> {
    let n_bins = edges.len().saturating_sub(1);
    if n_bins == 0 {
        return Vec::new();
    }

    let mut counts = vec![0usize; n_bins];
    for &x in values {
        counts[bin_index(x, edges)] += 1;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; n_bins];
    }
    counts
        .into_iter()
        .map(|count| count as f64 / total as f64)
        .collect()
}

/// Frequency probabilities of a string sample over a fixed category list.
/// Values outside the list count toward "__OTHER__" when present, and are
/// dropped otherwise. An empty placed total yields a zero vector.
pub fn categorical_probs(values: &[String], categories: &[String]) -> Vec<f64> {
    let index: HashMap<&str, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category.as_str(), i))
        .collect();
    let other_slot = index.get(OTHER_BUCKET).copied();

    let mut counts = vec![0usize; categories.len()];
    let mut total = 0usize;
    for value in values {
        if let Some(slot) = index.get(value.as_str()).copied().or(other_slot) {
            counts[slot] += 1;
            total += 1;
        }
    }

    if total == 0 {
        return vec![0.0; categories.len()];
    }
    counts
        .into_iter()
        .map(|count| count as f64 / total as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_edges_cover_min_to_max() {
        let values = vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
        let edges = equal_width_edges(&values, 5).unwrap();
        assert_eq!(edges.len(), 6);
        assert_relative_eq!(edges[0], 0.0);
        assert_relative_eq!(edges[5], 10.0);
        assert_relative_eq!(edges[1], 2.0);
    }

    #[test]
    fn test_all_equal_sample_widens_range() {
        let values = vec![3.0; 40];
        let edges = equal_width_edges(&values, 4).unwrap();
        assert_relative_eq!(edges[0], 2.5);
        assert_relative_eq!(edges[4], 3.5);

        let probs = histogram_probs(&values, &edges);
        // everything concentrates in the bin containing 3.0
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(probs[2], 1.0);
    }

    #[test]
    fn test_empty_sample_rejected_for_edges() {
        assert!(equal_width_edges(&[], 10).is_err());
    }

    #[test]
    fn test_one_bin_rejected() {
        assert!(equal_width_edges(&[1.0, 2.0], 1).is_err());
    }

    #[test]
    fn test_histogram_sums_to_one() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 / 10.0).collect();
        let edges = equal_width_edges(&values, 10).unwrap();
        let probs = histogram_probs(&values, &edges);
        assert_eq!(probs.len(), 10);
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_sample_yields_zero_vector() {
        let edges = vec![0.0, 1.0, 2.0];
        let probs = histogram_probs(&[], &edges);
        assert_eq!(probs, vec![0.0, 0.0]);
    }

    #[test]
    fn test_last_bin_includes_right_edge() {
        let edges = vec![0.0, 1.0, 2.0];
        let probs = histogram_probs(&[2.0], &edges);
        assert_eq!(probs, vec![0.0, 1.0]);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let edges = vec![0.0, 1.0, 2.0];
        let probs = histogram_probs(&[-5.0, 7.0, 9.0], &edges);
        assert_relative_eq!(probs[0], 1.0 / 3.0);
        assert_relative_eq!(probs[1], 2.0 / 3.0);
    }

    #[test]
    fn test_categorical_probs_with_other_bucket() {
        let categories = vec!["CA".to_string(), "US".to_string(), OTHER_BUCKET.to_string()];
        let values: Vec<String> = ["CA", "CA", "US", "FR", "DE"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let probs = categorical_probs(&values, &categories);
        assert_relative_eq!(probs[0], 0.4);
        assert_relative_eq!(probs[1], 0.2);
        assert_relative_eq!(probs[2], 0.4);
    }

    #[test]
    fn test_unseen_values_dropped_without_other_bucket() {
        let categories = vec!["CA".to_string(), "US".to_string()];
        let values: Vec<String> = ["CA", "FR", "FR", "FR"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let probs = categorical_probs(&values, &categories);
        assert_relative_eq!(probs[0], 1.0);
        assert_relative_eq!(probs[1], 0.0);
    }

    #[test]
    fn test_categorical_empty_total_yields_zero_vector() {
        let categories = vec!["CA".to_string(), "US".to_string()];
        let values: Vec<String> = vec!["FR".to_string()];
        assert_eq!(categorical_probs(&values, &categories), vec![0.0, 0.0]);
        assert_eq!(categorical_probs(&[], &categories), vec![0.0, 0.0]);
    }
}
