use crate::error::DriftError;

/// Smoothing floor preventing ln(0) and division by zero.
pub const PSI_EPSILON: f64 = 1e-6;

/// Population Stability Index between two equal-length discrete
/// distributions:
///
///   PSI = sum((a' - e') * ln(a' / e')), e' = max(e, eps), a' = max(a, eps)
///
/// Non-negative for any smoothed inputs.
pub fn population_stability_index(expected: &[f64], actual: &[f64]) -> Result<f64, DriftError> {
    if expected.len() != actual.len() {
        return Err(DriftError::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    Ok(expected
        .iter()
        .zip(actual.iter())
        .map(|(&e, &a)| {
            let e = e.max(PSI_EPSILON);
            let a = a.max(PSI_EPSILON);
            (a - e) * (a / e).ln()
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::{equal_width_edges, histogram_probs};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_identity_psi_is_zero() {
        let probs = vec![0.2, 0.3, 0.1, 0.4];
        let psi = population_stability_index(&probs, &probs).unwrap();
        assert_relative_eq!(psi, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let result = population_stability_index(&[0.5, 0.5], &[1.0]);
        assert!(matches!(
            result,
            Err(DriftError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_psi_known_value() {
        let expected = vec![0.3, 0.4, 0.3];
        let actual = vec![0.2, 0.4, 0.4];
        let psi = population_stability_index(&expected, &actual).unwrap();

        let by_hand = (0.2f64 - 0.3) * (0.2f64 / 0.3).ln() + (0.4f64 - 0.3) * (0.4f64 / 0.3).ln();
        assert_relative_eq!(psi, by_hand, epsilon = 1e-12);
    }

    #[test]
    fn test_psi_non_negative_for_zero_bins() {
        // zero entries exercise the smoothing floor
        let expected = vec![0.0, 1.0];
        let actual = vec![1.0, 0.0];
        let psi = population_stability_index(&expected, &actual).unwrap();
        assert!(psi >= 0.0);
        assert!(psi > 10.0);
    }

    #[test]
    fn test_same_distribution_stays_below_warn() {
        let mut rng = StdRng::seed_from_u64(7);
        let reference: Vec<f64> = (0..500).map(|_| rng.random::<f64>()).collect();
        let replay: Vec<f64> = (0..500).map(|_| rng.random::<f64>()).collect();

        let edges = equal_width_edges(&reference, 10).unwrap();
        let expected = histogram_probs(&reference, &edges);
        let actual = histogram_probs(&replay, &edges);

        let psi = population_stability_index(&expected, &actual).unwrap();
        assert!(psi < 0.10, "psi was {psi}");
    }

    #[test]
    fn test_shifted_distribution_alerts() {
        let mut rng = StdRng::seed_from_u64(7);
        let reference: Vec<f64> = (0..500).map(|_| rng.random::<f64>()).collect();
        // entirely outside the baseline range: every value clamps into the
        // last bin
        let shifted: Vec<f64> = (0..500).map(|_| 2.0 + rng.random::<f64>()).collect();

        let edges = equal_width_edges(&reference, 10).unwrap();
        let expected = histogram_probs(&reference, &edges);
        let actual = histogram_probs(&shifted, &edges);
        assert_relative_eq!(actual[9], 1.0);

        let psi = population_stability_index(&expected, &actual).unwrap();
        assert!(psi >= 0.25, "psi was {psi}");
    }
}
