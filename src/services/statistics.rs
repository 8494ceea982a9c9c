//! Pure statistics over ordered score sequences.
//!
//! Nothing here performs I/O; the sampler feeds these functions the scores
//! collected so far and acts on the answer.

/// Two-sided coefficient for ~95% confidence.
pub const DEFAULT_CONFIDENCE_COEFFICIENT: f64 = 1.96;

/// Scores needed before early stopping is considered.
pub const MIN_SAMPLES_FOR_CONFIDENCE: usize = 3;

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Unbiased sample variance (n - 1 denominator).
pub fn sample_variance(scores: &[f64]) -> Option<f64> {
    if scores.len() < 2 {
        return None;
    }
    let m = mean(scores)?;
    let sum_sq: f64 = scores.iter().map(|x| (x - m).powi(2)).sum();
    Some(sum_sq / (scores.len() - 1) as f64)
}

/// Standard error of the mean.
pub fn standard_error(scores: &[f64]) -> Option<f64> {
    sample_variance(scores).map(|var| (var / scores.len() as f64).sqrt())
}

/// `z * standard_error`
pub fn half_width(scores: &[f64], z: f64) -> Option<f64> {
    standard_error(scores).map(|se| z * se)
}

/// `z * stderr / |mean|`, or the plain standard error when the mean is 0.
///
/// `None` while fewer than [`MIN_SAMPLES_FOR_CONFIDENCE`] scores exist.
pub fn relative_confidence(scores: &[f64], z: f64) -> Option<f64> {
    if scores.len() < MIN_SAMPLES_FOR_CONFIDENCE {
        return None;
    }
    let m = mean(scores)?;
    let se = standard_error(scores)?;
    if m == 0.0 {
        Some(se)
    } else {
        Some(z * se / m.abs())
    }
}

/// Whether enough precision has been reached to stop sampling.
pub fn confidence_reached(scores: &[f64], z: f64, target: f64) -> bool {
    relative_confidence(scores, z).is_some_and(|confidence| confidence <= target)
}

/// Geometric mean of strictly positive values.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan() || *v <= 0.0) {
        return None;
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Some((log_sum / values.len() as f64).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const Z: f64 = DEFAULT_CONFIDENCE_COEFFICIENT;

    #[test]
    fn variance_and_standard_error() {
        let scores = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&scores), Some(5.0));
        let var = sample_variance(&scores).unwrap();
        assert!((var - 32.0 / 7.0).abs() < 1e-12);
        let se = standard_error(&scores).unwrap();
        assert!((se - (var / 8.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_stops_at_three() {
        assert!(confidence_reached(&[100.0, 100.0, 100.0], Z, 0.0));
    }

    #[test]
    fn stopping_matches_threshold() {
        let scores = [98.0, 100.0, 102.0];
        let se = standard_error(&scores).unwrap();
        let confidence = Z * se / 100.0;
        assert!((relative_confidence(&scores, Z).unwrap() - confidence).abs() < 1e-12);
        assert!(confidence_reached(&scores, Z, confidence));
        assert!(confidence_reached(&scores, Z, confidence + 1e-9));
        assert!(!confidence_reached(&scores, Z, confidence - 1e-9));
    }

    #[test]
    fn negative_means_use_magnitude() {
        let scores = [-98.0, -100.0, -102.0];
        let positive = relative_confidence(&[98.0, 100.0, 102.0], Z).unwrap();
        assert!((relative_confidence(&scores, Z).unwrap() - positive).abs() < 1e-12);
    }

    #[test]
    fn zero_mean_uses_absolute_standard_error() {
        let scores = [-1.0, 0.0, 1.0];
        let se = standard_error(&scores).unwrap();
        assert_eq!(relative_confidence(&scores, Z), Some(se));
    }

    #[test]
    fn geometric_mean_requires_positive_values() {
        let g = geometric_mean(&[1.0, 4.0, 16.0]).unwrap();
        assert!((g - 4.0).abs() < 1e-12);
        assert!(geometric_mean(&[]).is_none());
        assert!(geometric_mean(&[1.0, 0.0]).is_none());
        assert!(geometric_mean(&[1.0, f64::NAN]).is_none());
    }
}
