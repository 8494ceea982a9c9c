//! Property-based tests for the early-stopping rule and the sample budget.

mod common;

use std::sync::Arc;

use common::DistanceChannel;
use jsc_tune::services::statistics::{
    confidence_reached, relative_confidence, DEFAULT_CONFIDENCE_COEFFICIENT,
};
use jsc_tune::AdaptiveSampler;
use proptest::prelude::*;

const Z: f64 = DEFAULT_CONFIDENCE_COEFFICIENT;

fn score_vec(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0, len)
}

/// `(mean, standard error)` from first principles.
fn mean_and_standard_error(scores: &[f64]) -> (f64, f64) {
    let n = scores.len() as f64;
    let m = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1.0);
    (m, (variance / n).sqrt())
}

proptest! {
    /// Property: with at least three scores and a non-zero mean, sampling
    /// stops exactly when `1.96 * se / |mean|` is within the target.
    #[test]
    fn prop_stops_iff_relative_half_width_within_target(
        scores in score_vec(3..20),
        target in 0.0f64..0.5,
    ) {
        let (m, se) = mean_and_standard_error(&scores);
        prop_assume!(m != 0.0);

        let expected = Z * se / m.abs() <= target;
        prop_assert_eq!(confidence_reached(&scores, Z, target), expected);
    }

    /// Property: sequences shorter than three never stop, whatever their spread.
    #[test]
    fn prop_short_sequences_never_stop(
        scores in score_vec(0..3),
        target in prop_oneof![Just(f64::INFINITY), Just(f64::MAX), 0.0f64..1e6],
    ) {
        prop_assert!(relative_confidence(&scores, Z).is_none());
        prop_assert!(!confidence_reached(&scores, Z, target));
    }

    /// Property: identical scores always agree, so three of them are enough.
    #[test]
    fn prop_constant_scores_stop_at_three(value in -1000.0f64..1000.0, target in 1e-9f64..1.0) {
        prop_assert!(confidence_reached(&[value; 3], Z, target));
    }

    /// Property: invocations stay within the budget when at most one failure
    /// occurs, except for the single extra call that rescues an empty result.
    #[test]
    fn prop_invocations_stay_within_budget(
        max_samples in 1u32..12,
        failing_call in prop::option::of(0usize..12),
        target in prop_oneof![Just(0.0f64), 0.0f64..0.05],
        offset in 0i64..50,
    ) {
        let mut script = vec![false; 13];
        if let Some(index) = failing_call {
            script[index] = true;
        }
        let channel = Arc::new(DistanceChannel::new(vec![0]).with_script(script));
        let sampler = AdaptiveSampler::new(channel.clone());

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let summary = runtime
            .block_on(sampler.sample(&[offset], max_samples, target))
            .unwrap();

        prop_assert!(!summary.scores.is_empty());
        prop_assert_eq!(summary.invocations, channel.calls());
        if summary.invocations > max_samples {
            prop_assert_eq!(max_samples, 1);
            prop_assert_eq!(summary.invocations, 2);
            prop_assert_eq!(summary.scores.len(), 1);
        }
    }
}
