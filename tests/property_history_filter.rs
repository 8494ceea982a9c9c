//! Property-based tests for filtering stored observations by bounds.

use jsc_tune::domain::models::{Observation, SessionHistory};
use jsc_tune::services::filter_in_bounds;
use jsc_tune::{Bounds, HistoryMerger};
use proptest::prelude::*;

const DIMENSIONS: usize = 2;

fn any_bounds() -> impl Strategy<Value = Vec<Bounds>> {
    prop::collection::vec(
        (-100i64..300, 0i64..200).prop_map(|(lo, width)| Bounds::new(lo, lo + width)),
        DIMENSIONS,
    )
}

/// Outer bounds paired with inner bounds nested inside them.
fn nested_bounds() -> impl Strategy<Value = (Vec<Bounds>, Vec<Bounds>)> {
    any_bounds().prop_flat_map(|outer| {
        let inner: Vec<_> = outer
            .iter()
            .map(|&b| {
                (b.lo..=b.hi)
                    .prop_flat_map(move |lo| (Just(lo), lo..=b.hi))
                    .prop_map(|(lo, hi)| Bounds::new(lo, hi))
            })
            .collect();
        (Just(outer), inner)
    })
}

fn any_observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec(
        (
            prop::collection::vec(-200i64..600, DIMENSIONS),
            -500.0f64..500.0,
        )
            .prop_map(|(x, y)| Observation::new(x, y)),
        0..60,
    )
}

proptest! {
    /// Property: every kept observation lies inside the bounds, and every
    /// observation inside the bounds is kept, in the original order.
    #[test]
    fn prop_filter_keeps_exactly_in_bounds_points(
        bounds in any_bounds(),
        observations in any_observations(),
    ) {
        let kept = filter_in_bounds(&observations, &bounds);
        let expected: Vec<Observation> = observations
            .iter()
            .filter(|obs| {
                obs.configuration
                    .iter()
                    .zip(&bounds)
                    .all(|(x, b)| b.lo <= *x && *x <= b.hi)
            })
            .cloned()
            .collect();
        prop_assert_eq!(kept, expected);
    }

    /// Property: filtering an already filtered list changes nothing.
    #[test]
    fn prop_refiltering_is_idempotent(
        bounds in any_bounds(),
        observations in any_observations(),
    ) {
        let once = filter_in_bounds(&observations, &bounds);
        let twice = filter_in_bounds(&once, &bounds);
        prop_assert_eq!(once, twice);
    }

    /// Property: filtering with `inner ⊆ outer` and then `outer` equals
    /// filtering once with `inner`.
    #[test]
    fn prop_nested_bounds_filter_like_inner(
        (outer, inner) in nested_bounds(),
        observations in any_observations(),
    ) {
        prop_assert!(inner.iter().zip(&outer).all(|(i, o)| i.is_within(o)));

        let inner_then_outer = filter_in_bounds(&filter_in_bounds(&observations, &inner), &outer);
        let inner_only = filter_in_bounds(&observations, &inner);
        prop_assert_eq!(inner_then_outer, inner_only);
    }

    /// Property: merging several histories concatenates their filtered
    /// observations in file order.
    #[test]
    fn prop_merge_concatenates_in_file_order(
        bounds in any_bounds(),
        files in prop::collection::vec(any_observations(), 0..4),
    ) {
        let histories: Vec<SessionHistory> = files
            .iter()
            .map(|obs| SessionHistory::new(bounds.clone(), obs.clone()))
            .collect();

        let seeds = HistoryMerger::new(bounds.clone()).merge(&histories);

        let expected: Vec<Observation> = files
            .iter()
            .flat_map(|obs| filter_in_bounds(obs, &bounds))
            .collect();
        prop_assert_eq!(
            &seeds.configurations,
            &expected.iter().map(|o| o.configuration.clone()).collect::<Vec<_>>()
        );
        prop_assert_eq!(
            &seeds.scores,
            &expected.iter().map(|o| o.score).collect::<Vec<_>>()
        );
    }
}
