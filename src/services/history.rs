//! Folding earlier sessions into seed data for the current one.

use tracing::{debug, info};

use crate::domain::models::{within_bounds, Bounds, Observation, SeedData, SessionHistory};

/// Keep only the observations lying inside `bounds` (inclusive, every
/// coordinate). Order is preserved.
pub fn filter_in_bounds<'a, I>(observations: I, bounds: &[Bounds]) -> Vec<Observation>
where
    I: IntoIterator<Item = &'a Observation>,
{
    observations
        .into_iter()
        .filter(|obs| within_bounds(&obs.configuration, bounds))
        .cloned()
        .collect()
}

/// Merges stored session histories under the current session's bounds.
pub struct HistoryMerger {
    bounds: Vec<Bounds>,
}

impl HistoryMerger {
    /// `bounds` are the current session's parameter ranges.
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Bounds every kept point lies within.
    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    /// Concatenate the in-bounds observations of every history, in file
    /// order and then in recorded order. Out-of-bounds points are expected
    /// when bounds changed between sessions and are dropped silently.
    pub fn merge(&self, histories: &[SessionHistory]) -> SeedData {
        let mut seeds = SeedData::empty();

        for history in histories {
            let kept = filter_in_bounds(&history.observations, &self.bounds);
            let source = history
                .source
                .as_ref()
                .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());

            if history.bounds != self.bounds {
                debug!(
                    source = %source,
                    "history was collected under different bounds"
                );
            }
            info!(
                source = %source,
                kept = kept.len(),
                total = history.len(),
                "using {} of {} previous points",
                kept.len(),
                history.len()
            );

            seeds.extend(kept.into_iter().collect());
        }

        seeds
    }

    /// Seed data for a session: the baseline point first (if any), then the
    /// merged histories.
    pub fn seed_with_baseline(
        &self,
        baseline: Option<Observation>,
        histories: &[SessionHistory],
    ) -> SeedData {
        let mut seeds = match baseline {
            Some(obs) => SeedData::single(obs.configuration, obs.score),
            None => SeedData::empty(),
        };
        seeds.extend(self.merge(histories));
        seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(points: &[(&[i64], f64)]) -> SessionHistory {
        SessionHistory::new(
            vec![Bounds::new(0, 1000), Bounds::new(0, 1000)],
            points
                .iter()
                .map(|(x, y)| Observation::new(x.to_vec(), *y))
                .collect(),
        )
    }

    #[test]
    fn retains_point_inside_bounds() {
        let merger = HistoryMerger::new(vec![Bounds::new(50, 180)]);
        let seeds = merger.merge(&[SessionHistory::new(
            vec![Bounds::new(0, 200)],
            vec![Observation::new(vec![120], -5.0)],
        )]);
        assert_eq!(seeds.configurations, vec![vec![120]]);
        assert_eq!(seeds.scores, vec![-5.0]);
    }

    #[test]
    fn discards_point_outside_bounds() {
        let merger = HistoryMerger::new(vec![Bounds::new(181, 200)]);
        let seeds = merger.merge(&[SessionHistory::new(
            vec![Bounds::new(0, 200)],
            vec![Observation::new(vec![120], -5.0)],
        )]);
        assert!(seeds.is_empty());
    }

    #[test]
    fn preserves_order_across_and_within_files() {
        let merger = HistoryMerger::new(vec![Bounds::new(0, 100), Bounds::new(0, 100)]);
        let first = history(&[(&[1, 1], 1.0), (&[500, 1], 2.0), (&[2, 2], 3.0)]);
        let second = history(&[(&[3, 3], 4.0), (&[4, 400], 5.0), (&[5, 5], 6.0)]);

        let seeds = merger.merge(&[first, second]);

        assert_eq!(
            seeds.configurations,
            vec![vec![1, 1], vec![2, 2], vec![3, 3], vec![5, 5]]
        );
        assert_eq!(seeds.scores, vec![1.0, 3.0, 4.0, 6.0]);
    }

    #[test]
    fn no_histories_yields_empty_seeds() {
        let merger = HistoryMerger::new(vec![Bounds::new(0, 1)]);
        let seeds = merger.merge(&[]);
        assert!(seeds.configurations.is_empty());
        assert!(seeds.scores.is_empty());
    }

    #[test]
    fn dimension_mismatch_is_filtered() {
        let merger = HistoryMerger::new(vec![Bounds::new(0, 10)]);
        let seeds = merger.merge(&[history(&[(&[1, 1], 1.0)])]);
        assert!(seeds.is_empty());
    }

    #[test]
    fn baseline_comes_first() {
        let merger = HistoryMerger::new(vec![Bounds::new(0, 100), Bounds::new(0, 100)]);
        let baseline = Observation::new(vec![50, 50], -100.0);
        let seeds = merger.seed_with_baseline(Some(baseline), &[history(&[(&[1, 2], -90.0)])]);

        assert_eq!(seeds.configurations, vec![vec![50, 50], vec![1, 2]]);
        assert_eq!(seeds.scores, vec![-100.0, -90.0]);
    }
}
