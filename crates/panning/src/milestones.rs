//! Sediment milestone ladder.
//!
//! Each milestone fires at most once, the first time normalized sediment
//! remaining drops to or below its threshold. Fired state is keyed by the
//! milestone's identity (its position in the configured table), not by its
//! position in the sorted ladder.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Normalized sediment remaining at or below which this fires.
    pub threshold: f32,
    #[serde(default)]
    pub shake_cue: bool,
    #[serde(default)]
    pub sparkle_cue: bool,
}

impl Milestone {
    pub fn new(threshold: f32, shake_cue: bool, sparkle_cue: bool) -> Self {
        Self {
            threshold,
            shake_cue,
            sparkle_cue,
        }
    }
}

/// The classic three-step ladder: two shake cues then a sparkle.
pub fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone::new(0.75, true, false),
        Milestone::new(0.5, true, false),
        Milestone::new(0.25, false, true),
    ]
}

#[derive(Clone, Copy, Debug)]
struct Rung {
    id: usize,
    milestone: Milestone,
}

/// Milestone that just fired, with the remaining fraction that fired it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
    pub milestone: Milestone,
    pub remaining: f32,
}

#[derive(Clone, Debug)]
pub struct MilestoneLadder {
    rungs: Vec<Rung>,
    fired: FxHashSet<usize>,
}

impl MilestoneLadder {
    /// Build a ladder from a configured table.
    ///
    /// Thresholds are clamped to [0, 1], non-finite ones are dropped and the
    /// table is sorted ascending.
    pub fn new(milestones: Vec<Milestone>) -> Self {
        let mut rungs: Vec<Rung> = milestones
            .into_iter()
            .enumerate()
            .filter_map(|(id, mut milestone)| {
                if !milestone.threshold.is_finite() {
                    log::warn!("dropping milestone {} with non-finite threshold", id);
                    return None;
                }
                milestone.threshold = milestone.threshold.clamp(0.0, 1.0);
                Some(Rung { id, milestone })
            })
            .collect();

        let sorted = rungs
            .windows(2)
            .all(|w| w[0].milestone.threshold <= w[1].milestone.threshold);
        if !sorted {
            log::warn!("sediment milestones were not sorted by threshold; re-sorting");
            rungs.sort_by(|a, b| a.milestone.threshold.total_cmp(&b.milestone.threshold));
        }

        Self {
            rungs,
            fired: FxHashSet::default(),
        }
    }

    /// Milestones in ascending threshold order.
    pub fn milestones(&self) -> impl Iterator<Item = &Milestone> + '_ {
        self.rungs.iter().map(|r| &r.milestone)
    }

    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    /// Whether the milestone at `index` in ascending order has fired.
    pub fn has_fired(&self, index: usize) -> bool {
        self.rungs
            .get(index)
            .is_some_and(|rung| self.fired.contains(&rung.id))
    }

    /// Forget everything that has fired.
    pub fn reset(&mut self) {
        self.fired.clear();
    }

    /// Fire every unfired milestone whose threshold is at or above `remaining`,
    /// in ascending threshold order.
    pub fn evaluate(&mut self, remaining: f32) -> Vec<Crossing> {
        let mut crossings = Vec::new();
        for rung in &self.rungs {
            if self.fired.contains(&rung.id) {
                continue;
            }
            if remaining <= rung.milestone.threshold {
                self.fired.insert(rung.id);
                crossings.push(Crossing {
                    milestone: rung.milestone,
                    remaining,
                });
            }
        }
        crossings
    }
}

impl Default for MilestoneLadder {
    fn default() -> Self {
        Self::new(default_milestones())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsorted_table_is_sorted() {
        let ladder = MilestoneLadder::new(vec![
            Milestone::new(0.5, false, false),
            Milestone::new(0.1, false, true),
            Milestone::new(0.9, true, false),
        ]);
        let thresholds: Vec<f32> = ladder.milestones().map(|m| m.threshold).collect();
        assert_eq!(thresholds, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_thresholds_clamped_and_nan_dropped() {
        let ladder = MilestoneLadder::new(vec![
            Milestone::new(1.5, false, false),
            Milestone::new(f32::NAN, false, false),
            Milestone::new(-0.5, false, false),
        ]);
        let thresholds: Vec<f32> = ladder.milestones().map(|m| m.threshold).collect();
        assert_eq!(thresholds, vec![0.0, 1.0]);
    }

    #[test]
    fn test_each_milestone_fires_once() {
        let mut ladder = MilestoneLadder::default();

        let first = ladder.evaluate(0.7);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].milestone.threshold, 0.75);

        assert!(ladder.evaluate(0.7).is_empty());

        let jump = ladder.evaluate(0.1);
        let thresholds: Vec<f32> = jump.iter().map(|c| c.milestone.threshold).collect();
        assert_eq!(thresholds, vec![0.25, 0.5]);
        assert_eq!(ladder.fired_count(), 3);
        assert!(ladder.evaluate(0.0).is_empty());
    }

    #[test]
    fn test_reset_allows_refire() {
        let mut ladder = MilestoneLadder::default();
        assert_eq!(ladder.evaluate(0.0).len(), 3);
        ladder.reset();
        assert!(!ladder.has_fired(0));
        assert_eq!(ladder.evaluate(0.0).len(), 3);
    }

    #[test]
    fn test_fired_state_follows_identity_after_sort() {
        let mut ladder = MilestoneLadder::new(vec![
            Milestone::new(0.8, false, false),
            Milestone::new(0.2, false, false),
        ]);
        ladder.evaluate(0.5);
        // 0.8 sorts to index 1 and is the only one that fired.
        assert!(!ladder.has_fired(0));
        assert!(ladder.has_fired(1));
    }
}
