//! # Weighted Sampler
//!
//! Draws tracks one at a time from a weighted pool. Every track starts in the
//! pool once with weight 1.0. Whenever a favorite is drawn, a fresh entry for
//! it goes back into the pool (weight 2.0 for double-weight favorites, 1.0
//! otherwise), which is how favorites come round again.
//!
//! A short recent-window of emitted ids keeps the same track from being
//! emitted twice in quick succession: a draw that hits the window is put back
//! at the end of the pool instead of being emitted.
//!
//! ## Output Length
//!
//! ```text
//! target = unique_count + repeat_factor * favorite_count
//! ```
//!
//! The loop stops at the target, when the pool runs dry, or when no remaining
//! entry could ever be emitted (see [`StopReason`]). Stopping early is not an
//! error.

use crate::config::ShuffleConfig;
use crate::rng::RandomSource;
use crate::track::{Item, PlaylistEntry};
use std::collections::{HashSet, VecDeque};

/// Weight of a re-queued 1x favorite
pub const SINGLE_WEIGHT: f64 = 1.0;
/// Weight of a re-queued 2x favorite
pub const DOUBLE_WEIGHT: f64 = 2.0;

/// Why the sampling loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    #[default]
    TargetReached,
    PoolExhausted,
    /// Every pool entry is in the recent-window and more than one remains,
    /// so every further draw would be deferred.
    Starved,
    /// Too many deferrals in a row.
    DeferralLimit,
}

/// Counters describing one sampling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleStats {
    pub unique_count: usize,
    pub favorite_count: usize,
    pub double_count: usize,
    pub target_length: usize,
    pub deferrals: usize,
    pub stop: StopReason,
}

/// Result of [`WeightedSampler::sample`].
#[derive(Debug, Clone)]
pub struct Sample {
    pub items: Vec<Item>,
    pub stats: SampleStats,
}

/// Pending entries for one run. Owned by the sampler, never shared.
#[derive(Debug, Default)]
struct Pool {
    entries: Vec<Item>,
}

impl Pool {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    /// Index of the first entry whose cumulative weight reaches
    /// `unit * total_weight`. Falls back to the last entry when rounding
    /// leaves the scan short.
    fn draw_index(&self, unit: f64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        let threshold = unit * self.total_weight();
        let mut cumulative = 0.0;
        for (index, entry) in self.entries.iter().enumerate() {
            cumulative += entry.weight;
            if cumulative >= threshold {
                return Some(index);
            }
        }
        Some(self.len() - 1)
    }

    fn take(&mut self, index: usize) -> Item {
        self.entries.remove(index)
    }

    fn push(&mut self, item: Item) {
        self.entries.push(item);
    }

    fn all_recent(&self, recent: &RecentWindow) -> bool {
        self.entries.iter().all(|entry| recent.contains(&entry.id))
    }
}

/// The last `capacity` emitted ids.
#[derive(Debug)]
struct RecentWindow {
    ids: VecDeque<String>,
    capacity: usize,
}

impl RecentWindow {
    fn new(capacity: usize) -> Self {
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|recent| recent == id)
    }

    fn push(&mut self, id: &str) {
        if self.capacity == 0 {
            return;
        }
        self.ids.push_back(id.to_string());
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }
}

/// Favorite-weighted sampler.
#[derive(Debug, Clone, Default)]
pub struct WeightedSampler {
    config: ShuffleConfig,
}

impl WeightedSampler {
    #[must_use]
    pub fn new(config: ShuffleConfig) -> Self {
        Self { config }
    }

    /// Sample an ordering of `entries` that over-represents favorites.
    ///
    /// Entries without a track are skipped. Membership in
    /// `double_weight_ids` makes a track a favorite even when it is missing
    /// from `favorite_ids`.
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        entries: &[PlaylistEntry],
        favorite_ids: &HashSet<String>,
        double_weight_ids: &HashSet<String>,
        rng: &mut R,
    ) -> Sample {
        let mut pool = Pool {
            entries: entries
                .iter()
                .filter_map(|entry| entry.track.as_ref())
                .map(|track| Item::from_track(track, favorite_ids, double_weight_ids))
                .collect(),
        };

        let unique_count = pool.len();
        let favorite_count = pool.entries.iter().filter(|item| item.is_favorite).count();
        let mut stats = SampleStats {
            unique_count,
            favorite_count,
            double_count: pool.entries.iter().filter(|item| item.is_double).count(),
            target_length: unique_count + self.config.repeat_factor * favorite_count,
            ..SampleStats::default()
        };
        log::debug!(
            "Sampling {} tracks ({} favorites, {} double), target length {}",
            stats.unique_count,
            stats.favorite_count,
            stats.double_count,
            stats.target_length
        );

        let mut recent = RecentWindow::new(self.config.min_repeat_gap);
        let mut output = Vec::with_capacity(stats.target_length);
        let mut consecutive_deferrals = 0;

        stats.stop = loop {
            if output.len() >= stats.target_length {
                break StopReason::TargetReached;
            }
            if pool.is_empty() {
                break StopReason::PoolExhausted;
            }
            if pool.len() > 1 && pool.all_recent(&recent) {
                log::debug!(
                    "Every pending entry was played recently, stopping at {}",
                    output.len()
                );
                break StopReason::Starved;
            }

            let Some(index) = pool.draw_index(rng.next_unit()) else {
                break StopReason::PoolExhausted;
            };
            let selected = pool.take(index);

            if recent.contains(&selected.id) && !pool.is_empty() {
                log::trace!("Deferring recently played '{}'", selected.name);
                pool.push(selected);
                stats.deferrals += 1;
                consecutive_deferrals += 1;
                if consecutive_deferrals >= self.config.max_consecutive_deferrals {
                    log::debug!("Gave up after {consecutive_deferrals} deferrals in a row");
                    break StopReason::DeferralLimit;
                }
                continue;
            }

            consecutive_deferrals = 0;
            recent.push(&selected.id);
            if selected.is_favorite {
                let weight = if selected.is_double {
                    DOUBLE_WEIGHT
                } else {
                    SINGLE_WEIGHT
                };
                pool.push(selected.requeued(weight));
            }
            log::trace!("Emitting '{}' at {}", selected.name, output.len());
            output.push(selected);
        };

        Sample { items: output, stats }
    }
}
