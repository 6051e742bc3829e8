use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Random source for every probabilistic decision in the core (50/50 exercise
/// branches, lesson sizing, distractor shuffles, weighted proposer picks).
///
/// Kept behind one seedable handle so production uses entropy while tests pin
/// a seed and get deterministic branches.
#[derive(Debug, Clone)]
pub struct PracticeRng {
    inner: StdRng,
}

impl PracticeRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// True with probability `p` (clamped to [0, 1]).
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Random integer in `[lo, hi]` inclusive. `lo > hi` yields `lo`.
    pub fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        if lo >= hi {
            return lo;
        }
        self.inner.gen_range(lo..=hi)
    }

    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.inner.gen_range(0..len)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Up to `count` distinct items, in random order.
    pub fn sample<T: Clone>(&mut self, items: &[T], count: usize) -> Vec<T> {
        let mut pool: Vec<T> = items.to_vec();
        pool.shuffle(&mut self.inner);
        pool.truncate(count.min(pool.len()));
        pool
    }
}

impl Default for PracticeRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
