//! Exemplar sampling strategy and the lock-free slot that holds a cell's current exemplar.

use std::{sync::Arc, time::Duration};

use arc_swap::ArcSwapOption;

use crate::{raw::exemplar::Exemplar, util::now_millis};

/// A strategy that decides, on every observation, whether a freshly sampled exemplar should
/// replace the one currently held by a cell.
///
/// Implementations must be pure (no I/O, bounded running time) and thread-safe: the crate may
/// invoke `sample` any number of times for a single observation while retrying its CAS loop.
pub trait ExemplarSampler: Send + Sync {
    /// Given the observed `amount` and the exemplar currently held (if any), returns a new
    /// exemplar to install, or `None` to leave the slot untouched.
    fn sample(&self, amount: f64, previous: Option<&Exemplar>) -> Option<Exemplar>;
}

/// The default sampler: replaces the held exemplar if it is absent or older than a threshold
/// (7 seconds by default).
///
/// This sampler has no trace context to attach, so the exemplars it produces carry an empty
/// label set; callers who want trace/span correlation should use the `*_with_exemplar` methods,
/// which always install a caller-supplied exemplar unconditionally.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdExemplarSampler {
    threshold: Duration,
}

impl ThresholdExemplarSampler {
    /// The default replacement threshold used by [`ThresholdExemplarSampler::default`].
    pub const DEFAULT_THRESHOLD: Duration = Duration::from_secs(7);

    /// Builds a sampler with a custom threshold.
    pub fn new(threshold: Duration) -> Self {
        Self { threshold }
    }
}

impl Default for ThresholdExemplarSampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl ExemplarSampler for ThresholdExemplarSampler {
    fn sample(&self, amount: f64, previous: Option<&Exemplar>) -> Option<Exemplar> {
        let now = now_millis();
        let stale = match previous.and_then(Exemplar::timestamp_millis) {
            Some(previous_ts) => {
                now.saturating_sub(previous_ts) >= self.threshold.as_millis() as i64
            },
            None => true,
        };
        if !stale {
            return None;
        }
        // An empty label set here is intentional: see the struct docs. `expect` is safe because
        // an empty label set is always within the exemplar size bound.
        Some(
            Exemplar::new(amount, crate::raw::labels::Labels::empty(), Some(now), None, None)
                .expect("an empty label set always satisfies the exemplar size bound"),
        )
    }
}

/// A single-word, lock-free holder for a cell's current exemplar.
///
/// Reads and the sampling CAS loop never block.
#[derive(Debug, Default)]
pub struct ExemplarSlot(ArcSwapOption<Exemplar>);

impl ExemplarSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self(ArcSwapOption::empty())
    }

    /// Loads the currently held exemplar, if any.
    pub fn load(&self) -> Option<Arc<Exemplar>> {
        self.0.load_full()
    }

    /// Runs the sampler's CAS loop: `prev ← slot; next ← sampler(amount, prev); if next is
    /// some, attempt CAS(slot, prev, next)`, retrying only if the slot changed concurrently
    /// under us. Exits immediately, without writing, once the sampler returns `None`.
    pub fn try_sample(&self, amount: f64, sampler: &dyn ExemplarSampler) {
        loop {
            let prev = self.0.load_full();
            let candidate = match sampler.sample(amount, prev.as_deref()) {
                None => return,
                Some(candidate) => Arc::new(candidate),
            };
            let witnessed = self.0.compare_and_swap(&prev, Some(candidate));
            let swapped = match (&*witnessed, &prev) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            };
            if swapped {
                return;
            }
        }
    }

    /// Unconditionally installs a caller-supplied exemplar, bypassing the sampler. Used by the
    /// `*_with_exemplar` observation methods.
    pub fn set(&self, exemplar: Exemplar) {
        self.0.store(Some(Arc::new(exemplar)));
    }
}
