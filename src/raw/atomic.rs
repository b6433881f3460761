//! A single-word atomic `f64`, bit-cast onto `AtomicU64`.
//!
//! This is the building block for every numeric cell in the crate: gauges store a value in one
//! directly, counters and histogram sums wrap one in a monotonic [`DoubleAdder`].

use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` that can be read and written across threads without a lock.
#[derive(Debug, Default)]
pub struct AtomicF64(AtomicU64);

impl AtomicF64 {
    /// Creates a new atomic float with the given initial value.
    pub fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    /// Loads the current value.
    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Stores a new value, discarding whatever was there.
    #[inline]
    pub fn set(&self, value: f64) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Adds `delta` to the current value via a compare-and-swap loop, returning the previous
    /// value. `delta` may be negative; callers that need monotonicity enforce it themselves
    /// before calling this.
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        let old_bits = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |old_bits| {
                let old = f64::from_bits(old_bits);
                Some((old + delta).to_bits())
            })
            .unwrap_or_else(|bits| bits);
        f64::from_bits(old_bits)
    }
}

/// A non-decreasing `f64` accumulator used by counters and histogram sums.
///
/// Conceptually a striped/sharded adder under heavy contention; here it is a single CAS-looped
/// word, which is sufficient to satisfy the associativity and lock-freedom requirements without
/// the bookkeeping of a sharded implementation.
#[derive(Debug, Default)]
pub struct DoubleAdder(AtomicF64);

impl DoubleAdder {
    /// Creates a new adder starting at zero.
    pub fn new() -> Self {
        Self(AtomicF64::new(0.0))
    }

    /// Adds a non-negative amount, returning the previous total.
    #[inline]
    pub fn add(&self, amount: f64) -> f64 {
        self.0.add(amount)
    }

    /// Returns the current total.
    #[inline]
    pub fn get(&self) -> f64 {
        self.0.get()
    }
}
