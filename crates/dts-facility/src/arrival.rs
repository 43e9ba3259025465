//! Poisson arrival process.
//!
//! Inter-arrival gaps are exponential with the configured mean, optionally
//! clamped into `[lo, hi]`.  The "sleep" between arrivals is an absolute
//! due time checked once per tick, never a blocking wait.

use dts_core::SimRng;

use crate::params::DerivedParams;

/// Tolerance on the due-time comparison, absorbing accumulated `dt` error.
const DUE_EPSILON: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InterArrivalSampler {
    mean: f64,
    bounds: Option<(f64, f64)>,
}

impl InterArrivalSampler {
    pub fn new(mean: f64, bounds: Option<(f64, f64)>) -> Self {
        Self { mean, bounds }
    }

    pub fn from_derived(derived: &DerivedParams) -> Self {
        Self::new(derived.average_inter_arrival_time, derived.arrival_bounds)
    }

    pub fn mean(&self) -> f64 { self.mean }
    pub fn bounds(&self) -> Option<(f64, f64)> { self.bounds }

    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        let gap = rng.exponential(self.mean);
        match self.bounds {
            Some((lo, hi)) if hi >= lo => gap.clamp(lo, hi),
            _ => gap,
        }
    }
}

/// Countdown to the next arrival.  Starts due, so the first arrival is
/// attempted on the first tick.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ArrivalTimer {
    next_at: f64,
}

impl ArrivalTimer {
    pub fn next_at(&self) -> f64 { self.next_at }

    /// Seconds until the next arrival, floored at zero.
    pub fn remaining(&self, now: f64) -> f64 {
        (self.next_at - now).max(0.0)
    }

    #[inline]
    pub fn is_due(&self, now: f64) -> bool {
        now + DUE_EPSILON >= self.next_at
    }

    /// Schedule the next arrival `gap` seconds after the one that just fired.
    pub fn rearm(&mut self, gap: f64) {
        self.next_at += gap.max(0.0);
    }
}
