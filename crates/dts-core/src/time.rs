//! Simulation time model.
//!
//! # Design
//!
//! Time advances in discrete ticks.  Each tick carries a delta in seconds
//! (`dt`), fixed by `SimConfig::tick_duration_secs` or supplied per step by
//! the host.  `SimClock` accumulates the elapsed seconds so that `now()` is
//! monotonically increasing even with a variable `dt`:
//!
//!   now = Σ dt over all advanced ticks
//!
//! Elapsed time is held in `f64` so that long runs at sub-second resolution
//! do not lose precision; per-tick deltas stay `f32` because they feed
//! single-precision kinematics.

use std::fmt;

use crate::{DtsError, DtsResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// The host's notion of time as seen by the simulation core.
pub trait Clock {
    /// Seconds since the start of the run.  Never decreases.
    fn now(&self) -> f64;

    /// Seconds covered by the current tick.
    fn delta(&self) -> f32;
}

/// Tick counter plus accumulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Default step used by [`advance`](Self::advance).
    pub tick_duration_secs: f32,
    /// The current tick — advanced once per step.
    pub current_tick: Tick,
    /// Seconds elapsed at the start of `current_tick`.
    pub elapsed_secs: f64,
    /// Delta of the step most recently taken (or the default before the
    /// first step).
    last_delta: f32,
}

impl SimClock {
    pub fn new(tick_duration_secs: f32) -> Self {
        Self {
            tick_duration_secs,
            current_tick: Tick::ZERO,
            elapsed_secs: 0.0,
            last_delta:   tick_duration_secs,
        }
    }

    /// Advance by one fixed-duration tick.
    #[inline]
    pub fn advance(&mut self) {
        self.advance_by(self.tick_duration_secs);
    }

    /// Advance by one tick of `dt` seconds.  Negative deltas are treated as
    /// zero so `now()` stays monotonic.
    pub fn advance_by(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.current_tick = self.current_tick + 1;
        self.elapsed_secs += dt as f64;
        self.last_delta = dt;
    }

    /// Break elapsed time into (hour, minute, second) components.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let total = self.elapsed_secs.max(0.0) as u64;
        let hours = total / 3_600;
        let minutes = ((total % 3_600) / 60) as u32;
        let seconds = (total % 60) as u32;
        (hours, minutes, seconds)
    }

    /// How many fixed ticks span `secs` seconds? (rounds up)
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        if self.tick_duration_secs <= 0.0 {
            return 0;
        }
        (secs / self.tick_duration_secs as f64).ceil().max(0.0) as u64
    }
}

impl Clock for SimClock {
    #[inline]
    fn now(&self) -> f64 {
        self.elapsed_secs
    }

    #[inline]
    fn delta(&self) -> f32 {
        self.last_delta
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per tick.  Default: 0.02 (50 Hz).
    pub tick_duration_secs: f32,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Snapshot vehicle state every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl SimConfig {
    /// Configuration covering `secs` simulated seconds at `tick_duration_secs`.
    pub fn for_duration(secs: f64, tick_duration_secs: f32, seed: u64) -> Self {
        let clock = SimClock::new(tick_duration_secs);
        Self {
            tick_duration_secs,
            total_ticks: clock.ticks_for_secs(secs),
            seed,
            output_interval_ticks: 0,
        }
    }

    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Simulated seconds covered by a full run.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.total_ticks as f64 * self.tick_duration_secs as f64
    }

    /// Reject a tick duration that is zero, negative, or not finite.
    pub fn validate(&self) -> DtsResult<()> {
        let dt = self.tick_duration_secs;
        if dt.is_finite() && dt > 0.0 {
            Ok(())
        } else {
            Err(DtsError::InvalidTickDuration(dt))
        }
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs:    0.02,
            total_ticks:           0,
            seed:                  0,
            output_interval_ticks: 0,
        }
    }
}
