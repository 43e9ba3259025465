//! Simulation observer trait for progress reporting and data collection.

use dts_agent::VehicleAgent;
use dts_core::Tick;
use dts_facility::{DepartureRecord, FacilityStats};

/// Facility state at the end of one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TickSummary {
    pub tick: Tick,
    /// Simulated seconds at the start of the tick.
    pub now: f64,
    /// Vehicles in the facility after the tick.
    pub live: usize,
    pub spawned: usize,
    pub turned_away: usize,
    pub departures: usize,
    /// New contact pairs delivered this tick (each pair counted once per side).
    pub contacts: usize,
    pub total_served: u64,
    pub average_time_in_system: f64,
    pub traffic_intensity: f64,
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  An observer that wants to end the run
/// early holds a clone of the sim's [`StopHandle`][crate::StopHandle].
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, s: &TickSummary) {
///         if s.tick.0 % self.interval == 0 {
///             println!("{}: {} cars, {} served", s.tick, s.live, s.total_served);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick, _now: f64) {}

    /// Called once per departure, in the order they were recorded.
    fn on_departure(&mut self, _tick: Tick, _record: &DepartureRecord) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    ///
    /// `vehicles` is every live vehicle in spawn order, read-only.
    fn on_snapshot(&mut self, _tick: Tick, _now: f64, _vehicles: &[VehicleAgent]) {}

    /// Called once when the run ends, either at `end_tick` or on stop.
    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &FacilityStats) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
