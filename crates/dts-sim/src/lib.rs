//! `dts-sim` — tick loop orchestrator for the drive-thru simulator.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ⓪ Stop       — a raised StopHandle halts the facility and ends the run.
//!   ① Contacts   — ContactTracker diffs footprint overlaps in the occupancy
//!                  index; each new pair is delivered to both vehicles.
//!   ② Facility   — FacilityScheduler::step: due arrivals spawn (or are
//!                  turned away), vehicles tick in spawn order against the
//!                  live index, departures drain into statistics.
//!   ③ Observers  — on_departure per record, on_tick_end with a summary,
//!                  on_snapshot every output_interval_ticks.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dts_core::SimConfig;
//! use dts_facility::FacilityConfig;
//! use dts_sim::{NoopObserver, SimBuilder};
//!
//! let config = SimConfig::for_duration(3_600.0, 0.05, 42);
//! let mut sim = SimBuilder::new(config, graph, FacilityConfig::default()).build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("{} served", sim.facility.stats().total_cars_served());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use sim::{Sim, StopHandle};
