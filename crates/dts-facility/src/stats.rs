//! Occupancy, throughput, and time-in-system bookkeeping.
//!
//! Entry times are kept in a FIFO: each departure pops the *oldest* entry,
//! whichever vehicle actually left.  Time in system is therefore the
//! arrival-order approximation, exact whenever vehicles leave in the order
//! they came.  The live car count is the FIFO length, so the two can never
//! disagree.

use std::collections::VecDeque;

use dts_agent::DepartureReason;
use dts_core::AgentId;

/// One vehicle leaving the facility.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DepartureRecord {
    pub agent: AgentId,
    /// Oldest outstanding entry time at the moment of departure.
    pub entered_at: f64,
    pub departed_at: f64,
    pub time_in_system: f64,
    pub reason: DepartureReason,
}

#[derive(Clone, Debug, Default)]
pub struct FacilityStats {
    entry_times: VecDeque<f64>,
    total_cars_served: u64,
    average_time_in_system: f64,
    total_spawned: u64,
    total_removed: u64,
    rejected_at_capacity: u64,
    rejected_spawn_occupied: u64,
}

impl FacilityStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_car_count(&self) -> usize { self.entry_times.len() }
    pub fn total_cars_served(&self) -> u64 { self.total_cars_served }
    pub fn average_time_in_system(&self) -> f64 { self.average_time_in_system }
    pub fn total_spawned(&self) -> u64 { self.total_spawned }
    /// Departures caused by host eviction (included in `total_cars_served`).
    pub fn total_removed(&self) -> u64 { self.total_removed }
    pub fn rejected_at_capacity(&self) -> u64 { self.rejected_at_capacity }
    pub fn rejected_spawn_occupied(&self) -> u64 { self.rejected_spawn_occupied }

    /// Outstanding entry times, oldest first.
    pub fn entry_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.entry_times.iter().copied()
    }

    pub fn record_arrival(&mut self, now: f64) {
        self.entry_times.push_back(now);
        self.total_spawned += 1;
    }

    pub fn record_rejected_at_capacity(&mut self) {
        self.rejected_at_capacity += 1;
    }

    pub fn record_rejected_spawn_occupied(&mut self) {
        self.rejected_spawn_occupied += 1;
    }

    /// Pop the oldest entry and fold the departure into the running mean.
    ///
    /// A departure with no outstanding entry is a double notification; it
    /// is logged and ignored, leaving the count at zero.
    pub fn record_departure(
        &mut self,
        agent: AgentId,
        reason: DepartureReason,
        now: f64,
    ) -> Option<DepartureRecord> {
        let Some(entered_at) = self.entry_times.pop_front() else {
            tracing::warn!("departure of {agent} with no recorded entry; car count stays at 0");
            return None;
        };
        let time_in_system = now - entered_at;
        self.total_cars_served += 1;
        let n = self.total_cars_served as f64;
        self.average_time_in_system = (self.average_time_in_system * (n - 1.0) + time_in_system) / n;
        if reason == DepartureReason::Removed {
            self.total_removed += 1;
        }
        Some(DepartureRecord { agent, entered_at, departed_at: now, time_in_system, reason })
    }

    /// Cars served per simulated hour over `elapsed_secs`.
    pub fn throughput_per_hour(&self, elapsed_secs: f64) -> f64 {
        if elapsed_secs > 0.0 {
            self.total_cars_served as f64 * 3600.0 / elapsed_secs
        } else {
            0.0
        }
    }
}
