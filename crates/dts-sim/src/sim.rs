//! The `Sim` struct and its tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dts_agent::VehicleAgent;
use dts_core::{AgentId, Clock, SimClock, SimConfig, Tick};
use dts_facility::{DepartureRecord, FacilityParams, FacilityScheduler};
use dts_spatial::{ContactTracker, OccupancyIndex, WaypointGraph};

use crate::{SimObserver, SimResult, TickSummary};

// ── StopHandle ────────────────────────────────────────────────────────────────

/// Shared cancellation flag.
///
/// Clones share one flag, so a handle can be moved to another thread or
/// into an observer.  The sim checks it at every tick boundary.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim` owns the lane graph, the occupancy index every vehicle queries, the
/// contact tracker, and the facility scheduler that owns the vehicles.  One
/// tick is:
///
/// 1. **Contacts**: overlaps that began since the previous tick are delivered
///    to both vehicles involved.
/// 2. **Facility**: arrivals, vehicle ticks, departures
///    (see [`FacilityScheduler::step`]).
/// 3. **Observers**: departure, tick-end and snapshot hooks.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, tick duration, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and elapsed seconds.
    pub clock: SimClock,

    /// Lane topology.  Immutable for the whole run.
    pub graph: WaypointGraph,

    /// Footprints of every live vehicle; updated as each one ticks.
    pub index: OccupancyIndex,

    /// Edge-triggered overlap detection over `index`.
    pub contacts: ContactTracker,

    /// Arrivals, admission, live vehicles and statistics.
    pub facility: FacilityScheduler,

    stop: StopHandle,
}

impl Sim {
    pub(crate) fn from_parts(
        config:   SimConfig,
        graph:    WaypointGraph,
        facility: FacilityScheduler,
        stop:     StopHandle,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            graph,
            index: OccupancyIndex::new(),
            contacts: ContactTracker::new(),
            facility,
            stop,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// A handle that stops this sim at the next tick boundary.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Seconds elapsed at the start of the current tick.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// `true` once a stop has taken effect.
    pub fn is_stopped(&self) -> bool {
        self.facility.is_stopped()
    }

    /// Live vehicles in spawn order.
    pub fn vehicles(&self) -> &[VehicleAgent] {
        self.facility.agents()
    }

    /// Run the simulation from the current tick to `config.end_tick()`, or
    /// until a stop is requested.
    ///
    /// Calls observer hooks at every tick boundary and `on_sim_end` once.
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        tracing::info!(
            "run start: {} ticks of {}s, seed {}",
            self.config.total_ticks,
            self.config.tick_duration_secs,
            self.config.seed
        );
        while self.clock.current_tick < self.config.end_tick() {
            if self.step(observer)?.is_none() {
                break;
            }
        }
        let stats = self.facility.stats();
        tracing::info!(
            "run end at {}: {} spawned, {} served, {:.2}s mean time in system, {:.1} cars/h",
            self.clock,
            stats.total_spawned(),
            stats.total_cars_served(),
            stats.average_time_in_system(),
            stats.throughput_per_hour(self.clock.now())
        );
        observer.on_sim_end(self.clock.current_tick, stats);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Stops early if a stop is requested.  Useful for tests and incremental
    /// stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            if self.step(observer)?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Process one tick of the configured duration.  Returns `None`, without
    /// advancing the clock, once the sim has stopped.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Option<TickSummary>> {
        let dt = self.clock.tick_duration_secs;
        self.step_with(dt, observer)
    }

    /// Process one tick covering `dt` seconds, for hosts that drive the sim
    /// from their own frame clock.  A negative `dt` counts as zero.
    pub fn step_with<O: SimObserver>(
        &mut self,
        dt: f32,
        observer: &mut O,
    ) -> SimResult<Option<TickSummary>> {
        if self.stop.is_stop_requested() {
            self.facility.stop();
        }
        if self.facility.is_stopped() {
            return Ok(None);
        }
        let dt = dt.max(0.0);
        let summary = self.process_tick(dt, observer)?;
        self.clock.advance_by(dt);
        Ok(Some(summary))
    }

    /// Evict a vehicle now, on the host's behalf.
    pub fn remove_agent(&mut self, id: AgentId) -> Option<DepartureRecord> {
        let now = self.clock.now();
        let record = self.facility.remove_agent(id, now, &mut self.index)?;
        self.contacts.forget(id);
        Some(record)
    }

    /// Hot-reload the facility parameters.  See
    /// [`FacilityScheduler::update_params`].
    pub fn update_params(&mut self, params: FacilityParams) -> SimResult<()> {
        self.facility.update_params(params)?;
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, dt: f32, observer: &mut O) -> SimResult<TickSummary> {
        let tick: Tick = self.clock.current_tick;
        let now = self.clock.now();
        observer.on_tick_start(tick, now);

        // ── Phase 1: contacts that began since the last tick ──────────────
        let events = self.contacts.detect(&self.index);
        for event in &events {
            self.facility.notify_contact(*event);
        }

        // ── Phase 2: arrivals, vehicle ticks, departures ──────────────────
        let report = self.facility.step(now, dt, &self.graph, &mut self.index)?;
        for record in &report.departures {
            self.contacts.forget(record.agent);
            observer.on_departure(tick, record);
        }

        // ── Phase 3: observers ────────────────────────────────────────────
        let spawned = report.spawned().count();
        let stats = self.facility.stats();
        let summary = TickSummary {
            tick,
            now,
            live: self.facility.live_count(),
            spawned,
            turned_away: report.spawns.len() - spawned,
            departures: report.departures.len(),
            contacts: events.len(),
            total_served: stats.total_cars_served(),
            average_time_in_system: stats.average_time_in_system(),
            traffic_intensity: self.facility.traffic_intensity(),
        };
        observer.on_tick_end(&summary);
        if self.config.output_interval_ticks > 0
            && tick.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(tick, now, self.facility.agents());
        }
        Ok(summary)
    }
}
