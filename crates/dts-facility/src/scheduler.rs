//! The facility scheduler: arrivals, admission, agent ticking, departures.
//!
//! # Step order
//!
//! ```text
//! step(now, dt)
//!   ├─ arrivals   — for every due arrival: try to spawn, then draw the next gap
//!   ├─ agents     — tick each live vehicle in spawn order; write its new
//!   │               position into the occupancy index before the next ticks
//!   └─ departures — drain the departure channel into statistics; drop
//!                   terminated vehicles
//! ```
//!
//! The index is *live*: a vehicle that moves this tick is seen at its new
//! position by every vehicle that ticks after it.

use std::sync::mpsc::{self, Receiver, Sender};

use dts_agent::{
    AgentSpawn, Departure, TerminationNotifier, TickContext, TickOutcome, VehicleAgent,
    VehicleParams,
};
use dts_core::{AgentId, AgentRng, Pose, SimRng, WaypointId};
use dts_spatial::{
    CollisionLayer, ContactEvent, OccupancyIndex, Occupant, SpatialQuery, WaypointGraph,
};

use crate::arrival::{ArrivalTimer, InterArrivalSampler};
use crate::error::{FacilityError, FacilityResult};
use crate::loader::FacilityConfig;
use crate::params::{DerivedParams, FacilityParams};
use crate::service::ServiceTimeAllocator;
use crate::stats::{DepartureRecord, FacilityStats};

/// Result of one arrival firing.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SpawnOutcome {
    Spawned(AgentId),
    /// `max_cars` vehicles already live.
    AtCapacity,
    /// Something overlaps the spawn clearance circle.
    SpawnAreaOccupied,
}

/// What one [`FacilityScheduler::step`] did.
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    pub spawns: Vec<SpawnOutcome>,
    pub outcomes: Vec<(AgentId, TickOutcome)>,
    pub departures: Vec<DepartureRecord>,
}

impl StepReport {
    pub fn spawned(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.spawns.iter().filter_map(|s| match s {
            SpawnOutcome::Spawned(id) => Some(*id),
            _ => None,
        })
    }
}

/// Where new vehicles appear and which waypoint they head for first.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpawnPoint {
    pub pose: Pose,
    pub initial_waypoint: Option<WaypointId>,
}

pub struct FacilityScheduler {
    params: FacilityParams,
    derived: DerivedParams,
    allocator: ServiceTimeAllocator,
    sampler: InterArrivalSampler,
    arrivals: ArrivalTimer,

    templates: Vec<VehicleParams>,
    spawn_pose: Pose,
    initial_waypoint: WaypointId,
    /// Largest template footprint.
    spawn_clearance: f32,
    /// Union of template layers.
    spawn_layers: CollisionLayer,

    /// Live vehicles, ascending `AgentId`.
    agents: Vec<VehicleAgent>,
    next_agent_id: AgentId,
    departures_tx: Sender<Departure>,
    departures_rx: Receiver<Departure>,

    rng: SimRng,
    seed: u64,
    stats: FacilityStats,
    stopped: bool,
}

impl FacilityScheduler {
    /// Validate `config` and the spawn point against `graph`.
    ///
    /// Fails on an empty template set, an invalid template, bad parameters,
    /// or a missing/unknown initial waypoint.
    pub fn new(
        config: FacilityConfig,
        spawn:  SpawnPoint,
        graph:  &WaypointGraph,
        seed:   u64,
    ) -> FacilityResult<Self> {
        let FacilityConfig { params, vehicles } = config;
        if vehicles.is_empty() {
            return Err(FacilityError::NoVehicleTemplates);
        }
        for t in &vehicles {
            t.validate()?;
        }
        let initial_waypoint = match spawn.initial_waypoint {
            Some(w) if w.is_valid() => w,
            _ => return Err(FacilityError::MissingInitialWaypoint),
        };
        graph.position(initial_waypoint)?;

        let derived = params.reconcile()?;
        let spawn_clearance = vehicles.iter().map(|v| v.footprint_radius).fold(0.0, f32::max);
        let spawn_layers = vehicles
            .iter()
            .fold(CollisionLayer::NONE, |acc, v| CollisionLayer(acc.0 | v.layer.0));
        let (departures_tx, departures_rx) = mpsc::channel();

        tracing::info!(
            "facility ready: mean inter-arrival {:.2}s, rho {:.3}, max_cars {}, {} template(s)",
            derived.average_inter_arrival_time,
            derived.traffic_intensity,
            params.max_cars,
            vehicles.len()
        );

        Ok(Self {
            allocator: ServiceTimeAllocator::from_params(&params, &derived),
            sampler: InterArrivalSampler::from_derived(&derived),
            arrivals: ArrivalTimer::default(),
            params,
            derived,
            templates: vehicles,
            spawn_pose: spawn.pose,
            initial_waypoint,
            spawn_clearance,
            spawn_layers,
            agents: Vec::new(),
            next_agent_id: AgentId(0),
            departures_tx,
            departures_rx,
            rng: SimRng::new(seed),
            seed,
            stats: FacilityStats::new(),
            stopped: false,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn params(&self) -> &FacilityParams { &self.params }
    pub fn derived(&self) -> &DerivedParams { &self.derived }
    pub fn traffic_intensity(&self) -> f64 { self.derived.traffic_intensity }
    pub fn allocator(&self) -> &ServiceTimeAllocator { &self.allocator }
    pub fn sampler(&self) -> &InterArrivalSampler { &self.sampler }
    pub fn stats(&self) -> &FacilityStats { &self.stats }
    pub fn templates(&self) -> &[VehicleParams] { &self.templates }
    pub fn spawn_pose(&self) -> Pose { self.spawn_pose }
    pub fn initial_waypoint(&self) -> WaypointId { self.initial_waypoint }
    pub fn spawn_clearance(&self) -> f32 { self.spawn_clearance }
    pub fn next_arrival_at(&self) -> f64 { self.arrivals.next_at() }
    pub fn is_stopped(&self) -> bool { self.stopped }

    /// Live vehicles in spawn order.
    pub fn agents(&self) -> &[VehicleAgent] { &self.agents }

    pub fn live_count(&self) -> usize { self.agents.len() }

    pub fn agent(&self, id: AgentId) -> Option<&VehicleAgent> {
        self.position_of(id).map(|i| &self.agents[i])
    }

    fn position_of(&self, id: AgentId) -> Option<usize> {
        self.agents.binary_search_by_key(&id, |a| a.id()).ok()
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Replace the parameters, recomputing every derived value.
    ///
    /// On error the previous parameters stay in force.  The pending arrival
    /// keeps its due time; the gap after it uses the new mean.
    pub fn update_params(&mut self, params: FacilityParams) -> FacilityResult<()> {
        let derived = params.reconcile()?;
        self.allocator = ServiceTimeAllocator::from_params(&params, &derived);
        self.sampler = InterArrivalSampler::from_derived(&derived);
        tracing::info!(
            "facility parameters reloaded: mean inter-arrival {:.2}s, rho {:.3}, max_cars {}",
            derived.average_inter_arrival_time,
            derived.traffic_intensity,
            params.max_cars
        );
        self.params = params;
        self.derived = derived;
        Ok(())
    }

    /// Halt the arrival process and freeze every vehicle.  Irreversible.
    pub fn stop(&mut self) {
        if !self.stopped {
            tracing::info!("facility stopped with {} live vehicle(s)", self.agents.len());
            self.stopped = true;
        }
    }

    /// Deliver a contact to the vehicle it concerns.
    pub fn notify_contact(&mut self, event: ContactEvent) {
        if self.stopped {
            return;
        }
        if let Some(i) = self.position_of(event.agent) {
            self.agents[i].notify_contact(event.other, event.layer);
        }
    }

    /// Evict a vehicle on the host's behalf.
    pub fn remove_agent(
        &mut self,
        id:    AgentId,
        now:   f64,
        index: &mut OccupancyIndex,
    ) -> Option<DepartureRecord> {
        if self.stopped {
            return None;
        }
        let i = self.position_of(id)?;
        if !self.agents[i].remove(now) {
            return None;
        }
        index.remove(id);
        let records = self.drain_departures();
        self.agents.retain(|a| !a.is_terminated());
        records.into_iter().find(|r| r.agent == id)
    }

    // ── Step ──────────────────────────────────────────────────────────────

    /// Advance the facility by one tick starting at `now`.
    pub fn step(
        &mut self,
        now:   f64,
        dt:    f32,
        graph: &WaypointGraph,
        index: &mut OccupancyIndex,
    ) -> FacilityResult<StepReport> {
        let mut report = StepReport::default();
        if self.stopped {
            return Ok(report);
        }

        while self.arrivals.is_due(now) {
            let outcome = self.try_spawn(now, graph, index)?;
            report.spawns.push(outcome);
            let gap = self.sampler.sample(&mut self.rng);
            self.arrivals.rearm(gap);
        }

        for agent in self.agents.iter_mut() {
            let outcome = {
                let ctx = TickContext::new(now, dt, graph, &*index, Some(&self.allocator));
                agent.tick(&ctx)
            };
            if agent.is_terminated() {
                index.remove(agent.id());
            } else {
                index.update(agent.id(), agent.position(), agent.is_moving());
            }
            report.outcomes.push((agent.id(), outcome));
        }

        report.departures = self.drain_departures();
        if !report.departures.is_empty() {
            self.agents.retain(|a| !a.is_terminated());
        }
        Ok(report)
    }

    fn try_spawn(
        &mut self,
        now:   f64,
        graph: &WaypointGraph,
        index: &mut OccupancyIndex,
    ) -> FacilityResult<SpawnOutcome> {
        if self.stats.current_car_count() >= self.params.max_cars {
            self.stats.record_rejected_at_capacity();
            tracing::debug!("arrival at {now:.2}s turned away: {} cars live", self.params.max_cars);
            return Ok(SpawnOutcome::AtCapacity);
        }
        let origin = self.spawn_pose.position;
        if index.circle_occupied(origin, self.spawn_clearance, self.spawn_layers, None) {
            self.stats.record_rejected_spawn_occupied();
            tracing::debug!("arrival at {now:.2}s turned away: spawn area occupied");
            return Ok(SpawnOutcome::SpawnAreaOccupied);
        }

        let template = match self.templates.len() {
            1 => 0,
            n => self.rng.gen_range(0..n),
        };
        let params = self.templates[template].clone();
        let id = self.next_agent_id;
        let occupant = Occupant {
            id,
            position: origin,
            radius: params.footprint_radius,
            layer: params.layer,
            moving: false,
        };
        let spawn = AgentSpawn {
            id,
            params,
            pose: self.spawn_pose,
            initial_waypoint: Some(self.initial_waypoint),
            spawned_at: now,
        };
        let agent = VehicleAgent::activate(
            spawn,
            graph,
            AgentRng::new(self.seed, id),
            TerminationNotifier::new(self.departures_tx.clone()),
        )?;
        index.insert(occupant)?;

        self.next_agent_id = id.successor();
        self.stats.record_arrival(now);
        self.agents.push(agent);
        tracing::debug!("spawned {id} at {now:.2}s (template {template})");
        Ok(SpawnOutcome::Spawned(id))
    }

    fn drain_departures(&mut self) -> Vec<DepartureRecord> {
        let mut records = Vec::new();
        while let Ok(d) = self.departures_rx.try_recv() {
            if let Some(rec) = self.stats.record_departure(d.agent, d.reason, d.at) {
                tracing::debug!(
                    "{} departed at {:.2}s ({}), {:.2}s in system",
                    rec.agent,
                    rec.departed_at,
                    rec.reason.as_str(),
                    rec.time_in_system
                );
                records.push(rec);
            }
        }
        records
    }
}
