//! The per-vehicle tick state machine.
//!
//! # Tick algorithm
//!
//! Evaluated in this order; the first rule that returns ends the tick.
//!
//! 1. **Emergency brake.**  A contact delivered since the last tick arms the
//!    traffic timer with `collision_recovery_secs`.
//! 2. **Traffic wait.**  Count the traffic timer down.  On expiry re-check
//!    the collision cone and re-arm with `traffic_wait_secs` if still
//!    blocked.  When no traffic wait is active, a cone hit arms one.
//! 3. **Service wait.**  Count the service timer down.  On expiry mark the
//!    stop as served, then stay put if the cone or the queue slot is
//!    occupied.
//! 4. **Steer and arrive.**  Turn toward the current waypoint.  Inside
//!    `stop_distance` either start the service wait (stop points, once per
//!    visit) or pick the next waypoint; at a terminal, depart.
//! 5. **Queue slot.**  Stay put if the slot ahead is occupied.
//! 6. **Advance** by `speed · dt` along the heading.
//!
//! The traffic and service timers are independent: a vehicle that is braked
//! while being served resumes its service countdown once the brake clears.

use dts_core::{AgentId, AgentRng, Pose, Vec2, WaypointId};
use dts_core::geo::lerp_heading;
use dts_spatial::{CollisionLayer, OrientedBox, SpatialQuery, WaypointGraph};

use crate::context::TickContext;
use crate::error::{AgentError, AgentResult};
use crate::notifier::{Departure, DepartureReason, TerminationNotifier};
use crate::params::{QueueSlotPolicy, VehicleParams};
use crate::state::VehicleState;

/// Why a vehicle declined to move this tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BlockReason {
    /// Another vehicle inside the forward collision cone.
    Cone,
    /// The queue slot ahead is occupied.
    QueueSlot,
}

/// What happened during one call to [`VehicleAgent::tick`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    /// Already terminated, or the current waypoint vanished; nothing done.
    Idle,
    /// A contact forced an emergency stop.
    Braked,
    /// Traffic timer still running.
    WaitingForTraffic,
    /// Service timer still running.
    WaitingForService,
    /// Arrived at a stop point and started its service wait.
    EnteredService,
    Blocked(BlockReason),
    /// Moved forward.
    Advanced,
    /// Reached a terminal waypoint and departed this tick.
    Terminated,
}

/// Everything needed to activate one vehicle.
#[derive(Clone, Debug)]
pub struct AgentSpawn {
    pub id: AgentId,
    pub params: VehicleParams,
    pub pose: Pose,
    pub initial_waypoint: Option<WaypointId>,
    /// Simulated seconds at activation.
    pub spawned_at: f64,
}

pub struct VehicleAgent {
    id: AgentId,
    params: VehicleParams,
    pose: Pose,
    current_waypoint: WaypointId,
    spawned_at: f64,

    traffic_timer: Option<f32>,
    service_timer: Option<f32>,
    remaining_wait_time: f32,
    has_waited_at_current_stop: bool,

    /// Single-slot inbox: set by [`notify_contact`](Self::notify_contact),
    /// drained at the start of the next tick.
    touched: bool,
    moving: bool,
    terminated: bool,

    rng: AgentRng,
    notifier: TerminationNotifier,
}

impl VehicleAgent {
    /// Validate `spawn` against `graph` and build the vehicle.
    ///
    /// A missing or unknown initial waypoint refuses activation.
    pub fn activate(
        spawn:    AgentSpawn,
        graph:    &WaypointGraph,
        rng:      AgentRng,
        notifier: TerminationNotifier,
    ) -> AgentResult<Self> {
        let AgentSpawn { id, params, pose, initial_waypoint, spawned_at } = spawn;
        let waypoint = match initial_waypoint {
            Some(w) if w.is_valid() => w,
            _ => return Err(AgentError::MissingInitialWaypoint(id)),
        };
        if !graph.contains(waypoint) {
            return Err(AgentError::UnknownWaypoint { agent: id, waypoint });
        }
        params.validate()?;

        Ok(Self {
            id,
            params,
            pose,
            current_waypoint: waypoint,
            spawned_at,
            traffic_timer: None,
            service_timer: None,
            remaining_wait_time: 0.0,
            has_waited_at_current_stop: false,
            touched: false,
            moving: false,
            terminated: false,
            rng,
            notifier,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId { self.id }
    pub fn pose(&self) -> Pose { self.pose }
    pub fn position(&self) -> Vec2 { self.pose.position }
    pub fn params(&self) -> &VehicleParams { &self.params }
    pub fn current_waypoint(&self) -> WaypointId { self.current_waypoint }
    pub fn spawned_at(&self) -> f64 { self.spawned_at }
    pub fn has_waited_at_current_stop(&self) -> bool { self.has_waited_at_current_stop }

    /// `true` if the last tick moved the vehicle.
    pub fn is_moving(&self) -> bool { self.moving }

    pub fn is_terminated(&self) -> bool { self.terminated }

    pub fn state(&self) -> VehicleState {
        if self.terminated {
            VehicleState::Terminated
        } else if self.traffic_timer.is_some() {
            VehicleState::WaitingForTraffic
        } else if self.service_timer.is_some() {
            VehicleState::WaitingForService
        } else {
            VehicleState::Traveling
        }
    }

    /// Seconds left on the active wait, or `0` when not waiting.
    pub fn remaining_wait_time(&self) -> f32 {
        if self.state().is_waiting() { self.remaining_wait_time.max(0.0) } else { 0.0 }
    }

    // ── Host events ───────────────────────────────────────────────────────

    /// "You are now touching `other` on `layer`."  Ignored for self-contact,
    /// foreign layers, and terminated vehicles.
    pub fn notify_contact(&mut self, other: AgentId, layer: CollisionLayer) {
        if !self.terminated && other != self.id && layer.intersects(self.params.layer) {
            self.touched = true;
        }
    }

    /// Evict the vehicle.  Returns `false` if it had already departed.
    pub fn remove(&mut self, now: f64) -> bool {
        self.terminate(DepartureReason::Removed, now)
    }

    fn terminate(&mut self, reason: DepartureReason, now: f64) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;
        self.moving = false;
        self.traffic_timer = None;
        self.service_timer = None;
        self.notifier.fire(Departure { agent: self.id, reason, at: now });
        true
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    pub fn tick(&mut self, ctx: &TickContext<'_>) -> TickOutcome {
        if self.terminated {
            return TickOutcome::Idle;
        }
        let outcome = self.step(ctx);
        self.moving = outcome == TickOutcome::Advanced;
        outcome
    }

    fn step(&mut self, ctx: &TickContext<'_>) -> TickOutcome {
        if std::mem::take(&mut self.touched) {
            self.arm_traffic_wait(self.params.collision_recovery_secs);
            return TickOutcome::Braked;
        }

        if let Some(timer) = self.traffic_timer {
            let left = timer - ctx.dt;
            self.remaining_wait_time = left;
            if left > 0.0 {
                self.traffic_timer = Some(left);
                return TickOutcome::WaitingForTraffic;
            }
            self.traffic_timer = None;
            if self.vehicle_ahead(ctx.spatial) {
                self.arm_traffic_wait(self.params.traffic_wait_secs);
                return TickOutcome::Blocked(BlockReason::Cone);
            }
        } else if self.vehicle_ahead(ctx.spatial) {
            self.arm_traffic_wait(self.params.traffic_wait_secs);
            return TickOutcome::Blocked(BlockReason::Cone);
        }

        if let Some(timer) = self.service_timer {
            let left = timer - ctx.dt;
            self.remaining_wait_time = left;
            if left > 0.0 {
                self.service_timer = Some(left);
                return TickOutcome::WaitingForService;
            }
            self.service_timer = None;
            self.has_waited_at_current_stop = true;
            if self.vehicle_ahead(ctx.spatial) {
                return TickOutcome::Blocked(BlockReason::Cone);
            }
            if self.queue_slot_blocked(ctx.spatial) {
                return TickOutcome::Blocked(BlockReason::QueueSlot);
            }
        }

        let Ok(waypoint) = ctx.graph.waypoint(self.current_waypoint) else {
            return TickOutcome::Idle;
        };

        let to_target = waypoint.position - self.pose.position;
        if to_target.length_squared() > 0.0 {
            let fraction = self.params.rotation_speed * ctx.dt;
            self.pose.heading = lerp_heading(self.pose.heading, to_target.heading(), fraction);
        }

        let stop = self.params.stop_distance;
        if to_target.length_squared() < stop * stop {
            if waypoint.is_stop_point && !self.has_waited_at_current_stop {
                let wait = ctx
                    .service
                    .map_or(0.0, |s| s.service_wait_time(waypoint.service_type, &mut self.rng))
                    .max(0.0);
                self.service_timer = Some(wait);
                self.remaining_wait_time = wait;
                return TickOutcome::EnteredService;
            }
            match ctx.graph.choose_next(self.current_waypoint, &mut self.rng) {
                Some(next) => {
                    self.current_waypoint = next;
                    self.has_waited_at_current_stop = false;
                }
                None => {
                    self.terminate(DepartureReason::JourneyComplete, ctx.now);
                    return TickOutcome::Terminated;
                }
            }
        }

        if self.queue_slot_blocked(ctx.spatial) {
            return TickOutcome::Blocked(BlockReason::QueueSlot);
        }

        self.pose.advance(self.params.speed * ctx.dt);
        TickOutcome::Advanced
    }

    fn arm_traffic_wait(&mut self, secs: f32) {
        self.traffic_timer = Some(secs);
        self.remaining_wait_time = secs;
    }

    // ── Perception ────────────────────────────────────────────────────────

    /// Whether another vehicle within `detection_distance` lies inside the
    /// forward cone.  A vehicle at exactly our position counts as ahead.
    pub fn vehicle_ahead(&self, spatial: &dyn SpatialQuery) -> bool {
        let forward = self.pose.forward();
        let half_cone = self.params.cone_half_angle();
        spatial
            .query_circle(self.pose.position, self.params.detection_distance, self.params.layer, Some(self.id))
            .iter()
            .any(|o| forward.angle_between(o.position - self.pose.position) <= half_cone)
    }

    /// The rectangle `waiting_gap` long directly ahead of the vehicle.
    pub fn queue_slot(&self) -> OrientedBox {
        let gap = self.params.waiting_gap;
        OrientedBox::new(
            self.pose.position + self.pose.forward() * (gap * 0.5),
            Vec2::new(gap * 0.5, self.params.queue_slot_width * 0.5),
            self.pose.heading,
        )
    }

    pub fn queue_slot_blocked(&self, spatial: &dyn SpatialQuery) -> bool {
        let hits = spatial.query_oriented_box(&self.queue_slot(), self.params.layer, Some(self.id));
        match self.params.queue_policy {
            QueueSlotPolicy::BlockAny => !hits.is_empty(),
            QueueSlotPolicy::BlockStationaryOnly => hits.iter().any(|o| !o.moving),
        }
    }
}
