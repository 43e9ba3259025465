//! Fluent builder for constructing a [`Sim`].

use dts_core::{Pose, SimConfig, WaypointId};
use dts_facility::{FacilityConfig, FacilityScheduler, SpawnPoint};
use dts_spatial::WaypointGraph;

use crate::{Sim, SimError, SimResult, StopHandle};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, tick duration, …
/// - [`WaypointGraph`] — the lane topology
/// - [`FacilityConfig`] — queueing parameters plus vehicle templates
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                                   |
/// |---------------------|-----------------------------------------------------------|
/// | `.spawn_point(p)`   | At `WaypointId(0)`, facing its first successor            |
/// | `.stop_handle(h)`   | A fresh, unraised `StopHandle`                            |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, graph, facility)
///     .spawn_point(SpawnPoint { pose, initial_waypoint: Some(entry) })
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    graph:    WaypointGraph,
    facility: FacilityConfig,
    spawn:    Option<SpawnPoint>,
    stop:     Option<StopHandle>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, graph: WaypointGraph, facility: FacilityConfig) -> Self {
        Self { config, graph, facility, spawn: None, stop: None }
    }

    /// Where vehicles appear and which waypoint they target first.
    pub fn spawn_point(mut self, spawn: SpawnPoint) -> Self {
        self.spawn = Some(spawn);
        self
    }

    /// Share an existing stop flag (e.g. one already handed to a signal
    /// handler) instead of creating a new one.
    pub fn stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Validate inputs, build the facility scheduler, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;

        let spawn = match self.spawn {
            Some(s) => s,
            None => default_spawn(&self.graph)?,
        };
        if let Some(start) = spawn.initial_waypoint {
            if self.graph.contains(start) && self.graph.cycle_reachable_from(start) {
                tracing::warn!(
                    "waypoint cycle reachable from {start}: vehicles may circulate until removed"
                );
            }
        }

        let facility = FacilityScheduler::new(self.facility, spawn, &self.graph, self.config.seed)?;
        Ok(Sim::from_parts(self.config, self.graph, facility, self.stop.unwrap_or_default()))
    }
}

/// Spawn on the first waypoint, heading along its first outgoing link.
fn default_spawn(graph: &WaypointGraph) -> SimResult<SpawnPoint> {
    let first = WaypointId(0);
    if graph.is_empty() {
        return Err(SimError::Config("waypoint graph is empty".into()));
    }
    let position = graph.position(first)?;
    let heading = match graph.next(first).first() {
        Some(&next) => (graph.position(next)? - position).heading(),
        None => 0.0,
    };
    Ok(SpawnPoint { pose: Pose::new(position, heading), initial_waypoint: Some(first) })
}
