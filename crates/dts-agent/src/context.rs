//! Borrowed world state lent to a vehicle for one tick.

use dts_spatial::{SpatialQuery, WaypointGraph};

use crate::service::ServiceTimeSource;

/// Everything a [`VehicleAgent`][crate::VehicleAgent] may consult during
/// [`tick`][crate::VehicleAgent::tick].
///
/// Built by the caller per agent per tick; all borrows end when the tick
/// returns, so the caller is free to update the spatial index between
/// agents.
pub struct TickContext<'a> {
    /// Simulated seconds at the start of this tick.
    pub now: f64,
    /// Seconds covered by this tick.
    pub dt: f32,
    pub graph: &'a WaypointGraph,
    pub spatial: &'a dyn SpatialQuery,
    /// `None` means every service stop costs zero time.
    pub service: Option<&'a dyn ServiceTimeSource>,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        now:     f64,
        dt:      f32,
        graph:   &'a WaypointGraph,
        spatial: &'a dyn SpatialQuery,
        service: Option<&'a dyn ServiceTimeSource>,
    ) -> Self {
        Self { now, dt, graph, spatial, service }
    }
}
