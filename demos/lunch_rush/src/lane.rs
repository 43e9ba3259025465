//! The lunch-rush drive-thru lane.
//!
//! ```text
//!                              exit (14,16)
//!                                 ▲
//!                          pickup window (14,11)  Preparation
//!                                 ▲
//!                          pay window (14,6)      Payment
//!                                 ▲
//!   entry ──► approach ──► menu board ──► corner
//!   (0,0)     (5,0)        (9,0) Order    (14,0)
//! ```
//!
//! Stops are spaced further apart than a queued car plus its waiting gap so
//! a short queue can form between windows.

use dts_core::{Vec2, WaypointId};
use dts_spatial::{ServiceType, SpatialResult, Waypoint, WaypointGraph, WaypointGraphBuilder};

/// Build the lane.  Returns the graph and its entry waypoint.
pub fn build_lane() -> SpatialResult<(WaypointGraph, WaypointId)> {
    let mut b = WaypointGraphBuilder::new();

    let entry    = b.add_waypoint(Waypoint::path(Vec2::new(0.0, 0.0)));
    let approach = b.add_waypoint(Waypoint::path(Vec2::new(5.0, 0.0)));
    let menu     = b.add_waypoint(Waypoint::stop(Vec2::new(9.0, 0.0), ServiceType::Order));
    let corner   = b.add_waypoint(Waypoint::path(Vec2::new(14.0, 0.0)));
    let pay      = b.add_waypoint(Waypoint::stop(Vec2::new(14.0, 6.0), ServiceType::Payment));
    let pickup   = b.add_waypoint(Waypoint::stop(Vec2::new(14.0, 11.0), ServiceType::Preparation));
    let exit     = b.add_waypoint(Waypoint::path(Vec2::new(14.0, 16.0)));

    b.add_chain(&[entry, approach, menu, corner, pay, pickup, exit]);
    Ok((b.build()?, entry))
}
