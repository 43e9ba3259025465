//! Spatial-subsystem error type.

use thiserror::Error;

use dts_core::{AgentId, WaypointId};

/// Errors produced by `dts-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("{0} not found in graph")]
    WaypointNotFound(WaypointId),

    #[error("link {from} -> {to} references a missing waypoint")]
    DanglingLink { from: WaypointId, to: WaypointId },

    #[error("occupant {0} is already indexed")]
    DuplicateOccupant(AgentId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
