use thiserror::Error;

use dts_core::{AgentId, WaypointId};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{0} has no initial waypoint")]
    MissingInitialWaypoint(AgentId),

    #[error("{agent}: initial {waypoint} is not in the graph")]
    UnknownWaypoint { agent: AgentId, waypoint: WaypointId },

    #[error("invalid vehicle parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

pub type AgentResult<T> = Result<T, AgentError>;
