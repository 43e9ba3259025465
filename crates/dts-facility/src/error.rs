use thiserror::Error;

use dts_agent::AgentError;
use dts_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum FacilityError {
    #[error("facility has no vehicle templates")]
    NoVehicleTemplates,

    #[error("stage percentages order={order} + payment={payment} exceed 1 or fall outside [0, 1]")]
    StagePercentages { order: f32, payment: f32 },

    #[error("invalid facility parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("facility has no initial waypoint")]
    MissingInitialWaypoint,

    #[error("facility config parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FacilityResult<T> = Result<T, FacilityError>;
