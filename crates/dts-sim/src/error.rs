use dts_core::DtsError;
use dts_facility::FacilityError;
use dts_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] DtsError),

    #[error("facility error: {0}")]
    Facility(#[from] FacilityError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
