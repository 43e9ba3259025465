//! TOML facility configuration.
//!
//! # Format
//!
//! ```toml
//! [facility]
//! customers_per_hour   = 40.0
//! average_service_time = 120.0
//! order_percentage     = 0.25
//! payment_percentage   = 0.15
//! max_cars             = 8
//!
//! [[vehicle]]
//! speed            = 2.0
//! footprint_radius = 0.25
//!
//! [[vehicle]]
//! speed            = 1.6
//! footprint_radius = 0.35
//! waiting_gap      = 1.8
//! ```
//!
//! Every field is optional and falls back to its default.  Each
//! `[[vehicle]]` entry is one spawn template; a document without any yields
//! an empty template set, which the scheduler rejects.

use std::path::Path;

use serde::Deserialize;

use dts_agent::VehicleParams;

use crate::error::{FacilityError, FacilityResult};
use crate::params::FacilityParams;

/// Facility parameters plus the vehicle templates it spawns from.
#[derive(Clone, Debug, PartialEq)]
pub struct FacilityConfig {
    pub params: FacilityParams,
    pub vehicles: Vec<VehicleParams>,
}

impl Default for FacilityConfig {
    /// Default parameters and a single default vehicle.
    fn default() -> Self {
        Self { params: FacilityParams::default(), vehicles: vec![VehicleParams::default()] }
    }
}

#[derive(Deserialize)]
struct FacilityDocument {
    #[serde(default)]
    facility: FacilityParams,
    #[serde(default, rename = "vehicle")]
    vehicles: Vec<VehicleParams>,
}

/// Load a [`FacilityConfig`] from a TOML file.
pub fn load_facility_toml(path: &Path) -> FacilityResult<FacilityConfig> {
    let text = std::fs::read_to_string(path).map_err(FacilityError::Io)?;
    parse_facility_toml(&text)
}

/// Like [`load_facility_toml`] but from an in-memory string.
pub fn parse_facility_toml(text: &str) -> FacilityResult<FacilityConfig> {
    let doc: FacilityDocument =
        toml::from_str(text).map_err(|e| FacilityError::Parse(e.to_string()))?;
    Ok(FacilityConfig { params: doc.facility, vehicles: doc.vehicles })
}
