//! Randomized per-stage service durations.

use dts_agent::ServiceTimeSource;
use dts_core::AgentRng;
use dts_spatial::ServiceType;

use crate::params::{DerivedParams, FacilityParams, StageShares};

/// Maps a service stage to a jittered duration.
///
/// `adjusted = average_service_time · U(1 - v, 1 + v)`, and the stage is
/// charged `adjusted · share(stage)`.  Every call draws afresh, so the stages
/// of one visit vary independently.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ServiceTimeAllocator {
    pub average_service_time: f32,
    pub variation: f32,
    pub stages: StageShares,
}

impl ServiceTimeAllocator {
    pub fn new(average_service_time: f32, variation: f32, stages: StageShares) -> Self {
        Self { average_service_time, variation, stages }
    }

    pub fn from_params(params: &FacilityParams, derived: &DerivedParams) -> Self {
        Self::new(params.average_service_time, params.service_variation, derived.stages)
    }

    /// One draw of the jittered total.
    pub fn adjusted_total(&self, rng: &mut AgentRng) -> f32 {
        let v = self.variation.clamp(0.0, 1.0);
        self.average_service_time * rng.uniform(1.0 - v, 1.0 + v)
    }

    pub fn stage_duration(&self, stage: ServiceType, rng: &mut AgentRng) -> f32 {
        if stage == ServiceType::None {
            return 0.0;
        }
        self.adjusted_total(rng) * self.stages.share(stage)
    }
}

impl ServiceTimeSource for ServiceTimeAllocator {
    fn service_wait_time(&self, service: ServiceType, rng: &mut AgentRng) -> f32 {
        self.stage_duration(service, rng)
    }
}
