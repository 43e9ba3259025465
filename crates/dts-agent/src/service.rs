//! Where a vehicle gets its service durations from.

use dts_core::AgentRng;
use dts_spatial::ServiceType;

/// Supplies the wait a vehicle spends at a stop of the given type.
///
/// Draws come from the vehicle's own RNG so that service times are
/// reproducible per vehicle regardless of tick order.
pub trait ServiceTimeSource {
    fn service_wait_time(&self, service: ServiceType, rng: &mut AgentRng) -> f32;
}

/// The same wait at every service stop; `0` at a stop typed `None`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantServiceTime(pub f32);

impl ServiceTimeSource for ConstantServiceTime {
    fn service_wait_time(&self, service: ServiceType, _rng: &mut AgentRng) -> f32 {
        match service {
            ServiceType::None => 0.0,
            _ => self.0,
        }
    }
}
