//! Queueing parameters and their reconciliation.
//!
//! [`FacilityParams`] holds the raw inputs a user edits.  [`FacilityParams::reconcile`]
//! validates them and computes every derived quantity in one place, so a
//! scheduler never acts on a half-updated parameter set.
//!
//! | Derived                  | Formula                                              |
//! |--------------------------|------------------------------------------------------|
//! | inter-arrival mean       | `3600 / customers_per_hour` if set, else the raw mean |
//! | traffic intensity ρ      | `average_service_time / inter-arrival mean`          |
//! | preparation share        | `1 - order - payment`                                |
//! | arrival bounds           | `mean · [1 - variation, 1 + variation]`              |

use serde::{Deserialize, Serialize};

use dts_spatial::ServiceType;

use crate::error::{FacilityError, FacilityResult};

/// Slack allowed when checking that the stage shares fit in one.
const SHARE_EPSILON: f32 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityParams {
    /// Mean seconds between arrivals.  Ignored when `customers_per_hour` is set.
    pub average_inter_arrival_time: f64,
    /// Target arrival rate; overrides `average_inter_arrival_time`.
    pub customers_per_hour: Option<f64>,
    /// Half-width of the arrival clamp band as a fraction of the mean.
    pub arrival_variation: f64,
    /// Clamp exponential draws into the arrival band.
    pub clamp_arrivals: bool,
    /// Mean total service seconds across all stages.
    pub average_service_time: f32,
    /// Half-width of the uniform service jitter as a fraction.
    pub service_variation: f32,
    pub order_percentage: f32,
    pub payment_percentage: f32,
    pub max_cars: usize,
}

impl Default for FacilityParams {
    fn default() -> Self {
        Self {
            average_inter_arrival_time: 3.0,
            customers_per_hour:         None,
            arrival_variation:          0.2,
            clamp_arrivals:             true,
            average_service_time:       180.0,
            service_variation:          0.1,
            order_percentage:           0.2,
            payment_percentage:         0.15,
            max_cars:                   10,
        }
    }
}

/// Fractions of the total service time charged at each stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StageShares {
    pub order: f32,
    pub payment: f32,
    pub preparation: f32,
}

impl StageShares {
    pub fn share(&self, stage: ServiceType) -> f32 {
        match stage {
            ServiceType::Order       => self.order,
            ServiceType::Payment     => self.payment,
            ServiceType::Preparation => self.preparation,
            ServiceType::None        => 0.0,
        }
    }

    pub fn total(&self) -> f32 {
        self.order + self.payment + self.preparation
    }
}

/// Quantities computed from [`FacilityParams`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DerivedParams {
    pub average_inter_arrival_time: f64,
    pub traffic_intensity: f64,
    pub stages: StageShares,
    /// `None` when clamping is disabled.
    pub arrival_bounds: Option<(f64, f64)>,
}

fn check_fraction(name: &'static str, value: f64) -> FacilityResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FacilityError::InvalidParameter { name, value })
    }
}

impl FacilityParams {
    /// Validate the raw inputs and compute the derived set.
    pub fn reconcile(&self) -> FacilityResult<DerivedParams> {
        let mean = match self.customers_per_hour {
            Some(cph) if cph.is_finite() && cph > 0.0 => 3600.0 / cph,
            Some(cph) => {
                return Err(FacilityError::InvalidParameter { name: "customers_per_hour", value: cph });
            }
            None => self.average_inter_arrival_time,
        };
        if !(mean.is_finite() && mean > 0.0) {
            return Err(FacilityError::InvalidParameter {
                name: "average_inter_arrival_time",
                value: mean,
            });
        }
        check_fraction("arrival_variation", self.arrival_variation)?;

        let service = self.average_service_time;
        if !(service.is_finite() && service >= 0.0) {
            return Err(FacilityError::InvalidParameter {
                name: "average_service_time",
                value: service as f64,
            });
        }
        check_fraction("service_variation", self.service_variation as f64)?;

        let (order, payment) = (self.order_percentage, self.payment_percentage);
        let in_unit = |x: f32| (0.0..=1.0).contains(&x);
        if !(in_unit(order) && in_unit(payment) && order + payment <= 1.0 + SHARE_EPSILON) {
            return Err(FacilityError::StagePercentages { order, payment });
        }
        let stages = StageShares {
            order,
            payment,
            preparation: (1.0 - order - payment).max(0.0),
        };

        let arrival_bounds = self.clamp_arrivals.then(|| {
            (mean * (1.0 - self.arrival_variation), mean * (1.0 + self.arrival_variation))
        });

        Ok(DerivedParams {
            average_inter_arrival_time: mean,
            traffic_intensity: service as f64 / mean,
            stages,
            arrival_bounds,
        })
    }
}
