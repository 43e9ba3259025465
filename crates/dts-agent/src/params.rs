//! Per-vehicle kinematic and perception constants.

use dts_spatial::CollisionLayer;

use crate::error::{AgentError, AgentResult};

/// Which occupants of the queue slot stop a vehicle from moving forward.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueueSlotPolicy {
    /// Any vehicle in the slot blocks, moving or not.
    #[default]
    BlockAny,
    /// Only a stationary vehicle blocks; a moving one is assumed to pull away.
    BlockStationaryOnly,
}

/// Constant configuration of one vehicle.  Distances are metres, speeds
/// metres per second, times seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleParams {
    pub speed: f32,
    /// Fraction of the remaining heading error closed per second.
    pub rotation_speed: f32,
    /// Arrival radius around a waypoint.
    pub stop_distance: f32,
    /// Radius of the forward collision cone.
    pub detection_distance: f32,
    /// Full opening angle of the collision cone, in degrees.
    pub cone_angle_deg: f32,
    /// Length of the queue slot ahead of the vehicle.
    pub waiting_gap: f32,
    /// Lateral width of the queue slot.
    pub queue_slot_width: f32,
    pub footprint_radius: f32,
    /// Wait after the collision cone reports a vehicle ahead.
    pub traffic_wait_secs: f32,
    /// Wait after physically touching another vehicle.
    pub collision_recovery_secs: f32,
    pub queue_policy: QueueSlotPolicy,
    pub layer: CollisionLayer,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            speed:                   2.0,
            rotation_speed:          5.0,
            stop_distance:           0.2,
            detection_distance:      0.5,
            cone_angle_deg:          75.0,
            waiting_gap:             1.5,
            queue_slot_width:        0.5,
            footprint_radius:        0.25,
            traffic_wait_secs:       0.5,
            collision_recovery_secs: 0.5,
            queue_policy:            QueueSlotPolicy::BlockAny,
            layer:                   CollisionLayer::VEHICLE,
        }
    }
}

impl VehicleParams {
    /// Half the cone opening, in radians.
    #[inline]
    pub fn cone_half_angle(&self) -> f32 {
        (self.cone_angle_deg * 0.5).to_radians()
    }

    pub fn validate(&self) -> AgentResult<()> {
        let non_negative = [
            ("speed", self.speed),
            ("rotation_speed", self.rotation_speed),
            ("stop_distance", self.stop_distance),
            ("detection_distance", self.detection_distance),
            ("waiting_gap", self.waiting_gap),
            ("queue_slot_width", self.queue_slot_width),
            ("traffic_wait_secs", self.traffic_wait_secs),
            ("collision_recovery_secs", self.collision_recovery_secs),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AgentError::InvalidParameter { name, value });
            }
        }
        if !(self.footprint_radius.is_finite() && self.footprint_radius > 0.0) {
            return Err(AgentError::InvalidParameter {
                name: "footprint_radius",
                value: self.footprint_radius,
            });
        }
        if !(0.0..=360.0).contains(&self.cone_angle_deg) {
            return Err(AgentError::InvalidParameter {
                name: "cone_angle_deg",
                value: self.cone_angle_deg,
            });
        }
        Ok(())
    }
}
