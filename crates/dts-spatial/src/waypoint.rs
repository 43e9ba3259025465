//! Waypoint node data and service classification.

use dts_core::Vec2;

/// How a stop's share of the total service time is apportioned.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServiceType {
    /// Not a service point.
    #[default]
    None,
    /// Order board / speaker.
    Order,
    /// Payment window.
    Payment,
    /// Pickup window where the order is prepared and handed over.
    Preparation,
}

impl ServiceType {
    /// Label used in output columns.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::None        => "none",
            ServiceType::Order       => "order",
            ServiceType::Payment     => "payment",
            ServiceType::Preparation => "preparation",
        }
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the lane topology as supplied to
/// [`WaypointGraphBuilder::add_waypoint`][crate::WaypointGraphBuilder::add_waypoint].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: Vec2,
    /// Vehicles arriving here wait once for a service duration.
    pub is_stop_point: bool,
    pub service_type: ServiceType,
}

impl Waypoint {
    /// A pass-through node.
    pub fn path(position: Vec2) -> Self {
        Self { position, is_stop_point: false, service_type: ServiceType::None }
    }

    /// A stop point charging `service_type`.
    pub fn stop(position: Vec2, service_type: ServiceType) -> Self {
        Self { position, is_stop_point: true, service_type }
    }
}
