/// Externally visible phase of a vehicle.
///
/// `Terminated` is absorbing.  A vehicle whose service timer expired while
/// the way ahead was blocked reports `Traveling` even though it has not
/// moved: it is stopped, but no longer waiting on a timer.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VehicleState {
    #[default]
    Traveling,
    WaitingForTraffic,
    WaitingForService,
    Terminated,
}

impl VehicleState {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleState::Traveling         => "traveling",
            VehicleState::WaitingForTraffic => "waiting_for_traffic",
            VehicleState::WaitingForService => "waiting_for_service",
            VehicleState::Terminated        => "terminated",
        }
    }

    #[inline]
    pub fn is_waiting(self) -> bool {
        matches!(self, VehicleState::WaitingForTraffic | VehicleState::WaitingForService)
    }
}

impl std::fmt::Display for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
