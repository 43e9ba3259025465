//! Plain data row types written by output backends.

/// One vehicle's transform and state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshotRow {
    pub agent_id:       u32,
    pub tick:           u64,
    pub time_secs:      f64,
    pub x:              f32,
    pub y:              f32,
    /// Radians, CCW from +x.
    pub heading:        f32,
    /// `VehicleState::as_str`.
    pub state:          &'static str,
    /// Waypoint the vehicle is steering toward.
    pub waypoint:       u32,
    /// Seconds left on the active wait; 0 while traveling.
    pub remaining_wait: f32,
}

/// Facility statistics at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:                   u64,
    pub time_secs:              f64,
    pub live_cars:              u64,
    pub spawned:                u64,
    pub turned_away:            u64,
    pub departures:             u64,
    pub total_served:           u64,
    pub average_time_in_system: f64,
    pub traffic_intensity:      f64,
}

/// One vehicle leaving the facility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepartureRow {
    pub agent_id:       u32,
    pub tick:           u64,
    pub entered_at:     f64,
    pub departed_at:    f64,
    pub time_in_system: f64,
    /// `DepartureReason::as_str`.
    pub reason:         &'static str,
}
