//! The proximity-query seam between vehicles and the occupancy index.
//!
//! Vehicles never see each other directly.  Everything an agent learns about
//! its neighbours comes through [`SpatialQuery`]: "who overlaps this circle"
//! and "who overlaps this oriented box", filtered by collision layer and
//! excluding the querying agent.

use dts_core::{AgentId, Vec2};

// ── CollisionLayer ────────────────────────────────────────────────────────────

/// Bitmask of collision layers.  Two layers interact when they share a bit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    pub const NONE: CollisionLayer = CollisionLayer(0);
    pub const VEHICLE: CollisionLayer = CollisionLayer(1);
    pub const ALL: CollisionLayer = CollisionLayer(u32::MAX);

    #[inline]
    pub fn intersects(self, other: CollisionLayer) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::VEHICLE
    }
}

// ── Occupant ──────────────────────────────────────────────────────────────────

/// One body tracked by a spatial index: a circular footprint on a layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Occupant {
    pub id: AgentId,
    pub position: Vec2,
    pub radius: f32,
    pub layer: CollisionLayer,
    /// `false` while the vehicle is stopped (waiting, blocked, or braking).
    pub moving: bool,
}

// ── OrientedBox ───────────────────────────────────────────────────────────────

/// A rectangle with centre, half extents, and rotation.
///
/// `half_extents.x` runs along the box's local forward axis (the direction
/// `rotation` points), `half_extents.y` across it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrientedBox {
    pub center: Vec2,
    pub half_extents: Vec2,
    /// Radians, CCW from +x.
    pub rotation: f32,
}

impl OrientedBox {
    pub fn new(center: Vec2, half_extents: Vec2, rotation: f32) -> Self {
        Self { center, half_extents, rotation }
    }

    /// `p` in box-local coordinates (forward, lateral).
    #[inline]
    fn to_local(&self, p: Vec2) -> Vec2 {
        (p - self.center).rotated(-self.rotation)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let l = self.to_local(p);
        l.x.abs() <= self.half_extents.x && l.y.abs() <= self.half_extents.y
    }

    /// Circle–box overlap: clamp the circle centre onto the box and compare
    /// the residual against the radius.
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let l = self.to_local(center);
        let nearest = Vec2::new(
            l.x.clamp(-self.half_extents.x, self.half_extents.x),
            l.y.clamp(-self.half_extents.y, self.half_extents.y),
        );
        l.distance_squared(nearest) <= radius * radius
    }

    /// Radius of the circle circumscribing the box.
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.half_extents.length()
    }
}

// ── SpatialQuery ──────────────────────────────────────────────────────────────

/// Broad-phase overlap queries by collision layer.
///
/// An occupant matches when its *footprint* (a circle of its own radius)
/// overlaps the query region and its layer intersects `layer`.  The occupant
/// named by `exclude` is never returned.  Results are ordered by ascending
/// `AgentId`.
pub trait SpatialQuery {
    fn query_circle(
        &self,
        center: Vec2,
        radius: f32,
        layer: CollisionLayer,
        exclude: Option<AgentId>,
    ) -> Vec<Occupant>;

    fn query_oriented_box(
        &self,
        area: &OrientedBox,
        layer: CollisionLayer,
        exclude: Option<AgentId>,
    ) -> Vec<Occupant>;

    /// Whether anything at all overlaps the circle.
    fn circle_occupied(
        &self,
        center: Vec2,
        radius: f32,
        layer: CollisionLayer,
        exclude: Option<AgentId>,
    ) -> bool {
        !self.query_circle(center, radius, layer, exclude).is_empty()
    }
}
