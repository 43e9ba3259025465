//! R-tree backed occupancy index.
//!
//! Vehicle centres live in an `rstar` R-tree for range queries; full
//! occupant records (radius, layer, motion flag) live in a side map keyed by
//! `AgentId`.  Queries widen the search radius by the largest footprint ever
//! inserted, then filter exactly against each occupant's own radius.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use dts_core::{AgentId, Vec2};

use crate::error::{SpatialError, SpatialResult};
use crate::query::{CollisionLayer, Occupant, OrientedBox, SpatialQuery};

#[cfg(feature = "fx-hash")]
pub(crate) type IdMap<V> = rustc_hash::FxHashMap<AgentId, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type IdMap<V> = std::collections::HashMap<AgentId, V>;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Debug)]
struct OccupantEntry {
    point: [f32; 2],
    id: AgentId,
}

impl OccupantEntry {
    fn new(id: AgentId, position: Vec2) -> Self {
        Self { point: [position.x, position.y], id }
    }
}

impl RTreeObject for OccupantEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for OccupantEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── OccupancyIndex ────────────────────────────────────────────────────────────

/// Live index of every vehicle footprint in the facility.
#[derive(Default)]
pub struct OccupancyIndex {
    tree: RTree<OccupantEntry>,
    occupants: IdMap<Occupant>,
    max_radius: f32,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&Occupant> {
        self.occupants.get(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.occupants.contains_key(&id)
    }

    /// All occupants ordered by `AgentId`.
    pub fn occupants(&self) -> Vec<Occupant> {
        let mut all: Vec<Occupant> = self.occupants.values().copied().collect();
        all.sort_by_key(|o| o.id);
        all
    }

    pub fn insert(&mut self, occupant: Occupant) -> SpatialResult<()> {
        if self.occupants.contains_key(&occupant.id) {
            return Err(SpatialError::DuplicateOccupant(occupant.id));
        }
        self.tree.insert(OccupantEntry::new(occupant.id, occupant.position));
        self.max_radius = self.max_radius.max(occupant.radius);
        self.occupants.insert(occupant.id, occupant);
        Ok(())
    }

    /// Move an occupant.  Returns `false` if `id` is not indexed.
    pub fn update(&mut self, id: AgentId, position: Vec2, moving: bool) -> bool {
        let Some(occ) = self.occupants.get_mut(&id) else {
            return false;
        };
        if occ.position != position {
            self.tree.remove(&OccupantEntry::new(id, occ.position));
            self.tree.insert(OccupantEntry::new(id, position));
            occ.position = position;
        }
        occ.moving = moving;
        true
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Occupant> {
        let occ = self.occupants.remove(&id)?;
        self.tree.remove(&OccupantEntry::new(id, occ.position));
        Some(occ)
    }

    /// Candidates whose centre lies within `reach` of `center`, widened by
    /// the largest footprint, filtered by layer and exclusion.
    fn candidates(
        &self,
        center: Vec2,
        reach: f32,
        layer: CollisionLayer,
        exclude: Option<AgentId>,
    ) -> impl Iterator<Item = &Occupant> + '_ {
        let r = reach.max(0.0) + self.max_radius;
        self.tree
            .locate_within_distance([center.x, center.y], r * r)
            .filter_map(|e| self.occupants.get(&e.id))
            .filter(move |o| Some(o.id) != exclude && o.layer.intersects(layer))
    }
}

fn sorted(mut hits: Vec<Occupant>) -> Vec<Occupant> {
    hits.sort_by_key(|o| o.id);
    hits
}

impl SpatialQuery for OccupancyIndex {
    fn query_circle(
        &self,
        center: Vec2,
        radius: f32,
        layer: CollisionLayer,
        exclude: Option<AgentId>,
    ) -> Vec<Occupant> {
        let hits = self
            .candidates(center, radius, layer, exclude)
            .filter(|o| {
                let reach = radius.max(0.0) + o.radius;
                o.position.distance_squared(center) <= reach * reach
            })
            .copied()
            .collect();
        sorted(hits)
    }

    fn query_oriented_box(
        &self,
        area: &OrientedBox,
        layer: CollisionLayer,
        exclude: Option<AgentId>,
    ) -> Vec<Occupant> {
        let hits = self
            .candidates(area.center, area.bounding_radius(), layer, exclude)
            .filter(|o| area.intersects_circle(o.position, o.radius))
            .copied()
            .collect();
        sorted(hits)
    }
}
