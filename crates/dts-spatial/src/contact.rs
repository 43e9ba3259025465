//! Edge-triggered contact detection.
//!
//! A contact begins when two footprints on intersecting layers overlap
//! (strictly, `distance < r₁ + r₂`).  [`ContactTracker::detect`] reports each
//! pair once when it starts touching; a pair that stays in contact is silent
//! until it separates and touches again.

use std::collections::BTreeSet;

use dts_core::AgentId;

use crate::index::OccupancyIndex;
use crate::query::{CollisionLayer, SpatialQuery};

/// "`agent` is now touching `other` on `layer`."  Emitted in both directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub agent: AgentId,
    pub other: AgentId,
    pub layer: CollisionLayer,
}

/// Remembers which pairs touched on the previous pass.
#[derive(Default)]
pub struct ContactTracker {
    /// Unordered pairs stored as `(low, high)`.
    touching: BTreeSet<(AgentId, AgentId)>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pairs currently in contact.
    pub fn active_pairs(&self) -> usize {
        self.touching.len()
    }

    /// Compare current overlaps against the previous pass and return the
    /// events for pairs that just started touching, ordered by agent.
    pub fn detect(&mut self, index: &OccupancyIndex) -> Vec<ContactEvent> {
        let mut now = BTreeSet::new();
        let mut events = Vec::new();

        for occ in index.occupants() {
            for other in index.query_circle(occ.position, occ.radius, occ.layer, Some(occ.id)) {
                if other.id < occ.id {
                    continue;
                }
                let reach = occ.radius + other.radius;
                if occ.position.distance_squared(other.position) >= reach * reach {
                    continue;
                }
                let pair = (occ.id, other.id);
                if !self.touching.contains(&pair) {
                    let layer = CollisionLayer(occ.layer.0 & other.layer.0);
                    events.push(ContactEvent { agent: occ.id, other: other.id, layer });
                    events.push(ContactEvent { agent: other.id, other: occ.id, layer });
                }
                now.insert(pair);
            }
        }

        self.touching = now;
        events.sort_by_key(|e| (e.agent, e.other));
        events
    }

    /// Drop any remembered pair involving `id`.
    pub fn forget(&mut self, id: AgentId) {
        self.touching.retain(|&(a, b)| a != id && b != id);
    }
}
