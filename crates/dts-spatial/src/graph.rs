//! Lane topology: a directed waypoint graph and its builder.
//!
//! # Data layout
//!
//! Successor lists use **Compressed Sparse Row (CSR)** format.  The
//! successors of `WaypointId w` occupy the slice:
//!
//! ```text
//! link_to[ node_out_start[w] .. node_out_start[w+1] ]
//! ```
//!
//! Links are grouped by source with a *stable* sort, so successors keep the
//! order in which they were added.  Branch selection is by index into this
//! slice, which makes a seeded run reproducible.
//!
//! A waypoint with no successors is a **terminal**: a vehicle arriving there
//! has completed its journey.

use dts_core::{AgentRng, Vec2, WaypointId};

use crate::error::{SpatialError, SpatialResult};
use crate::waypoint::{ServiceType, Waypoint};

// ── WaypointGraph ─────────────────────────────────────────────────────────────

/// Immutable directed lane graph.  Build with [`WaypointGraphBuilder`].
pub struct WaypointGraph {
    // ── Node data (indexed by WaypointId) ─────────────────────────────────
    pub node_pos: Vec<Vec2>,
    pub node_is_stop: Vec<bool>,
    pub node_service: Vec<ServiceType>,

    // ── CSR successor lists ───────────────────────────────────────────────
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,
    pub link_to: Vec<WaypointId>,
}

impl WaypointGraph {
    /// A graph with no waypoints.
    pub fn empty() -> Self {
        Self {
            node_pos: Vec::new(),
            node_is_stop: Vec::new(),
            node_service: Vec::new(),
            node_out_start: vec![0],
            link_to: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: WaypointId) -> bool {
        id.index() < self.node_count()
    }

    fn check(&self, id: WaypointId) -> SpatialResult<usize> {
        if self.contains(id) { Ok(id.index()) } else { Err(SpatialError::WaypointNotFound(id)) }
    }

    pub fn position(&self, id: WaypointId) -> SpatialResult<Vec2> {
        self.check(id).map(|i| self.node_pos[i])
    }

    pub fn is_stop_point(&self, id: WaypointId) -> SpatialResult<bool> {
        self.check(id).map(|i| self.node_is_stop[i])
    }

    pub fn service_type(&self, id: WaypointId) -> SpatialResult<ServiceType> {
        self.check(id).map(|i| self.node_service[i])
    }

    /// Full node record for `id`.
    pub fn waypoint(&self, id: WaypointId) -> SpatialResult<Waypoint> {
        self.check(id).map(|i| Waypoint {
            position: self.node_pos[i],
            is_stop_point: self.node_is_stop[i],
            service_type: self.node_service[i],
        })
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Ordered successors of `id`.  Empty for a terminal or unknown waypoint.
    #[inline]
    pub fn next(&self, id: WaypointId) -> &[WaypointId] {
        if !self.contains(id) {
            return &[];
        }
        let start = self.node_out_start[id.index()] as usize;
        let end   = self.node_out_start[id.index() + 1] as usize;
        &self.link_to[start..end]
    }

    #[inline]
    pub fn is_terminal(&self, id: WaypointId) -> bool {
        self.next(id).is_empty()
    }

    /// Pick a successor uniformly at random, or `None` at a terminal.
    ///
    /// Each call is an independent draw; no choice is remembered between
    /// visits.
    pub fn choose_next(&self, id: WaypointId, rng: &mut AgentRng) -> Option<WaypointId> {
        match self.next(id) {
            [] => None,
            [only] => Some(*only),
            many => rng.choose(many).copied(),
        }
    }

    /// `true` if some walk starting at `start` can revisit a waypoint.
    ///
    /// Iterative three-colour DFS, O(N + E).
    pub fn cycle_reachable_from(&self, start: WaypointId) -> bool {
        const WHITE: u8 = 0;
        const GREY: u8 = 1;
        const BLACK: u8 = 2;

        if !self.contains(start) {
            return false;
        }
        let mut colour = vec![WHITE; self.node_count()];
        // (node, index of the next successor to explore)
        let mut stack: Vec<(WaypointId, usize)> = vec![(start, 0)];
        colour[start.index()] = GREY;

        while let Some(top) = stack.last_mut() {
            let (node, cursor) = *top;
            let succ = self.next(node);
            if cursor < succ.len() {
                top.1 += 1;
                let to = succ[cursor];
                match colour[to.index()] {
                    GREY => return true,
                    WHITE => {
                        colour[to.index()] = GREY;
                        stack.push((to, 0));
                    }
                    _ => {}
                }
            } else {
                colour[node.index()] = BLACK;
                stack.pop();
            }
        }
        false
    }
}

// ── WaypointGraphBuilder ──────────────────────────────────────────────────────

/// Construct a [`WaypointGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use dts_core::Vec2;
/// use dts_spatial::{ServiceType, Waypoint, WaypointGraphBuilder};
///
/// let mut b = WaypointGraphBuilder::new();
/// let entry = b.add_waypoint(Waypoint::path(Vec2::new(0.0, 0.0)));
/// let order = b.add_waypoint(Waypoint::stop(Vec2::new(5.0, 0.0), ServiceType::Order));
/// b.add_link(entry, order);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.next(entry), &[order]);
/// assert!(graph.is_terminal(order));
/// ```
#[derive(Default)]
pub struct WaypointGraphBuilder {
    nodes: Vec<Waypoint>,
    links: Vec<(WaypointId, WaypointId)>,
}

impl WaypointGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a waypoint and return its id (sequential from 0).
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> WaypointId {
        let id = WaypointId(self.nodes.len() as u32);
        self.nodes.push(waypoint);
        id
    }

    /// Add a directed link `from → to`.  Endpoints are checked in `build`.
    pub fn add_link(&mut self, from: WaypointId, to: WaypointId) {
        self.links.push((from, to));
    }

    /// Link each consecutive pair in `path`.
    pub fn add_chain(&mut self, path: &[WaypointId]) {
        for pair in path.windows(2) {
            self.add_link(pair[0], pair[1]);
        }
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.links.len() }

    /// Consume the builder.  Fails if any link names a waypoint that was
    /// never added.
    pub fn build(self) -> SpatialResult<WaypointGraph> {
        let node_count = self.nodes.len();

        if let Some(&(from, to)) = self
            .links
            .iter()
            .find(|(f, t)| f.index() >= node_count || t.index() >= node_count)
        {
            return Err(SpatialError::DanglingLink { from, to });
        }

        let mut links = self.links;
        links.sort_by_key(|&(from, _)| from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for &(from, _) in &links {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, links.len());

        Ok(WaypointGraph {
            node_pos: self.nodes.iter().map(|w| w.position).collect(),
            node_is_stop: self.nodes.iter().map(|w| w.is_stop_point).collect(),
            node_service: self.nodes.iter().map(|w| w.service_type).collect(),
            node_out_start,
            link_to: links.into_iter().map(|(_, to)| to).collect(),
        })
    }
}
