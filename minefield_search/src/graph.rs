// Graph model and adjacency index.
//
// A `Graph` is a flat set of `Node`s (positions, optionally mined) and
// undirected `Link`s (weighted id pairs). Links are stored once per unordered
// pair; the derived `AdjacencyIndex` exposes traversal in both directions.
//
// Links carry node *identifiers*, never references to node objects — an edge
// endpoint is always resolved through the graph at lookup time.
//
// See also: `generate.rs` for random graph synthesis, `search.rs` for the
// engines that walk the adjacency index.
//
// **Critical constraint: determinism.** Node and link order is the insertion
// order. The adjacency index is backed by a hash map, but its per-node
// neighbor lists are built in link order and map iteration order is never
// observed — only `neighbors()` lookups are.

use crate::types::{NodeId, Point3};
use minefield_prng::SearchRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A graph node — a position in space that a search can settle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Point3,
    /// Mined nodes abort a search that settles them, unless they are the
    /// search's start or end.
    pub mine: bool,
}

/// An undirected, weighted link between two nodes, stored once per pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
    /// Non-negative traversal cost (the Euclidean distance at generation time).
    pub weight: f32,
}

/// The graph container.
///
/// Exactly one graph is "current" from the caller's point of view; generating
/// a replacement invalidates any search outcome computed against the old one
/// (the caller is responsible for discarding stale outcomes).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Returns its id for convenience when building by hand.
    pub fn add_node(&mut self, id: impl Into<NodeId>, position: Point3, mine: bool) -> NodeId {
        let id = id.into();
        self.nodes.push(Node {
            id: id.clone(),
            position,
            mine,
        });
        id
    }

    /// Add an undirected link. The adjacency index will expose it in both
    /// directions regardless of which endpoint is recorded as `source`.
    pub fn add_link(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>, weight: f32) {
        self.links.push(Link {
            source: source.into(),
            target: target.into(),
            weight,
        });
    }

    /// Look up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Clear the mine flag on a node, if present.
    ///
    /// A collaborator typically calls this on its chosen start and end before
    /// searching, to guarantee the endpoints are never mined. The search
    /// engines additionally exempt start/end from the mine rule themselves.
    pub fn clear_mine(&mut self, id: &NodeId) {
        if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
            node.mine = false;
        }
    }

    /// Pick a uniformly random node, e.g. when a collaborator wants random
    /// search endpoints. `None` on an empty graph.
    pub fn random_node(&self, rng: &mut SearchRng) -> Option<&Node> {
        if self.nodes.is_empty() {
            return None;
        }
        Some(&self.nodes[rng.range_usize(0, self.nodes.len())])
    }

    /// Build the bidirectional adjacency index for this graph.
    pub fn adjacency(&self) -> AdjacencyIndex {
        AdjacencyIndex::build(self)
    }
}

/// Per-node neighbor list: `(neighbor id, link weight)` pairs in link order.
type NeighborList = SmallVec<[(NodeId, f32); 8]>;

/// Bidirectional neighbor lookup derived from a `Graph`.
///
/// Contains an entry (possibly empty) for every node id, including isolated
/// nodes. Symmetric by construction: if B appears under A with weight w, A
/// appears under B with weight w.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
    map: FxHashMap<NodeId, NeighborList>,
}

impl AdjacencyIndex {
    fn build(graph: &Graph) -> Self {
        let mut map: FxHashMap<NodeId, NeighborList> = FxHashMap::default();
        for node in &graph.nodes {
            map.entry(node.id.clone()).or_default();
        }
        for link in &graph.links {
            // A link endpoint not present in the node set is skipped rather
            // than faulting.
            if !map.contains_key(&link.source) || !map.contains_key(&link.target) {
                continue;
            }
            if let Some(list) = map.get_mut(&link.source) {
                list.push((link.target.clone(), link.weight));
            }
            if let Some(list) = map.get_mut(&link.target) {
                list.push((link.source.clone(), link.weight));
            }
        }
        Self { map }
    }

    /// Neighbors of a node, in link order. Unknown ids yield an empty slice.
    pub fn neighbors(&self, id: &NodeId) -> &[(NodeId, f32)] {
        self.map.get(id).map_or(&[], |list| list.as_slice())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.map.contains_key(id)
    }

    /// Number of indexed nodes (equals the graph's node count).
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
