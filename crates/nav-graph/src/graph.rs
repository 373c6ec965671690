//! Road graph: typed nodes and directed edges with a spatial index.
//!
//! # Data layout
//!
//! Nodes live in a `HashMap` keyed by [`NodeId`] (OSM ids are sparse);
//! edges live in a dense `Vec` indexed by [`EdgeId`].  A node's `out_edges`
//! lists the ids of the edges leaving it, which makes the A* inner loop a
//! map lookup plus a contiguous scan.
//!
//! The graph is append-only between [`clear`](RoadGraph::clear) calls:
//! ingestion creates nodes and edges and nothing mutates them afterwards.
//! The one sanctioned extension is [`split_edge_at`](RoadGraph::split_edge_at),
//! which the routing engine uses to snap an off-node position into the
//! graph — it only adds a node and its half-edges.

use std::collections::HashMap;

use nav_core::{EdgeId, LatLon, NodeId};

use crate::cells::CellIndex;

/// Edges shorter than this are discarded at insertion.
const MIN_EDGE_LENGTH_M: f64 = 0.001;

/// First id handed to nodes minted by edge splitting.  Counts downwards;
/// OSM ids are non-negative 64-bit integers, so the ranges cannot meet.
const FIRST_PROJECTED_ID: u64 = u64::MAX - 1;

// ── Road classification ───────────────────────────────────────────────────────

/// Coarse road class, derived from the OSM `highway` tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoadKind {
    Highway,
    Primary,
    Secondary,
    Residential,
    Service,
}

impl RoadKind {
    /// Default speed limit (km/h) applied when the way has no usable
    /// `maxspeed` tag.
    pub fn default_speed_kph(self) -> f32 {
        match self {
            RoadKind::Highway => 100.0,
            RoadKind::Primary => 70.0,
            RoadKind::Secondary => 50.0,
            RoadKind::Residential => 30.0,
            RoadKind::Service => 20.0,
        }
    }
}

// ── Node / Edge ───────────────────────────────────────────────────────────────

/// A graph vertex.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub pos: LatLon,
    /// Ids of edges with `from == self.id`.
    pub out_edges: Vec<EdgeId>,
}

/// A directed road segment between two nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub name: String,
    pub kind: RoadKind,
    pub speed_limit_kph: f32,
    /// Haversine length of the segment in metres.
    pub length_m: f64,
    pub oneway: bool,
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// The routable road graph plus its spatial index.
#[derive(Debug)]
pub struct RoadGraph {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    index: CellIndex,
    next_projected_id: u64,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            index: CellIndex::new(),
            next_projected_id: FIRST_PROJECTED_ID,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add (or replace) a node.
    pub fn add_node(&mut self, id: NodeId, pos: LatLon) {
        self.nodes.insert(
            id,
            Node {
                id,
                pos,
                out_edges: Vec::new(),
            },
        );
    }

    /// Add a directed edge from `from` to `to`.
    ///
    /// Returns `None` when either endpoint is missing or the segment is
    /// degenerate (shorter than a millimetre) — such edges would never be
    /// reachable through the spatial index anyway.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        name: &str,
        kind: RoadKind,
        speed_limit_kph: f32,
        oneway: bool,
    ) -> Option<EdgeId> {
        let from_pos = self.nodes.get(&from)?.pos;
        let to_pos = self.nodes.get(&to)?.pos;

        let length_m = from_pos.distance_m(to_pos);
        if length_m < MIN_EDGE_LENGTH_M {
            return None;
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            from,
            to,
            name: name.to_string(),
            kind,
            speed_limit_kph,
            length_m,
            oneway,
        });

        if let Some(node) = self.nodes.get_mut(&from) {
            node.out_edges.push(id);
        }
        self.index.insert(id, from_pos, to_pos);
        Some(id)
    }

    /// Split `edge` at `pos`, minting a projected node joined to both
    /// original endpoints by half-edges that inherit the edge's metadata.
    ///
    /// The original edge stays in the pool — search may traverse either the
    /// whole edge or its halves at identical cost — so cached `EdgeId`s
    /// remain valid.  Returns the new node's id.
    pub fn split_edge_at(&mut self, edge: EdgeId, pos: LatLon) -> NodeId {
        let (from, to, name, kind, speed, oneway) = {
            let e = &self.edges[edge.index()];
            (e.from, e.to, e.name.clone(), e.kind, e.speed_limit_kph, e.oneway)
        };

        let node_id = NodeId(self.next_projected_id);
        self.next_projected_id -= 1;
        self.add_node(node_id, pos);

        self.add_edge(from, node_id, &name, kind, speed, oneway);
        self.add_edge(node_id, to, &name, kind, speed, oneway);
        if !oneway {
            self.add_edge(to, node_id, &name, kind, speed, oneway);
            self.add_edge(node_id, from, &name, kind, speed, oneway);
        }
        node_id
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// The edge with the given id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this graph generation.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Checked variant of [`edge`](Self::edge).
    #[inline]
    pub fn try_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Position of a node, if present.
    #[inline]
    pub fn node_pos(&self, id: NodeId) -> Option<LatLon> {
        self.nodes.get(&id).map(|n| n.pos)
    }

    /// Edges whose cells intersect the circle around `loc`; see
    /// [`CellIndex::query`] for the exact guarantees.
    pub fn nearby_edges(&self, loc: LatLon, radius_m: f64) -> Vec<EdgeId> {
        self.index.query(loc, radius_m)
    }

    /// `true` when an edge `from → to` exists.
    pub fn has_direct_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes
            .get(&from)
            .map(|n| n.out_edges.iter().any(|&e| self.edges[e.index()].to == to))
            .unwrap_or(false)
    }

    // ── Dimensions & lifecycle ────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Wipe all nodes, edges, and the spatial index.  Any `EdgeId`/`NodeId`
    /// held by callers is invalidated.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.next_projected_id = FIRST_PROJECTED_ID;
    }
}
