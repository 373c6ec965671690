//! A* search over the road graph.
//!
//! Straight-line (haversine) distance to the goal is the heuristic; it
//! never overestimates any positive edge cost based on length, so the
//! search is admissible for [`Length`](crate::cost::Length) and merely
//! greedy-biased for the weighted variants — acceptable here, since the
//! weighted paths are only used as alternatives.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use nav_core::NodeId;
use nav_graph::RoadGraph;

use crate::cost::EdgeCost;

/// Entry in the open set.
///
/// The heap is a max-heap, so `Ord` is inverted to pop the smallest
/// f-score first.  `seq` (insertion counter) breaks f-score ties in
/// insertion order, which keeps the search deterministic.
struct OpenEntry {
    f: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}
impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest f wins; on ties, the earlier insertion wins.
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a node path from `start` to `goal` under the given edge cost.
///
/// Returns the path including both endpoints, or an empty vector when the
/// goal is unreachable.  Nodes are finalized when popped; stale heap
/// entries are skipped via the closed set.
pub fn find_path(
    graph: &RoadGraph,
    start: NodeId,
    goal: NodeId,
    cost: &dyn EdgeCost,
) -> Vec<NodeId> {
    if start == goal {
        return vec![start];
    }
    let goal_pos = match graph.node_pos(goal) {
        Some(p) => p,
        None => return Vec::new(),
    };
    if graph.get_node(start).is_none() {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<NodeId> = HashSet::new();
    let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    open.push(OpenEntry { f: 0.0, seq, node: start });

    while let Some(OpenEntry { node: current, .. }) = open.pop() {
        if current == goal {
            return reconstruct(&came_from, start, goal);
        }
        if !closed.insert(current) {
            continue;
        }

        let node = match graph.get_node(current) {
            Some(n) => n,
            None => continue,
        };
        let g_current = g_score[&current];

        for &edge_id in &node.out_edges {
            let edge = graph.edge(edge_id);
            let neighbor = edge.to;
            if closed.contains(&neighbor) {
                continue;
            }

            let tentative = g_current + cost.cost(edge);
            if g_score.get(&neighbor).is_none_or(|&g| tentative < g) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);

                let h = graph
                    .node_pos(neighbor)
                    .map(|p| p.distance_m(goal_pos))
                    .unwrap_or(0.0);
                seq += 1;
                open.push(OpenEntry {
                    f: tentative + h,
                    seq,
                    node: neighbor,
                });
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<NodeId, NodeId>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut node = goal;
    while node != start {
        node = came_from[&node];
        path.push(node);
    }
    path.reverse();
    path
}
