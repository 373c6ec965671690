//! The routing engine: snapping, search, alternatives, fallbacks.

use std::collections::HashSet;

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use nav_core::geo::project_onto_segment;
use nav_core::{LatLon, NodeId};
use nav_graph::RoadGraph;

use crate::astar;
use crate::builder;
use crate::cost::{EdgeCost, Fastest, Length, NoHighways};
use crate::error::{RouteError, RouteResult};
use crate::route::Route;

/// Beyond this straight-line distance no graph search is attempted — small
/// OSM extracts do not justify long cross-region searches.
pub const MAX_ROUTE_DISTANCE_M: f64 = 10_000.0;

/// Radius used when snapping a position onto the graph.
pub const NODE_SEARCH_RADIUS_M: f64 = 10_000.0;

/// A mid-edge projection closer than this to an endpoint snaps to the
/// endpoint instead of splitting the edge.
const SPLIT_MIN_OFFSET_M: f64 = 10.0;

/// Alternative acceptance: endpoints must agree with the primary's within
/// this distance…
const ALT_ENDPOINT_TOLERANCE_M: f64 = 100.0;
/// …and fewer than 70 % of sampled points may shadow the primary within
/// 200 m, otherwise the alternative is just the primary again.
const ALT_SAMPLE_COUNT: usize = 10;
const ALT_SHADOW_RADIUS_M: f64 = 200.0;
const ALT_MAX_SHARED_FRACTION: f64 = 0.7;

// ── RoutingEngine ─────────────────────────────────────────────────────────────

/// Computes ranked routes over a [`RoadGraph`].
///
/// Owns only the id-generation RNG; the graph is passed per call (mutably,
/// because snapping may mint projected nodes).  One engine instance never
/// issues the same route id twice.
pub struct RoutingEngine {
    rng: SmallRng,
    issued_ids: HashSet<String>,
}

impl RoutingEngine {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen())
    }

    /// Deterministic variant for tests and replay.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            issued_ids: HashSet::new(),
        }
    }

    /// Compute 1–3 routes from `start` to `end`, primary first.
    ///
    /// Every data-unavailable condition (far apart, nothing nearby, no
    /// path) falls back to a straight-line route; only non-finite input
    /// returns an empty list.
    pub fn routes(&mut self, graph: &mut RoadGraph, start: LatLon, end: LatLon) -> Vec<Route> {
        if !start.is_valid() || !end.is_valid() {
            return Vec::new();
        }

        let crow_flies = start.distance_m(end);
        if crow_flies > MAX_ROUTE_DISTANCE_M {
            info!("{crow_flies:.0} m exceeds the search gate; using a direct route");
            return vec![self.direct_route(start, end)];
        }

        let (from, to) = match (
            find_nearest_node(graph, start, NODE_SEARCH_RADIUS_M),
            find_nearest_node(graph, end, NODE_SEARCH_RADIUS_M),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                warn!("no roads near origin or destination; using a direct route");
                return vec![self.direct_route(start, end)];
            }
        };

        let path = astar::find_path(graph, from, to, &Length);
        if path.is_empty() {
            warn!("no path from {from} to {to}; using a direct route");
            return vec![self.direct_route(start, end)];
        }

        let id = self.generate_route_id();
        let primary = builder::build_route(graph, &path, start, end, id, "Route to Destination");
        let mut routes = vec![primary];

        // Alternatives: same endpoints, different cost surfaces.  The
        // duration scaling presents them as a trade-off against the primary.
        let variants: [(&dyn EdgeCost, &str, f64); 2] = [
            (&Fastest, "Fastest Route", 1.2),
            (&NoHighways, "Avoid Highways", 0.8),
        ];
        for (cost, name, duration_factor) in variants {
            let alt_path = astar::find_path(graph, from, to, cost);
            if alt_path.is_empty() {
                continue;
            }
            let id = self.generate_route_id();
            let mut alt = builder::build_route(graph, &alt_path, start, end, id, name);
            alt.duration_s = (f64::from(alt.duration_s) * duration_factor).round() as u32;

            if is_distinct_alternative(&routes[0], &alt) {
                routes.push(alt);
            }
        }

        info!("generated {} route(s)", routes.len());
        routes
    }

    /// The primary (shortest-distance) route, without fallbacks.
    ///
    /// Used where the caller wants to handle failure itself, e.g. the
    /// façade's detailed-path helper.
    pub fn primary_route(
        &mut self,
        graph: &mut RoadGraph,
        start: LatLon,
        end: LatLon,
    ) -> RouteResult<Route> {
        if !start.is_valid() {
            return Err(RouteError::InvalidCoordinate(start));
        }
        if !end.is_valid() {
            return Err(RouteError::InvalidCoordinate(end));
        }

        let from = find_nearest_node(graph, start, NODE_SEARCH_RADIUS_M)
            .ok_or(RouteError::NoNearbyRoads(start))?;
        let to = find_nearest_node(graph, end, NODE_SEARCH_RADIUS_M)
            .ok_or(RouteError::NoNearbyRoads(end))?;

        let path = astar::find_path(graph, from, to, &Length);
        if path.is_empty() {
            return Err(RouteError::NoPath { from, to });
        }

        let id = self.generate_route_id();
        Ok(builder::build_route(graph, &path, start, end, id, "Route to Destination"))
    }

    /// Straight-line fallback route between two positions.
    pub fn direct_route(&mut self, start: LatLon, end: LatLon) -> Route {
        let id = self.generate_route_id();
        builder::direct_route(&mut self.rng, id, start, end)
    }

    /// "route-" + 8 lowercase hex digits, unique for this engine instance.
    fn generate_route_id(&mut self) -> String {
        loop {
            let id = format!("route-{:08x}", self.rng.gen::<u32>());
            if self.issued_ids.insert(id.clone()) {
                return id;
            }
        }
    }
}

impl Default for RoutingEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Node snapping ─────────────────────────────────────────────────────────────

/// Snap `loc` to the nearest graph node within `radius_m`.
///
/// Candidates are the endpoints of every nearby edge plus the perpendicular
/// projection of `loc` onto each edge; a projection at least 10 m from both
/// endpoints mints a new node by splitting the edge.  Returns `None` when
/// the index yields no edges at all.
pub fn find_nearest_node(graph: &mut RoadGraph, loc: LatLon, radius_m: f64) -> Option<NodeId> {
    let edges = graph.nearby_edges(loc, radius_m);
    if edges.is_empty() {
        return None;
    }

    enum Candidate {
        Existing(NodeId),
        MidEdge(nav_core::EdgeId, LatLon),
    }

    let mut best_dist = f64::MAX;
    let mut best: Option<Candidate> = None;

    for edge_id in edges {
        let (from, to) = {
            let e = graph.edge(edge_id);
            (e.from, e.to)
        };
        let a = graph.node_pos(from)?;
        let b = graph.node_pos(to)?;

        let d = loc.distance_m(a);
        if d < best_dist {
            best_dist = d;
            best = Some(Candidate::Existing(from));
        }
        let d = loc.distance_m(b);
        if d < best_dist {
            best_dist = d;
            best = Some(Candidate::Existing(to));
        }

        let proj = project_onto_segment(loc, a, b);
        if proj.distance_m < best_dist
            && proj.point.distance_m(a) >= SPLIT_MIN_OFFSET_M
            && proj.point.distance_m(b) >= SPLIT_MIN_OFFSET_M
        {
            best_dist = proj.distance_m;
            best = Some(Candidate::MidEdge(edge_id, proj.point));
        }
    }

    match best? {
        Candidate::Existing(node) => Some(node),
        Candidate::MidEdge(edge, point) => Some(graph.split_edge_at(edge, point)),
    }
}

// ── Alternative acceptance ────────────────────────────────────────────────────

/// An alternative counts only when it ends where the primary ends and
/// actually diverges along the way.
fn is_distinct_alternative(primary: &Route, alt: &Route) -> bool {
    if primary.start().distance_m(alt.start()) > ALT_ENDPOINT_TOLERANCE_M
        || primary.end().distance_m(alt.end()) > ALT_ENDPOINT_TOLERANCE_M
    {
        return false;
    }

    let p_samples = primary.sample_positions(ALT_SAMPLE_COUNT);
    let a_samples = alt.sample_positions(ALT_SAMPLE_COUNT);
    let shadowed = p_samples
        .iter()
        .zip(&a_samples)
        .filter(|(p, a)| p.distance_m(**a) <= ALT_SHADOW_RADIUS_M)
        .count();

    (shadowed as f64 / ALT_SAMPLE_COUNT as f64) < ALT_MAX_SHARED_FRACTION
}
