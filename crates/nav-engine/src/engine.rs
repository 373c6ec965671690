//! The `NavigationEngine` façade.

use std::io::BufRead;
use std::time::Instant;

use log::{info, warn};

use nav_core::{Fix, LatLon, RawFix};
use nav_filter::LocationFilter;
use nav_graph::{ingest_osm, RoadGraph};
use nav_match::{MatchResult, RouteMatcher};
use nav_route::{Route, RoutingEngine};

/// Floor for the point count of a synthesized detailed path.
const MIN_DETAILED_POINTS: usize = 10;

/// Owns and orchestrates the navigation pipeline.
///
/// Single-threaded by design: every method runs to completion on the
/// caller's thread, and callers on other threads must serialize access
/// externally.  State lives for the lifetime of the value; `load_osm`
/// replaces the graph wholesale and drops anything that referenced it.
pub struct NavigationEngine {
    filter: LocationFilter,
    pub(crate) graph: RoadGraph,
    routing: RoutingEngine,
    matcher: RouteMatcher,

    last_fix: Option<Fix>,
    destination: Option<LatLon>,
    routes: Vec<Route>,
    active_route_id: Option<String>,

    /// Origin of the implicit monotonic sample clock.
    started: Instant,
}

impl NavigationEngine {
    pub fn new() -> Self {
        Self::build(RoutingEngine::new())
    }

    /// Deterministic route ids for tests and replay harnesses.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(RoutingEngine::with_seed(seed))
    }

    fn build(routing: RoutingEngine) -> Self {
        Self {
            filter: LocationFilter::new(),
            graph: RoadGraph::new(),
            routing,
            matcher: RouteMatcher::new(),
            last_fix: None,
            destination: None,
            routes: Vec::new(),
            active_route_id: None,
            started: Instant::now(),
        }
    }

    // ── Data loading ──────────────────────────────────────────────────────

    /// Rebuild the road graph from an OSM XML stream.
    ///
    /// The previous graph is discarded either way: on failure the engine is
    /// left with an empty graph (routing degrades to direct routes).  Any
    /// computed routes and the active match state are dropped because their
    /// edge ids die with the old graph; a cached destination survives.
    pub fn load_osm<R: BufRead>(&mut self, reader: R) -> bool {
        self.graph.clear();
        self.matcher.clear();
        self.routes.clear();
        self.active_route_id = None;

        match ingest_osm(reader, &mut self.graph) {
            Ok(stats) => {
                info!(
                    "road graph loaded: {} nodes, {} edges",
                    stats.nodes, stats.edges
                );
                true
            }
            Err(e) => {
                warn!("OSM load failed: {e}");
                self.graph.clear();
                false
            }
        }
    }

    /// PBF signature parity; dispatches to the XML path.
    pub fn load_osm_pbf<R: BufRead>(&mut self, reader: R) -> bool {
        self.load_osm(reader)
    }

    // ── Location updates ──────────────────────────────────────────────────

    /// Feed one raw location sample, timestamped from the engine's own
    /// monotonic clock, and get guidance back.
    pub fn update_location(&mut self, raw: &RawFix) -> MatchResult {
        let at_ms = self.started.elapsed().as_millis() as u64;
        self.update_location_at(raw, at_ms)
    }

    /// [`update_location`](Self::update_location) with an explicit
    /// timestamp — the deterministic entry point for replaying recorded
    /// traces.  Timestamps must be non-decreasing; violations are clamped
    /// by the filter rather than rejected.
    pub fn update_location_at(&mut self, raw: &RawFix, at_ms: u64) -> MatchResult {
        let fix = self.filter.process(raw, at_ms);
        self.last_fix = Some(fix);

        // A destination may have been set before the first fix arrived.
        if let Some(dest) = self.destination {
            if self.routes.is_empty() {
                info!("first fix after destination; computing routes");
                self.compute_routes(fix.pos, dest);
            }
        }

        if self.matcher.has_route() {
            self.matcher.match_fix(&fix, &self.graph)
        } else {
            MatchResult::no_route(fix.pos, fix.bearing_deg)
        }
    }

    // ── Destination & routes ──────────────────────────────────────────────

    /// Set (or replace) the destination.
    ///
    /// Without a fix yet, the destination is cached and `true` returned;
    /// routes are computed on the first location update.  With a fix,
    /// routes are computed immediately and `true` means at least one route
    /// exists.  Invalid coordinates are rejected without touching state.
    pub fn set_destination(&mut self, loc: LatLon) -> bool {
        if !loc.is_valid() {
            warn!("rejecting invalid destination {loc}");
            return false;
        }

        self.destination = Some(loc);
        self.routes.clear();
        self.matcher.clear();
        self.active_route_id = None;

        match self.last_fix {
            None => {
                info!("destination cached; waiting for a fix");
                true
            }
            Some(fix) => {
                self.compute_routes(fix.pos, loc);
                !self.routes.is_empty()
            }
        }
    }

    /// The most recent filtered fix, if any sample has arrived.
    pub fn current_location(&self) -> Option<Fix> {
        self.last_fix
    }

    /// Snapshot of the current route list, primary first.
    pub fn routes(&self) -> Vec<Route> {
        self.routes.clone()
    }

    /// The route currently used for matching.
    pub fn active_route(&self) -> Option<&Route> {
        let id = self.active_route_id.as_deref()?;
        self.routes.iter().find(|r| r.id == id)
    }

    /// Activate one of the computed routes by id.
    pub fn switch_to_route(&mut self, id: &str) -> bool {
        match self.routes.iter().find(|r| r.id == id) {
            Some(route) => {
                info!("switching to route {id}");
                self.matcher.set_route(route.clone(), &self.graph);
                self.active_route_id = Some(id.to_string());
                true
            }
            None => {
                warn!("unknown route id {id}");
                false
            }
        }
    }

    /// A renderable path between two arbitrary positions, at most
    /// `max(10, max_segments)` points, without touching the engine's
    /// destination or route state.  Falls back to a straight-line sample
    /// when no graph route exists.
    pub fn detailed_path(&mut self, start: LatLon, end: LatLon, max_segments: u32) -> Vec<Fix> {
        let cap = (max_segments as usize).max(MIN_DETAILED_POINTS);

        match self.routing.primary_route(&mut self.graph, start, end) {
            Ok(route) => {
                let mut points = route.points;
                if points.len() > cap {
                    points = thin_by_index(points, cap);
                }
                points
            }
            Err(e) => {
                info!("detailed path falls back to a straight line: {e}");
                straight_line_path(start, end, cap)
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn compute_routes(&mut self, start: LatLon, dest: LatLon) {
        self.routes = self.routing.routes(&mut self.graph, start, dest);
        if let Some(first) = self.routes.first() {
            self.matcher.set_route(first.clone(), &self.graph);
            self.active_route_id = Some(first.id.clone());
        }
    }
}

impl Default for NavigationEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Down-sample by index, endpoints preserved.
fn thin_by_index(points: Vec<Fix>, cap: usize) -> Vec<Fix> {
    let last = points.len() - 1;
    (0..cap).map(|i| points[i * last / (cap - 1)]).collect()
}

/// Evenly sampled straight line of exactly `n` points; last point
/// stationary.
fn straight_line_path(start: LatLon, end: LatLon, n: usize) -> Vec<Fix> {
    let bearing = start.bearing_to(end) as f32;
    let gap = start.distance_m(end) / (n - 1) as f64;
    let speed = (gap / 10.0).clamp(5.0, 30.0) as f32;

    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let pos = LatLon::new(
                start.lat + t * (end.lat - start.lat),
                start.lon + t * (end.lon - start.lon),
            );
            if i == n - 1 {
                Fix::new(pos, bearing, 0.0, 0.0)
            } else {
                Fix::new(pos, bearing, speed, 0.0)
            }
        })
        .collect()
}
