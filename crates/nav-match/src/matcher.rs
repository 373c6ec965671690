//! The route matcher.
//!
//! # How a fix becomes guidance
//!
//! 1. Find the closest route point and decide whether the observer has
//!    already progressed past it (70 % into the segment, heading aligned).
//! 2. Collect candidate edges around the fix, preferring edges that back
//!    the route itself (resolved once per route in [`set_route`]).
//! 3. Score candidates by perpendicular distance, bearing agreement, and a
//!    speed plausibility factor; project onto the winner.
//! 4. Walk the route ahead for the next ≥ 30° turn and phrase it.
//!
//! [`set_route`]: RouteMatcher::set_route

use log::{debug, warn};

use nav_core::geo::{bearing_diff, project_onto_segment, wrap_signed};
use nav_core::{EdgeId, Fix, LatLon};
use nav_graph::RoadGraph;
use nav_route::Route;

use crate::result::{Maneuver, MatchResult};

// ── Tuning constants ──────────────────────────────────────────────────────────

/// Consecutive route points further apart than this draw a validation
/// warning at `set_route` time.
const GAP_WARN_M: f64 = 50.0;

/// Radii for binding route segments to graph edges.
const SEGMENT_BIND_RADIUS_M: f64 = 50.0;
const SEGMENT_BIND_RETRY_M: f64 = 100.0;

/// Radii for collecting candidate edges around a fix.
const CANDIDATE_RADIUS_M: f64 = 100.0;
const CANDIDATE_RETRY_M: f64 = 300.0;

/// Candidates further than this from the fix are rejected outright.
const MAX_PERP_DISTANCE_M: f64 = 50.0;

/// Candidate scoring weights.
const DISTANCE_WEIGHT: f64 = 1.0;
const BEARING_WEIGHT: f64 = 0.5;
/// Multiplier applied to candidates that back the active route.
const ON_ROUTE_BONUS: f64 = 0.5;

/// Progress fraction and heading agreement needed to advance past the
/// closest point.
const ADVANCE_PROGRESS: f64 = 0.7;
const ADVANCE_HEADING_DEG: f64 = 45.0;

/// Bearing changes above this at a route point count as a maneuver.
const TURN_THRESHOLD_DEG: f64 = 30.0;

// ── Active-route state ────────────────────────────────────────────────────────

/// Everything precomputed at `set_route` time.
struct ActiveRoute {
    route: Route,
    /// `cumulative[i]` = along-route metres from the start to point `i`.
    cumulative: Vec<f64>,
    /// Best graph edge backing each route segment, if any.
    segment_edges: Vec<Option<EdgeId>>,
}

// ── RouteMatcher ──────────────────────────────────────────────────────────────

/// Projects live fixes onto the active route and emits guidance.
#[derive(Default)]
pub struct RouteMatcher {
    active: Option<ActiveRoute>,
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when a route is set.
    pub fn has_route(&self) -> bool {
        self.active.is_some()
    }

    /// Drop the active route.  Required whenever the graph the matcher was
    /// initialized against is cleared — the cached edge ids die with it.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Activate `route` for matching, resolving each route segment to its
    /// best-fitting graph edge.
    pub fn set_route(&mut self, route: Route, graph: &RoadGraph) {
        let points = &route.points;

        let wide_gaps = points
            .windows(2)
            .filter(|w| w[0].pos.distance_m(w[1].pos) > GAP_WARN_M)
            .count();
        if wide_gaps > 0 {
            warn!("route {} has {wide_gaps} segment(s) wider than {GAP_WARN_M} m", route.id);
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for w in points.windows(2) {
            total += w[0].pos.distance_m(w[1].pos);
            cumulative.push(total);
        }

        let segment_edges = points
            .windows(2)
            .map(|w| bind_segment(graph, w[0].pos, w[1].pos))
            .collect();

        debug!("route {} activated: {} points, {total:.0} m", route.id, points.len());
        self.active = Some(ActiveRoute {
            route,
            cumulative,
            segment_edges,
        });
    }

    /// Match one fix against the active route.
    pub fn match_fix(&self, fix: &Fix, graph: &RoadGraph) -> MatchResult {
        let active = match &self.active {
            Some(a) => a,
            None => return MatchResult::no_route(fix.pos, fix.bearing_deg),
        };
        let points = &active.route.points;

        // ── Progress along the route ──────────────────────────────────────
        let closest_i = find_progress_index(points, fix);

        // ── Candidate edges around the fix ────────────────────────────────
        let mut candidates = graph.nearby_edges(fix.pos, CANDIDATE_RADIUS_M);
        if candidates.is_empty() {
            candidates = graph.nearby_edges(fix.pos, CANDIDATE_RETRY_M);
        }

        let on_route: Vec<EdgeId> = candidates
            .iter()
            .copied()
            .filter(|id| active.segment_edges.contains(&Some(*id)))
            .collect();
        let pool: &[EdgeId] = if on_route.is_empty() { &candidates } else { &on_route };
        let preferred = !on_route.is_empty();

        let best = pool
            .iter()
            .filter_map(|&id| score_candidate(graph, id, fix, preferred))
            .min_by(|a, b| a.score.total_cmp(&b.score));

        // ── Guidance ──────────────────────────────────────────────────────
        let (maneuver_i, maneuver) = next_maneuver(points, closest_i);
        let distance_to_next_m =
            (active.cumulative[maneuver_i] - active.cumulative[closest_i]).max(0.0) as u32;

        match best {
            Some(m) => {
                debug!(
                    "matched to '{}' at {:.1} m (score {:.2})",
                    m.street_name, m.perp_distance_m, m.score
                );
                MatchResult {
                    street_name: m.street_name,
                    next_maneuver: maneuver,
                    distance_to_next_m,
                    eta: String::new(),
                    matched: m.matched,
                    matched_bearing_deg: m.matched_bearing_deg,
                }
            }
            None => {
                // No edge backs this position.  Still on the polyline means
                // an unmapped stretch (direct routes); off it means the
                // observer has left the route.
                let on_segment = project_on_route(points, closest_i, fix.pos);
                if on_segment.distance_m <= MAX_PERP_DISTANCE_M {
                    // "Arrive" is only honest at the final point; anywhere
                    // else on an unmapped stretch the instruction is to
                    // stay on the line.
                    let maneuver = if closest_i + 1 >= points.len() {
                        Maneuver::Arrive
                    } else {
                        Maneuver::FollowRoute
                    };
                    MatchResult {
                        street_name: String::new(),
                        next_maneuver: maneuver,
                        distance_to_next_m,
                        eta: String::new(),
                        matched: on_segment.point,
                        matched_bearing_deg: segment_bearing(points, closest_i) as f32,
                    }
                } else {
                    debug!("fix {:.0} m off route; recalc needed", on_segment.distance_m);
                    MatchResult {
                        street_name: String::new(),
                        next_maneuver: Maneuver::RecalcNeeded,
                        distance_to_next_m,
                        eta: String::new(),
                        matched: fix.pos,
                        matched_bearing_deg: fix.bearing_deg,
                    }
                }
            }
        }
    }
}

// ── Progress tracking ─────────────────────────────────────────────────────────

/// Index of the route point the observer is at: the closest point, advanced
/// by one when the fix sits more than 70 % into the following segment with
/// an aligned heading.  Clamped to the last index.
fn find_progress_index(points: &[Fix], fix: &Fix) -> usize {
    let mut closest_i = 0;
    let mut closest_d = f64::MAX;
    for (i, p) in points.iter().enumerate() {
        let d = fix.pos.distance_m(p.pos);
        if d < closest_d {
            closest_d = d;
            closest_i = i;
        }
    }

    if closest_i + 1 < points.len() {
        let a = points[closest_i].pos;
        let b = points[closest_i + 1].pos;
        let proj = project_onto_segment(fix.pos, a, b);
        let heading_ok = bearing_diff(f64::from(fix.bearing_deg), a.bearing_to(b)) < ADVANCE_HEADING_DEG;
        if proj.t > ADVANCE_PROGRESS && heading_ok {
            closest_i += 1;
        }
    }
    closest_i.min(points.len() - 1)
}

/// Projection of `pos` onto the route segment at `i` (or the final point).
fn project_on_route(points: &[Fix], i: usize, pos: LatLon) -> nav_core::SegmentProjection {
    if i + 1 < points.len() {
        project_onto_segment(pos, points[i].pos, points[i + 1].pos)
    } else {
        let last = points[points.len() - 1].pos;
        nav_core::SegmentProjection {
            point: last,
            t: 1.0,
            distance_m: pos.distance_m(last),
        }
    }
}

/// Travel bearing of the route segment at `i` (backwards-looking at the end).
fn segment_bearing(points: &[Fix], i: usize) -> f64 {
    if i + 1 < points.len() {
        points[i].pos.bearing_to(points[i + 1].pos)
    } else if points.len() >= 2 {
        points[points.len() - 2].pos.bearing_to(points[i].pos)
    } else {
        0.0
    }
}

// ── Maneuver derivation ───────────────────────────────────────────────────────

/// The first route index past `from` whose turn exceeds 30°, with its
/// phrased maneuver; the final index ("arrive") when the remainder is
/// straight.
fn next_maneuver(points: &[Fix], from: usize) -> (usize, Maneuver) {
    let last = points.len() - 1;
    for j in (from + 1)..last {
        let bearing_in = points[j - 1].pos.bearing_to(points[j].pos);
        let bearing_out = points[j].pos.bearing_to(points[j + 1].pos);
        let angle = wrap_signed(bearing_out - bearing_in);
        if angle.abs() > TURN_THRESHOLD_DEG {
            return (j, Maneuver::from_turn_angle(angle));
        }
    }
    (last, Maneuver::Arrive)
}

// ── Candidate scoring ─────────────────────────────────────────────────────────

struct ScoredMatch {
    score: f64,
    perp_distance_m: f64,
    matched: LatLon,
    matched_bearing_deg: f32,
    street_name: String,
}

/// Score one candidate edge against the fix; `None` when it is too far to
/// be plausible.
fn score_candidate(graph: &RoadGraph, id: EdgeId, fix: &Fix, on_route: bool) -> Option<ScoredMatch> {
    let edge = graph.try_edge(id)?;
    let a = graph.node_pos(edge.from)?;
    let b = graph.node_pos(edge.to)?;

    let proj = project_onto_segment(fix.pos, a, b);
    if proj.distance_m > MAX_PERP_DISTANCE_M {
        return None;
    }

    let edge_bearing = a.bearing_to(b);
    let diff = bearing_diff(f64::from(fix.bearing_deg), edge_bearing);

    let base = DISTANCE_WEIGHT * proj.distance_m + BEARING_WEIGHT * (diff / 180.0) * 50.0;
    let bonus = if on_route { ON_ROUTE_BONUS } else { 1.0 };
    let score = base * bonus * speed_factor(fix.speed_mps, edge.speed_limit_kph);

    // Present the bearing in the direction of travel.
    let matched_bearing = if diff > 90.0 {
        (edge_bearing + 180.0) % 360.0
    } else {
        edge_bearing
    };

    Some(ScoredMatch {
        score,
        perp_distance_m: proj.distance_m,
        matched: proj.point,
        matched_bearing_deg: matched_bearing as f32,
        street_name: edge.name.clone(),
    })
}

/// Plausibility multiplier from observed speed against the edge's limit.
/// Rows are checked top to bottom; the first hit wins.
fn speed_factor(speed_mps: f32, limit_kph: f32) -> f64 {
    if speed_mps > 1.0 && limit_kph > 60.0 {
        0.8
    } else if speed_mps > 10.0 && limit_kph < 30.0 {
        1.2
    } else if speed_mps < 5.0 && limit_kph > 70.0 {
        1.2
    } else {
        1.0
    }
}

// ── Segment → edge binding ────────────────────────────────────────────────────

/// Resolve the graph edge that best represents one route segment, scored by
/// midpoint projection distance plus bearing disagreement (20 m per 45°).
fn bind_segment(graph: &RoadGraph, a: LatLon, b: LatLon) -> Option<EdgeId> {
    let mid = LatLon::new((a.lat + b.lat) / 2.0, (a.lon + b.lon) / 2.0);
    let seg_bearing = a.bearing_to(b);

    let mut candidates = graph.nearby_edges(mid, SEGMENT_BIND_RADIUS_M);
    if candidates.is_empty() {
        candidates = graph.nearby_edges(mid, SEGMENT_BIND_RETRY_M);
    }

    candidates
        .into_iter()
        .filter_map(|id| {
            let edge = graph.try_edge(id)?;
            let ea = graph.node_pos(edge.from)?;
            let eb = graph.node_pos(edge.to)?;
            let proj = project_onto_segment(mid, ea, eb);
            let diff = bearing_diff(seg_bearing, ea.bearing_to(eb));
            Some((id, proj.distance_m + (diff / 45.0) * 20.0))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}
