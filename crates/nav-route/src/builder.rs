//! Route geometry: densification, smoothing, and the direct fallback.
//!
//! A node path out of the search is too coarse to render or match against
//! (graph nodes can be hundreds of metres apart), so it is densified to a
//! ~25 m point spacing, then lightly smoothed to drop collinear filler the
//! densification itself introduced.

use rand::rngs::SmallRng;
use rand::Rng;

use nav_core::geo::bearing_diff;
use nav_core::{Fix, LatLon, NodeId};
use nav_graph::RoadGraph;

use crate::route::Route;

/// Hard cap on points per route.
pub const MAX_ROUTE_POINTS: usize = 1000;

/// Upper bound on adjacent point spacing for rendered segments.
pub const ROUTE_POINT_SPACING_MAX_M: f64 = 25.0;

/// Average speed used when per-point speeds cannot provide a duration.
pub const FALLBACK_SPEED_MPS: f64 = 9.72;

/// Joins from the user position to the snapped node are densified when
/// longer than this.
const JOIN_THRESHOLD_M: f64 = 10.0;

/// Target spacing when bridging node pairs that share no direct edge.
const BRIDGE_SPACING_M: f64 = 20.0;

/// Adjacent points closer than this are duplicates and are merged.
const MIN_POINT_SPACING_M: f64 = 1.0;

// Smoothing thresholds.
const SMOOTH_MAX_TURN_DEG: f64 = 20.0;
const SMOOTH_MAX_SKIP_M: f64 = 50.0;
const SMOOTH_COLLINEARITY: f64 = 0.8;

/// Jitter applied to intermediate direct-route samples, degrees.
const DIRECT_JITTER_DEG: f64 = 0.000005;

// ── Route assembly ────────────────────────────────────────────────────────────

/// Turn a node path into a finished [`Route`].
pub(crate) fn build_route(
    graph: &RoadGraph,
    path: &[NodeId],
    start: LatLon,
    end: LatLon,
    id: String,
    name: &str,
) -> Route {
    let pts = densify(graph, path, start, end);
    let pts = smooth(pts);
    let pts = thin_to_max(pts);
    finalize(pts, id, name, None)
}

/// Straight-line fallback route, sampled every ~25 m.
///
/// Intermediate samples get sub-metre jitter so downstream consumers never
/// see a perfectly collinear polyline (degenerate for bearing math).
pub(crate) fn direct_route(rng: &mut SmallRng, id: String, start: LatLon, end: LatLon) -> Route {
    let total = start.distance_m(end);
    let segments = ((total / ROUTE_POINT_SPACING_MAX_M).ceil() as usize).max(1);

    let mut pts = Vec::with_capacity(segments + 1);
    pts.push(start);
    for k in 1..segments {
        let mut p = lerp(start, end, k as f64 / segments as f64);
        p.lat += rng.gen_range(-DIRECT_JITTER_DEG..=DIRECT_JITTER_DEG);
        p.lon += rng.gen_range(-DIRECT_JITTER_DEG..=DIRECT_JITTER_DEG);
        pts.push(p);
    }
    pts.push(end);

    let pts = thin_to_max(pts);
    let duration = (total / FALLBACK_SPEED_MPS) as u32;
    finalize(pts, id, "Direct Route", Some(duration))
}

// ── Densification ─────────────────────────────────────────────────────────────

/// Expand a node path into positions bounded by the point-spacing rules:
/// user start/end joined (with 3 interpolated fixes when > 10 m out), node
/// pairs without a direct edge bridged at ~20 m spacing, long direct edges
/// subdivided to the 25 m rendering bound.
fn densify(graph: &RoadGraph, path: &[NodeId], start: LatLon, end: LatLon) -> Vec<LatLon> {
    // Resolve positions up front; a node the graph no longer knows would be
    // a caller bug, and skipping it degrades gracefully.
    let nodes: Vec<(NodeId, LatLon)> = path
        .iter()
        .filter_map(|&n| graph.node_pos(n).map(|p| (n, p)))
        .collect();
    if nodes.is_empty() {
        return vec![start, end];
    }

    let mut pts: Vec<LatLon> = Vec::new();

    let first = nodes[0].1;
    let join = start.distance_m(first);
    if join > MIN_POINT_SPACING_M {
        pts.push(start);
        if join > JOIN_THRESHOLD_M {
            push_linear(&mut pts, start, first, 3);
        }
    }

    for (i, &(node, pos)) in nodes.iter().enumerate() {
        pts.push(pos);

        if let Some(&(next, next_pos)) = nodes.get(i + 1) {
            let gap = pos.distance_m(next_pos);

            if !graph.has_direct_edge(node, next) {
                let n = (((gap / BRIDGE_SPACING_M).ceil()) as usize).max(2);
                push_linear(&mut pts, pos, next_pos, n);
            } else if gap > ROUTE_POINT_SPACING_MAX_M {
                let n = ((gap / ROUTE_POINT_SPACING_MAX_M).ceil() as usize) - 1;
                push_linear(&mut pts, pos, next_pos, n);
            }
        }
    }

    let last = nodes[nodes.len() - 1].1;
    let join = end.distance_m(last);
    if join > MIN_POINT_SPACING_M {
        if join > JOIN_THRESHOLD_M {
            push_linear(&mut pts, last, end, 3);
        }
        pts.push(end);
    }

    dedupe(pts)
}

/// Push `n` evenly spaced positions strictly between `a` and `b`.
fn push_linear(pts: &mut Vec<LatLon>, a: LatLon, b: LatLon, n: usize) {
    for k in 1..=n {
        pts.push(lerp(a, b, k as f64 / (n + 1) as f64));
    }
}

#[inline]
fn lerp(a: LatLon, b: LatLon, t: f64) -> LatLon {
    LatLon::new(a.lat + t * (b.lat - a.lat), a.lon + t * (b.lon - a.lon))
}

/// Merge adjacent points closer than a metre, always keeping the final one.
fn dedupe(pts: Vec<LatLon>) -> Vec<LatLon> {
    let n = pts.len();
    let mut out: Vec<LatLon> = Vec::with_capacity(n);
    for (i, p) in pts.into_iter().enumerate() {
        let duplicate = out
            .last()
            .map(|prev| prev.distance_m(p) < MIN_POINT_SPACING_M)
            .unwrap_or(false);
        if !duplicate {
            out.push(p);
        } else if i == n - 1 {
            // The destination wins over whatever landed next to it.
            let slot = out.len() - 1;
            out[slot] = p;
        }
    }
    if out.len() < 2 {
        // Degenerate request (start ≈ end); keep a two-point route.
        let p = out[0];
        out.push(p);
    }
    out
}

// ── Smoothing ─────────────────────────────────────────────────────────────────

/// Drop interior points that carry no geometry: bearing change under 20°,
/// a resulting gap of at most 50 m, and a prev→next chord at least 80 % of
/// the two-leg length (so real detours survive).  Endpoints are preserved
/// exactly, and no drop can push adjacent spacing past 50 m.
fn smooth(pts: Vec<LatLon>) -> Vec<LatLon> {
    if pts.len() <= 2 {
        return pts;
    }

    let last = pts.len() - 1;
    let mut kept: Vec<LatLon> = vec![pts[0]];

    for i in 1..last {
        let prev = kept[kept.len() - 1];
        let curr = pts[i];
        let next = pts[i + 1];

        let turn = bearing_diff(prev.bearing_to(curr), curr.bearing_to(next));
        let d1 = prev.distance_m(curr);
        let d2 = curr.distance_m(next);
        let chord = prev.distance_m(next);

        let droppable = turn < SMOOTH_MAX_TURN_DEG
            && chord <= SMOOTH_MAX_SKIP_M
            && chord >= SMOOTH_COLLINEARITY * (d1 + d2);
        if !droppable {
            kept.push(curr);
        }
    }

    kept.push(pts[last]);
    kept
}

/// Down-sample by index when the point budget is exceeded; endpoints stay.
fn thin_to_max(pts: Vec<LatLon>) -> Vec<LatLon> {
    if pts.len() <= MAX_ROUTE_POINTS {
        return pts;
    }
    let last = pts.len() - 1;
    (0..MAX_ROUTE_POINTS)
        .map(|i| pts[i * last / (MAX_ROUTE_POINTS - 1)])
        .collect()
}

// ── Finalization ──────────────────────────────────────────────────────────────

/// Attach bearings, speeds, and a duration to a finished polyline.
fn finalize(pts: Vec<LatLon>, id: String, name: &str, duration_override: Option<u32>) -> Route {
    let n = pts.len();
    let mut points: Vec<Fix> = Vec::with_capacity(n);
    let mut total = 0.0;
    let mut duration = 0.0;

    for i in 0..n - 1 {
        let gap = pts[i].distance_m(pts[i + 1]);
        let bearing = pts[i].bearing_to(pts[i + 1]) as f32;
        let speed = (gap / 10.0).clamp(5.0, 30.0);

        total += gap;
        if speed > 0.1 {
            duration += gap / speed;
        }
        points.push(Fix::new(pts[i], bearing, speed as f32, 0.0));
    }

    // Last point: previous bearing, speed zero.
    let last_bearing = points.last().map(|p| p.bearing_deg).unwrap_or(0.0);
    points.push(Fix::new(pts[n - 1], last_bearing, 0.0, 0.0));

    let duration_s = duration_override.unwrap_or_else(|| {
        if duration > 0.0 {
            duration as u32
        } else {
            (total / FALLBACK_SPEED_MPS) as u32
        }
    });

    Route {
        id,
        name: name.to_string(),
        points,
        duration_s,
    }
}
