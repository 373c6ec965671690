//! Pluggable edge costs for the A* search.
//!
//! The search is parameterized by a single-method trait so route variants
//! are just alternative cost functions — no duplicate search code.

use nav_graph::{Edge, RoadKind};

/// Cost of traversing one edge.  Must be positive for every edge, or the
/// search's admissibility (and termination) breaks.
pub trait EdgeCost {
    fn cost(&self, edge: &Edge) -> f64;
}

/// Plain geometric length — the default, shortest-distance routing.
pub struct Length;

impl EdgeCost for Length {
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        edge.length_m
    }
}

/// Travel-time flavored cost: length scaled by how far the speed limit is
/// below a 50 km/h baseline.  Fast roads get cheaper, slow roads dearer.
pub struct Fastest;

impl EdgeCost for Fastest {
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        edge.length_m * (50.0 / f64::from(edge.speed_limit_kph.max(1.0)))
    }
}

/// Penalizes motorway-class edges tenfold, steering routes onto the
/// ordinary street network.
pub struct NoHighways;

impl EdgeCost for NoHighways {
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        let factor = if edge.kind == RoadKind::Highway { 10.0 } else { 1.0 };
        edge.length_m * factor
    }
}
