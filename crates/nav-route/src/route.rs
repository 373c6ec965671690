//! The route value handed to rendering and matching.

use nav_core::{Fix, LatLon};

/// A computed route: densified points plus presentation metadata.
///
/// `points` always has at least two entries; the first is the requested
/// origin and the last the requested destination (to within a metre).
/// Each point carries the bearing towards its successor and a plausible
/// travel speed; the last point repeats the previous bearing with speed 0.
/// Routes own their geometry — there are no references back into the graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Unique within one engine instance ("route-" + 8 hex digits).
    pub id: String,
    pub name: String,
    pub points: Vec<Fix>,
    pub duration_s: u32,
}

impl Route {
    /// Total polyline length in metres.
    pub fn length_m(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].pos.distance_m(w[1].pos))
            .sum()
    }

    /// `n` positions spaced evenly by point index, endpoints included.
    /// Used for the alternative-similarity comparison.
    pub fn sample_positions(&self, n: usize) -> Vec<LatLon> {
        debug_assert!(n >= 2);
        let last = self.points.len() - 1;
        (0..n)
            .map(|i| {
                let idx = i * last / (n - 1);
                self.points[idx].pos
            })
            .collect()
    }

    pub fn start(&self) -> LatLon {
        self.points[0].pos
    }

    pub fn end(&self) -> LatLon {
        self.points[self.points.len() - 1].pos
    }
}
