//! Cell-bucketed spatial index over edges.
//!
//! # Design
//!
//! Edges are registered into a hash map keyed by `(lat_cell, lon_cell)`,
//! where each cell spans [`CELL_SIZE_DEG`] (~111 m of latitude).  An edge is
//! added to every cell its bounding box intersects, so a radius query only
//! has to scan the square of cells covering the search circle and dedupe.
//!
//! A sidecar list of all edges backs a graceful-degradation path: when a
//! wide query (> 1 km) hits no cells at all — typical of a tiny OSM extract
//! whose coverage the caller has wandered off — the whole pool is returned
//! rather than nothing.
//!
//! Result ordering is arbitrary; callers must not depend on it.

use std::collections::{HashMap, HashSet};

use nav_core::geo::METERS_PER_DEG;
use nav_core::{EdgeId, LatLon};

/// Cell edge length in degrees (~111 m of latitude).
pub const CELL_SIZE_DEG: f64 = 0.001;

/// Radius above which an empty cell scan falls back to the sidecar list.
const FALLBACK_RADIUS_M: f64 = 1_000.0;

/// Spatial index mapping cells to the edges whose AABB touches them.
#[derive(Debug, Default)]
pub struct CellIndex {
    cells: HashMap<(i32, i32), Vec<EdgeId>>,
    all_edges: Vec<EdgeId>,
}

impl CellIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `edge` in every cell intersecting the AABB of `a → b`.
    pub fn insert(&mut self, edge: EdgeId, a: LatLon, b: LatLon) {
        let (lat_min, lat_max) = minmax(a.lat, b.lat);
        let (lon_min, lon_max) = minmax(a.lon, b.lon);

        let c_lat_min = cell_coord(lat_min);
        let c_lat_max = cell_coord(lat_max);
        let c_lon_min = cell_coord(lon_min);
        let c_lon_max = cell_coord(lon_max);

        for lat in c_lat_min..=c_lat_max {
            for lon in c_lon_min..=c_lon_max {
                self.cells.entry((lat, lon)).or_default().push(edge);
            }
        }
        self.all_edges.push(edge);
    }

    /// All edges whose cells intersect the circle around `loc`.
    ///
    /// Returns a superset of the edges within `radius_m` (cell granularity
    /// rounds outwards), deduplicated, in arbitrary order.  An empty scan at
    /// a radius above 1 km degrades to the full edge list.
    pub fn query(&self, loc: LatLon, radius_m: f64) -> Vec<EdgeId> {
        let radius_deg = radius_m / METERS_PER_DEG;
        let span = 1 + (radius_deg / CELL_SIZE_DEG).ceil() as i32;

        let center_lat = cell_coord(loc.lat);
        let center_lon = cell_coord(loc.lon);

        let mut seen: HashSet<EdgeId> = HashSet::new();
        for lat in (center_lat - span)..=(center_lat + span) {
            for lon in (center_lon - span)..=(center_lon + span) {
                if let Some(bucket) = self.cells.get(&(lat, lon)) {
                    seen.extend(bucket.iter().copied());
                }
            }
        }

        if seen.is_empty() && radius_m > FALLBACK_RADIUS_M {
            return self.all_edges.clone();
        }
        seen.into_iter().collect()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.all_edges.clear();
    }

    pub fn len(&self) -> usize {
        self.all_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_edges.is_empty()
    }
}

#[inline]
fn cell_coord(deg: f64) -> i32 {
    (deg / CELL_SIZE_DEG).floor() as i32
}

#[inline]
fn minmax(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
