//! Geographic coordinate type and spherical-geometry helpers.
//!
//! All angles at the API boundary are decimal degrees (WGS-84); conversions
//! to radians are internal.  Distances are metres on a spherical Earth with
//! R = 6 371 000 m, which is accurate to ~0.5 % — plenty for city-scale
//! routing and matching.

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres per degree of latitude.  One degree of latitude is ~111 km; the
/// same factor is applied to longitude when converting search radii, which
/// overestimates cell spans away from the equator.  That only widens queries,
/// never narrows them.
pub const METERS_PER_DEG: f64 = 111_000.0;

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: LatLon) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing towards `other`, degrees in [0, 360).
    ///
    /// 0° is true north, 90° east.  Returns 0 when the points coincide.
    pub fn bearing_to(self, other: LatLon) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        let deg = y.atan2(x).to_degrees();
        (deg + 360.0) % 360.0
    }

    /// `true` when both components are finite and inside the WGS-84 range.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Angle helpers ─────────────────────────────────────────────────────────────

/// Wrap an angle difference to (-180, 180].
pub fn wrap_signed(deg: f64) -> f64 {
    let mut a = deg % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Absolute difference between two bearings, degrees in [0, 180].
#[inline]
pub fn bearing_diff(a: f64, b: f64) -> f64 {
    wrap_signed(a - b).abs()
}

// ── Segment projection ────────────────────────────────────────────────────────

/// Result of projecting a point onto a segment.
#[derive(Copy, Clone, Debug)]
pub struct SegmentProjection {
    /// The projected point on the segment.
    pub point: LatLon,
    /// Parameter along the segment, clamped to [0, 1].
    pub t: f64,
    /// Haversine distance from the query point to `point`, metres.
    pub distance_m: f64,
}

/// Project `p` perpendicularly onto the segment `a → b`.
///
/// The projection is computed in a local equirectangular plane around `a`
/// (longitude scaled by cos lat), which is exact enough for segment lengths
/// in the tens-of-metres range this engine works with.  Degenerate segments
/// collapse to `a`.
pub fn project_onto_segment(p: LatLon, a: LatLon, b: LatLon) -> SegmentProjection {
    let cos_lat = a.lat.to_radians().cos();

    let ax = 0.0;
    let ay = 0.0;
    let bx = (b.lon - a.lon) * cos_lat;
    let by = b.lat - a.lat;
    let px = (p.lon - a.lon) * cos_lat;
    let py = p.lat - a.lat;

    let len2 = (bx - ax) * (bx - ax) + (by - ay) * (by - ay);
    let t = if len2 <= f64::EPSILON {
        0.0
    } else {
        (((px - ax) * (bx - ax) + (py - ay) * (by - ay)) / len2).clamp(0.0, 1.0)
    };

    let point = LatLon::new(a.lat + t * (b.lat - a.lat), a.lon + t * (b.lon - a.lon));
    SegmentProjection {
        point,
        t,
        distance_m: p.distance_m(point),
    }
}
