//! Position samples, raw and filtered.
//!
//! A [`RawFix`] is what the platform's location provider delivers: position
//! plus bearing/speed/accuracy, any of which may be NaN when the sensor has
//! no estimate.  A [`Fix`] is the same shape after the location filter has
//! run — bearing and speed are guaranteed finite.  The receive timestamp is
//! implicit: callers hand the filter a monotonic millisecond clock alongside
//! each sample.

use crate::geo::LatLon;

/// An unfiltered location sample.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawFix {
    pub pos: LatLon,
    /// Degrees clockwise from true north, in [0, 360), or NaN when unknown.
    pub bearing_deg: f32,
    /// Metres per second, ≥ 0, or NaN when unknown.
    pub speed_mps: f32,
    /// Estimated 1-σ horizontal error in metres, ≥ 0.
    pub accuracy_m: f32,
}

impl RawFix {
    pub fn new(lat: f64, lon: f64, bearing_deg: f32, speed_mps: f32, accuracy_m: f32) -> Self {
        Self {
            pos: LatLon::new(lat, lon),
            bearing_deg,
            speed_mps,
            accuracy_m,
        }
    }
}

/// A filtered location sample.  Same shape as [`RawFix`], but `bearing_deg`
/// and `speed_mps` are always finite (the filter synthesizes them from its
/// velocity estimate when the sensor reported NaN).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub pos: LatLon,
    pub bearing_deg: f32,
    pub speed_mps: f32,
    pub accuracy_m: f32,
}

impl Fix {
    pub fn new(pos: LatLon, bearing_deg: f32, speed_mps: f32, accuracy_m: f32) -> Self {
        debug_assert!(bearing_deg.is_finite() && speed_mps.is_finite());
        Self {
            pos,
            bearing_deg,
            speed_mps,
            accuracy_m,
        }
    }

    /// A stationary fix at `pos` — used for synthetic route points before
    /// bearings and speeds are assigned.
    #[inline]
    pub fn at(pos: LatLon) -> Self {
        Self::new(pos, 0.0, 0.0, 0.0)
    }
}
