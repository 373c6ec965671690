//! Match results and maneuver instructions.

use nav_core::LatLon;

/// A turn instruction derived from route geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maneuver {
    Continue,
    SlightLeft,
    Left,
    SharpLeft,
    SlightRight,
    Right,
    SharpRight,
    Arrive,
    /// On the route, but no graph edge backs the current segment (direct
    /// routes over unmapped ground).
    FollowRoute,
    /// No active route to match against.
    NoRoute,
    /// The fix has left the route corridor; the embedder decides whether
    /// to reroute.
    RecalcNeeded,
}

impl Maneuver {
    /// Classify the signed turn angle (degrees, wrapped to (-180, 180])
    /// at a route point.
    pub fn from_turn_angle(angle_deg: f64) -> Maneuver {
        let magnitude = angle_deg.abs();
        if magnitude < 20.0 {
            Maneuver::Continue
        } else if magnitude < 60.0 {
            if angle_deg < 0.0 { Maneuver::SlightLeft } else { Maneuver::SlightRight }
        } else if magnitude < 120.0 {
            if angle_deg < 0.0 { Maneuver::Left } else { Maneuver::Right }
        } else if angle_deg < 0.0 {
            Maneuver::SharpLeft
        } else {
            Maneuver::SharpRight
        }
    }

    /// Human-readable instruction text.
    pub fn as_str(self) -> &'static str {
        match self {
            Maneuver::Continue => "Continue straight",
            Maneuver::SlightLeft => "Slight left",
            Maneuver::Left => "Turn left",
            Maneuver::SharpLeft => "Sharp left",
            Maneuver::SlightRight => "Slight right",
            Maneuver::Right => "Turn right",
            Maneuver::SharpRight => "Sharp right",
            Maneuver::Arrive => "Arrive at destination",
            Maneuver::FollowRoute => "Follow the route",
            Maneuver::NoRoute => "Set a destination",
            Maneuver::RecalcNeeded => "Return to the route",
        }
    }
}

impl std::fmt::Display for Maneuver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the matcher reports for one fix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    /// Name of the matched edge, or empty when none backs the position.
    pub street_name: String,
    pub next_maneuver: Maneuver,
    /// Along-route distance to the maneuver point, metres.
    pub distance_to_next_m: u32,
    /// RFC 3339 arrival estimate.  Always empty here — the embedder owns
    /// clock and locale.
    pub eta: String,
    /// The fix projected onto the matched edge (or route).
    pub matched: LatLon,
    pub matched_bearing_deg: f32,
}

impl MatchResult {
    /// Result for a fix with no active route.
    pub fn no_route(pos: LatLon, bearing_deg: f32) -> Self {
        Self {
            street_name: "No active route".to_string(),
            next_maneuver: Maneuver::NoRoute,
            distance_to_next_m: 0,
            eta: String::new(),
            matched: pos,
            matched_bearing_deg: bearing_deg,
        }
    }
}
