//! Unit tests for nav-core primitives.

#[cfg(test)]
mod geo {
    use crate::geo::{bearing_diff, project_onto_segment, wrap_signed};
    use crate::LatLon;

    #[test]
    fn zero_distance() {
        let p = LatLon::new(60.1699, 24.9384);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn distance_symmetric() {
        let a = LatLon::new(60.1699, 24.9384);
        let b = LatLon::new(60.1921, 24.9458);
        assert!((a.distance_m(b) - b.distance_m(a)).abs() < 1e-6);
    }

    #[test]
    fn one_degree_of_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = LatLon::new(60.0, 25.0);
        let b = LatLon::new(61.0, 25.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn triangle_inequality() {
        let a = LatLon::new(60.0, 24.0);
        let b = LatLon::new(60.1, 24.2);
        let c = LatLon::new(60.05, 24.4);
        assert!(a.distance_m(c) <= a.distance_m(b) + b.distance_m(c) + 1.0);
    }

    #[test]
    fn cardinal_bearings() {
        let origin = LatLon::new(60.0, 25.0);
        let north = LatLon::new(60.01, 25.0);
        let east = LatLon::new(60.0, 25.01);
        let south = LatLon::new(59.99, 25.0);

        assert!(origin.bearing_to(north).abs() < 0.5);
        assert!((origin.bearing_to(east) - 90.0).abs() < 0.5);
        assert!((origin.bearing_to(south) - 180.0).abs() < 0.5);
    }

    #[test]
    fn bearing_in_range() {
        let origin = LatLon::new(60.0, 25.0);
        let west = LatLon::new(60.0, 24.99);
        let b = origin.bearing_to(west);
        assert!((0.0..360.0).contains(&b));
        assert!((b - 270.0).abs() < 0.5);
    }

    #[test]
    fn wrap_signed_range() {
        assert_eq!(wrap_signed(0.0), 0.0);
        assert_eq!(wrap_signed(180.0), 180.0);
        assert_eq!(wrap_signed(190.0), -170.0);
        assert_eq!(wrap_signed(-190.0), 170.0);
        assert_eq!(wrap_signed(350.0), -10.0);
    }

    #[test]
    fn bearing_diff_symmetric_across_north() {
        assert!((bearing_diff(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((bearing_diff(10.0, 350.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn validity() {
        assert!(LatLon::new(60.0, 25.0).is_valid());
        assert!(!LatLon::new(f64::NAN, 25.0).is_valid());
        assert!(!LatLon::new(91.0, 25.0).is_valid());
        assert!(!LatLon::new(60.0, 181.0).is_valid());
    }

    #[test]
    fn projection_midpoint() {
        // Segment running due east; query point above its midpoint.
        let a = LatLon::new(60.0, 25.0);
        let b = LatLon::new(60.0, 25.002);
        let p = LatLon::new(60.0005, 25.001);

        let proj = project_onto_segment(p, a, b);
        assert!((proj.t - 0.5).abs() < 0.01);
        assert!((proj.point.lat - 60.0).abs() < 1e-9);
        // ~0.0005° of latitude ≈ 55 m
        assert!((proj.distance_m - 55.6).abs() < 2.0, "got {}", proj.distance_m);
    }

    #[test]
    fn projection_clamps_to_endpoints() {
        let a = LatLon::new(60.0, 25.0);
        let b = LatLon::new(60.0, 25.002);
        let before = LatLon::new(60.0, 24.99);
        let after = LatLon::new(60.0, 25.01);

        assert_eq!(project_onto_segment(before, a, b).t, 0.0);
        assert_eq!(project_onto_segment(after, a, b).t, 1.0);
    }

    #[test]
    fn projection_degenerate_segment() {
        let a = LatLon::new(60.0, 25.0);
        let p = LatLon::new(60.001, 25.0);
        let proj = project_onto_segment(p, a, a);
        assert_eq!(proj.t, 0.0);
        assert!((proj.distance_m - p.distance_m(a)).abs() < 1e-9);
    }
}

#[cfg(test)]
mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u64::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn edge_index_roundtrip() {
        assert_eq!(EdgeId(42).index(), 42);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(EdgeId(7).to_string(), "EdgeId(7)");
    }
}

#[cfg(test)]
mod fix {
    use crate::{Fix, LatLon, RawFix};

    #[test]
    fn raw_fix_carries_nan() {
        let raw = RawFix::new(60.0, 25.0, f32::NAN, f32::NAN, 5.0);
        assert!(raw.bearing_deg.is_nan());
        assert!(raw.speed_mps.is_nan());
    }

    #[test]
    fn stationary_fix() {
        let f = Fix::at(LatLon::new(60.0, 25.0));
        assert_eq!(f.bearing_deg, 0.0);
        assert_eq!(f.speed_mps, 0.0);
    }
}
