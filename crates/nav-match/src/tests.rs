//! Unit tests for nav-match.

#[cfg(test)]
mod helpers {
    use nav_core::{LatLon, NodeId};
    use nav_graph::{RoadGraph, RoadKind};
    use nav_route::{Route, RoutingEngine};

    /// An L-shaped street layout: two blocks east along "Main Street",
    /// then two blocks north along "North Avenue" (~111 m per block).
    ///
    /// ```text
    ///             5
    ///             |
    ///             4
    ///             |
    ///   1 -- 2 -- 3
    /// ```
    pub fn l_graph() -> RoadGraph {
        let mut g = RoadGraph::new();
        g.add_node(NodeId(1), LatLon::new(0.0, 25.0));
        g.add_node(NodeId(2), LatLon::new(0.0, 25.001));
        g.add_node(NodeId(3), LatLon::new(0.0, 25.002));
        g.add_node(NodeId(4), LatLon::new(0.001, 25.002));
        g.add_node(NodeId(5), LatLon::new(0.002, 25.002));

        let link = |g: &mut RoadGraph, a: u64, b: u64, name: &str| {
            g.add_edge(NodeId(a), NodeId(b), name, RoadKind::Residential, 30.0, false);
            g.add_edge(NodeId(b), NodeId(a), name, RoadKind::Residential, 30.0, false);
        };
        link(&mut g, 1, 2, "Main Street");
        link(&mut g, 2, 3, "Main Street");
        link(&mut g, 3, 4, "North Avenue");
        link(&mut g, 4, 5, "North Avenue");
        g
    }

    /// Route along the whole L, corner included.
    pub fn l_route(g: &mut RoadGraph) -> Route {
        let mut engine = RoutingEngine::with_seed(42);
        let routes = engine.routes(g, LatLon::new(0.0, 25.0), LatLon::new(0.002, 25.002));
        routes.into_iter().next().expect("route over the L graph")
    }

    pub const CORNER: LatLon = LatLon { lat: 0.0, lon: 25.002 };
}

// ── Maneuver phrasing ─────────────────────────────────────────────────────────

#[cfg(test)]
mod maneuvers {
    use crate::result::Maneuver;

    #[test]
    fn classification_table() {
        assert_eq!(Maneuver::from_turn_angle(0.0), Maneuver::Continue);
        assert_eq!(Maneuver::from_turn_angle(19.9), Maneuver::Continue);
        assert_eq!(Maneuver::from_turn_angle(-19.9), Maneuver::Continue);
        assert_eq!(Maneuver::from_turn_angle(30.0), Maneuver::SlightRight);
        assert_eq!(Maneuver::from_turn_angle(-30.0), Maneuver::SlightLeft);
        assert_eq!(Maneuver::from_turn_angle(90.0), Maneuver::Right);
        assert_eq!(Maneuver::from_turn_angle(-90.0), Maneuver::Left);
        assert_eq!(Maneuver::from_turn_angle(150.0), Maneuver::SharpRight);
        assert_eq!(Maneuver::from_turn_angle(-150.0), Maneuver::SharpLeft);
        assert_eq!(Maneuver::from_turn_angle(180.0), Maneuver::SharpRight);
    }

    #[test]
    fn instruction_text() {
        assert_eq!(Maneuver::Left.to_string(), "Turn left");
        assert_eq!(Maneuver::Arrive.to_string(), "Arrive at destination");
        assert_eq!(Maneuver::NoRoute.to_string(), "Set a destination");
    }
}

// ── Matching ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod matching {
    use nav_core::{Fix, LatLon};
    use nav_graph::RoadGraph;
    use nav_route::RoutingEngine;

    use super::helpers::{l_graph, l_route, CORNER};
    use crate::matcher::RouteMatcher;
    use crate::result::Maneuver;

    #[test]
    fn no_route_passthrough() {
        let g = l_graph();
        let matcher = RouteMatcher::new();

        let fix = Fix::new(LatLon::new(0.0, 25.0005), 90.0, 5.0, 4.0);
        let m = matcher.match_fix(&fix, &g);

        assert_eq!(m.next_maneuver, Maneuver::NoRoute);
        assert_eq!(m.matched, fix.pos);
        assert_eq!(m.matched_bearing_deg, 90.0);
        assert!(m.eta.is_empty());
    }

    #[test]
    fn on_route_point_matches_street() {
        let mut g = l_graph();
        let route = l_route(&mut g);
        let mut matcher = RouteMatcher::new();
        matcher.set_route(route.clone(), &g);

        // Stand exactly on the 3rd route point, heading east along Main
        // Street (still on the first leg).
        let p = route.points[2];
        let fix = Fix::new(p.pos, 90.0, 5.0, 4.0);
        let m = matcher.match_fix(&fix, &g);

        assert_eq!(m.street_name, "Main Street");
        assert!(m.matched.distance_m(p.pos) < 1.0);
        // Next turn is the corner: east → north is a left.
        assert_eq!(m.next_maneuver, Maneuver::Left);

        let expected = p.pos.distance_m(CORNER);
        let got = f64::from(m.distance_to_next_m);
        assert!(
            (got - expected).abs() < 10.0,
            "distance to corner {got} vs {expected}"
        );
    }

    #[test]
    fn distance_to_next_is_monotone() {
        let mut g = l_graph();
        let route = l_route(&mut g);
        let mut matcher = RouteMatcher::new();
        matcher.set_route(route, &g);

        // Drive the first leg east in 20 m steps.
        let mut last = u32::MAX;
        for step in 0..9 {
            let pos = LatLon::new(0.0, 25.0 + step as f64 * 0.0002);
            let fix = Fix::new(pos, 90.0, 8.0, 4.0);
            let m = matcher.match_fix(&fix, &g);
            if m.next_maneuver == Maneuver::Left {
                assert!(m.distance_to_next_m <= last, "distance increased at step {step}");
                last = m.distance_to_next_m;
            }
        }
        assert!(last < u32::MAX, "never saw the corner maneuver");
    }

    #[test]
    fn arrive_at_destination() {
        let mut g = l_graph();
        let route = l_route(&mut g);
        let mut matcher = RouteMatcher::new();
        matcher.set_route(route.clone(), &g);

        let end = route.points.last().unwrap().pos;
        let fix = Fix::new(end, 0.0, 1.0, 4.0);
        let m = matcher.match_fix(&fix, &g);

        assert_eq!(m.next_maneuver, Maneuver::Arrive);
        assert_eq!(m.distance_to_next_m, 0);
    }

    #[test]
    fn opposing_motion_flips_bearing() {
        let mut g = l_graph();
        let route = l_route(&mut g);
        let mut matcher = RouteMatcher::new();
        matcher.set_route(route, &g);

        // Driving west along the eastbound-bearing first leg.
        let fix = Fix::new(LatLon::new(0.0, 25.0008), 270.0, 5.0, 4.0);
        let m = matcher.match_fix(&fix, &g);

        assert_eq!(m.street_name, "Main Street");
        assert!((f64::from(m.matched_bearing_deg) - 270.0).abs() < 1.0);
    }

    #[test]
    fn far_off_route_needs_recalc() {
        let mut g = l_graph();
        let route = l_route(&mut g);
        let mut matcher = RouteMatcher::new();
        matcher.set_route(route, &g);

        // ~600 m south of the first leg.
        let fix = Fix::new(LatLon::new(-0.0054, 25.001), 90.0, 5.0, 4.0);
        let m = matcher.match_fix(&fix, &g);

        assert_eq!(m.next_maneuver, Maneuver::RecalcNeeded);
        assert_eq!(m.matched, fix.pos);
        assert!(m.street_name.is_empty());
    }

    #[test]
    fn direct_route_is_followed_without_edges() {
        // No graph data at all: the route is a straight synthetic line.
        let mut g = RoadGraph::new();
        let mut engine = RoutingEngine::with_seed(9);
        let route = engine
            .routes(&mut g, LatLon::new(60.0, 25.0), LatLon::new(60.0, 25.01))
            .remove(0);

        let mut matcher = RouteMatcher::new();
        matcher.set_route(route.clone(), &g);

        let mid = route.points[route.points.len() / 2];
        let fix = Fix::new(mid.pos, mid.bearing_deg, 5.0, 4.0);
        let m = matcher.match_fix(&fix, &g);

        assert_eq!(m.next_maneuver, Maneuver::FollowRoute);
        assert!(m.street_name.is_empty());
        assert!(m.matched.distance_m(mid.pos) < 5.0);
    }

    #[test]
    fn clear_drops_the_route() {
        let mut g = l_graph();
        let route = l_route(&mut g);
        let mut matcher = RouteMatcher::new();
        matcher.set_route(route, &g);
        assert!(matcher.has_route());

        matcher.clear();
        assert!(!matcher.has_route());

        let fix = Fix::new(LatLon::new(0.0, 25.0), 90.0, 5.0, 4.0);
        assert_eq!(matcher.match_fix(&fix, &g).next_maneuver, Maneuver::NoRoute);
    }
}
