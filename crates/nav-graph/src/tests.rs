//! Unit tests for nav-graph.
//!
//! All tests use hand-crafted graphs or inline OSM documents so they run
//! without any data files.

#[cfg(test)]
mod helpers {
    use nav_core::{LatLon, NodeId};

    use crate::graph::{RoadGraph, RoadKind};

    /// Build a 3×3 grid of nodes at 0.001° spacing, fully connected with
    /// bidirectional residential streets.
    ///
    /// Node ids are `row * 3 + col + 1` (1-based; id 0 is not a valid OSM id):
    ///
    /// ```text
    ///   7 8 9
    ///   4 5 6
    ///   1 2 3
    /// ```
    pub fn grid_graph() -> RoadGraph {
        let mut g = RoadGraph::new();
        let base = LatLon::new(60.0, 25.0);
        let spacing = 0.001;

        for row in 0..3u64 {
            for col in 0..3u64 {
                let id = NodeId(row * 3 + col + 1);
                let pos = LatLon::new(base.lat + row as f64 * spacing, base.lon + col as f64 * spacing);
                g.add_node(id, pos);
            }
        }
        for row in 0..3u64 {
            for col in 0..3u64 {
                let id = NodeId(row * 3 + col + 1);
                if col < 2 {
                    let right = NodeId(row * 3 + col + 2);
                    g.add_edge(id, right, "Street", RoadKind::Residential, 30.0, false);
                    g.add_edge(right, id, "Street", RoadKind::Residential, 30.0, false);
                }
                if row < 2 {
                    let up = NodeId((row + 1) * 3 + col + 1);
                    g.add_edge(id, up, "Avenue", RoadKind::Residential, 30.0, false);
                    g.add_edge(up, id, "Avenue", RoadKind::Residential, 30.0, false);
                }
            }
        }
        g
    }
}

// ── Graph structure ───────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use nav_core::{LatLon, NodeId};

    use crate::graph::{RoadGraph, RoadKind};

    #[test]
    fn empty_graph() {
        let g = RoadGraph::new();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn add_edge_links_endpoints() {
        let mut g = RoadGraph::new();
        g.add_node(NodeId(1), LatLon::new(60.0, 25.0));
        g.add_node(NodeId(2), LatLon::new(60.001, 25.0));

        let e = g
            .add_edge(NodeId(1), NodeId(2), "Main Street", RoadKind::Primary, 50.0, false)
            .unwrap();

        let edge = g.edge(e);
        assert_eq!(edge.from, NodeId(1));
        assert_eq!(edge.to, NodeId(2));
        assert_eq!(edge.name, "Main Street");
        assert!(g.get_node(NodeId(1)).unwrap().out_edges.contains(&e));
        assert!(g.get_node(NodeId(2)).unwrap().out_edges.is_empty());
    }

    #[test]
    fn edge_length_matches_haversine() {
        let g = super::helpers::grid_graph();
        for i in 0..g.edge_count() {
            let e = g.edge(nav_core::EdgeId(i as u32));
            let a = g.node_pos(e.from).unwrap();
            let b = g.node_pos(e.to).unwrap();
            assert!((e.length_m - a.distance_m(b)).abs() <= 1.0);
        }
    }

    #[test]
    fn out_edges_source_invariant() {
        let g = super::helpers::grid_graph();
        for id in 1..=9u64 {
            let node = g.get_node(NodeId(id)).unwrap();
            for &e in &node.out_edges {
                assert_eq!(g.edge(e).from, node.id);
            }
        }
    }

    #[test]
    fn missing_endpoint_rejected() {
        let mut g = RoadGraph::new();
        g.add_node(NodeId(1), LatLon::new(60.0, 25.0));
        assert!(g
            .add_edge(NodeId(1), NodeId(99), "x", RoadKind::Service, 20.0, false)
            .is_none());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn degenerate_edge_discarded() {
        let mut g = RoadGraph::new();
        g.add_node(NodeId(1), LatLon::new(60.0, 25.0));
        g.add_node(NodeId(2), LatLon::new(60.0, 25.0)); // same position
        assert!(g
            .add_edge(NodeId(1), NodeId(2), "x", RoadKind::Service, 20.0, false)
            .is_none());
    }

    #[test]
    fn has_direct_edge() {
        let g = super::helpers::grid_graph();
        assert!(g.has_direct_edge(NodeId(1), NodeId(2)));
        assert!(g.has_direct_edge(NodeId(2), NodeId(1)));
        assert!(!g.has_direct_edge(NodeId(1), NodeId(9)));
    }

    #[test]
    fn split_edge_mints_projected_node() {
        let mut g = RoadGraph::new();
        g.add_node(NodeId(1), LatLon::new(60.0, 25.0));
        g.add_node(NodeId(2), LatLon::new(60.0, 25.002));
        let e = g
            .add_edge(NodeId(1), NodeId(2), "Long Road", RoadKind::Secondary, 50.0, false)
            .unwrap();

        let edges_before = g.edge_count();
        let mid = LatLon::new(60.0, 25.001);
        let p = g.split_edge_at(e, mid);

        let node = g.get_node(p).unwrap();
        assert!(node.pos.distance_m(mid) < 0.01);
        // Two half-edges each way for a two-way road.
        assert_eq!(g.edge_count(), edges_before + 4);
        assert!(g.has_direct_edge(NodeId(1), p));
        assert!(g.has_direct_edge(p, NodeId(2)));
        assert!(g.has_direct_edge(NodeId(2), p));
        assert!(g.has_direct_edge(p, NodeId(1)));
        // Metadata inherited.
        let half = g.get_node(p).unwrap().out_edges[0];
        assert_eq!(g.edge(half).name, "Long Road");
        assert_eq!(g.edge(half).kind, RoadKind::Secondary);
    }

    #[test]
    fn clear_wipes_everything() {
        let mut g = super::helpers::grid_graph();
        assert!(!g.is_empty());
        g.clear();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.nearby_edges(LatLon::new(60.0, 25.0), 500.0).is_empty());
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod cells {
    use nav_core::{EdgeId, LatLon};

    use crate::cells::CellIndex;

    #[test]
    fn query_finds_inserted_edge() {
        let mut idx = CellIndex::new();
        let a = LatLon::new(60.0, 25.0);
        let b = LatLon::new(60.001, 25.001);
        idx.insert(EdgeId(0), a, b);

        let hits = idx.query(LatLon::new(60.0005, 25.0005), 100.0);
        assert_eq!(hits, vec![EdgeId(0)]);
    }

    #[test]
    fn no_duplicates_for_multi_cell_edge() {
        let mut idx = CellIndex::new();
        // Edge spanning ~5 cells of latitude.
        idx.insert(EdgeId(0), LatLon::new(60.0, 25.0), LatLon::new(60.005, 25.0));

        let hits = idx.query(LatLon::new(60.002, 25.0), 500.0);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn radius_superset() {
        let mut idx = CellIndex::new();
        for i in 0..10u32 {
            let lon = 25.0 + i as f64 * 0.001;
            idx.insert(EdgeId(i), LatLon::new(60.0, lon), LatLon::new(60.0, lon + 0.001));
        }
        // Everything within ~300 m of the western end must be found.
        let hits = idx.query(LatLon::new(60.0, 25.0), 300.0);
        assert!(hits.contains(&EdgeId(0)));
        assert!(hits.contains(&EdgeId(1)));
        assert!(hits.contains(&EdgeId(2)));
    }

    #[test]
    fn wide_miss_falls_back_to_all_edges() {
        let mut idx = CellIndex::new();
        idx.insert(EdgeId(0), LatLon::new(60.0, 25.0), LatLon::new(60.001, 25.0));

        // Far away, small radius: nothing.
        assert!(idx.query(LatLon::new(61.0, 26.0), 500.0).is_empty());
        // Far away, wide radius: sidecar kicks in.
        let all = idx.query(LatLon::new(61.0, 26.0), 5_000.0);
        assert_eq!(all, vec![EdgeId(0)]);
    }
}

// ── OSM ingestion ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod osm {
    use std::io::Cursor;

    use nav_core::NodeId;

    use crate::error::GraphError;
    use crate::graph::{RoadGraph, RoadKind};
    use crate::osm::{ingest_osm, ingest_osm_pbf};

    fn two_node_way(way_tags: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="60.0000" lon="25.0000"/>
  <node id="2" lat="60.0010" lon="25.0000"/>
  <way id="100">
    <nd ref="1"/>
    <nd ref="2"/>
    {way_tags}
  </way>
</osm>"#
        )
    }

    fn ingest(doc: &str) -> (RoadGraph, crate::osm::IngestStats) {
        let mut g = RoadGraph::new();
        let stats = ingest_osm(Cursor::new(doc.as_bytes().to_vec()), &mut g).unwrap();
        (g, stats)
    }

    #[test]
    fn residential_two_way() {
        let doc = two_node_way(r#"<tag k="highway" v="residential"/>"#);
        let (g, stats) = ingest(&doc);

        assert_eq!(stats.nodes, 2);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 2); // forward + reverse

        let e = g.edge(nav_core::EdgeId(0));
        assert_eq!(e.kind, RoadKind::Residential);
        assert_eq!(e.speed_limit_kph, 30.0);
        assert!(!e.oneway);
    }

    #[test]
    fn forward_and_reverse_share_metadata() {
        let doc = two_node_way(
            r#"<tag k="highway" v="primary"/>
    <tag k="name" v="Ring Road"/>
    <tag k="maxspeed" v="60"/>"#,
        );
        let (g, _) = ingest(&doc);
        assert_eq!(g.edge_count(), 2);

        let fwd = g.edge(nav_core::EdgeId(0));
        let rev = g.edge(nav_core::EdgeId(1));
        assert_eq!(fwd.name, rev.name);
        assert_eq!(fwd.kind, rev.kind);
        assert_eq!(fwd.speed_limit_kph, rev.speed_limit_kph);
        assert!((fwd.length_m - rev.length_m).abs() <= 1.0);
        assert_eq!(fwd.from, rev.to);
        assert_eq!(fwd.to, rev.from);
    }

    #[test]
    fn motorway_forced_oneway() {
        let doc = two_node_way(r#"<tag k="highway" v="motorway"/>"#);
        let (g, _) = ingest(&doc);

        assert_eq!(g.edge_count(), 1);
        let e = g.edge(nav_core::EdgeId(0));
        assert_eq!(e.kind, RoadKind::Highway);
        assert_eq!(e.speed_limit_kph, 100.0);
        assert!(e.oneway);
        assert_eq!(e.from, NodeId(1));
        assert_eq!(e.to, NodeId(2));
    }

    #[test]
    fn tagged_oneway() {
        let doc = two_node_way(
            r#"<tag k="highway" v="residential"/>
    <tag k="oneway" v="yes"/>"#,
        );
        let (g, _) = ingest(&doc);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn maxspeed_override() {
        let doc = two_node_way(
            r#"<tag k="highway" v="residential"/>
    <tag k="maxspeed" v="40"/>"#,
        );
        let (g, _) = ingest(&doc);
        assert_eq!(g.edge(nav_core::EdgeId(0)).speed_limit_kph, 40.0);
    }

    #[test]
    fn unparseable_maxspeed_uses_default() {
        let doc = two_node_way(
            r#"<tag k="highway" v="service"/>
    <tag k="maxspeed" v="walk"/>"#,
        );
        let (g, _) = ingest(&doc);
        assert_eq!(g.edge(nav_core::EdgeId(0)).speed_limit_kph, 20.0);
    }

    #[test]
    fn name_fallbacks() {
        let named = two_node_way(
            r#"<tag k="highway" v="primary"/>
    <tag k="name" v="Mannerheimintie"/>"#,
        );
        let (g, _) = ingest(&named);
        assert_eq!(g.edge(nav_core::EdgeId(0)).name, "Mannerheimintie");

        let reffed = two_node_way(
            r#"<tag k="highway" v="primary"/>
    <tag k="ref" v="E12"/>"#,
        );
        let (g, _) = ingest(&reffed);
        assert_eq!(g.edge(nav_core::EdgeId(0)).name, "Road E12");

        let anon = two_node_way(r#"<tag k="highway" v="primary"/>"#);
        let (g, _) = ingest(&anon);
        assert_eq!(g.edge(nav_core::EdgeId(0)).name, "Unnamed Road");
    }

    #[test]
    fn footway_rejected() {
        let doc = two_node_way(r#"<tag k="highway" v="footway"/>"#);
        let mut g = RoadGraph::new();
        let err = ingest_osm(Cursor::new(doc.into_bytes()), &mut g).unwrap_err();
        assert!(matches!(err, GraphError::NoHighways));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn private_access_rejected() {
        let doc = two_node_way(
            r#"<tag k="highway" v="residential"/>
    <tag k="access" v="private"/>"#,
        );
        let mut g = RoadGraph::new();
        assert!(ingest_osm(Cursor::new(doc.into_bytes()), &mut g).is_err());
    }

    #[test]
    fn missing_way_endpoint_skipped() {
        let doc = r#"<osm version="0.6">
  <node id="1" lat="60.0" lon="25.0"/>
  <node id="2" lat="60.001" lon="25.0"/>
  <way id="100">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="999"/>
    <tag k="highway" v="residential"/>
  </way>
</osm>"#;
        let (g, stats) = ingest(doc);
        // Pair (2, 999) contributes nothing; pair (1, 2) is bidirectional.
        assert_eq!(g.edge_count(), 2);
        assert_eq!(stats.edges, 2);
    }

    #[test]
    fn malformed_xml_errors() {
        let mut g = RoadGraph::new();
        let doc = b"<osm><node id=\"1\" lat=\"60".to_vec();
        assert!(ingest_osm(Cursor::new(doc), &mut g).is_err());
    }

    #[test]
    fn track_is_service_kind() {
        let doc = two_node_way(r#"<tag k="highway" v="track"/>"#);
        let (g, _) = ingest(&doc);
        assert_eq!(g.edge(nav_core::EdgeId(0)).kind, RoadKind::Service);
    }

    #[test]
    fn reload_is_idempotent() {
        let doc = two_node_way(r#"<tag k="highway" v="residential"/>"#);

        let mut g = RoadGraph::new();
        ingest_osm(Cursor::new(doc.clone().into_bytes()), &mut g).unwrap();
        let (n1, e1) = (g.node_count(), g.edge_count());

        g.clear();
        ingest_osm(Cursor::new(doc.into_bytes()), &mut g).unwrap();
        assert_eq!(g.node_count(), n1);
        assert_eq!(g.edge_count(), e1);
    }

    #[test]
    fn pbf_entry_dispatches_to_xml() {
        let doc = two_node_way(r#"<tag k="highway" v="residential"/>"#);
        let mut g = RoadGraph::new();
        assert!(ingest_osm_pbf(Cursor::new(doc.into_bytes()), &mut g).is_ok());
        assert_eq!(g.edge_count(), 2);
    }
}
