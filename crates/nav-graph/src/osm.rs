//! Streaming OSM XML ingestion.
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways become edges; walking/cycling classes and
//! `access=private|no` ways are skipped, as are all relations.  One-way ways
//! contribute a single directed edge per node pair, two-way ways contribute
//! both directions with identical metadata.  Motorways are one-way by OSM
//! convention whether tagged or not.
//!
//! # Input
//!
//! OSM XML 0.6 from any `BufRead`.  The minimum supported shape is
//! `<node id lat lon/>` and `<way id><nd ref/>…<tag k v/>…</way>`; anything
//! else is ignored.  Parsing is a single pass — node elements must precede
//! the ways that reference them, which every exporter guarantees.

use std::collections::HashMap;
use std::io::BufRead;
use std::str::from_utf8;

use log::info;
use quick_xml::events::{BytesStart, Event};

use nav_core::{LatLon, NodeId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{RoadGraph, RoadKind};

/// Counts reported by a successful ingestion.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestStats {
    pub nodes: usize,
    /// Highway ways that produced edges.
    pub ways: usize,
    pub edges: usize,
}

/// A `<way>` element being accumulated.
#[derive(Default)]
struct PendingWay {
    refs: Vec<u64>,
    tags: HashMap<String, String>,
}

/// Parse an OSM XML stream into `graph`.
///
/// The graph is not cleared here; callers wanting a rebuild clear first.
///
/// # Errors
///
/// [`GraphError::Xml`] on malformed XML, [`GraphError::NoNodes`] /
/// [`GraphError::NoHighways`] when the document holds no usable data.
pub fn ingest_osm<R: BufRead>(reader: R, graph: &mut RoadGraph) -> GraphResult<IngestStats> {
    let mut xml = quick_xml::Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut stats = IngestStats::default();
    let mut way: Option<PendingWay> = None;

    loop {
        let event = xml.read_event_into(&mut buf)?;
        match event {
            Event::Empty(start) => match start.local_name().as_ref() {
                b"node" => {
                    if let Some((id, pos)) = parse_node(&start) {
                        graph.add_node(id, pos);
                        stats.nodes += 1;
                        if stats.nodes % 10_000 == 0 {
                            info!("ingested {} nodes", stats.nodes);
                        }
                    }
                }
                b"nd" => {
                    if let Some(w) = way.as_mut() {
                        if let Some(r) = parse_nd(&start) {
                            w.refs.push(r);
                        }
                    }
                }
                b"tag" => {
                    if let Some(w) = way.as_mut() {
                        if let Some((k, v)) = parse_tag(&start) {
                            w.tags.insert(k, v);
                        }
                    }
                }
                _ => {}
            },

            Event::Start(start) => match start.local_name().as_ref() {
                b"node" => {
                    // Nodes with child tags; the tags are irrelevant here.
                    if let Some((id, pos)) = parse_node(&start) {
                        graph.add_node(id, pos);
                        stats.nodes += 1;
                        if stats.nodes % 10_000 == 0 {
                            info!("ingested {} nodes", stats.nodes);
                        }
                    }
                }
                b"way" => way = Some(PendingWay::default()),
                _ => {}
            },

            Event::End(end) => {
                if end.local_name().as_ref() == b"way" {
                    if let Some(w) = way.take() {
                        let added = process_way(graph, &w);
                        if added > 0 {
                            stats.ways += 1;
                            stats.edges += added;
                            if stats.ways % 1_000 == 0 {
                                info!("ingested {} ways ({} edges)", stats.ways, stats.edges);
                            }
                        }
                    }
                }
            }

            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if stats.nodes == 0 {
        return Err(GraphError::NoNodes);
    }
    if stats.ways == 0 {
        return Err(GraphError::NoHighways);
    }

    info!(
        "OSM ingestion complete: {} nodes, {} ways, {} edges",
        stats.nodes, stats.ways, stats.edges
    );
    Ok(stats)
}

/// PBF entry point.  Decoding protobuf extracts is not wired up; the data
/// this engine ships with is XML, so the call dispatches to the XML path.
pub fn ingest_osm_pbf<R: BufRead>(reader: R, graph: &mut RoadGraph) -> GraphResult<IngestStats> {
    info!("PBF input requested; dispatching to the XML parser");
    ingest_osm(reader, graph)
}

// ── Way processing ────────────────────────────────────────────────────────────

/// Turn one accumulated `<way>` into edges.  Returns the number added.
fn process_way(graph: &mut RoadGraph, way: &PendingWay) -> usize {
    if way.refs.len() < 2 {
        return 0;
    }

    let highway = match way.tags.get("highway") {
        Some(h) => h.as_str(),
        None => return 0,
    };
    if is_unroutable(highway) {
        return 0;
    }
    if matches!(way.tags.get("access").map(String::as_str), Some("private") | Some("no")) {
        return 0;
    }

    let kind = classify(highway);
    let speed = way
        .tags
        .get("maxspeed")
        .and_then(|v| v.trim().parse::<f32>().ok())
        .unwrap_or_else(|| kind.default_speed_kph());

    let name = match (way.tags.get("name"), way.tags.get("ref")) {
        (Some(n), _) => n.clone(),
        (None, Some(r)) => format!("Road {r}"),
        (None, None) => "Unnamed Road".to_string(),
    };

    let tagged_oneway = matches!(
        way.tags.get("oneway").map(String::as_str),
        Some("yes") | Some("true") | Some("1")
    );
    let oneway = tagged_oneway || matches!(highway, "motorway" | "motorway_link");

    let mut added = 0;
    for pair in way.refs.windows(2) {
        let from = NodeId(pair[0]);
        let to = NodeId(pair[1]);

        // Endpoints outside the extract are skipped silently.
        if graph.add_edge(from, to, &name, kind, speed, oneway).is_some() {
            added += 1;
        }
        if !oneway && graph.add_edge(to, from, &name, kind, speed, oneway).is_some() {
            added += 1;
        }
    }
    added
}

/// Map an OSM `highway` value onto a [`RoadKind`].
fn classify(highway: &str) -> RoadKind {
    match highway {
        "motorway" | "trunk" | "motorway_link" | "trunk_link" => RoadKind::Highway,
        "primary" | "secondary" | "primary_link" | "secondary_link" => RoadKind::Primary,
        "tertiary" | "unclassified" | "tertiary_link" => RoadKind::Secondary,
        "residential" | "living_street" => RoadKind::Residential,
        "service" | "track" => RoadKind::Service,
        _ => RoadKind::Residential,
    }
}

/// Highway classes that never carry vehicle traffic.
fn is_unroutable(highway: &str) -> bool {
    matches!(
        highway,
        "footway"
            | "cycleway"
            | "path"
            | "steps"
            | "pedestrian"
            | "bus_guideway"
            | "escape"
            | "raceway"
            | "bridleway"
    )
}

// ── Attribute parsing ─────────────────────────────────────────────────────────

fn parse_node(start: &BytesStart<'_>) -> Option<(NodeId, LatLon)> {
    let mut id: Option<u64> = None;
    let mut lat = f64::NAN;
    let mut lon = f64::NAN;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"id" => id = from_utf8(&attr.value).ok()?.parse().ok(),
            b"lat" => lat = from_utf8(&attr.value).ok()?.parse().ok()?,
            b"lon" => lon = from_utf8(&attr.value).ok()?.parse().ok()?,
            _ => {}
        }
    }

    let pos = LatLon::new(lat, lon);
    match id {
        Some(id) if pos.is_valid() => Some((NodeId(id), pos)),
        _ => None,
    }
}

fn parse_nd(start: &BytesStart<'_>) -> Option<u64> {
    for attr in start.attributes() {
        let attr = attr.ok()?;
        if attr.key.as_ref() == b"ref" {
            return from_utf8(&attr.value).ok()?.parse().ok();
        }
    }
    None
}

fn parse_tag(start: &BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in start.attributes() {
        let attr = attr.ok()?;
        match attr.key.as_ref() {
            b"k" => k = from_utf8(&attr.value).ok().map(str::to_string),
            b"v" => v = from_utf8(&attr.value).ok().map(str::to_string),
            _ => {}
        }
    }
    Some((k?, v.unwrap_or_default()))
}
