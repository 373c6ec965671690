//! `nav-graph` — routable road graph, spatial indexing, and OSM ingestion.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`graph`] | `RoadGraph`, `Node`, `Edge`, `RoadKind`                   |
//! | [`cells`] | `CellIndex` — 0.001° cell-bucketed edge index             |
//! | [`osm`]   | `ingest_osm` — streaming OSM XML → graph                  |
//! | [`error`] | `GraphError`, `GraphResult<T>`                            |
//!
//! # Ownership model
//!
//! The graph owns a pool of nodes (keyed by `NodeId`, the opaque OSM id) and
//! a pool of edges (indexed by `EdgeId`).  All cross-references are ids, so
//! there are no ownership cycles: a node's `out_edges` holds `EdgeId`s, an
//! edge names its endpoints by `NodeId`.  Consumers that cache `EdgeId`s
//! (the route matcher does) must drop them when the graph is cleared.

pub mod cells;
pub mod error;
pub mod graph;
pub mod osm;

#[cfg(test)]
mod tests;

pub use cells::CellIndex;
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, Node, RoadGraph, RoadKind};
pub use osm::{ingest_osm, ingest_osm_pbf, IngestStats};
