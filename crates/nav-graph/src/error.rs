//! Graph-subsystem error type.

use thiserror::Error;

/// Errors produced by `nav-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("OSM parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("no routable highway ways in input")]
    NoHighways,

    #[error("no nodes in input")]
    NoNodes,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
