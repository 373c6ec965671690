//! Routing-subsystem error type.

use thiserror::Error;

use nav_core::{LatLon, NodeId};

/// Errors produced by `nav-route`.
///
/// These never cross the engine façade: `RoutingEngine::routes` converts
/// them into the straight-line fallback (or an empty list for invalid
/// input) as the navigation contract requires.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("coordinate {0} is not a finite WGS-84 position")]
    InvalidCoordinate(LatLon),

    #[error("no roads within search radius of {0}")]
    NoNearbyRoads(LatLon),

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },
}

pub type RouteResult<T> = Result<T, RouteError>;
