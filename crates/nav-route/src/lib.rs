//! `nav-route` — pathfinding and route construction.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`cost`]    | `EdgeCost` trait; `Length`, `Fastest`, `NoHighways`       |
//! | [`astar`]   | A* search over the road graph                             |
//! | [`route`]   | `Route` — the densified, renderable result                |
//! | [`builder`] | node path → route points (densify, smooth, direct)        |
//! | [`engine`]  | `RoutingEngine` — snapping, alternatives, fallbacks       |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                            |
//!
//! # Pipeline
//!
//! `RoutingEngine::routes` gates on straight-line distance, snaps both ends
//! into the graph (splitting an edge when the nearest point is mid-segment),
//! runs A* with the plain length cost, densifies and smooths the node path
//! into ~25 m spaced [`Fix`](nav_core::Fix)es, then tries two alternative
//! cost functions and keeps whichever results differ enough from the
//! primary.  Every failure path degrades to a straight-line route rather
//! than an error; only non-finite input yields an empty result.

pub mod astar;
pub mod builder;
pub mod cost;
pub mod engine;
pub mod error;
pub mod route;


pub use cost::{EdgeCost, Fastest, Length, NoHighways};
pub use engine::RoutingEngine;
pub use error::{RouteError, RouteResult};
pub use route::Route;
