//! `nav-match` — map matching against the active route.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`result`]  | `MatchResult`, `Maneuver`                               |
//! | [`matcher`] | `RouteMatcher` — projection, scoring, guidance          |
//!
//! # Aliasing note
//!
//! The matcher caches `EdgeId`s resolved against the graph it was given at
//! [`set_route`](matcher::RouteMatcher::set_route) time.  Clearing or
//! reloading the graph invalidates those ids; call
//! [`clear`](matcher::RouteMatcher::clear) (the engine façade does) before
//! matching again.

pub mod matcher;
pub mod result;

#[cfg(test)]
mod tests;

pub use matcher::RouteMatcher;
pub use result::{Maneuver, MatchResult};
