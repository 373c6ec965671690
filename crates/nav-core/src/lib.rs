//! `nav-core` — foundational types for the `rust_nav` navigation core.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and minimal external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                                |
//! |----------|---------------------------------------------------------|
//! | [`geo`]  | `LatLon`, haversine distance, bearings, projection      |
//! | [`fix`]  | `RawFix` (sensor sample), `Fix` (filtered sample)       |
//! | [`ids`]  | `NodeId`, `EdgeId`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                   |
//! |---------|----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.      |

pub mod fix;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use fix::{Fix, RawFix};
pub use geo::{LatLon, SegmentProjection};
pub use ids::{EdgeId, NodeId};
