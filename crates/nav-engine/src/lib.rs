//! `nav-engine` — the navigation façade.
//!
//! One [`NavigationEngine`] value owns the whole pipeline: location filter,
//! road graph, routing engine, and route matcher.  Embedders construct it,
//! hold it, and drive it from a single thread; there is no global state and
//! no internal locking.  All failures surface as return values (`bool`,
//! empty lists, `NoRoute`/`RecalcNeeded` results) — nothing panics and no
//! error type crosses this boundary.
//!
//! # Typical sequence
//!
//! ```no_run
//! use std::io::BufReader;
//! use nav_core::{LatLon, RawFix};
//! use nav_engine::NavigationEngine;
//!
//! let mut engine = NavigationEngine::new();
//! # let osm_bytes: &[u8] = b"";
//! engine.load_osm(BufReader::new(osm_bytes));
//! engine.set_destination(LatLon::new(60.1699, 24.9384));
//! let guidance = engine.update_location(&RawFix::new(60.17, 24.93, f32::NAN, f32::NAN, 8.0));
//! println!("{}", guidance.next_maneuver);
//! ```

pub mod engine;


pub use engine::NavigationEngine;

// The façade's full vocabulary, re-exported so embedders need only this
// crate.
pub use nav_core::{Fix, LatLon, RawFix};
pub use nav_match::{Maneuver, MatchResult};
pub use nav_route::Route;
