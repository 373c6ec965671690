//! `nav-filter` — smoothing of raw location samples.
//!
//! A constant-velocity Kalman-style filter with four scalar states
//! (`lat`, `lon` and their velocities in degrees/second).  Raw samples go
//! in, [`Fix`](nav_core::Fix)es with guaranteed-finite bearing and speed
//! come out.  The filter never fails: bad timestamps and velocity spikes
//! are clamped, not rejected.

pub mod filter;


pub use filter::LocationFilter;
