//! The location filter.
//!
//! # Model
//!
//! State is four scalars: latitude, longitude, and their velocities in
//! degrees per second.  Each axis runs an independent scalar Kalman update
//! with a shared gain; covariance is likewise tracked as two scalars
//! (position, velocity).  This is deliberately not a full 4×4 filter — the
//! scalar version is what the tuning constants below were calibrated
//! against, and it is cheap enough to run on every GPS callback.
//!
//! # Timestamps
//!
//! The caller supplies a monotonic millisecond clock with each sample.
//! Non-increasing or implausibly large deltas (> 10 s) are replaced by
//! 0.1 s, which down-weights the affected sample instead of rejecting it.

use log::{debug, info};

use nav_core::{Fix, RawFix};

// ── Tuning constants ──────────────────────────────────────────────────────────

const INITIAL_POSITION_VARIANCE: f64 = 10.0;
const INITIAL_VELOCITY_VARIANCE: f64 = 5.0;
const PROCESS_NOISE_POSITION: f64 = 0.01;
const PROCESS_NOISE_VELOCITY: f64 = 0.1;
const BASE_MEASUREMENT_NOISE: f64 = 5.0;

/// Largest velocity step accepted per update, degrees/second.
const MAX_VELOCITY_CHANGE: f64 = 10.0;

/// Substitute Δt when the observed delta is non-positive or above 10 s.
const FALLBACK_DT_S: f64 = 0.1;

/// Velocity magnitudes below this (degrees/s) cannot produce a meaningful
/// bearing, so NaN sensor values fall back to zero instead.
const MIN_VELOCITY_FOR_BEARING: f64 = 1e-6;

/// Metres per degree of latitude.  The speed synthesized from the velocity
/// vector uses the flat 1° ≈ 111 km approximation — intentionally not
/// latitude-corrected, because the other tuning constants were calibrated
/// against it.
const SPEED_METERS_PER_DEG: f64 = 111_000.0;

// ── LocationFilter ────────────────────────────────────────────────────────────

/// Constant-velocity smoothing filter over raw location samples.
#[derive(Debug, Clone)]
pub struct LocationFilter {
    initialized: bool,
    /// Set once the first post-init update has seeded the velocity estimate.
    has_velocity: bool,

    lat: f64,
    lon: f64,
    lat_vel: f64,
    lon_vel: f64,

    position_variance: f64,
    velocity_variance: f64,

    last_timestamp_ms: u64,
}

impl Default for LocationFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationFilter {
    pub fn new() -> Self {
        Self {
            initialized: false,
            has_velocity: false,
            lat: 0.0,
            lon: 0.0,
            lat_vel: 0.0,
            lon_vel: 0.0,
            position_variance: INITIAL_POSITION_VARIANCE,
            velocity_variance: INITIAL_VELOCITY_VARIANCE,
            last_timestamp_ms: 0,
        }
    }

    /// Forget all state; the next sample re-initializes.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Smooth one raw sample received at `at_ms` (monotonic milliseconds).
    ///
    /// Always produces a [`Fix`]; NaN bearing/speed are replaced by values
    /// synthesized from the velocity estimate (or zero while stationary).
    pub fn process(&mut self, raw: &RawFix, at_ms: u64) -> Fix {
        if !self.initialized {
            self.lat = raw.pos.lat;
            self.lon = raw.pos.lon;
            self.lat_vel = 0.0;
            self.lon_vel = 0.0;
            self.initialized = true;
            self.last_timestamp_ms = at_ms;

            info!("filter initialized at {}", raw.pos);
            return Fix {
                pos: raw.pos,
                bearing_deg: finite_or_zero(raw.bearing_deg),
                speed_mps: finite_or_zero(raw.speed_mps),
                accuracy_m: raw.accuracy_m,
            };
        }

        let mut dt = (at_ms as f64 - self.last_timestamp_ms as f64) / 1000.0;
        if dt <= 0.0 || dt > 10.0 {
            debug!("implausible dt {dt:.3}s, substituting {FALLBACK_DT_S}");
            dt = FALLBACK_DT_S;
        }
        self.last_timestamp_ms = at_ms;

        // Measurement noise widens with reported sensor inaccuracy.
        let adapted_noise = if raw.accuracy_m > 0.0 {
            BASE_MEASUREMENT_NOISE * (raw.accuracy_m as f64 / 10.0)
        } else {
            BASE_MEASUREMENT_NOISE
        };

        // Predict.
        let predicted_lat = self.lat + self.lat_vel * dt;
        let predicted_lon = self.lon + self.lon_vel * dt;
        let predicted_pos_var =
            self.position_variance + PROCESS_NOISE_POSITION + self.velocity_variance * dt * dt;
        let predicted_vel_var = self.velocity_variance + PROCESS_NOISE_VELOCITY;

        // Update.
        let k = (predicted_pos_var / (predicted_pos_var + adapted_noise)).clamp(0.1, 0.9);

        self.lat = predicted_lat + k * (raw.pos.lat - predicted_lat);
        self.lon = predicted_lon + k * (raw.pos.lon - predicted_lon);

        // Velocity from the innovation, rate-limited then smoothed.  The
        // first update has no velocity history, so it adopts the measured
        // velocity outright; smoothing starts with the second.
        let new_lat_vel = limit_step(self.lat_vel, (raw.pos.lat - predicted_lat) / dt);
        let new_lon_vel = limit_step(self.lon_vel, (raw.pos.lon - predicted_lon) / dt);

        if self.has_velocity {
            self.lat_vel = self.lat_vel * 0.7 + new_lat_vel * 0.3;
            self.lon_vel = self.lon_vel * 0.7 + new_lon_vel * 0.3;
        } else {
            self.lat_vel = new_lat_vel;
            self.lon_vel = new_lon_vel;
            self.has_velocity = true;
        }

        self.position_variance = (1.0 - k) * predicted_pos_var;
        self.velocity_variance = (1.0 - k) * predicted_vel_var;

        // Synthesize bearing/speed from the velocity vector when the sensor
        // had none.
        let velocity_magnitude = (self.lat_vel * self.lat_vel + self.lon_vel * self.lon_vel).sqrt();
        let (synth_bearing, synth_speed) = if velocity_magnitude > MIN_VELOCITY_FOR_BEARING {
            let mut bearing = self.lon_vel.atan2(self.lat_vel).to_degrees();
            if bearing < 0.0 {
                bearing += 360.0;
            }
            (bearing as f32, (velocity_magnitude * SPEED_METERS_PER_DEG) as f32)
        } else {
            (0.0, 0.0)
        };

        let fix = Fix {
            pos: nav_core::LatLon::new(self.lat, self.lon),
            bearing_deg: if raw.bearing_deg.is_nan() {
                synth_bearing
            } else {
                raw.bearing_deg
            },
            speed_mps: if raw.speed_mps.is_nan() {
                synth_speed
            } else {
                raw.speed_mps
            },
            accuracy_m: raw.accuracy_m * 0.8,
        };

        debug!(
            "filtered {} (raw {}), bearing {:.1}, speed {:.1}",
            fix.pos, raw.pos, fix.bearing_deg, fix.speed_mps
        );
        fix
    }
}

#[inline]
fn limit_step(prev: f64, new: f64) -> f64 {
    if (new - prev).abs() > MAX_VELOCITY_CHANGE {
        prev + MAX_VELOCITY_CHANGE.copysign(new - prev)
    } else {
        new
    }
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
