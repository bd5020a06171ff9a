//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec3;
use orrery::ephemeris::{BinarySystemConfig, BodyConfig, LongTermCycles, OrbitalElements};

/// Scale used by every scenario: km to millions of km.
pub const SCALE: f64 = 1e-6;

fn body(name: &str, orbit_radius: f64) -> BodyConfig {
    BodyConfig {
        name: name.to_string(),
        radius: 1_000.0,
        axial_tilt: 0.0,
        rotation_period: 1.0,
        precession_period: None,
        orbit_radius: Some(orbit_radius),
        orbit: None,
        long_term: LongTermCycles::default(),
        moons: Vec::new(),
    }
}

/// Flat binary without precession or long-term cycles.
pub fn binary(period: f64, mutual_period: f64, eccentricity: f64) -> BinarySystemConfig {
    BinarySystemConfig {
        name: "Scenario Binary".to_string(),
        orbit: OrbitalElements {
            semi_major_axis: 308_000_000.0,
            eccentricity,
            period,
            inclination: 0.0,
            nodal_precession_period: None,
        },
        mutual_orbit_period: mutual_period,
        components: [body("Narym", 5_490_000.0), body("Vezmar", 1_910_000.0)],
        long_term: LongTermCycles::default(),
    }
}

/// Dot product of the two position directions as seen from the star.
pub fn direction_dot(a: DVec3, b: DVec3) -> f64 {
    a.normalize().dot(b.normalize())
}
