//! Test utilities for ephemeris and calendar tests.
//!
//! Provides fixtures for simplified binary systems and synthetic eclipse
//! predictors, plus assertions for geometric invariants.

use bevy::math::DVec3;

use crate::ephemeris::{BinarySystemConfig, BodyConfig, LongTermCycles, OrbitalElements};

/// Fixtures for creating test configurations.
pub mod fixtures {
    use super::*;

    /// A planet on the mutual orbit with no tilt, no precession and a one-day spin.
    pub fn simple_body(name: &str, orbit_radius: f64) -> BodyConfig {
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

    /// Flat binary: no inclination, no precession, no long-term cycles.
    ///
    /// Narym sits 5.49e6 km from the barycenter and Vezmar 1.91e6 km, so at
    /// t = 0 (periapsis, mutual phase 0) the pair is perfectly aligned.
    pub fn simple_binary(period: f64, mutual_period: f64, eccentricity: f64) -> BinarySystemConfig {
        BinarySystemConfig {
            name: "Test Binary".to_string(),
            orbit: OrbitalElements {
                semi_major_axis: 308_000_000.0,
                eccentricity,
                period,
                inclination: 0.0,
                nodal_precession_period: None,
            },
            mutual_orbit_period: mutual_period,
            components: [
                simple_body("Narym", 5_490_000.0),
                simple_body("Vezmar", 1_910_000.0),
            ],
            long_term: LongTermCycles::default(),
        }
    }

    /// Eclipse exactly `offset` days into every cycle of length `year_length`.
    pub fn regular_eclipses(year_length: f64, offset: f64) -> impl Fn(i64) -> f64 + Send + Sync {
        move |cycle| cycle as f64 * year_length + offset
    }

    /// Eclipse offset that wanders around `offset` by up to `jitter` days,
    /// never crossing the cycle bounds when `jitter < offset`.
    pub fn wandering_eclipses(
        year_length: f64,
        offset: f64,
        jitter: f64,
    ) -> impl Fn(i64) -> f64 + Send + Sync {
        move |cycle| cycle as f64 * year_length + offset + jitter * (cycle as f64 * 1.7).sin()
    }
}

/// Assertions for verifying geometric invariants.
pub mod assertions {
    use super::*;

    /// Assert that `near` lies on the segment between the origin and `far`,
    /// within an angular tolerance in radians.
    ///
    /// # Panics
    /// Panics if the directions differ by more than `tolerance` or `near` is
    /// not closer to the origin.
    pub fn assert_in_front(far: DVec3, near: DVec3, tolerance: f64) {
        let angle = far.angle_between(near);
        assert!(
            angle <= tolerance && near.length() < far.length(),
            "Not in front: far={far:?}, near={near:?}, angle={angle:.3e}, tolerance={tolerance:.3e}"
        );
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    ///
    /// This app uses MinimalPlugins for a lightweight test environment.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conjunction::alignment_at;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_binary_is_valid() {
        fixtures::simple_binary(754.0, 377.0, 0.05).validate().unwrap();
    }

    #[test]
    fn test_simple_binary_aligned_at_epoch() {
        let binary = fixtures::simple_binary(754.0, 377.0, 0.05);
        assert_relative_eq!(alignment_at(&binary, 1e-6, 0.0), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_regular_eclipses() {
        let eclipses = fixtures::regular_eclipses(754.0, 10.5);
        assert_eq!(eclipses(0), 10.5);
        assert_eq!(eclipses(2), 1518.5);
    }

    #[test]
    fn test_wandering_eclipses_stay_in_cycle() {
        let eclipses = fixtures::wandering_eclipses(754.0, 300.0, 100.0);
        for cycle in -5..50 {
            let t = eclipses(cycle);
            let start = cycle as f64 * 754.0;
            assert!(t > start && t < start + 754.0);
        }
    }

    #[test]
    fn test_assert_in_front_accepts_line_up() {
        assertions::assert_in_front(DVec3::new(10.0, 0.0, 0.0), DVec3::new(4.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    #[should_panic(expected = "Not in front")]
    fn test_assert_in_front_rejects_wrong_order() {
        assertions::assert_in_front(DVec3::new(4.0, 0.0, 0.0), DVec3::new(10.0, 0.0, 0.0), 1e-12);
    }
}
