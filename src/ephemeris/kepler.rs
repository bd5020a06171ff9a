//! Kepler solver and in-plane orbital geometry.
//!
//! Positions are returned in the orbital plane (X/Z, with Y as the plane
//! normal). Tilting and precessing the plane is the job of [`super::frames`].

use bevy::math::DVec3;
use std::f64::consts::TAU;

use super::ConfigError;

/// Newton iteration cap for [`solve_kepler`].
pub const KEPLER_MAX_ITERATIONS: usize = 10;

/// Absolute step tolerance for [`solve_kepler`].
pub const KEPLER_TOLERANCE: f64 = 1e-6;

/// Time offset used for finite-difference tangents, in days.
pub const TANGENT_DT: f64 = 0.001;

/// Default number of segments for orbit path polylines.
pub const DEFAULT_PATH_SEGMENTS: usize = 360;

/// Solve Kepler's equation M = E - e*sin(E) for eccentric anomaly E
/// using Newton's method.
///
/// Starts from E = M and stops after [`KEPLER_MAX_ITERATIONS`] steps or once
/// the Newton step falls below [`KEPLER_TOLERANCE`]. Non-convergence is not
/// reported: the last iterate is returned. This is accurate for the small
/// eccentricities (< 0.1) used by the Narym system.
pub fn solve_kepler(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let mut e_anomaly = mean_anomaly;

    for _ in 0..KEPLER_MAX_ITERATIONS {
        // f(E) = E - e*sin(E) - M, f'(E) = 1 - e*cos(E)
        let delta = (e_anomaly - eccentricity * e_anomaly.sin() - mean_anomaly)
            / (1.0 - eccentricity * e_anomaly.cos());
        e_anomaly -= delta;

        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }

    e_anomaly
}

/// Rotate an in-plane point about the plane normal (apsidal precession).
pub fn rotate_in_plane(point: DVec3, angle: f64) -> DVec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    DVec3::new(
        point.x * cos_a - point.z * sin_a,
        point.y,
        point.x * sin_a + point.z * cos_a,
    )
}

/// Keplerian orbital elements.
///
/// Distances in kilometres, periods in days, inclination in degrees.
/// Fields are public for configuration literals; [`OrbitalElements::new`]
/// is the validating constructor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis in km
    pub semi_major_axis: f64,
    /// Eccentricity (0 ≤ e < 1)
    pub eccentricity: f64,
    /// Orbital period in days
    pub period: f64,
    /// Inclination of the orbital plane in degrees
    pub inclination: f64,
    /// Nodal precession period in orbital years, if the plane precesses
    pub nodal_precession_period: Option<f64>,
}

impl OrbitalElements {
    /// Create validated orbital elements.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        period: f64,
        inclination: f64,
    ) -> Result<Self, ConfigError> {
        let elements = Self {
            semi_major_axis,
            eccentricity,
            period,
            inclination,
            nodal_precession_period: None,
        };
        elements.validate()?;
        Ok(elements)
    }

    /// Copy of these elements with a different eccentricity.
    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = eccentricity;
        self
    }

    /// Check the elliptical-orbit invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(ConfigError::InvalidEccentricity(self.eccentricity));
        }
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(ConfigError::InvalidPeriod(self.period));
        }
        if !(self.semi_major_axis.is_finite() && self.semi_major_axis > 0.0) {
            return Err(ConfigError::InvalidSemiMajorAxis(self.semi_major_axis));
        }
        if let Some(p) = self.nodal_precession_period
            && !(p.is_finite() && p != 0.0)
        {
            return Err(ConfigError::InvalidCyclePeriod(p));
        }
        Ok(())
    }

    /// Mean anomaly at time `t` (days), unnormalized.
    pub fn mean_anomaly(&self, t: f64) -> f64 {
        (TAU / self.period) * t
    }

    /// Compute true anomaly from eccentric anomaly.
    pub fn eccentric_to_true_anomaly(&self, eccentric_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        let half_e = eccentric_anomaly / 2.0;

        // ν = 2 * atan2(sqrt(1+e) * sin(E/2), sqrt(1-e) * cos(E/2))
        let y = (1.0 + e).sqrt() * half_e.sin();
        let x = (1.0 - e).sqrt() * half_e.cos();
        2.0 * y.atan2(x)
    }

    /// Distance from the focus for an eccentric anomaly, in unscaled km.
    pub fn radius(&self, eccentric_anomaly: f64) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * eccentric_anomaly.cos())
    }

    /// Position in the orbital plane at time `t`.
    ///
    /// # Arguments
    /// * `scale` - km → scene-unit conversion factor
    /// * `t` - Time in days
    /// * `precession_angle` - Apsidal rotation of the ellipse within its plane, radians
    ///
    /// # Returns
    /// `(x, 0, z)` relative to the central body.
    pub fn position_at(&self, scale: f64, t: f64, precession_angle: f64) -> DVec3 {
        let e = self.eccentricity;

        let flat = if e == 0.0 {
            let a = self.semi_major_axis * scale;
            let angle = self.mean_anomaly(t);
            DVec3::new(a * angle.cos(), 0.0, a * angle.sin())
        } else {
            let e_anomaly = solve_kepler(e, self.mean_anomaly(t));
            let true_anomaly = self.eccentric_to_true_anomaly(e_anomaly);
            let r = self.radius(e_anomaly) * scale;
            DVec3::new(r * true_anomaly.cos(), 0.0, r * true_anomaly.sin())
        };

        if precession_angle != 0.0 {
            rotate_in_plane(flat, precession_angle)
        } else {
            flat
        }
    }

    /// Closed polyline covering exactly one period, `segments + 1` points.
    pub fn path_points(&self, scale: f64, segments: usize) -> OrbitPath {
        OrbitPath {
            orbit: *self,
            scale,
            segments: segments.max(1),
            next: 0,
        }
    }

    /// Unit direction of motion at time `t` (finite difference over [`TANGENT_DT`]).
    pub fn tangent_at(&self, scale: f64, t: f64, precession_angle: f64) -> DVec3 {
        let here = self.position_at(scale, t, precession_angle);
        let ahead = self.position_at(scale, t + TANGENT_DT, precession_angle);
        (ahead - here).normalize_or_zero()
    }
}

/// Lazy sampler over one orbital period.
///
/// Cloning restarts the sequence from wherever the clone was taken.
#[derive(Clone, Debug)]
pub struct OrbitPath {
    orbit: OrbitalElements,
    scale: f64,
    segments: usize,
    next: usize,
}

impl Iterator for OrbitPath {
    type Item = DVec3;

    fn next(&mut self) -> Option<DVec3> {
        if self.next > self.segments {
            return None;
        }
        let t = (self.orbit.period / self.segments as f64) * self.next as f64;
        self.next += 1;
        Some(self.orbit.position_at(self.scale, t, 0.0))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.segments + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OrbitPath {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    fn barycenter_orbit() -> OrbitalElements {
        OrbitalElements::new(308_000_000.0, 0.0502, 754.0, 8.0).unwrap()
    }

    #[test]
    fn test_kepler_solver_circular() {
        // For circular orbit, E = M
        let m = 1.0;
        let e = solve_kepler(0.0, m);
        assert!((e - m).abs() < 1e-10, "Circular orbit: E should equal M");
    }

    #[test]
    fn test_kepler_solver_small_eccentricity() {
        for m in [0.1, 0.5, 1.0, 2.0, 3.0, 5.0, 6.2] {
            let e_anom = solve_kepler(0.0502, m);
            let m_check = e_anom - 0.0502 * e_anom.sin();
            assert!(
                (m_check - m).abs() < 1e-9,
                "Kepler equation not satisfied for M={}: {} vs {}",
                m,
                m_check,
                m
            );
        }
    }

    #[test]
    fn test_kepler_solver_does_not_normalize() {
        // Mean anomaly is taken as-is; several turns in, E stays in the same turn.
        let m = 4.0 * TAU + 1.0;
        let e_anom = solve_kepler(0.05, m);
        assert!((e_anom - m).abs() < 0.1);
    }

    #[test]
    fn test_kepler_solver_returns_last_iterate_without_error() {
        // e close to 1 at tiny M may not converge in 10 steps; it still returns a number.
        let e_anom = solve_kepler(0.999, 0.001);
        assert!(e_anom.is_finite());
    }

    #[test]
    fn test_circular_position_matches_closed_form() {
        let orbit = OrbitalElements::new(234_000.0, 0.0, 4.0, 12.0).unwrap();
        let scale = 1e-6;
        for t in [0.0, 0.3, 1.0, 2.5, 17.75] {
            let pos = orbit.position_at(scale, t, 0.0);
            let angle = (TAU / 4.0) * t;
            let a = 234_000.0 * scale;
            assert_eq!(pos, DVec3::new(a * angle.cos(), 0.0, a * angle.sin()));
        }
    }

    #[test]
    fn test_periapsis_at_epoch() {
        let orbit = barycenter_orbit();
        let pos = orbit.position_at(1.0, 0.0, 0.0);
        assert_relative_eq!(pos.x, 308_000_000.0 * (1.0 - 0.0502), max_relative = 1e-12);
        assert_abs_diff_eq!(pos.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_position_distance_matches_radius() {
        let orbit = barycenter_orbit();
        assert_relative_eq!(orbit.radius(0.0), 308_000_000.0 * (1.0 - 0.0502));
        assert_relative_eq!(orbit.radius(PI), 308_000_000.0 * (1.0 + 0.0502));

        for t in [10.0, 200.0, 555.5] {
            let e_anom = solve_kepler(orbit.eccentricity, orbit.mean_anomaly(t));
            let pos = orbit.position_at(1e-6, t, 0.0);
            assert_relative_eq!(pos.length(), orbit.radius(e_anom) * 1e-6, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_apoapsis_at_half_period() {
        let orbit = barycenter_orbit();
        let pos = orbit.position_at(1.0, 377.0, 0.0);
        assert_relative_eq!(pos.length(), 308_000_000.0 * (1.0 + 0.0502), max_relative = 1e-9);
        assert!(pos.x < 0.0);
    }

    #[test]
    fn test_position_stays_in_plane() {
        let orbit = barycenter_orbit();
        for t in [0.0, 100.0, 400.0, 700.0] {
            assert_eq!(orbit.position_at(1e-6, t, 0.3).y, 0.0);
        }
    }

    #[test]
    fn test_position_periodicity() {
        let orbit = barycenter_orbit();
        let pos1 = orbit.position_at(1e-6, 123.0, 0.0);
        let pos2 = orbit.position_at(1e-6, 123.0 + orbit.period, 0.0);
        assert!((pos2 - pos1).length() < 1e-6);
    }

    #[test]
    fn test_precession_rotates_major_axis() {
        let orbit = barycenter_orbit();
        let plain = orbit.position_at(1.0, 0.0, 0.0);
        let rotated = orbit.position_at(1.0, 0.0, PI / 2.0);

        // Periapsis moves from +X to +Z, distance unchanged.
        assert_relative_eq!(rotated.length(), plain.length(), max_relative = 1e-12);
        assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(rotated.z, plain.x, max_relative = 1e-12);
    }

    #[test]
    fn test_path_points_closed_polyline() {
        let orbit = barycenter_orbit();
        let points: Vec<DVec3> = orbit.path_points(1e-6, DEFAULT_PATH_SEGMENTS).collect();
        assert_eq!(points.len(), DEFAULT_PATH_SEGMENTS + 1);

        let first = points[0];
        let last = points[DEFAULT_PATH_SEGMENTS];
        assert!((first - last).length() < 1e-6, "path should close on itself");
    }

    #[test]
    fn test_path_points_is_restartable() {
        let orbit = barycenter_orbit();
        let mut path = orbit.path_points(1e-6, 8);
        path.next();
        let restart = path.clone();
        assert_eq!(path.len(), 8);
        assert_eq!(path.collect::<Vec<_>>(), restart.collect::<Vec<_>>());
    }

    #[test]
    fn test_path_points_zero_segments_is_finite() {
        let orbit = barycenter_orbit();
        let points: Vec<DVec3> = orbit.path_points(1.0, 0).collect();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_tangent_is_unit_and_perpendicular_on_circle() {
        let orbit = OrbitalElements::new(656_000.0, 0.0, 19.0, 5.0).unwrap();
        let pos = orbit.position_at(1e-6, 3.0, 0.0);
        let tangent = orbit.tangent_at(1e-6, 3.0, 0.0);
        assert_relative_eq!(tangent.length(), 1.0, max_relative = 1e-9);
        assert!(tangent.dot(pos.normalize()).abs() < 1e-3);
    }

    #[test]
    fn test_validation_rejects_bad_elements() {
        assert!(matches!(
            OrbitalElements::new(1.0, 1.0, 10.0, 0.0),
            Err(ConfigError::InvalidEccentricity(_))
        ));
        assert!(matches!(
            OrbitalElements::new(1.0, -0.1, 10.0, 0.0),
            Err(ConfigError::InvalidEccentricity(_))
        ));
        assert!(matches!(
            OrbitalElements::new(1.0, 0.1, -10.0, 0.0),
            Err(ConfigError::InvalidPeriod(_))
        ));
        assert!(matches!(
            OrbitalElements::new(0.0, 0.1, 10.0, 0.0),
            Err(ConfigError::InvalidSemiMajorAxis(_))
        ));
    }

    #[test]
    fn test_unvalidated_elements_propagate_nan() {
        // Bypassing validation keeps the legacy behaviour: NaN, not a panic.
        let orbit = OrbitalElements {
            semi_major_axis: 1.0,
            eccentricity: 1.5,
            period: 10.0,
            inclination: 0.0,
            nodal_precession_period: None,
        };
        let pos = orbit.position_at(1.0, 2.0, 0.0);
        assert!(pos.x.is_nan() || pos.z.is_nan());
    }
}
