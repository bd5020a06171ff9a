//! Property-based tests for ephemeris computations using proptest.
//!
//! These tests verify that orbital and calendar computations maintain
//! expected properties across a wide range of inputs.

use proptest::prelude::*;
use std::f64::consts::TAU;

use super::cycles::CyclicVariation;
use super::kepler::{OrbitalElements, solve_kepler};
use crate::calendar::CalendarSystem;
use crate::test_utils::fixtures;
use crate::types::MINUTES_PER_DAY;

const YEAR: f64 = 754.0;

fn orbit(eccentricity: f64, period: f64) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: 308_000_000.0,
        eccentricity,
        period,
        inclination: 0.0,
        nodal_precession_period: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Kepler's equation holds for the solver's output.
    #[test]
    fn prop_kepler_round_trip(
        mean_anomaly_normalized in 0.0f64..1.0,
        eccentricity in 0.0f64..=0.1,
    ) {
        let mean_anomaly = mean_anomaly_normalized * TAU;
        let e_anom = solve_kepler(eccentricity, mean_anomaly);

        let m_check = e_anom - eccentricity * e_anom.sin();
        let error = (m_check - mean_anomaly).abs();
        prop_assert!(
            error < 1e-5,
            "Kepler solver failed: M={}, e={}, E={}, error={}",
            mean_anomaly, eccentricity, e_anom, error
        );
    }

    /// Position repeats after one period when nothing precesses.
    #[test]
    fn prop_position_is_periodic(
        t in -5000.0f64..5000.0,
        eccentricity in 0.0f64..0.1,
        period in 1.0f64..1000.0,
    ) {
        let orbit = orbit(eccentricity, period);
        let a = orbit.position_at(1e-6, t, 0.0);
        let b = orbit.position_at(1e-6, t + period, 0.0);
        prop_assert!(
            (a - b).length() < 1e-6 * a.length().max(1.0),
            "t={} a={:?} b={:?}", t, a, b
        );
    }

    /// Circular orbits follow uniform circular motion exactly.
    #[test]
    fn prop_zero_eccentricity_is_circular_motion(
        t in -5000.0f64..5000.0,
        period in 1.0f64..1000.0,
    ) {
        let orbit = orbit(0.0, period);
        let p = orbit.position_at(1e-6, t, 0.0);
        let angle = TAU / period * t;
        let a = orbit.semi_major_axis * 1e-6;
        prop_assert_eq!(p.x, a * angle.cos());
        prop_assert_eq!(p.y, 0.0);
        prop_assert_eq!(p.z, a * angle.sin());
    }

    /// The orbit radius stays between periapsis and apoapsis.
    #[test]
    fn prop_radius_within_apsides(
        t in -5000.0f64..5000.0,
        eccentricity in 0.0f64..0.1,
        precession in 0.0f64..TAU,
    ) {
        let orbit = orbit(eccentricity, YEAR);
        let r = orbit.position_at(1e-6, t, precession).length();
        let a = 308.0;
        prop_assert!(r >= a * (1.0 - eccentricity) - 1e-9);
        prop_assert!(r <= a * (1.0 + eccentricity) + 1e-9);
    }

    /// Cyclic values never leave their bounds.
    #[test]
    fn prop_cyclic_value_within_bounds(
        t in -1e7f64..1e7,
        min in -100.0f64..100.0,
        spread in 0.0f64..50.0,
        period in 0.5f64..5000.0,
    ) {
        let cycle = CyclicVariation { min, max: min + spread, period };
        let value = cycle.value_at(t, YEAR);
        prop_assert!(value >= cycle.min && value <= cycle.max);
    }

    /// Later times within one year never map to an earlier day.
    #[test]
    fn prop_calendar_days_monotonic(
        cycle in 0i64..40,
        a in 1.0f64..500.0,
        b in 1.0f64..500.0,
    ) {
        let calendar = CalendarSystem::new(fixtures::wandering_eclipses(YEAR, 300.0, 100.0), YEAR);
        let start = calendar.new_year_boundary(cycle);
        let (t1, t2) = if a <= b { (start + a, start + b) } else { (start + b, start + a) };

        let d1 = calendar.calendar_state(t1);
        let d2 = calendar.calendar_state(t2);
        prop_assert_eq!(d1.year, d2.year);
        prop_assert!(d2.day >= d1.day);
    }

    /// Date and time convert back within one minute inside a year.
    #[test]
    fn prop_calendar_round_trip(
        cycle in 0i64..40,
        offset in 1.0f64..500.0,
    ) {
        let calendar = CalendarSystem::new(fixtures::wandering_eclipses(YEAR, 300.0, 100.0), YEAR);
        let t = calendar.new_year_boundary(cycle) + offset;
        let date = calendar.calendar_state(t);
        let back = calendar.simulation_time_from_date(&date);
        prop_assert!(
            (t - back).abs() < 1.0 / MINUTES_PER_DAY,
            "t={} date={} back={}", t, date, back
        );
        prop_assert_eq!(calendar.calendar_state(back), date);
    }
}
