//! Composition of rotating reference frames into world-space transforms.
//!
//! Every transform is recomputed from scratch for the requested time: there
//! is no integrator state, so jumping backward or forward gives the same
//! result as arriving there gradually.
//!
//! Frame order, outermost first:
//! 1. Barycenter orbit plane: inclination, then nodal precession about +Y.
//!    Apsidal precession rotates the ellipse inside the plane.
//! 2. Mutual orbit of the two components about the barycenter (phase 0 and π),
//!    expressed in the same tilted plane.
//! 3. Per-body axis: tilt about +Z, precessing about the plane normal, with the
//!    daily spin applied about the already-tilted axis.
//! 4. Moons: their own plane (inclination, nodal, apsidal) nested inside the
//!    system plane, offset from the parent's resolved position.

use bevy::math::{DMat3, DQuat, DVec3};
use bevy::prelude::*;
use std::f64::consts::{PI, TAU};

use super::data::{BinarySystemConfig, BodyConfig, LongTermCycles, SystemConfig};
use super::kepler::OrbitalElements;
use crate::types::DEG_TO_RAD;

/// Angle swept by a precession with the given period (orbital years) after `t` days.
///
/// A missing or zero period means no precession.
pub fn precession_angle(period_years: Option<f64>, t: f64, year_length: f64) -> f64 {
    match period_years {
        Some(period) if period != 0.0 => TAU * t / (period * year_length),
        _ => 0.0,
    }
}

/// Rotation from an orbital plane into its parent frame.
///
/// Inclination about +X is applied first, then the nodal rotation about +Y.
pub fn orbit_plane_matrix(inclination: f64, nodal_angle: f64) -> DMat3 {
    DMat3::from_rotation_y(nodal_angle) * DMat3::from_rotation_x(inclination)
}

/// Orientation of an orbit at one instant, with long-term cycles evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitFrame {
    /// Eccentricity after long-term variation
    pub eccentricity: f64,
    /// Inclination in radians after long-term variation
    pub inclination: f64,
    /// Nodal precession angle in radians
    pub nodal_angle: f64,
    /// Apsidal precession angle in radians
    pub apsidal_angle: f64,
    /// Orbital plane → parent frame
    pub matrix: DMat3,
}

impl OrbitFrame {
    /// Evaluate the frame of `orbit` at time `t`.
    pub fn at(orbit: &OrbitalElements, long_term: &LongTermCycles, t: f64, year_length: f64) -> Self {
        let eccentricity = long_term
            .eccentricity
            .map_or(orbit.eccentricity, |cycle| cycle.value_at(t, year_length));
        let inclination = long_term
            .inclination
            .map_or(orbit.inclination, |cycle| cycle.value_at(t, year_length))
            * DEG_TO_RAD;
        let nodal_angle = precession_angle(orbit.nodal_precession_period, t, year_length);
        let apsidal_angle = precession_angle(long_term.apsidal_precession_period, t, year_length);

        Self {
            eccentricity,
            inclination,
            nodal_angle,
            apsidal_angle,
            matrix: orbit_plane_matrix(inclination, nodal_angle),
        }
    }

    /// Frame of the barycenter orbit of a binary system.
    pub fn of_binary(binary: &BinarySystemConfig, t: f64) -> Self {
        Self::at(&binary.orbit, &binary.long_term, t, binary.year_length())
    }

    /// The plane rotation as a quaternion.
    pub fn rotation(&self) -> DQuat {
        DQuat::from_mat3(&self.matrix)
    }

    /// Position on `orbit` at `t`, using this frame's eccentricity and
    /// apsidal angle, rotated into the parent frame.
    pub fn place(&self, orbit: &OrbitalElements, scale: f64, t: f64) -> DVec3 {
        let flat = orbit
            .with_eccentricity(self.eccentricity)
            .position_at(scale, t, self.apsidal_angle);
        self.matrix * flat
    }
}

/// Angle of the first component around the barycenter at time `t`.
pub fn mutual_angle(binary: &BinarySystemConfig, t: f64) -> f64 {
    (TAU / binary.mutual_orbit_period) * t
}

/// In-plane offset of a component from the barycenter.
fn component_offset(component: &BodyConfig, angle: f64, scale: f64) -> DVec3 {
    let radius = component.orbit_radius.unwrap_or(0.0) * scale;
    DVec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// World positions of both binary components, `[far, near]`.
pub fn component_positions(
    binary: &BinarySystemConfig,
    frame: &OrbitFrame,
    scale: f64,
    t: f64,
) -> [DVec3; 2] {
    let barycenter = frame.place(&binary.orbit, scale, t);
    let angle = mutual_angle(binary, t);
    let [far, near] = &binary.components;

    [
        barycenter + frame.matrix * component_offset(far, angle, scale),
        barycenter + frame.matrix * component_offset(near, angle + PI, scale),
    ]
}

/// Orientation of a body's axis at time `t`.
///
/// `(precession ∘ tilt) ∘ spin`, expressed in `plane`.
pub fn axial_orientation(body: &BodyConfig, plane: DQuat, t: f64, year_length: f64) -> DQuat {
    let tilt_deg = body
        .long_term
        .obliquity
        .map_or(body.axial_tilt, |cycle| cycle.value_at(t, year_length));

    let tilt = DQuat::from_rotation_z(tilt_deg * DEG_TO_RAD);
    let precession =
        DQuat::from_rotation_y(precession_angle(body.precession_period, t, year_length));
    let spin = DQuat::from_rotation_y((TAU / body.rotation_period) * t);

    plane * (precession * tilt) * spin
}

/// Rotation that points the local +Z axis from `from` toward `target`.
pub fn facing(from: DVec3, target: DVec3) -> DQuat {
    let direction = (target - from).normalize_or_zero();
    if direction == DVec3::ZERO {
        DQuat::IDENTITY
    } else {
        DQuat::from_rotation_arc(DVec3::Z, direction)
    }
}

/// World position and orientation of a moon.
pub fn moon_transform(
    moon: &BodyConfig,
    parent_position: DVec3,
    system: &OrbitFrame,
    scale: f64,
    t: f64,
    year_length: f64,
) -> (DVec3, DQuat) {
    let Some(orbit) = &moon.orbit else {
        // Without an orbit the moon rides on its parent.
        let orientation = axial_orientation(moon, system.rotation(), t, year_length);
        return (parent_position, orientation);
    };

    let frame = OrbitFrame::at(orbit, &moon.long_term, t, year_length);
    let position = parent_position + system.matrix * frame.place(orbit, scale, t);

    let orientation = if moon.is_tidally_locked() {
        facing(position, parent_position)
    } else {
        axial_orientation(moon, system.rotation() * frame.rotation(), t, year_length)
    };

    (position, orientation)
}

/// Role of a body in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Star,
    Barycenter,
    Component,
    Moon,
}

/// Resolved world-space transform of one body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyTransform {
    pub name: String,
    pub kind: BodyKind,
    /// Position in scene units, star at the origin
    pub position: DVec3,
    pub orientation: DQuat,
}

/// Transforms of every body at one instant.
///
/// Order: star, barycenter, then each component followed by its moons.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct SystemState {
    /// Time in days this state was resolved for
    pub time: f64,
    pub bodies: Vec<BodyTransform>,
}

impl SystemState {
    /// Look up a body by name.
    pub fn body(&self, name: &str) -> Option<&BodyTransform> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

/// Resolve every body's absolute transform at time `t`.
pub fn resolve_system_state(config: &SystemConfig, t: f64) -> SystemState {
    let binary = &config.binary;
    let scale = config.scale;
    let year_length = binary.year_length();

    let frame = OrbitFrame::of_binary(binary, t);
    let plane = frame.rotation();
    let barycenter = frame.place(&binary.orbit, scale, t);
    let positions = component_positions(binary, &frame, scale, t);

    let mut bodies = vec![
        BodyTransform {
            name: config.star.name.clone(),
            kind: BodyKind::Star,
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        },
        BodyTransform {
            name: binary.name.clone(),
            kind: BodyKind::Barycenter,
            position: barycenter,
            orientation: plane,
        },
    ];

    for (component, position) in binary.components.iter().zip(positions) {
        bodies.push(BodyTransform {
            name: component.name.clone(),
            kind: BodyKind::Component,
            position,
            orientation: axial_orientation(component, plane, t, year_length),
        });

        for moon in &component.moons {
            let (moon_position, orientation) =
                moon_transform(moon, position, &frame, scale, t, year_length);
            bodies.push(BodyTransform {
                name: moon.name.clone(),
                kind: BodyKind::Moon,
                position: moon_position,
                orientation,
            });
        }
    }

    SystemState { time: t, bodies }
}
