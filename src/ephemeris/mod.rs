//! Ephemeris module for computing body positions and orientations.
//!
//! Everything here is a pure function of simulation time and the static
//! configuration tree:
//! - [`kepler`]: Kepler's equation and in-plane positions.
//! - [`cycles`]: slow sinusoidal drift of orbital elements.
//! - [`frames`]: composition of orbit planes, mutual orbit and body axes.
//! - [`data`]: the configuration tree and the built-in Anavon preset.
//!
//! Coordinate frame: star at the origin, Y is the reference plane normal.

pub mod cycles;
pub mod data;
pub mod frames;
pub mod kepler;

#[cfg(test)]
mod proptest_ephemeris;

pub use cycles::CyclicVariation;
pub use data::{
    BinarySystemConfig, BodyConfig, FAR_COMPONENT, LongTermCycles, NEAR_COMPONENT, StarConfig,
    SystemConfig,
};
pub use frames::{BodyKind, BodyTransform, OrbitFrame, SystemState, resolve_system_state};
pub use kepler::{OrbitPath, OrbitalElements, solve_kepler};

/// Invalid configuration detected at construction time.
///
/// The numeric routines themselves never fail; unchecked inputs produce NaN.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("eccentricity {0} outside [0, 1)")]
    InvalidEccentricity(f64),

    #[error("invalid orbital period: {0} (must be positive)")]
    InvalidPeriod(f64),

    #[error("invalid semi-major axis: {0} (must be positive)")]
    InvalidSemiMajorAxis(f64),

    #[error("invalid cycle bounds: min {min} > max {max}")]
    InvalidCycleBounds { min: f64, max: f64 },

    #[error("invalid cycle period: {0} (must be finite and non-zero)")]
    InvalidCyclePeriod(f64),

    #[error("invalid rotation period for {body}: {period}")]
    InvalidRotationPeriod { body: String, period: f64 },

    #[error("invalid scene scale: {0} (must be positive)")]
    InvalidScale(f64),
}
