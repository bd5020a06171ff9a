//! Static configuration tree for the Anavon system.
//!
//! Star → binary pair (Narym and Vezmar orbiting a shared barycenter) → moons.
//! The tree is read-only once an [`crate::orrery::Orrery`] is built from it.

use super::ConfigError;
use super::cycles::CyclicVariation;
use super::kepler::OrbitalElements;

/// Index of the body that can be hidden behind its companion (Narym).
pub const FAR_COMPONENT: usize = 0;

/// Index of the occluding companion (Vezmar).
pub const NEAR_COMPONENT: usize = 1;

/// Central star. Sits at the origin and does not move.
#[derive(Clone, Debug, PartialEq)]
pub struct StarConfig {
    pub name: String,
    pub spectral_type: String,
    /// Radius in km
    pub radius: f64,
}

/// Optional long-term variations attached to an orbit or a body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LongTermCycles {
    pub eccentricity: Option<CyclicVariation>,
    /// Inclination variation in degrees
    pub inclination: Option<CyclicVariation>,
    /// Axial tilt variation in degrees
    pub obliquity: Option<CyclicVariation>,
    /// Period of the major axis rotation within the orbital plane, in orbital years
    pub apsidal_precession_period: Option<f64>,
}

impl LongTermCycles {
    fn validate(&self) -> Result<(), ConfigError> {
        for cycle in [self.eccentricity, self.inclination, self.obliquity]
            .into_iter()
            .flatten()
        {
            cycle.validate()?;
        }
        if let Some(ecc) = self.eccentricity
            && let Some(bad) = [ecc.min, ecc.max]
                .into_iter()
                .find(|e| !(0.0..1.0).contains(e))
        {
            return Err(ConfigError::InvalidEccentricity(bad));
        }
        if let Some(p) = self.apsidal_precession_period
            && !(p.is_finite() && p != 0.0)
        {
            return Err(ConfigError::InvalidCyclePeriod(p));
        }
        Ok(())
    }
}

/// A planet or moon.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    /// Radius in km
    pub radius: f64,
    /// Axial tilt in degrees
    pub axial_tilt: f64,
    /// Sidereal rotation period in days
    pub rotation_period: f64,
    /// Axial precession period in orbital years
    pub precession_period: Option<f64>,
    /// Distance to the barycenter in km (binary components only)
    pub orbit_radius: Option<f64>,
    /// Orbit around the parent body (moons only)
    pub orbit: Option<OrbitalElements>,
    pub long_term: LongTermCycles,
    pub moons: Vec<BodyConfig>,
}

impl BodyConfig {
    /// A moon whose day equals its orbital period always shows the same face
    /// to its parent.
    pub fn is_tidally_locked(&self) -> bool {
        self.orbit
            .is_some_and(|orbit| orbit.period == self.rotation_period)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rotation_period.is_finite() && self.rotation_period > 0.0) {
            return Err(ConfigError::InvalidRotationPeriod {
                body: self.name.clone(),
                period: self.rotation_period,
            });
        }
        if let Some(orbit) = &self.orbit {
            orbit.validate()?;
        }
        if let Some(p) = self.precession_period
            && !(p.is_finite() && p != 0.0)
        {
            return Err(ConfigError::InvalidCyclePeriod(p));
        }
        self.long_term.validate()?;
        self.moons.iter().try_for_each(BodyConfig::validate)
    }
}

/// Two planets revolving about a common barycenter, which itself orbits the star.
#[derive(Clone, Debug, PartialEq)]
pub struct BinarySystemConfig {
    pub name: String,
    /// Barycenter orbit around the star. Its period defines the year.
    pub orbit: OrbitalElements,
    /// Period of the components around the barycenter, in days
    pub mutual_orbit_period: f64,
    /// `[far, near]`: the first component is the one that can be eclipsed.
    pub components: [BodyConfig; 2],
    pub long_term: LongTermCycles,
}

impl BinarySystemConfig {
    /// Length of one orbital cycle (year) in days.
    pub fn year_length(&self) -> f64 {
        self.orbit.period
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orbit.validate()?;
        if !(self.mutual_orbit_period.is_finite() && self.mutual_orbit_period > 0.0) {
            return Err(ConfigError::InvalidPeriod(self.mutual_orbit_period));
        }
        self.long_term.validate()?;
        self.components.iter().try_for_each(BodyConfig::validate)
    }
}

/// Root of the configuration tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemConfig {
    /// km → scene-unit conversion factor
    pub scale: f64,
    /// Default simulated days per real-world second
    pub time_scale: f64,
    pub star: StarConfig,
    pub binary: BinarySystemConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::narym()
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        self.binary.validate()
    }

    /// Find a planet or moon by name.
    pub fn body(&self, name: &str) -> Option<&BodyConfig> {
        self.binary.components.iter().find_map(|component| {
            if component.name == name {
                Some(component)
            } else {
                component.moons.iter().find(|moon| moon.name == name)
            }
        })
    }

    /// The Anavon system: Narym and Vezmar with Narym's two moons.
    pub fn narym() -> Self {
        Self {
            scale: 1e-6,
            time_scale: 1.0,
            star: StarConfig {
                name: "Anavon".to_string(),
                spectral_type: "F5 V".to_string(),
                radius: 905_000.0,
            },
            binary: BinarySystemConfig {
                name: "Narym-Vezmar System".to_string(),
                // e = (324M - 293M) / (324M + 293M)
                orbit: OrbitalElements {
                    semi_major_axis: 308_000_000.0,
                    eccentricity: 0.0502,
                    period: 754.0,
                    inclination: 8.0,
                    nodal_precession_period: Some(2600.0),
                },
                mutual_orbit_period: 377.0,
                components: [narym(), vezmar()],
                long_term: LongTermCycles {
                    eccentricity: Some(CyclicVariation {
                        min: 0.0482,
                        max: 0.0522,
                        period: 96.0,
                    }),
                    inclination: Some(CyclicVariation {
                        min: 7.5,
                        max: 8.5,
                        period: 64.0,
                    }),
                    obliquity: None,
                    apsidal_precession_period: Some(1200.0),
                },
            },
        }
    }
}

fn narym() -> BodyConfig {
    BodyConfig {
        name: "Narym".to_string(),
        radius: 12_250.0,
        axial_tilt: 29.0,
        rotation_period: 1.0,
        precession_period: Some(260.0),
        orbit_radius: Some(5_490_000.0),
        orbit: None,
        long_term: LongTermCycles {
            obliquity: Some(CyclicVariation {
                min: 27.5,
                max: 30.5,
                period: 41.0,
            }),
            ..Default::default()
        },
        moons: vec![
            BodyConfig {
                name: "Tharela".to_string(),
                radius: 2_200.0,
                axial_tilt: 0.0,
                rotation_period: 4.0,
                precession_period: None,
                orbit_radius: None,
                orbit: Some(OrbitalElements {
                    semi_major_axis: 234_000.0,
                    eccentricity: 0.0,
                    period: 4.0,
                    inclination: 12.0,
                    nodal_precession_period: Some(9.0),
                }),
                long_term: LongTermCycles::default(),
                moons: Vec::new(),
            },
            BodyConfig {
                name: "Ciren".to_string(),
                radius: 1_400.0,
                axial_tilt: 0.0,
                rotation_period: 19.0,
                precession_period: None,
                orbit_radius: None,
                orbit: Some(OrbitalElements {
                    semi_major_axis: 656_000.0,
                    eccentricity: 0.012,
                    period: 19.0,
                    inclination: 5.0,
                    nodal_precession_period: None,
                }),
                long_term: LongTermCycles {
                    apsidal_precession_period: Some(8.0),
                    ..Default::default()
                },
                moons: Vec::new(),
            },
        ],
    }
}

fn vezmar() -> BodyConfig {
    BodyConfig {
        name: "Vezmar".to_string(),
        radius: 129_150.0,
        axial_tilt: 4.0,
        rotation_period: 11.3 / 30.0,
        precession_period: None,
        orbit_radius: Some(1_910_000.0),
        orbit: None,
        long_term: LongTermCycles::default(),
        moons: Vec::new(),
    }
}
