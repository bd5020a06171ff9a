//! The simulation context: configuration plus calendar, and the plugin that
//! keeps [`SystemState`] in step with [`SimulationTime`].

use bevy::prelude::*;

use crate::anchors::AnchorRegistry;
use crate::calendar::{CalendarDate, CalendarSystem};
use crate::conjunction::ConjunctionEvent;
use crate::ephemeris::{
    ConfigError, OrbitPath, OrbitalElements, SystemConfig, SystemState, resolve_system_state,
};
use crate::time::TimeSystemSet;
use crate::types::SimulationTime;

/// Configuration and calendar of one star system.
///
/// The calendar caches eclipse events for this configuration only, so the
/// configuration can only be replaced as a whole through
/// [`Orrery::set_config`], which starts a fresh calendar.
#[derive(Resource, Debug)]
pub struct Orrery {
    config: SystemConfig,
    calendar: CalendarSystem,
}

impl Default for Orrery {
    fn default() -> Self {
        // The built-in preset is known to be valid.
        Self::from_validated(SystemConfig::narym())
    }
}

impl Orrery {
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: SystemConfig) -> Self {
        let calendar = CalendarSystem::for_binary(&config.binary, config.scale);
        Self { config, calendar }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn calendar(&self) -> &CalendarSystem {
        &self.calendar
    }

    /// Replace the configuration. Cached eclipses are discarded.
    pub fn set_config(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        info!(
            "Loaded configuration {} ({} eclipse cycles discarded)",
            config.binary.name,
            self.calendar.cached_cycles()
        );
        *self = Self::from_validated(config);
        Ok(())
    }

    /// Every body's transform at time `t`.
    pub fn state_at(&self, t: f64) -> SystemState {
        resolve_system_state(&self.config, t)
    }

    pub fn calendar_state(&self, t: f64) -> CalendarDate {
        self.calendar.calendar_state(t)
    }

    pub fn simulation_time_from_date(&self, date: &CalendarDate) -> f64 {
        self.calendar.simulation_time_from_date(date)
    }

    /// Eclipse of a cycle, from the calendar cache.
    pub fn eclipse(&self, cycle: i64) -> ConjunctionEvent {
        self.calendar.eclipse(cycle)
    }

    /// In-plane orbit polylines, one per orbiting body.
    ///
    /// The barycenter and moons trace their Keplerian ellipses; each binary
    /// component traces its circle about the barycenter. Points are in the
    /// body's own orbital plane; the renderer applies the plane rotation.
    pub fn orbit_paths(&self, segments: usize) -> Vec<(String, OrbitPath)> {
        let binary = &self.config.binary;
        let scale = self.config.scale;

        let mut paths = vec![(
            binary.name.clone(),
            binary.orbit.path_points(scale, segments),
        )];

        for component in &binary.components {
            if let Some(radius) = component.orbit_radius {
                let circle = OrbitalElements {
                    semi_major_axis: radius,
                    eccentricity: 0.0,
                    period: binary.mutual_orbit_period,
                    inclination: 0.0,
                    nodal_precession_period: None,
                };
                paths.push((component.name.clone(), circle.path_points(scale, segments)));
            }
            for moon in &component.moons {
                if let Some(orbit) = &moon.orbit {
                    paths.push((moon.name.clone(), orbit.path_points(scale, segments)));
                }
            }
        }

        paths
    }
}

/// Calendar date shown for the current frame.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct CalendarClock {
    pub date: Option<CalendarDate>,
}

/// Plugin resolving body transforms and the calendar every frame.
pub struct OrreryPlugin;

impl Plugin for OrreryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Orrery>()
            .init_resource::<SystemState>()
            .init_resource::<CalendarClock>()
            .init_resource::<AnchorRegistry>()
            .add_systems(
                Update,
                (update_system_state, update_calendar_clock).after(TimeSystemSet),
            );
    }
}

/// Recompute every transform when time or configuration changed.
fn update_system_state(
    orrery: Res<Orrery>,
    sim_time: Res<SimulationTime>,
    mut state: ResMut<SystemState>,
) {
    if !orrery.is_changed() && !state.bodies.is_empty() && state.time == sim_time.current {
        return;
    }
    *state = orrery.state_at(sim_time.current);
}

fn update_calendar_clock(
    orrery: Res<Orrery>,
    sim_time: Res<SimulationTime>,
    mut clock: ResMut<CalendarClock>,
) {
    let date = orrery.calendar_state(sim_time.current);
    if let Some(previous) = clock.date
        && previous.year != date.year
    {
        info!("Year {} began ({})", date.year, date);
    }
    if clock.date != Some(date) {
        clock.date = Some(date);
    }
}
