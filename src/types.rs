//! Core simulation types and calendar constants.

use bevy::prelude::*;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Hours in one Narym day.
///
/// The calendar uses a non-Earth unit system: a day has 30 hours of 60 minutes.
pub const HOURS_PER_DAY: f64 = 30.0;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: u32 = 60;

/// Minutes in one Narym day (30 × 60).
pub const MINUTES_PER_DAY: f64 = HOURS_PER_DAY * MINUTES_PER_HOUR as f64;

/// Simulation time resource.
///
/// Time is a single scalar measured in Narym days. Every position and
/// orientation in the system is a pure function of `current`, so it can be
/// moved freely in either direction without accumulating drift.
#[derive(Resource, Clone, Debug)]
pub struct SimulationTime {
    /// Current time in days
    pub current: f64,
    /// Simulated days per real-world second (negative runs backward)
    pub scale: f64,
    /// Whether simulation is paused
    pub paused: bool,
    /// Initial time for reset functionality
    pub initial: f64,
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::at_day(0.0)
    }
}

impl SimulationTime {
    /// Create simulation time starting at a specific day.
    pub fn at_day(day: f64) -> Self {
        Self {
            current: day,
            scale: 1.0,
            paused: false,
            initial: day,
        }
    }

    /// Builder-style override of the time scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Reset to initial time
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.paused = true;
    }

    /// Advance by a real-world interval, honouring pause and scale.
    pub fn advance(&mut self, real_seconds: f64) {
        if self.paused {
            return;
        }
        self.current += real_seconds * self.scale;
    }

    /// Move by a whole number of days, pausing first.
    ///
    /// Manual stepping always leaves the simulation paused so the stepped
    /// state stays on screen.
    pub fn step_days(&mut self, days: f64) {
        self.paused = true;
        self.current += days;
    }

    /// Elapsed orbital years for a given year length.
    pub fn years(&self, year_length: f64) -> f64 {
        self.current / year_length
    }
}
