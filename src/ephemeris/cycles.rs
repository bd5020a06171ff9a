//! Long-period sinusoidal variation of orbital elements.

use std::f64::consts::TAU;

use super::ConfigError;

/// A value oscillating between `min` and `max` with a period measured in
/// orbital years.
///
/// Used for eccentricity, inclination and obliquity, which drift slowly over
/// many years independently of the orbit itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CyclicVariation {
    pub min: f64,
    pub max: f64,
    /// Period in orbital years
    pub period: f64,
}

impl CyclicVariation {
    /// Create a validated variation.
    pub fn new(min: f64, max: f64, period: f64) -> Result<Self, ConfigError> {
        let cycle = Self { min, max, period };
        cycle.validate()?;
        Ok(cycle)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min <= self.max) {
            return Err(ConfigError::InvalidCycleBounds {
                min: self.min,
                max: self.max,
            });
        }
        if !(self.period.is_finite() && self.period != 0.0) {
            return Err(ConfigError::InvalidCyclePeriod(self.period));
        }
        Ok(())
    }

    pub fn amplitude(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    pub fn average(&self) -> f64 {
        (self.max + self.min) / 2.0
    }

    /// Period converted to days for a given year length.
    pub fn period_days(&self, year_length: f64) -> f64 {
        self.period * year_length
    }

    /// Value at time `t` (days): `avg + amplitude * sin(2πt / period_days)`.
    ///
    /// The result is kept inside `[min, max]` to absorb rounding at the peaks.
    pub fn value_at(&self, t: f64, year_length: f64) -> f64 {
        let phase = TAU * t / self.period_days(year_length);
        let value = self.average() + self.amplitude() * phase.sin();
        value.max(self.min).min(self.max)
    }
}
