//! Narym calendar built on eclipse events.
//!
//! A year does not have a fixed length. Year N+1 begins at the start of the
//! day after the cycle-N conjunction, when Vezmar passes in front of Narym as
//! seen from Anavon. Days have 30 hours of 60 minutes.
//!
//! Cycle N covers `[N * year_length, (N + 1) * year_length)`. Times before
//! the first modeled eclipse are clamped: negative times are treated as 0 and
//! any year below 1 is reported as year 1. Further back than that the
//! calendar is intentionally unspecified.

use bevy::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::conjunction::{ConjunctionEvent, find_conjunction};
use crate::ephemeris::BinarySystemConfig;
use crate::types::{HOURS_PER_DAY, MINUTES_PER_DAY, MINUTES_PER_HOUR};

/// Fraction of a minute forgiven when flooring to whole minutes, so the
/// start of a minute converted to days and back stays on that minute.
const MINUTE_ROUNDING_SLACK: f64 = 1e-6;

/// A date in the Narym calendar. Years and days are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CalendarDate {
    pub year: i64,
    pub day: i64,
    /// Hour of the day, `0..30`
    pub hour: u32,
    /// Minute of the hour, `0..60`
    pub minute: u32,
}

impl CalendarDate {
    /// Build a date, carrying minute overflow into hours and hour overflow
    /// into days.
    pub fn new(year: i64, day: i64, hour: u32, minute: u32) -> Self {
        let hours_per_day = HOURS_PER_DAY as u32;
        let total_hours = hour + minute / MINUTES_PER_HOUR;
        Self {
            year,
            day: day + i64::from(total_hours / hours_per_day),
            hour: total_hours % hours_per_day,
            minute: minute % MINUTES_PER_HOUR,
        }
    }

    /// Minutes since the start of the day.
    pub fn minute_of_day(&self) -> u32 {
        self.hour * MINUTES_PER_HOUR + self.minute
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year {}, Day {}, {:02}:{:02}",
            self.year, self.day, self.hour, self.minute
        )
    }
}

/// Source of eclipse events, one per orbital cycle.
pub trait EclipsePredictor: Send + Sync {
    fn predict(&self, cycle: i64) -> ConjunctionEvent;
}

/// Any `Fn(cycle) -> time` works as a predictor with perfect alignment.
impl<F> EclipsePredictor for F
where
    F: Fn(i64) -> f64 + Send + Sync,
{
    fn predict(&self, cycle: i64) -> ConjunctionEvent {
        ConjunctionEvent {
            cycle,
            time: self(cycle),
            alignment: 1.0,
        }
    }
}

/// Predictor backed by the numerical conjunction search.
#[derive(Clone, Debug)]
pub struct ConjunctionPredictor {
    binary: BinarySystemConfig,
    scale: f64,
}

impl ConjunctionPredictor {
    pub fn new(binary: BinarySystemConfig, scale: f64) -> Self {
        Self { binary, scale }
    }
}

impl EclipsePredictor for ConjunctionPredictor {
    fn predict(&self, cycle: i64) -> ConjunctionEvent {
        find_conjunction(cycle, &self.binary, self.scale)
    }
}

/// Calendar with a per-cycle eclipse cache.
///
/// The cache is valid for the lifetime of one configuration: build a new
/// calendar (or call [`CalendarSystem::invalidate`]) when the configuration
/// changes.
pub struct CalendarSystem {
    predictor: Box<dyn EclipsePredictor>,
    /// Average year length used to estimate the cycle of a time
    year_length: f64,
    /// Cached eclipse per cycle number.
    ///
    /// Behind a lock so queries can stay `&self` while the calendar lives in
    /// a Bevy `Resource`.
    cache: RwLock<HashMap<i64, ConjunctionEvent>>,
}

impl fmt::Debug for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarSystem")
            .field("year_length", &self.year_length)
            .field("cached_cycles", &self.cached_cycles())
            .finish()
    }
}

impl CalendarSystem {
    pub fn new(predictor: impl EclipsePredictor + 'static, year_length: f64) -> Self {
        Self {
            predictor: Box::new(predictor),
            year_length,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Calendar driven by the conjunction search over `binary`.
    pub fn for_binary(binary: &BinarySystemConfig, scale: f64) -> Self {
        Self::new(
            ConjunctionPredictor::new(binary.clone(), scale),
            binary.year_length(),
        )
    }

    pub fn year_length(&self) -> f64 {
        self.year_length
    }

    /// Eclipse event for a cycle, computed once and then served from cache.
    pub fn eclipse(&self, cycle: i64) -> ConjunctionEvent {
        if let Ok(guard) = self.cache.read()
            && let Some(event) = guard.get(&cycle).copied()
        {
            return event;
        }

        let event = self.predictor.predict(cycle);
        debug!(
            "Eclipse cache miss: cycle {} at t={:.4} (alignment {:.6})",
            cycle, event.time, event.alignment
        );

        // Best-effort; if lock is poisoned, just skip caching.
        if let Ok(mut guard) = self.cache.write() {
            guard.insert(cycle, event);
        }

        event
    }

    pub fn eclipse_time(&self, cycle: i64) -> f64 {
        self.eclipse(cycle).time
    }

    /// First instant of the year that follows the cycle's eclipse:
    /// the start of the day after the eclipse day.
    pub fn new_year_boundary(&self, cycle: i64) -> f64 {
        self.eclipse_time(cycle).floor() + 1.0
    }

    /// Number of cycles currently cached.
    pub fn cached_cycles(&self) -> usize {
        self.cache.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Drop every cached eclipse.
    pub fn invalidate(&self) {
        if let Ok(mut guard) = self.cache.write() {
            guard.clear();
        }
    }

    /// Calendar date for a simulation time.
    pub fn calendar_state(&self, simulation_time: f64) -> CalendarDate {
        let time = simulation_time.max(0.0);

        // `as` saturates, so far-future times land on the last cycle.
        let cycle = (time / self.year_length).floor() as i64;
        let boundary = self.new_year_boundary(cycle);

        let (year, year_start) = if time >= boundary {
            (cycle.saturating_add(1), boundary)
        } else {
            (cycle, self.new_year_boundary(cycle.saturating_sub(1)))
        };

        let elapsed = time - year_start;
        let whole_days = elapsed.floor();
        let minutes = (elapsed - whole_days) * MINUTES_PER_DAY + MINUTE_ROUNDING_SLACK;
        let minute_of_day = (minutes.floor() as u32).min(MINUTES_PER_DAY as u32 - 1);

        CalendarDate {
            year: year.max(1),
            day: (whole_days as i64).saturating_add(1),
            hour: minute_of_day / MINUTES_PER_HOUR,
            minute: minute_of_day % MINUTES_PER_HOUR,
        }
    }

    /// Simulation time at the start of the given minute.
    ///
    /// Year N starts the day after the eclipse of cycle N-1. Days below 1
    /// count as day 1.
    pub fn simulation_time_from_date(&self, date: &CalendarDate) -> f64 {
        let year_start = self.new_year_boundary(date.year.saturating_sub(1));
        let days = date.day.saturating_sub(1).max(0) as f64;

        year_start
            + days
            + f64::from(date.hour) / HOURS_PER_DAY
            + f64::from(date.minute) / MINUTES_PER_DAY
    }
}
