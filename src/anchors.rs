//! Calendar anchors: user-marked first and last days of a year, saved with a
//! snapshot of the whole system at day zero.
//!
//! Anchors live in memory only. Restoring a snapshot means jumping back to
//! its time, since the system state is a pure function of time.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::ephemeris::SystemState;
use crate::orrery::Orrery;

/// Errors from defining, saving or applying anchors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AnchorError {
    #[error("no anchor definition in progress")]
    NotDefining,

    #[error("day zero has not been marked")]
    MissingDayZero,

    #[error("last day has not been marked")]
    MissingLastDay,

    #[error("last day {day_last} comes before day zero {day_zero}")]
    InvertedRange { day_zero: f64, day_last: f64 },

    #[error("no anchor saved for year {0}")]
    NotFound(i64),
}

/// Transform of one body, in plain arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySnapshot {
    pub name: String,
    pub position: [f64; 3],
    /// Quaternion as `[x, y, z, w]`
    pub orientation: [f64; 4],
}

/// Frozen copy of every body's transform at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSnapshot {
    pub time: f64,
    pub bodies: Vec<BodySnapshot>,
}

impl SystemSnapshot {
    pub fn capture(state: &SystemState) -> Self {
        Self {
            time: state.time,
            bodies: state
                .bodies
                .iter()
                .map(|body| BodySnapshot {
                    name: body.name.clone(),
                    position: body.position.to_array(),
                    orientation: body.orientation.to_array(),
                })
                .collect(),
        }
    }

    pub fn body(&self, name: &str) -> Option<&BodySnapshot> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

/// A year whose first and last days were marked by hand.
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarAnchor {
    pub year: i64,
    /// Start of the first day, in days
    pub day_zero: f64,
    /// Start of the last day, in days
    pub day_last: f64,
    pub snapshot: SystemSnapshot,
}

impl CalendarAnchor {
    /// Days in the anchored year, both marked days included.
    pub fn duration(&self) -> f64 {
        self.day_last - self.day_zero + 1.0
    }
}

/// Anchor under construction.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Draft {
    year: i64,
    day_zero: Option<f64>,
    day_last: Option<f64>,
}

/// Saved anchors keyed by year, plus at most one definition in progress.
#[derive(Resource, Clone, Debug, Default)]
pub struct AnchorRegistry {
    anchors: BTreeMap<i64, CalendarAnchor>,
    draft: Option<Draft>,
}

impl AnchorRegistry {
    /// Begin marking a year. Replaces any unfinished definition.
    pub fn start_definition(&mut self, year: i64) {
        self.draft = Some(Draft {
            year,
            day_zero: None,
            day_last: None,
        });
    }

    pub fn is_defining(&self) -> bool {
        self.draft.is_some()
    }

    pub fn cancel_definition(&mut self) {
        self.draft = None;
    }

    pub fn set_day_zero(&mut self, t: f64) -> Result<(), AnchorError> {
        let draft = self.draft.as_mut().ok_or(AnchorError::NotDefining)?;
        draft.day_zero = Some(t);
        Ok(())
    }

    pub fn set_last_day(&mut self, t: f64) -> Result<(), AnchorError> {
        let draft = self.draft.as_mut().ok_or(AnchorError::NotDefining)?;
        draft.day_last = Some(t);
        Ok(())
    }

    /// Finish the definition, capturing the system at day zero.
    ///
    /// The draft is kept on error so the missing day can still be marked.
    pub fn save(&mut self, orrery: &Orrery) -> Result<&CalendarAnchor, AnchorError> {
        let draft = self.draft.ok_or(AnchorError::NotDefining)?;
        let day_zero = draft.day_zero.ok_or(AnchorError::MissingDayZero)?;
        let day_last = draft.day_last.ok_or(AnchorError::MissingLastDay)?;
        if day_last < day_zero {
            return Err(AnchorError::InvertedRange { day_zero, day_last });
        }

        let anchor = CalendarAnchor {
            year: draft.year,
            day_zero,
            day_last,
            snapshot: SystemSnapshot::capture(&orrery.state_at(day_zero)),
        };
        info!(
            "Saved anchor for year {} ({} days)",
            anchor.year,
            anchor.duration()
        );

        self.draft = None;
        self.anchors.insert(anchor.year, anchor);
        self.anchors
            .get(&draft.year)
            .ok_or(AnchorError::NotFound(draft.year))
    }

    /// Time to jump to for an anchored year.
    pub fn apply(&self, year: i64) -> Result<f64, AnchorError> {
        let anchor = self.get(year).ok_or(AnchorError::NotFound(year))?;
        info!("Applying anchor for year {}", year);
        Ok(anchor.snapshot.time)
    }

    pub fn delete(&mut self, year: i64) -> Result<CalendarAnchor, AnchorError> {
        let anchor = self.anchors.remove(&year).ok_or(AnchorError::NotFound(year))?;
        info!("Deleted anchor for year {}", year);
        Ok(anchor)
    }

    pub fn get(&self, year: i64) -> Option<&CalendarAnchor> {
        self.anchors.get(&year)
    }

    /// Anchors in year order.
    pub fn iter(&self) -> impl Iterator<Item = &CalendarAnchor> {
        self.anchors.values()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Length of the year containing `t`.
    ///
    /// Uses the most recent anchor whose day zero is not after `t`, otherwise
    /// `default_year_length`.
    pub fn year_duration_for_time(&self, t: f64, default_year_length: f64) -> f64 {
        self.anchors
            .values()
            .filter(|anchor| anchor.day_zero <= t)
            .max_by(|a, b| a.day_zero.total_cmp(&b.day_zero))
            .map_or(default_year_length, CalendarAnchor::duration)
    }
}
