//! Time advancement system for the orrery.
//!
//! Handles progression of simulation time based on scale and pause state,
//! and applies user time commands (pause, step, jump) synchronously.

use bevy::prelude::*;

use crate::anchors::AnchorRegistry;
use crate::calendar::CalendarDate;
use crate::orrery::Orrery;
use crate::types::{HOURS_PER_DAY, MINUTES_PER_HOUR, SimulationTime};

/// Plugin providing time advancement functionality.
pub struct TimePlugin;

/// Systems that move simulation time. Anything that reads the clock for the
/// current frame runs after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeSystemSet;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationTime>()
            .add_message::<TimeCommand>()
            .add_systems(
                Update,
                (handle_time_commands, advance_time)
                    .chain()
                    .in_set(TimeSystemSet),
            );
    }
}

/// A user request to change the simulation clock.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum TimeCommand {
    TogglePause,
    /// Move by a number of days and pause
    StepDays(f64),
    /// Jump to an absolute time in days
    JumpTo(f64),
    /// Jump to the start of a calendar minute
    JumpToDate(CalendarDate),
    /// Jump to the day zero of an anchored year
    JumpToAnchor(i64),
    /// Simulated days per real-world second
    SetScale(f64),
    Reset,
}

/// Whether a date names a real calendar minute.
///
/// Day 0 is accepted and means the first day of the year.
pub fn is_valid_date(date: &CalendarDate) -> bool {
    date.year >= 1
        && date.day >= 0
        && date.hour < HOURS_PER_DAY as u32
        && date.minute < MINUTES_PER_HOUR
}

/// Apply one command to the clock. Returns `false` if it was rejected.
///
/// Date jumps need the calendar, so they are rejected without an [`Orrery`].
/// Anchor jumps likewise need an [`AnchorRegistry`].
pub fn apply_command(
    sim_time: &mut SimulationTime,
    command: &TimeCommand,
    orrery: Option<&Orrery>,
    anchors: Option<&AnchorRegistry>,
) -> bool {
    match command {
        TimeCommand::TogglePause => {
            sim_time.paused = !sim_time.paused;
            if sim_time.paused {
                info!("Simulation paused at t={:.4}", sim_time.current);
            } else {
                info!("Simulation resumed at {}x", sim_time.scale);
            }
        }
        TimeCommand::StepDays(days) => {
            if !days.is_finite() {
                warn!("Ignoring step of {} days", days);
                return false;
            }
            sim_time.step_days(*days);
        }
        TimeCommand::JumpTo(t) => {
            if !t.is_finite() {
                warn!("Ignoring jump to t={}", t);
                return false;
            }
            sim_time.current = *t;
            info!("Jumped to t={:.4}", t);
        }
        TimeCommand::JumpToDate(date) => {
            if !is_valid_date(date) {
                warn!("Ignoring jump to invalid date {}", date);
                return false;
            }
            let Some(orrery) = orrery else {
                warn!("Cannot jump to {}: no calendar available", date);
                return false;
            };
            sim_time.current = orrery.simulation_time_from_date(date);
            info!("Jumped to {} (t={:.4})", date, sim_time.current);
        }
        TimeCommand::JumpToAnchor(year) => {
            let Some(anchors) = anchors else {
                warn!("Cannot jump to anchor of year {}: no anchors available", year);
                return false;
            };
            match anchors.apply(*year) {
                Ok(t) => sim_time.current = t,
                Err(err) => {
                    warn!("Ignoring anchor jump: {}", err);
                    return false;
                }
            }
        }
        TimeCommand::SetScale(scale) => {
            if !scale.is_finite() {
                warn!("Ignoring time scale {}", scale);
                return false;
            }
            sim_time.scale = *scale;
            info!("Time scale set to {} days/s", scale);
        }
        TimeCommand::Reset => {
            sim_time.reset();
            info!("Simulation reset to t={:.4}", sim_time.current);
        }
    }
    true
}

fn handle_time_commands(
    mut commands: MessageReader<TimeCommand>,
    mut sim_time: ResMut<SimulationTime>,
    orrery: Option<Res<Orrery>>,
    anchors: Option<Res<AnchorRegistry>>,
) {
    for command in commands.read() {
        apply_command(&mut sim_time, command, orrery.as_deref(), anchors.as_deref());
    }
}

/// Advance simulation time based on scale and pause state.
///
/// Time scale represents how many simulation days pass per real-world second.
/// For example, scale=1.0 means 1 sim-day per real-second.
fn advance_time(mut sim_time: ResMut<SimulationTime>, time: Res<Time>) {
    sim_time.advance(time.delta_secs_f64());
}
