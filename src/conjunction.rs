//! Conjunction search: when does Vezmar pass between Anavon and Narym?
//!
//! The search scans one orbital cycle in two passes: whole days first, then
//! single minutes within a day either side of the best coarse sample. Every
//! sample re-evaluates the long-term precession state, because apsidal and
//! nodal angles keep moving within a year.
//!
//! A search costs a few thousand frame evaluations. Results are meant to be
//! cached per cycle (see [`crate::calendar::CalendarSystem`]).

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::ephemeris::BinarySystemConfig;
use crate::ephemeris::frames::{OrbitFrame, component_positions};
use crate::types::MINUTES_PER_DAY;

/// Coarse pass step, in days.
pub const COARSE_STEP_DAYS: f64 = 1.0;

/// Fine pass step: one simulated minute.
pub const FINE_STEP_DAYS: f64 = 1.0 / MINUTES_PER_DAY;

/// Half-width of the fine pass window around the coarse maximum, in days.
pub const FINE_WINDOW_DAYS: f64 = 1.0;

/// Metric returned when the far body is not behind the near one.
///
/// Two exactly anti-aligned bodies also score -1; the two cases are not
/// distinguished.
pub const EXCLUDED_ALIGNMENT: f64 = -1.0;

/// How well `near` lines up in front of `far` as seen from the origin.
///
/// 1.0 is a perfect line-up. Only counts when `far` really is farther from
/// the star, otherwise [`EXCLUDED_ALIGNMENT`].
pub fn alignment_metric(far: DVec3, near: DVec3) -> f64 {
    if far.length() > near.length() {
        far.normalize_or_zero().dot(near.normalize_or_zero())
    } else {
        EXCLUDED_ALIGNMENT
    }
}

/// Alignment of the binary components at time `t`, frames evaluated fresh.
pub fn alignment_at(binary: &BinarySystemConfig, scale: f64, t: f64) -> f64 {
    let frame = OrbitFrame::of_binary(binary, t);
    let [far, near] = component_positions(binary, &frame, scale, t);
    alignment_metric(far, near)
}

/// Best alignment found in one orbital cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConjunctionEvent {
    pub cycle: i64,
    /// Time of best alignment, in days
    pub time: f64,
    /// Alignment metric at `time`; low values mean a poor conjunction
    pub alignment: f64,
}

/// Start and end (exclusive) of an orbital cycle, in days.
pub fn cycle_window(cycle: i64, year_length: f64) -> (f64, f64) {
    let start = cycle as f64 * year_length;
    (start, start + year_length)
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    time: f64,
    alignment: f64,
}

/// Sample `[from, to)` every `step` days and keep the first maximum.
///
/// Times are computed as `from + i * step` so no rounding accumulates.
fn scan(
    binary: &BinarySystemConfig,
    scale: f64,
    from: f64,
    to: f64,
    step: f64,
    seed: Option<Sample>,
) -> Sample {
    let mut best = seed.unwrap_or(Sample {
        time: from,
        alignment: f64::NEG_INFINITY,
    });

    let steps = ((to - from) / step).ceil().max(0.0) as usize;
    for i in 0..steps {
        let t = from + i as f64 * step;
        if t >= to {
            break;
        }
        let alignment = alignment_at(binary, scale, t);
        if alignment > best.alignment {
            best = Sample { time: t, alignment };
        }
    }

    best
}

/// Find the conjunction of a cycle, with its alignment.
///
/// Never fails: a cycle without any valid ordering returns its start time
/// with the excluded metric.
pub fn find_conjunction(cycle: i64, binary: &BinarySystemConfig, scale: f64) -> ConjunctionEvent {
    let (start, end) = cycle_window(cycle, binary.year_length());

    let coarse = scan(binary, scale, start, end, COARSE_STEP_DAYS, None);

    // The fine window is clipped to the cycle and seeded with the coarse
    // winner, so refining can only improve on it.
    let from = (coarse.time - FINE_WINDOW_DAYS).max(start);
    let to = (coarse.time + FINE_WINDOW_DAYS).min(end);
    let fine = scan(binary, scale, from, to, FINE_STEP_DAYS, Some(coarse));

    debug!(
        "Conjunction for cycle {}: t={:.4} (coarse t={:.1}), alignment={:.8}",
        cycle, fine.time, coarse.time, fine.alignment
    );

    ConjunctionEvent {
        cycle,
        time: fine.time,
        alignment: fine.alignment,
    }
}

/// Time of best alignment in `[cycle * year, (cycle + 1) * year)`.
pub fn find_conjunction_time(cycle: i64, binary: &BinarySystemConfig, scale: f64) -> f64 {
    find_conjunction(cycle, binary, scale).time
}
