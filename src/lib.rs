//! Orrery - Binary Planet Ephemeris and Eclipse Calendar
//!
//! A library crate computing the positions and orientations of the Anavon
//! system (the Narym-Vezmar binary and Narym's moons) as pure functions of
//! time, and deriving a calendar whose years begin at eclipses.

pub mod anchors;
pub mod calendar;
pub mod conjunction;
pub mod ephemeris;
pub mod orrery;
pub mod time;
pub mod types;

#[cfg(test)]
pub mod test_utils;
