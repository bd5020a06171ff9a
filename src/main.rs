//! Orrery - Binary Planet Ephemeris and Eclipse Calendar
//!
//! Runs the simulation headless and logs calendar progress. Rendering is
//! left to a host application that reads the `SystemState` resource.

use bevy::log::LogPlugin;
use bevy::prelude::*;

use orrery::orrery::{Orrery, OrreryPlugin};
use orrery::time::TimePlugin;
use orrery::types::SimulationTime;

fn main() {
    let orrery = Orrery::default();
    let time_scale = orrery.config().time_scale;

    App::new()
        .add_plugins((MinimalPlugins, LogPlugin::default()))
        // Insert resources before plugins that depend on them
        .insert_resource(SimulationTime::default().with_scale(time_scale))
        .insert_resource(orrery)
        .add_plugins((TimePlugin, OrreryPlugin))
        .run();
}
