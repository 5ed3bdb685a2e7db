mod tracer;

use bevy::prelude::*;

pub use tracer::{Tracer, TracerAssets};

pub struct LevelMechanicsPlugin;

impl Plugin for LevelMechanicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(tracer::TracerPlugin);
    }
}
