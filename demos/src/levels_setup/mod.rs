mod helper;
pub mod top_down_arena;

use bevy_rapier3d::prelude::Group;

pub use helper::LevelSetupHelper3d;

/// Collision layers of the demo levels.
pub struct LevelLayers;

impl LevelLayers {
    /// Index of the layer the aim ray hits.
    pub const GROUND_INDEX: u32 = 0;
    pub const GROUND: Group = Group::GROUP_1;
    pub const OBSTACLES: Group = Group::GROUP_2;
    pub const CHARACTERS: Group = Group::GROUP_3;
}
