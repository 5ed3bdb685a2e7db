use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_strafe::{StrafeControllerConfig, StrafeLayerMask};
use clap::{Parser, ValueEnum};

#[derive(Resource, Debug, Parser, Clone)]
pub struct AppSetupConfiguration {
    #[arg(long = "schedule", default_value_t = ScheduleToUse::Update)]
    pub schedule_to_use: ScheduleToUse,

    #[arg(long, default_value_t = 5.0)]
    pub walk_speed: f32,

    #[arg(long, default_value_t = 10.0)]
    pub run_speed: f32,

    #[arg(long, default_value_t = 5.0)]
    pub rotation_speed: f32,

    /// Do not move the character at all while there is no movement input, even when it is
    /// falling.
    #[arg(long)]
    pub keep_original_idle_gravity: bool,
}

impl AppSetupConfiguration {
    pub fn from_environment() -> Self {
        Self::parse()
    }

    pub fn controller_config(&self, aim_layer_mask: StrafeLayerMask) -> StrafeControllerConfig {
        StrafeControllerConfig {
            walk_speed: self.walk_speed,
            run_speed: self.run_speed,
            rotation_speed: self.rotation_speed,
            aim_layer_mask,
            apply_gravity_when_idle: !self.keep_original_idle_gravity,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum ScheduleToUse {
    Update,
    FixedUpdate,
}

impl std::fmt::Display for ScheduleToUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Update => "update",
            Self::FixedUpdate => "fixed-update",
        })
    }
}

impl ScheduleToUse {
    pub fn label(&self) -> InternedScheduleLabel {
        match self {
            Self::Update => Update.intern(),
            Self::FixedUpdate => FixedUpdate.intern(),
        }
    }
}
