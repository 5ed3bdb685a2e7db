use bevy::prelude::*;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::StrafeControllerConfig;

/// The speed the character moves at, selected anew on every tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum StrafeSpeedMode {
    #[default]
    Walk,
    Run,
}

impl StrafeSpeedMode {
    /// Run only when the run button is held **and** the character actually moves.
    pub fn select(is_running: bool, horizontal_intent: Vec3) -> Self {
        if is_running && 0.0 < horizontal_intent.length_squared() {
            Self::Run
        } else {
            Self::Walk
        }
    }

    pub fn speed(&self, config: &StrafeControllerConfig) -> f32 {
        match self {
            StrafeSpeedMode::Walk => config.walk_speed,
            StrafeSpeedMode::Run => config.run_speed,
        }
    }
}

/// Convert the 2D move axis to a world space direction on the horizontal plane.
///
/// The axis' `y` is "forward", which is `-Z` in Bevy.
pub fn horizontal_intent(move_axis: Vec2) -> Vec3 {
    Vec3::new(move_axis.x, 0.0, -move_axis.y)
}

/// Advance the falling speed by one tick.
pub fn integrate_vertical_velocity(
    vertical_velocity: f32,
    grounded: bool,
    config: &StrafeControllerConfig,
    frame_duration: f32,
) -> f32 {
    if grounded {
        config.grounded_vertical_velocity
    } else {
        vertical_velocity - config.gravity * frame_duration
    }
}

/// Everything the movement part of a tick decides.
#[derive(Debug, Clone, PartialEq)]
pub struct StrafeMovementStep {
    /// The direction of the input, on the horizontal plane.
    pub horizontal_intent: Vec3,
    /// The horizontal intent with the vertical velocity in its `y`.
    pub intent: Vec3,
    pub speed_mode: StrafeSpeedMode,
    pub vertical_velocity: f32,
    /// How far the body should move this tick.
    pub translation: Vec3,
}

impl StrafeMovementStep {
    pub fn compute(
        config: &StrafeControllerConfig,
        move_axis: Vec2,
        is_running: bool,
        vertical_velocity: f32,
        grounded: bool,
        frame_duration: f32,
    ) -> Self {
        let horizontal_intent = horizontal_intent(move_axis);
        let speed_mode = StrafeSpeedMode::select(is_running, horizontal_intent);
        let vertical_velocity =
            integrate_vertical_velocity(vertical_velocity, grounded, config, frame_duration);
        let intent = horizontal_intent.with_y(vertical_velocity);

        let translation =
            if 0.0 < horizontal_intent.length_squared() || config.apply_gravity_when_idle {
                intent * frame_duration * speed_mode.speed(config)
            } else {
                Vec3::ZERO
            };

        Self {
            horizontal_intent,
            intent,
            speed_mode,
            vertical_velocity,
            translation,
        }
    }

    pub fn is_moving(&self) -> bool {
        0.0 < self.horizontal_intent.length_squared()
    }
}
