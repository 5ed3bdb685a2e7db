use bevy::prelude::*;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::StrafeLayerMask;

/// Tunables of a [`StrafeController`](crate::StrafeController).
///
/// Required by the controller, so characters spawned without it use the defaults. All of the
/// fields can be changed at runtime and take effect on the next tick.
#[derive(Component, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct StrafeControllerConfig {
    /// Horizontal speed, in units per second, when not running.
    pub walk_speed: f32,

    /// Horizontal speed, in units per second, while running.
    ///
    /// Only used when the character is both running and moving - holding the run button while
    /// standing still does not count as running.
    pub run_speed: f32,

    /// How fast the character turns to face the aim target.
    ///
    /// This is the interpolation factor per second: each tick the rotation is slerped toward the
    /// target by `rotation_speed * frame_duration` (clamped to 1.0), so this is not an angular
    /// velocity.
    pub rotation_speed: f32,

    /// The layers the aim ray can hit. Typically the ground.
    pub aim_layer_mask: StrafeLayerMask,

    /// Downward acceleration while airborne.
    pub gravity: f32,

    /// The vertical velocity the character is clamped to while grounded.
    ///
    /// Slightly negative, to keep the character pressed against the ground.
    pub grounded_vertical_velocity: f32,

    /// Time constant, in seconds, of the smoothing applied to the velocity animation parameters.
    pub velocity_damp_time: f32,

    /// Whether gravity moves the character on ticks with no horizontal input.
    ///
    /// When `false`, the character is not moved at all on ticks without horizontal input - even
    /// when airborne. The vertical velocity still accumulates, and gets applied all at once when
    /// the character starts moving again.
    pub apply_gravity_when_idle: bool,
}

impl Default for StrafeControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            run_speed: 10.0,
            rotation_speed: 5.0,
            aim_layer_mask: StrafeLayerMask::ALL,
            gravity: 9.81,
            grounded_vertical_velocity: -0.5,
            velocity_damp_time: 0.1,
            apply_gravity_when_idle: true,
        }
    }
}
