//! # Strafe - A Top-Down Strafing Character Controller
//!
//! Strafe is a character controller for top-down and isometric shooters: the character walks
//! (or runs) according to the movement input, falls under gravity, and turns to face the point in
//! the world under the mouse cursor - so it can strafe sideways or backpedal while aiming. It also
//! publishes animation parameters describing the motion relative to where the character faces.
//!
//! Strafe does not do physics on its own. It needs a physics backend integration crate, like
//! [bevy-strafe-rapier3d](https://crates.io/crates/bevy-strafe-rapier3d), that provides the
//! collide-and-slide mover, the grounded check and the aim raycast.
//!
//! ## Using Strafe
//!
//! * Add [`StrafeControllerPlugin`] and the physics backend's plugin, with the same schedule.
//! * Optionally add [`StrafeKeyboardMouseInputPlugin`] for WASD/Shift/mouse controls.
//! * Spawn a camera with [`StrafeAimCamera`].
//! * Spawn the character with a collider from the physics backend and a [`StrafeController`]
//!   (which pulls in everything else it needs). Optionally add:
//!   * [`StrafeControllerConfig`] to change the speeds and the aim layers.
//!   * [`StrafePlayer`] to control it with the keyboard and the mouse.
//!   * [`StrafeAimIndicator`] to show a marker where the character is aiming.
//! * Read [`StrafeAnimationParameters`] in an animation system to play the right clips.
//!   [`StrafeAnimatingState`] can help decide when to switch them.
//!
//! Characters can also be controlled by sending [`StrafeInput`] events directly, and can be
//! disabled with [`StrafeToggle`].
pub mod action_map;
pub mod aim;
mod animating_helper;
pub mod animation;
mod config;
pub mod controller;
pub mod input;
pub mod movement;

pub mod prelude {
    pub use crate::action_map::{StrafeKeyboardMouseInputPlugin, StrafePlayer};
    pub use crate::aim::{StrafeAimCamera, StrafeAimIndicator};
    pub use crate::animation::{parameter_names, StrafeAnimationParameters};
    pub use crate::controller::{StrafeController, StrafeControllerPlugin};
    pub use crate::input::{StrafeActionEdge, StrafeInput};
    pub use crate::movement::StrafeSpeedMode;
    pub use crate::{StrafeControllerConfig, StrafeLayerMask, StrafeSystems, StrafeToggle};
}

pub use action_map::{
    StrafeActionMap, StrafeActionMapBuilder, StrafeActionMapError,
    StrafeKeyboardMouseInputPlugin, StrafeMoveDirection, StrafePlayer,
};
pub use aim::{StrafeAimCamera, StrafeAimIndicator};
pub use animating_helper::{StrafeAnimatingState, StrafeAnimatingStateDirective};
pub use animation::StrafeAnimationParameters;
pub use bevy_strafe_physics_integration_layer::data_for_backends::*;
pub use bevy_strafe_physics_integration_layer::layer_mask::StrafeLayerMask;
pub use bevy_strafe_physics_integration_layer::*;
pub use config::StrafeControllerConfig;
pub use controller::{StrafeController, StrafeControllerPlugin};
pub use input::{StrafeActionEdge, StrafeActionKind, StrafeInput, StrafeInputState};
pub use movement::{StrafeMovementStep, StrafeSpeedMode};
