//! Components for integrating physics backends with bevy-strafe.
//!
//! A physics backend crate (e.g. `bevy-strafe-rapier3d`) reads and writes the components in
//! [`data_for_backends`] from systems placed in the [`StrafePipelineSystems::Sensors`] and
//! [`StrafePipelineSystems::Motors`] sets. The controller itself never talks to the physics
//! engine directly.
use bevy::prelude::*;

pub mod data_for_backends;
pub mod layer_mask;

/// Umbrella system set for [`StrafePipelineSystems`].
///
/// The physics backends' plugins are responsible for preventing this entire system set from
/// running when the physics backend itself is paused.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub struct StrafeSystems;

/// The various stages of the Strafe pipeline.
#[derive(SystemSet, Clone, PartialEq, Eq, Debug, Hash)]
pub enum StrafePipelineSystems {
    /// Action edges are folded into the cached input state, and the pointer is projected into an
    /// aim ray.
    Input,
    /// Data is read from the physics backend.
    Sensors,
    /// The controller decides how the character should move, turn and animate.
    Logic,
    /// The desired motion is applied in the physics backend.
    Motors,
}
