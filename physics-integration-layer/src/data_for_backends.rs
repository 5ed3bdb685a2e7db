use bevy::prelude::*;

use crate::layer_mask::StrafeLayerMask;

/// Allows disabling Strafe for a specific entity.
///
/// This is the enable/disable lifecycle of the controller. It can be used to let some other system
/// temporarily take control over a character (a cutscene, a menu, a death animation).
///
/// This component is not mandatory - if omitted, Strafe will just assume it is enabled for that
/// entity.
#[derive(Component, Default, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StrafeToggle {
    /// Do not update the sensors, do not accept input, and do not apply the motor.
    ///
    /// Input edges addressed to the character are discarded while it is disabled, and switching
    /// to this state cancels whatever actions were in progress (the character stops moving and
    /// stops running). The controller system will not run and the motor and controller components
    /// retain their last value from before `StrafeToggle::Disabled` was set.
    Disabled,
    /// Accept input and update the sensors, but do not apply the motor.
    ///
    /// The controller system will still run and still update the motor, the aim target and the
    /// animation parameters. Only the system that moves and turns the body is disabled.
    SenseOnly,
    #[default]
    /// The backend behaves normally - it updates the sensors and applies the motor.
    Enabled,
}

impl StrafeToggle {
    pub fn accepts_input(&self) -> bool {
        match self {
            StrafeToggle::Disabled => false,
            StrafeToggle::SenseOnly | StrafeToggle::Enabled => true,
        }
    }

    pub fn applies_motor(&self) -> bool {
        match self {
            StrafeToggle::Disabled | StrafeToggle::SenseOnly => false,
            StrafeToggle::Enabled => true,
        }
    }
}

/// Whether or not the character rests on a supporting surface.
///
/// The physics backend is responsible for updating this component from the physics engine during
/// [`StrafePipelineSystems::Sensors`](crate::StrafePipelineSystems::Sensors).
#[derive(Component, Default, Debug)]
pub struct StrafeGroundSensor {
    pub grounded: bool,
}

/// A ray cast from the aim camera through the pointer, into the scene.
///
/// The controller sets the [`ray`](Self::ray) and the [`layer_mask`](Self::layer_mask) during
/// [`StrafePipelineSystems::Input`](crate::StrafePipelineSystems::Input). The physics backend
/// casts it during [`StrafePipelineSystems::Sensors`](crate::StrafePipelineSystems::Sensors) and
/// writes the nearest hit into [`output`](Self::output). The character's own colliders are never
/// hit.
#[derive(Component, Debug)]
pub struct StrafeAimProbe {
    /// The ray in world coordinates. `None` when there is no pointer or no camera to project it
    /// with - the backend must then clear the output.
    pub ray: Option<Ray3d>,
    pub max_distance: f32,
    /// Only colliders that are members of at least one of these layers can be hit.
    pub layer_mask: StrafeLayerMask,
    pub output: Option<StrafeAimHit>,
}

impl Default for StrafeAimProbe {
    fn default() -> Self {
        Self {
            ray: None,
            max_distance: f32::INFINITY,
            layer_mask: StrafeLayerMask::ALL,
            output: None,
        }
    }
}

impl StrafeAimProbe {
    /// The part of the ray the backend should cast, if there is anything to cast.
    pub fn cast_parameters(&self) -> Option<(Ray3d, f32)> {
        if self.layer_mask.is_empty() {
            return None;
        }
        let ray = self.ray?;
        Some((ray, self.max_distance))
    }
}

/// Information from [`StrafeAimProbe`] that have detected a collider.
#[derive(Debug, Clone, PartialEq)]
pub struct StrafeAimHit {
    /// The entity of the collider detected by the ray.
    pub entity: Entity,
    /// The world point where the ray hits.
    pub point: Vec3,
    /// The normal from the detected collider's surface where the ray hits.
    pub normal: Dir3,
    /// Distance from the ray's origin.
    pub distance: f32,
}

/// Instructions on how to move the character in the current tick.
///
/// The physics backend is responsible for reading this component during
/// [`StrafePipelineSystems::Motors`](crate::StrafePipelineSystems::Motors) and applying it to the
/// body. Unlike forces, the translation is a displacement - it already accounts for the frame
/// duration, and the backend should move the body by it (sliding along obstacles) rather than
/// integrate it.
#[derive(Component, Default, Debug)]
pub struct StrafeMotor {
    /// How far the body should move in the current tick.
    pub translation: Vec3,
    /// The rotation the body should have at the end of the current tick. `None` means the
    /// rotation should be left alone.
    pub rotation: Option<Quat>,
}
