use bevy::prelude::*;
use bevy_strafe::animation::parameter_names;
use bevy_strafe::prelude::*;
use bevy_strafe::{StrafeAnimatingState, StrafeAnimatingStateDirective};

use crate::level_mechanics::TracerAssets;

/// How far (in radians) the body leans at full speed.
const MAX_LEAN: f32 = 0.25;

#[derive(Debug)]
pub enum AnimationState {
    Disabled,
    Idle,
    /// Velocities relative to the body's facing, in `[-1, 1]`.
    Walking { sideways: f32, forward: f32 },
    Running { sideways: f32, forward: f32 },
}

impl AnimationState {
    fn color(&self) -> Color {
        match self {
            AnimationState::Disabled => Color::srgb(0.3, 0.3, 0.3),
            AnimationState::Idle => Color::srgb(0.5, 0.55, 0.8),
            AnimationState::Walking { .. } => Color::srgb(0.3, 0.75, 0.4),
            AnimationState::Running { .. } => Color::srgb(0.95, 0.55, 0.2),
        }
    }

    fn lean(&self) -> Quat {
        let (sideways, forward, factor) = match self {
            AnimationState::Disabled | AnimationState::Idle => (0.0, 0.0, 0.0),
            AnimationState::Walking { sideways, forward } => (*sideways, *forward, 0.5),
            AnimationState::Running { sideways, forward } => (*sideways, *forward, 1.0),
        };
        Quat::from_euler(
            EulerRot::XYZ,
            -forward * factor * MAX_LEAN,
            0.0,
            -sideways * factor * MAX_LEAN,
        )
    }
}

/// The mesh that represents the character's body. Leans and changes color to show the animation
/// state. Must be a child of the character.
#[derive(Component)]
pub struct CharacterBody(pub Entity);

/// Where the shots come out of, relative to the character.
#[derive(Component)]
pub struct CharacterMuzzle(pub Vec3);

#[allow(clippy::type_complexity)]
pub fn animate_strafe_character(
    mut characters_query: Query<(
        // `StrafeAnimatingState` is a helper for deciding when to switch animations. The system
        // feeds it an enum describing the character on every frame, and it tells whether the
        // variant changed (start a new animation) or not (maybe adjust the running one).
        &mut StrafeAnimatingState<AnimationState>,
        // The controller publishes its output for animations here - velocities relative to the
        // body's facing, the running flag and the fire triggers.
        &mut StrafeAnimationParameters,
        &StrafeController,
        Option<&StrafeToggle>,
        &GlobalTransform,
        &CharacterBody,
        Option<&CharacterMuzzle>,
    )>,
    mut bodies_query: Query<(&mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    tracer_assets: Option<Res<TracerAssets>>,
    mut commands: Commands,
) {
    for (
        mut animating_state,
        mut animation,
        controller,
        strafe_toggle,
        global_transform,
        &CharacterBody(body_entity),
        muzzle,
    ) in characters_query.iter_mut()
    {
        let current_state = if !strafe_toggle.copied().unwrap_or_default().applies_motor() {
            AnimationState::Disabled
        } else if !controller.is_moving() {
            AnimationState::Idle
        } else {
            let sideways = animation.float(parameter_names::X_VELOCITY);
            let forward = animation.float(parameter_names::Z_VELOCITY);
            if animation.bool(parameter_names::IS_RUNNING) {
                AnimationState::Running { sideways, forward }
            } else {
                AnimationState::Walking { sideways, forward }
            }
        };

        let Ok((mut body_transform, body_material)) = bodies_query.get_mut(body_entity) else {
            continue;
        };

        let state = match animating_state.by_discriminant(current_state) {
            StrafeAnimatingStateDirective::Maintain { state } => state,
            StrafeAnimatingStateDirective::Alter { state, .. } => {
                if let Some(material) = materials.get_mut(&body_material.0) {
                    material.base_color = state.color();
                }
                state
            }
        };
        // Even with a maintained state the velocities change, so the lean is updated every frame.
        body_transform.rotation = state.lean();

        // Every press of the fire button is a separate shot.
        while animation.take_trigger(parameter_names::FIRE) {
            let Some(tracer_assets) = tracer_assets.as_ref() else {
                continue;
            };
            let muzzle_offset = muzzle.map(|muzzle| muzzle.0).unwrap_or_default();
            tracer_assets.spawn(
                &mut commands,
                global_transform.transform_point(muzzle_offset),
                global_transform.forward(),
                40.0,
            );
        }
    }
}
