use bevy::ecs::query::QuerySingleError;
use bevy::prelude::*;

use crate::{
    StrafeAimProbe, StrafeController, StrafeControllerConfig, StrafeInputState, StrafeToggle,
};

/// Marks the camera the pointer is projected through to get the aim ray.
///
/// There should be exactly one such camera. Without one, characters never have an aim target.
///
/// The pointer is taken to be in the logical coordinates of this camera's window, which is what
/// `CursorMoved` reports. A camera that renders to a part of the window only aims while the
/// pointer is inside that part.
#[derive(Component, Default, Debug)]
pub struct StrafeAimCamera;

/// An entity that marks the aim target in the world - a reticle decal, a glowing disc etc.
///
/// Put this on the character entity. Strafe will show the indicator entity and move it to the
/// aim target while there is one, and hide it when there isn't. The indicator is hidden when this
/// component is added.
///
/// The indicator's `Transform` is set to the world position of the target, so it should not be a
/// child of the character (or of anything else that moves).
#[derive(Component, Debug, Clone, Copy)]
pub struct StrafeAimIndicator(pub Entity);

/// The rotation that makes the body face `target` from `from`, turning only around the up axis.
///
/// Follows Bevy's convention of `-Z` being forward. Returns `None` when the target is directly
/// above or below.
pub fn horizontal_look_rotation(from: Vec3, target: Vec3) -> Option<Quat> {
    let direction = (target - from).with_y(0.0);
    if direction == Vec3::ZERO {
        return None;
    }
    Some(Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z)))
}

/// Move a window-space pointer into the coordinates of a camera's viewport.
///
/// `viewport` is the camera's logical viewport rectangle, or `None` when it covers the whole
/// window. Returns `None` for a pointer outside the viewport.
pub fn pointer_in_viewport(pointer: Vec2, viewport: Option<Rect>) -> Option<Vec2> {
    match viewport {
        None => Some(pointer),
        Some(viewport) if viewport.contains(pointer) => Some(pointer - viewport.min),
        Some(_) => None,
    }
}

/// Slerp toward the desired rotation, by a factor of `rotation_speed * frame_duration`.
pub fn turn_towards(
    current: Quat,
    desired: Quat,
    rotation_speed: f32,
    frame_duration: f32,
) -> Quat {
    let factor = (rotation_speed * frame_duration).clamp(0.0, 1.0);
    current.slerp(desired, factor).normalize()
}

pub(crate) fn hide_new_aim_indicators_system(
    new_indicators_query: Query<&StrafeAimIndicator, Added<StrafeAimIndicator>>,
    mut visibility_query: Query<&mut Visibility, Without<StrafeController>>,
) {
    for StrafeAimIndicator(indicator_entity) in new_indicators_query.iter() {
        if let Ok(mut visibility) = visibility_query.get_mut(*indicator_entity) {
            *visibility = Visibility::Hidden;
        }
    }
}

pub(crate) fn update_aim_rays_system(
    camera_query: Query<(&Camera, &GlobalTransform), With<StrafeAimCamera>>,
    mut query: Query<(
        &StrafeInputState,
        &StrafeControllerConfig,
        &mut StrafeAimProbe,
        Option<&StrafeToggle>,
    )>,
    mut warned_about_multiple_cameras: Local<bool>,
) {
    let camera = match camera_query.single() {
        Ok(camera) => Some(camera),
        Err(QuerySingleError::NoEntities(_)) => None,
        Err(QuerySingleError::MultipleEntities(_)) => {
            if !*warned_about_multiple_cameras {
                warn!("More than one StrafeAimCamera - not projecting the pointer through any");
                *warned_about_multiple_cameras = true;
            }
            None
        }
    };

    for (input, config, mut probe, strafe_toggle) in query.iter_mut() {
        match strafe_toggle.copied().unwrap_or_default() {
            StrafeToggle::Disabled => continue,
            StrafeToggle::SenseOnly => {}
            StrafeToggle::Enabled => {}
        }
        probe.layer_mask = config.aim_layer_mask;
        probe.ray = camera.zip(input.pointer).and_then(
            |((camera, camera_transform), pointer)| {
                let pointer = pointer_in_viewport(pointer, camera.logical_viewport_rect())?;
                camera.viewport_to_world(camera_transform, pointer).ok()
            },
        );
    }
}

/// Show the indicator at the target, or hide it if there is no target.
pub(crate) fn place_aim_indicator(
    target: Option<Vec3>,
    indicator: Option<&StrafeAimIndicator>,
    indicator_query: &mut Query<(&mut Transform, &mut Visibility), Without<StrafeController>>,
) {
    let Some(StrafeAimIndicator(indicator_entity)) = indicator else {
        return;
    };
    let Ok((mut transform, mut visibility)) = indicator_query.get_mut(*indicator_entity) else {
        return;
    };
    if let Some(target) = target {
        transform.translation = target;
        visibility.set_if_neq(Visibility::Visible);
    } else {
        visibility.set_if_neq(Visibility::Hidden);
    }
}
