//! # bevy_rapier3d Integration for bevy-strafe
//!
//! In addition to the instruction in bevy-strafe's documentation:
//!
//! * Add [`StrafeRapier3dPlugin`] to the Bevy app.
//! * Give the character a [`Collider`]. Strafe moves it with Rapier's
//!   [`KinematicCharacterController`], which is added automatically and can be customized (e.g.
//!   its `offset`, `max_slope_climb_angle` or `snap_to_ground`) by inserting it explicitly.
//! * Put the aimable colliders (usually the ground) in [`CollisionGroups`] whose memberships
//!   match the aim layer mask of `StrafeControllerConfig`.
mod helpers;

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use bevy_strafe_physics_integration_layer::data_for_backends::StrafeToggle;
use bevy_strafe_physics_integration_layer::data_for_backends::{
    StrafeAimHit, StrafeAimProbe, StrafeGroundSensor, StrafeMotor,
};
use bevy_strafe_physics_integration_layer::layer_mask::StrafeLayerMask;
use bevy_strafe_physics_integration_layer::StrafePipelineSystems;
use bevy_strafe_physics_integration_layer::StrafeSystems;

pub mod prelude {
    pub use crate::StrafeRapier3dPlugin;
}

/// Add this plugin to use bevy_rapier3d as a physics backend.
///
/// This plugin should be used in addition to `StrafeControllerPlugin`, and both plugins must use
/// the same schedule - which should be the one Rapier runs in or the one before it. By default,
/// Rapier runs in [`PostUpdate`] - which means this plugin and `StrafeControllerPlugin` should run
/// in [`Update`].
pub struct StrafeRapier3dPlugin {
    schedule: InternedScheduleLabel,
}

impl StrafeRapier3dPlugin {
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Default for StrafeRapier3dPlugin {
    fn default() -> Self {
        Self::new(Update)
    }
}

impl Plugin for StrafeRapier3dPlugin {
    fn build(&self, app: &mut App) {
        app.register_required_components::<StrafeMotor, KinematicCharacterController>();
        app.configure_sets(
            self.schedule,
            StrafeSystems.before(PhysicsSet::SyncBackend).run_if(
                |rapier_config: Single<&RapierConfiguration>| rapier_config.physics_pipeline_active,
            ),
        );
        app.add_systems(
            self.schedule,
            (update_ground_sensors_system, update_aim_probes_system)
                .in_set(StrafePipelineSystems::Sensors),
        );
        app.add_systems(
            self.schedule,
            apply_motors_system.in_set(StrafePipelineSystems::Motors),
        );
    }
}

/// Only colliders that are members of the mask's layers, and that did not exclude all of them
/// from their filters, will be hit.
pub fn aim_collision_groups(layer_mask: StrafeLayerMask) -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::from_bits_truncate(layer_mask.0))
}

fn update_ground_sensors_system(
    mut query: Query<(
        &mut StrafeGroundSensor,
        Option<&KinematicCharacterControllerOutput>,
        Option<&StrafeToggle>,
    )>,
) {
    for (mut sensor, output, strafe_toggle) in query.iter_mut() {
        match strafe_toggle.copied().unwrap_or_default() {
            StrafeToggle::Disabled => continue,
            StrafeToggle::SenseOnly => {}
            StrafeToggle::Enabled => {}
        }
        // Until the character moves for the first time there is no output, and it is considered
        // airborne.
        sensor.grounded = output.is_some_and(|output| output.grounded);
    }
}

#[allow(clippy::type_complexity)]
fn update_aim_probes_system(
    rapier_context_query: Query<(
        &RapierContextSimulation,
        &RapierContextColliders,
        &RapierRigidBodySet,
    )>,
    mut query: Query<(
        Entity,
        &mut StrafeAimProbe,
        Option<&RapierContextEntityLink>,
        Option<&StrafeToggle>,
    )>,
) {
    for (owner_entity, mut probe, rapier_context_entity_link, strafe_toggle) in query.iter_mut() {
        match strafe_toggle.copied().unwrap_or_default() {
            StrafeToggle::Disabled => continue,
            StrafeToggle::SenseOnly => {}
            StrafeToggle::Enabled => {}
        }

        let Some((ray, max_distance)) = probe.cast_parameters() else {
            probe.output = None;
            continue;
        };
        let rapier_context = if let Some(link) = rapier_context_entity_link {
            rapier_context_query.get(link.0).ok()
        } else {
            rapier_context_query.iter().next()
        };
        let Some(rapier_context) = rapier_context else {
            probe.output = None;
            continue;
        };

        let query_filter = QueryFilter::new()
            .exclude_collider(owner_entity)
            .exclude_rigid_body(owner_entity)
            .exclude_sensors()
            .groups(aim_collision_groups(probe.layer_mask));
        let max_distance = if max_distance.is_finite() {
            max_distance
        } else {
            f32::MAX
        };

        probe.output = helpers::cast_ray(rapier_context, query_filter, ray, max_distance).map(
            |(entity, intersection)| StrafeAimHit {
                entity,
                point: intersection.point,
                normal: Dir3::new(intersection.normal).unwrap_or(-ray.direction),
                distance: intersection.time_of_impact,
            },
        );
    }
}

fn apply_motors_system(
    mut query: Query<(
        &StrafeMotor,
        &mut KinematicCharacterController,
        &mut Transform,
        Option<&StrafeToggle>,
    )>,
) {
    for (motor, mut character_controller, mut transform, strafe_toggle) in query.iter_mut() {
        if !strafe_toggle.copied().unwrap_or_default().applies_motor() {
            character_controller.translation = None;
            continue;
        }
        if motor.translation.is_finite() {
            character_controller.translation = Some(motor.translation);
        }
        if let Some(rotation) = motor.rotation {
            if rotation.is_finite() {
                transform.rotation = rotation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aim_groups_filter_by_mask() {
        let groups = aim_collision_groups(StrafeLayerMask::from_layers([0, 2]));
        assert_eq!(groups.memberships, Group::ALL);
        assert_eq!(groups.filters, Group::GROUP_1 | Group::GROUP_3);
    }
}
