use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

use crate::aim::{
    hide_new_aim_indicators_system, horizontal_look_rotation, place_aim_indicator, turn_towards,
    update_aim_rays_system, StrafeAimIndicator,
};
use crate::animation::{parameter_names, project_onto_body, StrafeAnimationParameters};
use crate::input::{
    apply_input_edges_system, handle_toggle_transitions_system, StrafeInput, StrafeInputState,
};
use crate::movement::{StrafeMovementStep, StrafeSpeedMode};
use crate::{
    StrafeAimProbe, StrafeControllerConfig, StrafeGroundSensor, StrafeMotor,
    StrafePipelineSystems, StrafeSystems, StrafeToggle,
};

/// The main plugin for Strafe.
///
/// Must be used together with a physics backend plugin (e.g. `StrafeRapier3dPlugin` from
/// `bevy-strafe-rapier3d`), and both plugins must use the same schedule.
pub struct StrafeControllerPlugin {
    schedule: InternedScheduleLabel,
}

impl StrafeControllerPlugin {
    pub fn new(schedule: impl ScheduleLabel) -> Self {
        Self {
            schedule: schedule.intern(),
        }
    }
}

impl Default for StrafeControllerPlugin {
    fn default() -> Self {
        Self::new(Update)
    }
}

impl Plugin for StrafeControllerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StrafeInput>();
        app.configure_sets(
            self.schedule,
            (
                StrafePipelineSystems::Input,
                StrafePipelineSystems::Sensors,
                StrafePipelineSystems::Logic,
                StrafePipelineSystems::Motors,
            )
                .chain()
                .in_set(StrafeSystems),
        );
        app.add_systems(
            self.schedule,
            (
                handle_toggle_transitions_system,
                apply_input_edges_system,
                hide_new_aim_indicators_system,
                update_aim_rays_system,
            )
                .chain()
                .in_set(StrafePipelineSystems::Input),
        );
        app.add_systems(
            self.schedule,
            apply_controller_system.in_set(StrafePipelineSystems::Logic),
        );
    }
}

/// The main component used for interaction with the controls and animation code.
///
/// Add it to the character entity, together with the physics backend's collider. The input comes
/// from [`StrafeInput`] events, and the results are written to [`StrafeMotor`] (for the physics
/// backend) and [`StrafeAnimationParameters`] (for the user's animation systems).
///
/// The character is assumed to be a root entity - its `Transform` is its world position.
#[derive(Component, Default, Debug)]
#[require(
    StrafeControllerConfig,
    StrafeInputState,
    StrafeGroundSensor,
    StrafeAimProbe,
    StrafeMotor,
    StrafeAnimationParameters,
    Transform
)]
pub struct StrafeController {
    vertical_velocity: f32,
    aim_target: Option<Vec3>,
    speed_mode: StrafeSpeedMode,
    movement_intent: Vec3,
}

impl StrafeController {
    /// The falling speed. Negative is downward.
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// The world point the character aims at, if the pointer is over something aimable.
    pub fn aim_target(&self) -> Option<Vec3> {
        self.aim_target
    }

    /// The speed mode selected in the last tick.
    pub fn speed_mode(&self) -> StrafeSpeedMode {
        self.speed_mode
    }

    /// The horizontal direction of the input, with the vertical velocity as its `y`.
    pub fn movement_intent(&self) -> Vec3 {
        self.movement_intent
    }

    pub fn is_moving(&self) -> bool {
        0.0 < self.movement_intent.with_y(0.0).length_squared()
    }

    fn refresh_aim_target(
        &mut self,
        probe: &StrafeAimProbe,
        indicator: Option<&StrafeAimIndicator>,
        indicator_query: &mut Query<(&mut Transform, &mut Visibility), Without<StrafeController>>,
    ) {
        self.aim_target = probe.output.as_ref().map(|hit| hit.point);
        place_aim_indicator(self.aim_target, indicator, indicator_query);
    }
}

#[allow(clippy::type_complexity)]
fn apply_controller_system(
    time: Res<Time>,
    mut query: Query<(
        Entity,
        &mut StrafeController,
        &StrafeControllerConfig,
        &mut StrafeInputState,
        &StrafeGroundSensor,
        &StrafeAimProbe,
        &mut StrafeMotor,
        &mut StrafeAnimationParameters,
        &Transform,
        Option<&StrafeAimIndicator>,
        Option<&StrafeToggle>,
    )>,
    mut indicator_query: Query<(&mut Transform, &mut Visibility), Without<StrafeController>>,
) {
    let frame_duration = time.delta_secs();
    if frame_duration == 0.0 {
        return;
    }
    for (
        entity,
        mut controller,
        config,
        mut input,
        ground_sensor,
        aim_probe,
        mut motor,
        mut animation,
        transform,
        aim_indicator,
        strafe_toggle,
    ) in query.iter_mut()
    {
        match strafe_toggle.copied().unwrap_or_default() {
            StrafeToggle::Disabled => continue,
            StrafeToggle::SenseOnly => {}
            StrafeToggle::Enabled => {}
        }
        let controller = controller.as_mut();

        // The sensors already cast this tick's ray, so a miss must stop the turn right away,
        // with or without a new aim edge.
        if input.aim_refresh_requested {
            input.aim_refresh_requested = false;
        }
        controller.refresh_aim_target(aim_probe, aim_indicator, &mut indicator_query);

        let step = StrafeMovementStep::compute(
            config,
            input.move_axis,
            input.is_running,
            controller.vertical_velocity,
            ground_sensor.grounded,
            frame_duration,
        );
        if step.speed_mode != controller.speed_mode {
            debug!("{entity} switched to {:?}", step.speed_mode);
        }
        controller.vertical_velocity = step.vertical_velocity;
        controller.speed_mode = step.speed_mode;
        controller.movement_intent = step.intent;

        motor.translation = step.translation;
        motor.rotation = controller
            .aim_target
            .and_then(|target| horizontal_look_rotation(transform.translation, target))
            .map(|desired| {
                turn_towards(
                    transform.rotation,
                    desired,
                    config.rotation_speed,
                    frame_duration,
                )
            });

        let rotation = motor.rotation.unwrap_or(transform.rotation);
        let (x_velocity, z_velocity) = project_onto_body(step.horizontal_intent, rotation);
        animation.set_float_damped(
            parameter_names::X_VELOCITY,
            x_velocity,
            config.velocity_damp_time,
            frame_duration,
        );
        animation.set_float_damped(
            parameter_names::Z_VELOCITY,
            z_velocity,
            config.velocity_damp_time,
            frame_duration,
        );
        animation.set_bool(
            parameter_names::IS_RUNNING,
            step.speed_mode == StrafeSpeedMode::Run,
        );
    }
}
