use std::time::Duration;

use bevy::input::mouse::MouseButtonInput;
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::window::{CursorLeft, CursorMoved};
use bevy_strafe::animation::parameter_names;
use bevy_strafe::prelude::*;
use bevy_strafe::{
    StrafeAimHit, StrafeAimProbe, StrafeAnimationParameters, StrafeGroundSensor, StrafeInputState,
    StrafeMotor, StrafePipelineSystems,
};

const FRAME_DURATION: f32 = 0.1;

/// What the physics engine would have reported, had there been one.
#[derive(Resource, Default)]
struct ScriptedScene {
    grounded: bool,
    aim_hit: Option<Vec3>,
}

fn scripted_sensors_system(
    scene: Res<ScriptedScene>,
    mut query: Query<(
        &mut StrafeGroundSensor,
        &mut StrafeAimProbe,
        Option<&StrafeToggle>,
    )>,
) {
    for (mut sensor, mut probe, strafe_toggle) in query.iter_mut() {
        if strafe_toggle == Some(&StrafeToggle::Disabled) {
            continue;
        }
        sensor.grounded = scene.grounded;
        probe.output = scene.aim_hit.map(|point| StrafeAimHit {
            entity: Entity::PLACEHOLDER,
            point,
            normal: Dir3::Y,
            distance: 10.0,
        });
    }
}

fn teleporting_motors_system(
    mut query: Query<(&StrafeMotor, &mut Transform, Option<&StrafeToggle>)>,
) {
    for (motor, mut transform, strafe_toggle) in query.iter_mut() {
        if !strafe_toggle.copied().unwrap_or_default().applies_motor() {
            continue;
        }
        transform.translation += motor.translation;
        if let Some(rotation) = motor.rotation {
            transform.rotation = rotation;
        }
    }
}

/// An app with a fixed frame duration and a fake physics backend.
///
/// Note that the first update always has a zero frame duration, so the controller only starts
/// ticking from the second update.
fn create_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        FRAME_DURATION,
    )));
    app.add_plugins(StrafeControllerPlugin::default());
    app.init_resource::<ScriptedScene>();
    app.add_systems(
        Update,
        scripted_sensors_system.in_set(StrafePipelineSystems::Sensors),
    );
    app.add_systems(
        Update,
        teleporting_motors_system.in_set(StrafePipelineSystems::Motors),
    );
    app
}

fn spawn_character(app: &mut App, bundle: impl Bundle) -> Entity {
    app.world_mut()
        .spawn((StrafeController::default(), bundle))
        .id()
}

fn send(app: &mut App, character: Entity, edge: StrafeActionEdge) {
    app.world_mut().send_event(StrafeInput { character, edge });
}

fn update_times(app: &mut App, times: usize) {
    for _ in 0..times {
        app.update();
    }
}

/// Install the keyboard and mouse source without Bevy's input plugin, which nothing here needs.
fn add_keyboard_and_mouse(app: &mut App, schedule: impl bevy::ecs::schedule::ScheduleLabel) {
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_event::<MouseButtonInput>();
    app.add_event::<CursorMoved>();
    app.add_event::<CursorLeft>();
    app.add_plugins(StrafeKeyboardMouseInputPlugin::new(schedule));
}

fn click(app: &mut App, button: MouseButton) {
    app.world_mut().send_event(MouseButtonInput {
        button,
        state: ButtonState::Pressed,
        window: Entity::PLACEHOLDER,
    });
}

fn get<'a, T: Component>(app: &'a App, entity: Entity) -> &'a T {
    app.world()
        .get::<T>(entity)
        .unwrap_or_else(|| panic!("{entity} has no {}", std::any::type_name::<T>()))
}

#[test]
fn every_fire_edge_is_a_separate_trigger() {
    let mut app = create_app();
    let character = spawn_character(&mut app, ());

    for _ in 0..3 {
        send(&mut app, character, StrafeActionEdge::FirePerformed);
    }
    app.update();
    assert_eq!(
        get::<StrafeAnimationParameters>(&app, character).pending_triggers(parameter_names::FIRE),
        3
    );

    send(&mut app, character, StrafeActionEdge::FirePerformed);
    app.update();
    let animation = get::<StrafeAnimationParameters>(&app, character);
    assert_eq!(animation.pending_triggers(parameter_names::FIRE), 4);
}

#[test]
fn edges_for_other_entities_are_ignored() {
    let mut app = create_app();
    let character = spawn_character(&mut app, ());
    let bystander = app.world_mut().spawn(Transform::default()).id();

    send(&mut app, bystander, StrafeActionEdge::RunPerformed);
    send(&mut app, Entity::PLACEHOLDER, StrafeActionEdge::FirePerformed);
    app.update();

    assert_eq!(
        get::<StrafeInputState>(&app, character),
        &StrafeInputState::default()
    );
}

#[test]
fn disabled_character_ignores_input_and_stays_put() {
    let mut app = create_app();
    let character = spawn_character(
        &mut app,
        (StrafeToggle::Disabled, Transform::from_xyz(1.0, 2.0, 3.0)),
    );

    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::Y));
    send(&mut app, character, StrafeActionEdge::RunPerformed);
    send(&mut app, character, StrafeActionEdge::FirePerformed);
    update_times(&mut app, 5);

    assert_eq!(
        get::<StrafeInputState>(&app, character),
        &StrafeInputState::default()
    );
    assert_eq!(
        get::<StrafeAnimationParameters>(&app, character).pending_triggers(parameter_names::FIRE),
        0
    );
    assert_eq!(get::<StrafeController>(&app, character).vertical_velocity(), 0.0);
    assert_eq!(
        get::<Transform>(&app, character).translation,
        Vec3::new(1.0, 2.0, 3.0)
    );
}

#[test]
fn disabling_cancels_and_reenabling_resumes() {
    let mut app = create_app();
    app.world_mut().resource_mut::<ScriptedScene>().grounded = true;
    let character = spawn_character(&mut app, ());

    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::Y));
    send(&mut app, character, StrafeActionEdge::RunPerformed);
    update_times(&mut app, 3);
    assert_eq!(
        get::<StrafeController>(&app, character).speed_mode(),
        StrafeSpeedMode::Run
    );

    app.world_mut()
        .entity_mut(character)
        .insert(StrafeToggle::Disabled);
    app.update();
    let input = get::<StrafeInputState>(&app, character);
    assert_eq!(input.move_axis, Vec2::ZERO);
    assert!(!input.is_running);
    let position_when_disabled = get::<Transform>(&app, character).translation;

    update_times(&mut app, 3);
    assert_eq!(
        get::<Transform>(&app, character).translation,
        position_when_disabled
    );

    app.world_mut()
        .entity_mut(character)
        .insert(StrafeToggle::Enabled);
    app.update();
    // The in-progress move was canceled, so the character does not resume it by itself.
    let position = get::<Transform>(&app, character).translation;
    assert_eq!(position.xz(), position_when_disabled.xz());

    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::X));
    app.update();
    assert_eq!(get::<StrafeInputState>(&app, character).move_axis, Vec2::X);
    let moved = get::<Transform>(&app, character).translation - position;
    assert!((moved.x - 5.0 * FRAME_DURATION).abs() < 1e-4, "{moved}");
    assert!(moved.z.abs() < 1e-6, "{moved}");
}

#[test]
fn sense_only_computes_but_does_not_move() {
    let mut app = create_app();
    let character = spawn_character(&mut app, StrafeToggle::SenseOnly);

    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::Y));
    update_times(&mut app, 3);

    assert_eq!(get::<StrafeInputState>(&app, character).move_axis, Vec2::Y);
    assert!(get::<StrafeMotor>(&app, character).translation.z < 0.0);
    assert_eq!(get::<Transform>(&app, character).translation, Vec3::ZERO);
}

#[test]
fn gravity_accumulates_while_airborne_and_is_clamped_when_grounded() {
    let mut app = create_app();
    let character = spawn_character(&mut app, ());

    // The first update does not tick the controller.
    update_times(&mut app, 4);
    let vertical_velocity = get::<StrafeController>(&app, character).vertical_velocity();
    assert!(
        (vertical_velocity - -9.81 * 3.0 * FRAME_DURATION).abs() < 1e-4,
        "{vertical_velocity}"
    );
    assert!(get::<Transform>(&app, character).translation.y < 0.0);

    app.world_mut().resource_mut::<ScriptedScene>().grounded = true;
    app.update();
    assert_eq!(
        get::<StrafeController>(&app, character).vertical_velocity(),
        -0.5
    );
}

#[test]
fn idle_gravity_policy() {
    let mut app = create_app();
    let falls_when_idle = spawn_character(&mut app, ());
    let floats_when_idle = spawn_character(
        &mut app,
        StrafeControllerConfig {
            apply_gravity_when_idle: false,
            ..Default::default()
        },
    );

    update_times(&mut app, 4);

    assert!(get::<Transform>(&app, falls_when_idle).translation.y < 0.0);
    assert_eq!(
        get::<Transform>(&app, floats_when_idle).translation,
        Vec3::ZERO
    );
    // The falling speed still accumulates, and will be applied once the character moves.
    assert!(get::<StrafeController>(&app, floats_when_idle).vertical_velocity() < -2.0);

    send(&mut app, floats_when_idle, StrafeActionEdge::MovePerformed(Vec2::Y));
    app.update();
    assert!(get::<Transform>(&app, floats_when_idle).translation.y < -1.0);
}

#[test]
fn holding_run_in_place_is_walking() {
    let mut app = create_app();
    app.world_mut().resource_mut::<ScriptedScene>().grounded = true;
    let character = spawn_character(&mut app, ());

    send(&mut app, character, StrafeActionEdge::RunPerformed);
    update_times(&mut app, 3);
    assert_eq!(
        get::<StrafeController>(&app, character).speed_mode(),
        StrafeSpeedMode::Walk
    );
    assert!(!get::<StrafeAnimationParameters>(&app, character).bool(parameter_names::IS_RUNNING));

    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::Y));
    app.update();
    assert_eq!(
        get::<StrafeController>(&app, character).speed_mode(),
        StrafeSpeedMode::Run
    );
    assert!(get::<StrafeAnimationParameters>(&app, character).bool(parameter_names::IS_RUNNING));
    let z = get::<Transform>(&app, character).translation.z;
    assert!((z - -10.0 * FRAME_DURATION).abs() < 1e-4, "{z}");
}

#[test]
fn walking_forward_drives_the_forward_animation_parameter() {
    let mut app = create_app();
    app.world_mut().resource_mut::<ScriptedScene>().grounded = true;
    let character = spawn_character(&mut app, ());

    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::Y));
    update_times(&mut app, 2);
    let first_tick_z = get::<StrafeAnimationParameters>(&app, character)
        .float(parameter_names::Z_VELOCITY);
    assert!(0.0 < first_tick_z && first_tick_z < 1.0, "{first_tick_z}");

    update_times(&mut app, 30);
    let animation = get::<StrafeAnimationParameters>(&app, character);
    let z_velocity = animation.float(parameter_names::Z_VELOCITY);
    let x_velocity = animation.float(parameter_names::X_VELOCITY);
    assert!((z_velocity - 1.0).abs() < 1e-2, "{z_velocity}");
    assert!(x_velocity.abs() < 1e-2, "{x_velocity}");
    assert!(get::<StrafeController>(&app, character).is_moving());
}

#[test]
fn aiming_turns_the_character_and_shows_the_indicator() {
    let mut app = create_app();
    app.world_mut().resource_mut::<ScriptedScene>().grounded = true;
    let indicator = app
        .world_mut()
        .spawn((Transform::default(), Visibility::Inherited))
        .id();
    let character = spawn_character(
        &mut app,
        (
            StrafeAimIndicator(indicator),
            StrafeControllerConfig {
                apply_gravity_when_idle: false,
                ..Default::default()
            },
        ),
    );

    app.update();
    assert_eq!(get::<Visibility>(&app, indicator), &Visibility::Hidden);

    let target = Vec3::new(1000.0, -1.0, 0.0);
    app.world_mut().resource_mut::<ScriptedScene>().aim_hit = Some(target);
    send(&mut app, character, StrafeActionEdge::AimPerformed(Vec2::new(100.0, 50.0)));
    app.update();
    assert_eq!(
        get::<StrafeController>(&app, character).aim_target(),
        Some(target)
    );
    assert_eq!(get::<Visibility>(&app, indicator), &Visibility::Visible);
    assert_eq!(get::<Transform>(&app, indicator).translation, target);

    update_times(&mut app, 30);
    let rotation = get::<Transform>(&app, character).rotation;
    let forward = rotation * Vec3::NEG_Z;
    assert!(forward.abs_diff_eq(Vec3::X, 1e-3), "{forward}");
    let up = rotation * Vec3::Y;
    assert!(up.abs_diff_eq(Vec3::Y, 1e-5), "{up}");

    // Walking toward -Z while facing +X is strafing to the left.
    send(&mut app, character, StrafeActionEdge::MovePerformed(Vec2::Y));
    update_times(&mut app, 30);
    let animation = get::<StrafeAnimationParameters>(&app, character);
    let z_velocity = animation.float(parameter_names::Z_VELOCITY);
    let x_velocity = animation.float(parameter_names::X_VELOCITY);
    assert!((x_velocity - -1.0).abs() < 2e-2, "{x_velocity}");
    assert!(z_velocity.abs() < 2e-2, "{z_velocity}");
}

#[test]
fn aim_miss_hides_the_indicator_and_keeps_the_rotation() {
    let mut app = create_app();
    app.world_mut().resource_mut::<ScriptedScene>().aim_hit = Some(Vec3::new(0.0, 0.0, 5.0));
    let indicator = app
        .world_mut()
        .spawn((Transform::default(), Visibility::Inherited))
        .id();
    let character = spawn_character(
        &mut app,
        (
            StrafeAimIndicator(indicator),
            StrafeControllerConfig {
                apply_gravity_when_idle: false,
                ..Default::default()
            },
        ),
    );
    update_times(&mut app, 3);
    assert_eq!(get::<Visibility>(&app, indicator), &Visibility::Visible);

    app.world_mut().resource_mut::<ScriptedScene>().aim_hit = None;
    send(&mut app, character, StrafeActionEdge::AimPerformed(Vec2::new(-10.0, -10.0)));
    app.update();
    let rotation_at_miss = get::<Transform>(&app, character).rotation;
    assert_eq!(get::<StrafeController>(&app, character).aim_target(), None);
    assert_eq!(get::<Visibility>(&app, indicator), &Visibility::Hidden);
    assert_eq!(get::<StrafeMotor>(&app, character).rotation, None);

    update_times(&mut app, 5);
    assert_eq!(get::<Transform>(&app, character).rotation, rotation_at_miss);
}

#[test]
fn aim_miss_without_pointer_movement_stops_the_turn_at_once() {
    let mut app = create_app();
    app.world_mut().resource_mut::<ScriptedScene>().aim_hit = Some(Vec3::new(5.0, 0.0, 0.0));
    let character = spawn_character(
        &mut app,
        StrafeControllerConfig {
            apply_gravity_when_idle: false,
            ..Default::default()
        },
    );
    send(&mut app, character, StrafeActionEdge::AimPerformed(Vec2::new(40.0, 30.0)));
    update_times(&mut app, 3);
    assert!(get::<StrafeMotor>(&app, character).rotation.is_some());
    let rotation_before_miss = get::<Transform>(&app, character).rotation;
    assert_ne!(rotation_before_miss, Quat::IDENTITY);

    // The camera moved away while the pointer stayed put, so there is no new aim edge.
    app.world_mut().resource_mut::<ScriptedScene>().aim_hit = None;
    app.update();
    assert_eq!(get::<StrafeController>(&app, character).aim_target(), None);
    assert_eq!(get::<StrafeMotor>(&app, character).rotation, None);
    assert_eq!(
        get::<Transform>(&app, character).rotation,
        rotation_before_miss
    );
}

#[test]
fn keyboard_and_mouse_drive_the_player() {
    let mut app = create_app();
    add_keyboard_and_mouse(&mut app, Update);

    let player = spawn_character(&mut app, StrafePlayer);
    let npc = spawn_character(&mut app, ());

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyW);
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::ShiftLeft);
    app.update();
    let input = get::<StrafeInputState>(&app, player);
    assert_eq!(input.move_axis, Vec2::Y);
    assert!(input.is_running);
    assert_eq!(
        get::<StrafeInputState>(&app, npc),
        &StrafeInputState::default()
    );

    app.world_mut().send_event(CursorMoved {
        window: Entity::PLACEHOLDER,
        position: Vec2::new(320.0, 240.0),
        delta: None,
    });
    click(&mut app, MouseButton::Left);
    click(&mut app, MouseButton::Right);
    app.update();
    let input = get::<StrafeInputState>(&app, player);
    assert_eq!(input.pointer, Some(Vec2::new(320.0, 240.0)));
    assert_eq!(
        get::<StrafeAnimationParameters>(&app, player).pending_triggers(parameter_names::FIRE),
        1
    );

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(KeyCode::KeyW);
    app.update();
    let input = get::<StrafeInputState>(&app, player);
    assert_eq!(input.move_axis, Vec2::ZERO);
    assert!(input.is_running);
    // The cursor stopped, but its last position is kept.
    assert_eq!(input.pointer, Some(Vec2::new(320.0, 240.0)));
    assert_eq!(
        get::<StrafeAnimationParameters>(&app, player).pending_triggers(parameter_names::FIRE),
        1
    );
}

#[test]
fn one_click_fires_once_when_the_fixed_schedule_runs_twice() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StrafeControllerPlugin::new(FixedUpdate));
    add_keyboard_and_mouse(&mut app, FixedUpdate);
    let player = spawn_character(&mut app, StrafePlayer);

    click(&mut app, MouseButton::Left);
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedUpdate);
    assert_eq!(
        get::<StrafeAnimationParameters>(&app, player).pending_triggers(parameter_names::FIRE),
        1
    );

    click(&mut app, MouseButton::Left);
    app.world_mut().run_schedule(FixedUpdate);
    assert_eq!(
        get::<StrafeAnimationParameters>(&app, player).pending_triggers(parameter_names::FIRE),
        2
    );
}

#[test]
fn reenabled_player_picks_up_the_keys_already_held() {
    let mut app = create_app();
    add_keyboard_and_mouse(&mut app, Update);
    let player = spawn_character(&mut app, StrafePlayer);

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::KeyW);
    app.update();
    assert_eq!(get::<StrafeInputState>(&app, player).move_axis, Vec2::Y);

    app.world_mut()
        .entity_mut(player)
        .insert(StrafeToggle::Disabled);
    app.update();
    assert_eq!(get::<StrafeInputState>(&app, player).move_axis, Vec2::ZERO);

    app.world_mut()
        .entity_mut(player)
        .insert(StrafeToggle::Enabled);
    app.update();
    assert_eq!(get::<StrafeInputState>(&app, player).move_axis, Vec2::Y);

    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(KeyCode::ShiftLeft);
    app.update();
    let latecomer = spawn_character(&mut app, StrafePlayer);
    app.update();
    let input = get::<StrafeInputState>(&app, latecomer);
    assert_eq!(input.move_axis, Vec2::Y);
    assert!(input.is_running);
}

#[test]
fn config_is_serializable() {
    #[cfg(feature = "serialize")]
    {
        let config = StrafeControllerConfig {
            walk_speed: 3.0,
            aim_layer_mask: StrafeLayerMask::from_layers([1, 4]),
            ..Default::default()
        };
        let serialized = ron::to_string(&config).expect("Unable to serialize the configuration");
        let deserialized: StrafeControllerConfig =
            ron::from_str(&serialized).expect("Unable to deserialize the configuration");
        assert_eq!(deserialized, config);

        let partial: StrafeControllerConfig =
            ron::from_str("(run_speed: 12.0)").expect("Missing fields should use the defaults");
        assert_eq!(partial.run_speed, 12.0);
        assert_eq!(partial.walk_speed, 5.0);
    }
}
