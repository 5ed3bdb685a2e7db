use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_strafe::prelude::*;
use bevy_strafe::StrafeAnimatingState;
use bevy_strafe_rapier3d::prelude::*;

use strafe_demos_crate::app_setup_options::{AppSetupConfiguration, ScheduleToUse};
use strafe_demos_crate::character_animating_systems::strafe_animating_systems::{
    animate_strafe_character, AnimationState, CharacterBody, CharacterMuzzle,
};
use strafe_demos_crate::level_mechanics::LevelMechanicsPlugin;
use strafe_demos_crate::levels_setup::{top_down_arena, LevelLayers};

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins);

    let app_setup_configuration = AppSetupConfiguration::from_environment();
    app.insert_resource(app_setup_configuration.clone());

    app.add_plugins(RapierDebugRenderPlugin::default());
    match app_setup_configuration.schedule_to_use {
        ScheduleToUse::Update => {
            app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
            // To use Strafe with bevy_rapier3d, you need the `StrafeRapier3dPlugin` plugin from
            // bevy-strafe-rapier3d.
            app.add_plugins(StrafeRapier3dPlugin::default());
        }
        ScheduleToUse::FixedUpdate => {
            app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule());
            app.add_plugins(StrafeRapier3dPlugin::new(FixedUpdate));
        }
    }

    // This is Strafe's main plugin.
    app.add_plugins(StrafeControllerPlugin::new(
        app_setup_configuration.schedule_to_use.label(),
    ));
    // This plugin turns WASD, Shift and the mouse into input for the `StrafePlayer` characters.
    app.add_plugins(StrafeKeyboardMouseInputPlugin::new(
        app_setup_configuration.schedule_to_use.label(),
    ));

    app.add_systems(Startup, setup_camera_and_lights);
    app.add_systems(Startup, top_down_arena::setup_level);
    app.add_systems(Startup, setup_player);
    app.add_systems(Update, toggle_controls);
    app.add_systems(Update, draw_aim_line);
    app.add_systems(Update, animate_strafe_character.after(StrafeSystems));
    app.add_plugins(LevelMechanicsPlugin);
    app.run();
}

fn setup_camera_and_lights(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 22.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
        // The mouse cursor is projected through this camera to find what the character aims at.
        StrafeAimCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: true,
            ..Default::default()
        },
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::new(0.3, 0.0, -0.2), Vec3::Y),
    ));

    commands.insert_resource(AmbientLight {
        brightness: 300.0,
        ..Default::default()
    });
}

fn setup_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    app_setup_configuration: Res<AppSetupConfiguration>,
) {
    // The indicator is positioned in world coordinates, so it must not be a child of the player.
    let indicator = commands
        .spawn((Name::new("AimIndicator"), Transform::default(), Visibility::Hidden))
        .with_child((
            Mesh3d(meshes.add(Torus::new(0.3, 0.4))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(1.0, 0.2, 0.2),
                unlit: true,
                ..Default::default()
            })),
            Transform::from_xyz(0.0, 0.05, 0.0),
        ))
        .id();

    let body = commands
        .spawn((
            Name::new("PlayerBody"),
            Mesh3d(meshes.add(Capsule3d::new(0.5, 1.0))),
            MeshMaterial3d(materials.add(Color::WHITE)),
            Transform::default(),
        ))
        .with_child((
            Name::new("Gun"),
            Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.8))),
            MeshMaterial3d(materials.add(Color::srgb(0.15, 0.15, 0.15))),
            // Forward is -Z.
            Transform::from_xyz(0.35, 0.2, -0.6),
        ))
        .id();

    let mut cmd = commands.spawn((Name::new("Player"), Transform::from_xyz(0.0, 2.0, 0.0)));
    cmd.insert(Visibility::default());
    cmd.add_child(body);

    // Strafe moves the character with Rapier's `KinematicCharacterController`. It gets added
    // automatically, but here it is inserted explicitly to tune it.
    cmd.insert((
        Collider::capsule_y(0.5, 0.5),
        KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            snap_to_ground: Some(CharacterLength::Absolute(0.3)),
            ..Default::default()
        },
        CollisionGroups::new(LevelLayers::CHARACTERS, Group::ALL),
    ));

    // This is Strafe's main component. It requires all the other components it needs.
    cmd.insert(StrafeController::default());
    cmd.insert(
        app_setup_configuration
            .controller_config(StrafeLayerMask::from_layers([LevelLayers::GROUND_INDEX])),
    );
    // Makes the keyboard and the mouse control this character.
    cmd.insert(StrafePlayer);
    cmd.insert(StrafeAimIndicator(indicator));

    cmd.insert((
        StrafeAnimatingState::<AnimationState>::default(),
        CharacterBody(body),
        CharacterMuzzle(Vec3::new(0.35, 0.2, -1.0)),
    ));
}

fn toggle_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(Entity, Option<&mut StrafeToggle>), With<StrafePlayer>>,
    mut commands: Commands,
) {
    if !keyboard.just_pressed(KeyCode::Tab) {
        return;
    }
    for (entity, strafe_toggle) in query.iter_mut() {
        match strafe_toggle {
            Some(mut strafe_toggle) => {
                *strafe_toggle = match *strafe_toggle {
                    StrafeToggle::Enabled => StrafeToggle::Disabled,
                    StrafeToggle::Disabled | StrafeToggle::SenseOnly => StrafeToggle::Enabled,
                };
            }
            None => {
                commands.entity(entity).insert(StrafeToggle::Disabled);
            }
        }
    }
}

fn draw_aim_line(query: Query<(&StrafeController, &GlobalTransform)>, mut gizmos: Gizmos) {
    for (controller, global_transform) in query.iter() {
        if let Some(aim_target) = controller.aim_target() {
            gizmos.line(
                global_transform.translation(),
                aim_target,
                Color::srgba(1.0, 0.3, 0.3, 0.5),
            );
        }
    }
}
