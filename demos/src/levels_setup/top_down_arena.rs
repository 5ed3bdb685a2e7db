use bevy::prelude::*;

use super::{LevelLayers, LevelSetupHelper3d};

/// A walled arena with a ramp up to a platform and some crates.
///
/// The floor, the ramp and the platform are aimable. The walls and the crates are not, so the aim
/// goes through them to the ground behind.
pub fn setup_level(mut helper: LevelSetupHelper3d) {
    helper.with_color(Color::srgb(0.35, 0.45, 0.35)).spawn_cuboid(
        "Floor",
        Transform::from_xyz(0.0, -0.5, 0.0),
        Vec3::new(40.0, 1.0, 40.0),
        LevelLayers::GROUND,
    );

    let mut walls = helper.with_color(Color::srgb(0.4, 0.4, 0.45));
    for (name, transform, size) in [
        (
            "NorthWall",
            Transform::from_xyz(0.0, 1.0, -20.5),
            Vec3::new(42.0, 2.0, 1.0),
        ),
        (
            "SouthWall",
            Transform::from_xyz(0.0, 1.0, 20.5),
            Vec3::new(42.0, 2.0, 1.0),
        ),
        (
            "WestWall",
            Transform::from_xyz(-20.5, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 40.0),
        ),
        (
            "EastWall",
            Transform::from_xyz(20.5, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 40.0),
        ),
    ] {
        walls.spawn_cuboid(name, transform, size, LevelLayers::OBSTACLES);
    }

    let mut crates = helper.with_color(Color::srgb(0.6, 0.45, 0.25));
    for (index, position) in [
        Vec3::new(-6.0, 0.75, -4.0),
        Vec3::new(-7.5, 0.75, -4.5),
        Vec3::new(5.0, 0.75, 6.0),
        Vec3::new(-3.0, 0.75, 9.0),
        Vec3::new(9.0, 0.75, -9.0),
    ]
    .into_iter()
    .enumerate()
    {
        crates.spawn_cuboid(
            format!("Crate{index}"),
            Transform::from_translation(position)
                .with_rotation(Quat::from_rotation_y(0.4 * index as f32)),
            Vec3::splat(1.5),
            LevelLayers::OBSTACLES,
        );
    }

    let mut elevated = helper.with_color(Color::srgb(0.45, 0.5, 0.6));
    elevated.spawn_cuboid(
        "Ramp",
        Transform::from_xyz(8.0, 0.75, 0.0).with_rotation(Quat::from_rotation_z(0.25)),
        Vec3::new(8.0, 0.2, 4.0),
        LevelLayers::GROUND,
    );
    elevated.spawn_cuboid(
        "Platform",
        Transform::from_xyz(15.0, 0.9, 0.0),
        Vec3::new(6.0, 1.8, 8.0),
        LevelLayers::GROUND,
    );
}
