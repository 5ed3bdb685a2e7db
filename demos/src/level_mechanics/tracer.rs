use bevy::prelude::*;

pub struct TracerPlugin;

impl Plugin for TracerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, create_tracer_assets);
        app.add_systems(Update, move_tracers);
    }
}

/// A visual-only shot. Flies in a straight line, through everything, until its time is up.
#[derive(Component)]
pub struct Tracer {
    pub velocity: Vec3,
    lifetime: Timer,
}

impl Tracer {
    pub fn new(velocity: Vec3, lifetime: f32) -> Self {
        Self {
            velocity,
            lifetime: Timer::from_seconds(lifetime, TimerMode::Once),
        }
    }
}

#[derive(Resource)]
pub struct TracerAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

impl TracerAssets {
    pub fn spawn(&self, commands: &mut Commands, origin: Vec3, direction: Dir3, speed: f32) {
        commands.spawn((
            Name::new("Tracer"),
            Tracer::new(direction * speed, 0.6),
            Mesh3d(self.mesh.clone()),
            MeshMaterial3d(self.material.clone()),
            Transform::from_translation(origin).looking_to(direction, Vec3::Y),
        ));
    }
}

fn create_tracer_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(TracerAssets {
        mesh: meshes.add(Cuboid::new(0.06, 0.06, 0.6)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.9, 0.3),
            emissive: LinearRgba::rgb(4.0, 3.0, 0.5),
            unlit: true,
            ..Default::default()
        }),
    });
}

fn move_tracers(
    time: Res<Time>,
    mut query: Query<(Entity, &mut Tracer, &mut Transform)>,
    mut commands: Commands,
) {
    for (entity, mut tracer, mut transform) in query.iter_mut() {
        if tracer.lifetime.tick(time.delta()).finished() {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += tracer.velocity * time.delta_secs();
    }
}
