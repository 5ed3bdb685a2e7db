use bevy::{
    ecs::system::{EntityCommands, SystemParam},
    prelude::*,
};
use bevy_rapier3d::prelude as rapier;

#[derive(SystemParam, Deref, DerefMut)]
pub struct LevelSetupHelper3d<'w, 's> {
    #[deref]
    pub commands: Commands<'w, 's>,
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
}

impl<'w, 's> LevelSetupHelper3d<'w, 's> {
    pub fn spawn_named(&'_ mut self, name: impl ToString) -> EntityCommands<'_> {
        self.commands.spawn(Name::new(name.to_string()))
    }

    pub fn with_material<'a>(
        &'a mut self,
        material: impl Into<StandardMaterial>,
    ) -> LevelSetupHelper3dWithMaterial<'a, 'w, 's> {
        let material = self.materials.add(material);
        LevelSetupHelper3dWithMaterial {
            parent: self,
            material,
        }
    }

    pub fn with_color<'a>(
        &'a mut self,
        color: impl Into<Color>,
    ) -> LevelSetupHelper3dWithMaterial<'a, 'w, 's> {
        self.with_material(color.into())
    }
}

pub struct LevelSetupHelper3dWithMaterial<'a, 'w, 's> {
    parent: &'a mut LevelSetupHelper3d<'w, 's>,
    material: Handle<StandardMaterial>,
}

impl LevelSetupHelper3dWithMaterial<'_, '_, '_> {
    pub fn spawn_mesh_without_physics(
        &'_ mut self,
        name: impl ToString,
        transform: Transform,
        mesh: impl Into<Mesh>,
    ) -> EntityCommands<'_> {
        let mesh = self.parent.meshes.add(mesh);
        let mut cmd = self.parent.spawn_named(name);
        cmd.insert((
            Mesh3d(mesh),
            MeshMaterial3d(self.material.clone()),
            transform,
        ));
        cmd
    }

    /// A static box, member of the given collision layers.
    pub fn spawn_cuboid(
        &'_ mut self,
        name: impl ToString,
        transform: Transform,
        size: Vec3,
        memberships: rapier::Group,
    ) -> EntityCommands<'_> {
        let mut cmd = self.spawn_mesh_without_physics(name, transform, Cuboid::from_size(size));
        cmd.insert((
            rapier::Collider::cuboid(0.5 * size.x, 0.5 * size.y, 0.5 * size.z),
            rapier::CollisionGroups::new(memberships, rapier::Group::ALL),
        ));
        cmd
    }
}
