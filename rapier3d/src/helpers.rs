use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// The parts of a Rapier context needed for scene queries. Fetched with a `Query` so that it can
/// be picked by the character's [`RapierContextEntityLink`].
pub(crate) type RapierQueryContext<'a> = (
    &'a RapierContextSimulation,
    &'a RapierContextColliders,
    &'a RapierRigidBodySet,
);

// TODO: After https://github.com/dimforge/bevy_rapier/issues/677 is fixed, query through
// `RapierContext` directly and remove this.
/// Nearest hit of the ray, as `(collider entity, intersection)`.
pub(crate) fn cast_ray(
    (simulation, colliders, rigidbody_set): RapierQueryContext<'_>,
    filter: QueryFilter<'_>,
    ray: Ray3d,
    max_distance: f32,
) -> Option<(Entity, RayIntersection)> {
    RapierQueryPipeline::new_scoped(
        &simulation.broad_phase,
        colliders,
        rigidbody_set,
        &filter,
        &bevy_rapier3d::parry::query::DefaultQueryDispatcher,
        |query_pipeline| {
            query_pipeline.cast_ray_and_get_normal(ray.origin, *ray.direction, max_distance, true)
        },
    )
}
