use bevy_ecs::entity::Entity;

use crate::{RaycastRequest, RaycastResult};

/// Answers ray queries on behalf of an entity.
///
/// A provider is handed to the nodes that need it when they are built, which
/// keeps the physics backend swappable and lets tests substitute a fake one.
/// Returning `None` means nobody handled the query; callers treat that the
/// same as a miss.
///
/// Any `Fn(Entity, &RaycastRequest) -> Option<RaycastResult>` closure is a
/// provider:
///
/// ```
/// # use anim_raycast_physics::*;
/// # use bevy_ecs::entity::Entity;
/// # use bevy_math::Vec3;
/// let floor = |_: Entity, request: &RaycastRequest| {
///     let ground = Vec3::new(request.start.x, request.start.y, 0.0);
///     Some(RaycastResult::hit(ground, Vec3::Z))
/// };
/// let _: &dyn RaycastProvider = &floor;
/// ```
pub trait RaycastProvider: Send + Sync + 'static {
    /// Casts `request` into the world on behalf of `entity`.
    fn raycast(&self, entity: Entity, request: &RaycastRequest) -> Option<RaycastResult>;
}

impl<F> RaycastProvider for F
where
    F: Fn(Entity, &RaycastRequest) -> Option<RaycastResult> + Send + Sync + 'static,
{
    fn raycast(&self, entity: Entity, request: &RaycastRequest) -> Option<RaycastResult> {
        self(entity, request)
    }
}
