//! A flat list of colliders that answers ray queries.

use bevy_ecs::entity::Entity;
use bevy_math::{
    Dir3, Ray3d, Vec3,
    bounding::{Aabb3d, BoundingSphere, RayCast3d},
    primitives::InfinitePlane3d,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{BodyKind, RaycastProvider, RaycastRequest, RaycastResult};

/// The geometry of a [`Collider`], in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// A ball.
    Sphere {
        /// Center of the ball.
        center: Vec3,
        /// Radius of the ball.
        radius: f32,
    },
    /// An axis-aligned box.
    Cuboid {
        /// Center of the box.
        center: Vec3,
        /// Half of the box extent along each axis.
        half_size: Vec3,
    },
    /// An infinite plane, hit from either side.
    Plane {
        /// Any point on the plane.
        point: Vec3,
        /// The plane normal. Does not need to be normalized.
        normal: Vec3,
    },
}

/// A piece of collision geometry in a [`ColliderScene`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// The geometry.
    pub shape: ColliderShape,
    /// Whether the body moves.
    #[serde(default)]
    pub body: BodyKind,
    /// The entity this collider belongs to, if any.
    ///
    /// Rays cast on behalf of an entity never hit the colliders it owns.
    /// Entity ids are not stable across runs, so this is never serialized.
    #[serde(skip)]
    pub owner: Option<Entity>,
}

impl Collider {
    /// A static collider with no owner.
    pub fn fixed(shape: ColliderShape) -> Self {
        Self {
            shape,
            body: BodyKind::Static,
            owner: None,
        }
    }

    /// A dynamic collider with no owner.
    pub fn dynamic(shape: ColliderShape) -> Self {
        Self {
            shape,
            body: BodyKind::Dynamic,
            owner: None,
        }
    }

    /// Marks the collider as belonging to `owner`.
    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Returns the distance along the ray to this collider and the surface
    /// normal there, if the ray hits it.
    fn cast(&self, ray: Ray3d, max: f32) -> Option<(f32, Vec3)> {
        match self.shape {
            ColliderShape::Sphere { center, radius } => {
                let sphere = BoundingSphere::new(center, radius);
                let distance =
                    RayCast3d::new(ray.origin, ray.direction, max).sphere_intersection_at(&sphere)?;
                let normal = (ray.get_point(distance) - center)
                    .try_normalize()
                    .unwrap_or(-*ray.direction);
                Some((distance, normal))
            }
            ColliderShape::Cuboid { center, half_size } => {
                let aabb = Aabb3d::new(center, half_size.abs());
                let distance =
                    RayCast3d::new(ray.origin, ray.direction, max).aabb_intersection_at(&aabb)?;
                Some((distance, cuboid_normal(ray, distance, center, half_size)))
            }
            ColliderShape::Plane { point, normal } => {
                let normal = Dir3::new(normal).ok()?;
                let distance = ray.intersect_plane(point, InfinitePlane3d { normal })?;
                if distance > max {
                    return None;
                }
                // Report the side the ray came from.
                let normal = if normal.dot(*ray.direction) > 0.0 {
                    -*normal
                } else {
                    *normal
                };
                Some((distance, normal))
            }
        }
    }
}

/// The face normal of a box at the point where a ray enters it.
fn cuboid_normal(ray: Ray3d, distance: f32, center: Vec3, half_size: Vec3) -> Vec3 {
    if distance <= 0.0 {
        // Started inside the box.
        return -*ray.direction;
    }
    let local = (ray.get_point(distance) - center) / half_size.abs().max(Vec3::splat(f32::EPSILON));
    let magnitude = local.abs();
    if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
        Vec3::X * local.x.signum()
    } else if magnitude.y >= magnitude.z {
        Vec3::Y * local.y.signum()
    } else {
        Vec3::Z * local.z.signum()
    }
}

/// The closest intersection found by [`ColliderScene::cast`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderHit {
    /// Index of the collider that was hit.
    pub collider: usize,
    /// Distance from the ray start to the hit.
    pub distance: f32,
    /// Hit position in world space.
    pub position: Vec3,
    /// Surface normal at the hit.
    pub normal: Vec3,
}

/// An error while loading a [`ColliderScene`].
#[derive(Error, Debug)]
pub enum ColliderSceneLoadError {
    /// An I/O error occurred.
    #[error("I/O")]
    Io(#[from] std::io::Error),
    /// The RON was malformed; the location of the error is supplied.
    #[error("RON deserialization: {0}")]
    SpannedRon(#[from] ron::de::SpannedError),
}

/// A list of colliders that can be queried with rays.
///
/// This is the provider to reach for when there is no physics engine in the
/// app. It tests every collider against the ray, so it is meant for scenes
/// with a handful of shapes such as a ground plane and some steps.
///
/// Scenes can be written by hand in RON:
///
/// ```
/// # use anim_raycast_physics::ColliderScene;
/// let scene = ColliderScene::from_ron(
///     "(colliders: [(shape: Plane(point: (0.0, 0.0, 0.0), normal: (0.0, 0.0, 1.0)))])",
/// )
/// .unwrap();
/// assert_eq!(scene.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColliderScene {
    colliders: Vec<Collider>,
}

impl ColliderScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a scene from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ColliderSceneLoadError> {
        let scene: Self = ron::de::from_str(text)?;
        debug!("loaded collider scene with {} colliders", scene.colliders.len());
        Ok(scene)
    }

    /// Reads a scene from a RON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ColliderSceneLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Adds a collider and returns its index.
    pub fn add(&mut self, collider: Collider) -> usize {
        self.colliders.push(collider);
        self.colliders.len() - 1
    }

    /// Adds a collider, builder style.
    pub fn with(mut self, collider: Collider) -> Self {
        self.add(collider);
        self
    }

    /// Returns the collider at `index`.
    pub fn get(&self, index: usize) -> Option<&Collider> {
        self.colliders.get(index)
    }

    /// Number of colliders in the scene.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Returns `true` if the scene has no colliders.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Finds the closest collider hit by `request`.
    ///
    /// Colliders owned by `ignore` and bodies rejected by the request's
    /// [`QueryType`](crate::QueryType) are skipped. A request without length
    /// never hits anything.
    pub fn cast(&self, request: &RaycastRequest, ignore: Option<Entity>) -> Option<ColliderHit> {
        let Ok(direction) = Dir3::new(request.direction) else {
            trace!("skipping raycast without a direction");
            return None;
        };
        if request.distance.is_nan() || request.distance <= 0.0 {
            trace!("skipping raycast without length");
            return None;
        }
        let ray = Ray3d::new(request.start, direction);

        self.colliders
            .iter()
            .enumerate()
            .filter(|(_, collider)| request.query_type.accepts(collider.body))
            .filter(|(_, collider)| ignore.is_none() || collider.owner != ignore)
            .filter_map(|(index, collider)| {
                let (distance, normal) = collider.cast(ray, request.distance)?;
                Some(ColliderHit {
                    collider: index,
                    distance,
                    position: ray.get_point(distance),
                    normal,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl RaycastProvider for ColliderScene {
    fn raycast(&self, entity: Entity, request: &RaycastRequest) -> Option<RaycastResult> {
        let result = match self.cast(request, Some(entity)) {
            Some(hit) => RaycastResult::hit(hit.position, hit.normal),
            None => RaycastResult::miss(),
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryType;
    use bevy_ecs::world::World;

    const EPSILON: f32 = 0.001;

    fn ground() -> Collider {
        Collider::fixed(ColliderShape::Plane {
            point: Vec3::ZERO,
            normal: Vec3::Z,
        })
    }

    fn down_from(height: f32, length: f32) -> RaycastRequest {
        RaycastRequest::between(Vec3::new(1.0, 2.0, height), Vec3::new(1.0, 2.0, height - length))
    }

    #[test]
    fn ray_hits_ground_plane() {
        let scene = ColliderScene::new().with(ground());
        let hit = scene.cast(&down_from(5.0, 10.0), None).unwrap();
        assert_eq!(hit.collider, 0);
        assert!((hit.distance - 5.0).abs() < EPSILON);
        assert!(hit.position.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), EPSILON));
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn plane_normal_faces_the_ray() {
        let scene = ColliderScene::new().with(ground());
        let hit = scene.cast(&down_from(-5.0, -10.0), None).unwrap();
        assert_eq!(hit.normal, -Vec3::Z);
    }

    #[test]
    fn ray_too_short_misses() {
        let scene = ColliderScene::new().with(ground());
        assert!(scene.cast(&down_from(5.0, 4.0), None).is_none());
    }

    #[test]
    fn nearest_collider_wins() {
        let scene = ColliderScene::new().with(ground()).with(Collider::fixed(
            ColliderShape::Cuboid {
                center: Vec3::new(1.0, 2.0, 0.5),
                half_size: Vec3::splat(0.5),
            },
        ));
        let hit = scene.cast(&down_from(5.0, 10.0), None).unwrap();
        assert_eq!(hit.collider, 1);
        assert!((hit.distance - 4.0).abs() < EPSILON);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn sphere_hit_reports_radial_normal() {
        let scene = ColliderScene::new().with(Collider::fixed(ColliderShape::Sphere {
            center: Vec3::new(0.0, 0.0, 0.0),
            radius: 1.0,
        }));
        let request = RaycastRequest::between(Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0));
        let hit = scene.cast(&request, None).unwrap();
        assert!((hit.distance - 4.0).abs() < EPSILON);
        assert!(hit.normal.abs_diff_eq(-Vec3::X, EPSILON));
    }

    #[test]
    fn query_type_filters_dynamic_bodies() {
        let scene = ColliderScene::new().with(Collider::dynamic(ColliderShape::Sphere {
            center: Vec3::new(1.0, 2.0, 0.0),
            radius: 1.0,
        }));
        let request = down_from(5.0, 10.0);
        assert!(scene.cast(&request, None).is_none());
        let request = request.with_query_type(QueryType::StaticAndDynamic);
        assert!(scene.cast(&request, None).is_some());
        let request = request.with_query_type(QueryType::Dynamic);
        assert!(scene.cast(&request, None).is_some());
    }

    #[test]
    fn owned_colliders_are_ignored() {
        let mut world = World::new();
        let actor = world.spawn_empty().id();
        let other = world.spawn_empty().id();
        let scene = ColliderScene::new().with(ground().with_owner(actor));

        assert!(scene.cast(&down_from(5.0, 10.0), Some(actor)).is_none());
        assert!(scene.cast(&down_from(5.0, 10.0), Some(other)).is_some());
        assert!(scene.cast(&down_from(5.0, 10.0), None).is_some());
    }

    #[test]
    fn zero_length_ray_is_a_miss() {
        let scene = ColliderScene::new().with(ground());
        let request = RaycastRequest::between(Vec3::ZERO, Vec3::ZERO);
        assert!(scene.cast(&request, None).is_none());

        let result = scene.raycast(Entity::PLACEHOLDER, &request).unwrap();
        assert_eq!(result, RaycastResult::miss());
    }

    #[test]
    fn provider_answers_every_query() {
        let scene = ColliderScene::new().with(ground());
        let result = scene
            .raycast(Entity::PLACEHOLDER, &down_from(5.0, 10.0))
            .unwrap();
        assert!(result.intersected);
        assert_eq!(result.normal, Vec3::Z);
    }

    #[test]
    fn scene_loads_from_ron() {
        let scene = ColliderScene::from_ron(
            r#"(
                colliders: [
                    (shape: Plane(point: (0.0, 0.0, 0.0), normal: (0.0, 0.0, 2.0))),
                    (
                        shape: Sphere(center: (0.0, 0.0, 3.0), radius: 0.5),
                        body: Dynamic,
                    ),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(1).unwrap().body, BodyKind::Dynamic);
        assert_eq!(scene.get(0).unwrap().owner, None);

        assert!(ColliderScene::from_ron("(colliders: [(shape: Torus)])").is_err());
    }
}
