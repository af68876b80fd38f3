use bevy_math::Vec3;
use bevy_reflect::{Reflect, std_traits::ReflectDefault};

/// Which kinds of bodies a raycast is allowed to hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Debug, PartialEq, Hash, Default)]
pub enum QueryType {
    /// Only bodies that never move.
    Static,
    /// Only simulated or kinematic bodies.
    Dynamic,
    /// Every body in the scene.
    #[default]
    StaticAndDynamic,
}

impl QueryType {
    /// Returns `true` if a body of the given kind passes this filter.
    pub fn accepts(self, body: BodyKind) -> bool {
        match self {
            QueryType::Static => body == BodyKind::Static,
            QueryType::Dynamic => body == BodyKind::Dynamic,
            QueryType::StaticAndDynamic => true,
        }
    }
}

/// The kind of body a collider belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect, serde::Serialize, serde::Deserialize)]
#[reflect(Debug, PartialEq, Hash, Default)]
pub enum BodyKind {
    /// A body that never moves.
    #[default]
    Static,
    /// A body driven by simulation or animation.
    Dynamic,
}

/// A hint telling the provider what the query will be used for.
///
/// Providers may pick cheaper collision representations for some use cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Debug, PartialEq, Hash, Default)]
pub enum UsecaseHint {
    /// No particular use.
    #[default]
    Generic,
    /// Placing feet on the ground.
    FootPlanting,
}

/// A single ray query.
///
/// `direction` is either a unit vector or [`Vec3::ZERO`] when the ray has no
/// length; `distance` is never negative.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Debug, PartialEq)]
pub struct RaycastRequest {
    /// Where the ray starts, in world space.
    pub start: Vec3,
    /// Normalized direction of the ray.
    pub direction: Vec3,
    /// Maximum distance travelled along `direction`.
    pub distance: f32,
    /// Bodies the ray may hit.
    pub query_type: QueryType,
    /// What the query is for.
    pub hint: UsecaseHint,
}

impl RaycastRequest {
    /// Builds the request for a ray segment from `start` to `end`.
    ///
    /// The request only considers static geometry and uses the
    /// [`UsecaseHint::Generic`] hint. When both points coincide, the direction
    /// is left at zero rather than normalized.
    pub fn between(start: Vec3, end: Vec3) -> Self {
        let delta = end - start;
        // Divide by the largest component first so long rays cannot overflow.
        let scale = delta.abs().max_element();
        let (direction, distance) = if scale > 0.0 && scale.is_finite() {
            let scaled = delta / scale;
            let length = scaled.length();
            (scaled / length, scale * length)
        } else {
            (Vec3::ZERO, delta.length())
        };

        Self {
            start,
            direction,
            distance,
            query_type: QueryType::Static,
            hint: UsecaseHint::Generic,
        }
    }

    /// Returns a copy of this request with a different body filter.
    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    /// Returns a copy of this request with a different use case hint.
    pub fn with_hint(mut self, hint: UsecaseHint) -> Self {
        self.hint = hint;
        self
    }

    /// The point where the ray stops.
    pub fn end(&self) -> Vec3 {
        self.start + self.direction * self.distance
    }
}

/// The answer to a [`RaycastRequest`].
///
/// The default value is the "nothing was hit" result.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Debug, PartialEq, Default)]
pub struct RaycastResult {
    /// Whether anything was hit.
    pub intersected: bool,
    /// Hit position in world space. Meaningless without an intersection.
    pub position: Vec3,
    /// Surface normal at the hit position.
    pub normal: Vec3,
}

impl RaycastResult {
    /// A result describing a hit at `position` on a surface facing `normal`.
    pub fn hit(position: Vec3, normal: Vec3) -> Self {
        Self {
            intersected: true,
            position,
            normal,
        }
    }

    /// A result describing a ray that hit nothing.
    pub fn miss() -> Self {
        Self::default()
    }
}

impl Default for RaycastResult {
    fn default() -> Self {
        Self {
            intersected: false,
            position: Vec3::ZERO,
            normal: Vec3::Z,
        }
    }
}
