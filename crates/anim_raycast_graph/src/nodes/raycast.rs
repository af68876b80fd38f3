use std::sync::Arc;

use anim_raycast_physics::{RaycastProvider, RaycastRequest, RaycastResult};
use bevy_math::Vec3;
use tracing::trace;

use crate::{
    AnimGraphNode, AttributeType, NodeCategory, NodeContext, NodeSchema, PortDescriptor,
};

const INPUT_PORTS: [PortDescriptor; 2] = [
    PortDescriptor::new("Ray Start", 0, AttributeType::Vec3),
    PortDescriptor::new("Ray End", 1, AttributeType::Vec3),
];

const OUTPUT_PORTS: [PortDescriptor; 3] = [
    PortDescriptor::new("Position", 0, AttributeType::Vec3),
    PortDescriptor::new("Normal", 1, AttributeType::Vec3),
    PortDescriptor::new("Intersected", 2, AttributeType::Float),
];

/// Casts a ray between its two inputs and outputs what it hit.
///
/// Outputs:
/// - `Position`: the hit position, or the ray start on a miss.
/// - `Normal`: the surface normal, or [`Vec3::Z`] on a miss.
/// - `Intersected`: `1.0` on a hit, `0.0` otherwise.
///
/// When either input is missing or not a finite vector, the node flags
/// itself as errored and outputs the origin, [`Vec3::Z`] and `0.0` without
/// casting anything.
///
/// Only static geometry is queried. Actors that are not owned by the runtime,
/// such as editor previews, never cast rays and always see a miss, as do
/// nodes built without a provider.
#[derive(Clone, Default)]
pub struct RaycastNode {
    provider: Option<Arc<dyn RaycastProvider>>,
}

impl RaycastNode {
    /// Input port index of the ray start.
    pub const INPUT_RAY_START: usize = 0;
    /// Input port index of the ray end.
    pub const INPUT_RAY_END: usize = 1;
    /// Output port index of the hit position.
    pub const OUTPUT_POSITION: usize = 0;
    /// Output port index of the hit normal.
    pub const OUTPUT_NORMAL: usize = 1;
    /// Output port index of the hit flag.
    pub const OUTPUT_INTERSECTED: usize = 2;

    /// The schema of this node type.
    pub const SCHEMA: NodeSchema = NodeSchema {
        type_name: "RaycastNode",
        version: 1,
        palette_name: "Raycast",
        category: NodeCategory::Misc,
        description: "Raycast node attributes",
    };

    /// Creates a node casting rays through `provider`.
    pub fn new(provider: Option<Arc<dyn RaycastProvider>>) -> Self {
        Self { provider }
    }

    /// Creates a node casting rays through `provider`.
    pub fn with_provider(provider: impl RaycastProvider) -> Self {
        Self::new(Some(Arc::new(provider)))
    }

    /// Returns `true` if the node has somewhere to send its rays.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    fn write_outputs(context: &mut NodeContext<'_>, position: Vec3, normal: Vec3, intersected: f32) {
        context.set_output(Self::OUTPUT_POSITION, position);
        context.set_output(Self::OUTPUT_NORMAL, normal);
        context.set_output(Self::OUTPUT_INTERSECTED, intersected);
    }
}

impl AnimGraphNode for RaycastNode {
    fn schema(&self) -> &'static NodeSchema {
        &Self::SCHEMA
    }

    fn input_ports(&self) -> &[PortDescriptor] {
        &INPUT_PORTS
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        &OUTPUT_PORTS
    }

    fn output(&self, context: &mut NodeContext<'_>) {
        let (Some(start), Some(end)) = (
            context.try_input_vec3(Self::INPUT_RAY_START),
            context.try_input_vec3(Self::INPUT_RAY_END),
        ) else {
            context.set_has_error(true);
            Self::write_outputs(context, Vec3::ZERO, Vec3::Z, 0.0);
            return;
        };
        context.set_has_error(false);

        let request = RaycastRequest::between(start, end);

        let actor = *context.actor();
        let result = match &self.provider {
            Some(provider) if actor.is_owned_by_runtime() => {
                trace!(
                    "raycast for {:?} from {} along {} over {}",
                    actor.entity(),
                    request.start,
                    request.direction,
                    request.distance
                );
                provider
                    .raycast(actor.entity(), &request)
                    .unwrap_or_default()
            }
            _ => RaycastResult::default(),
        };

        if result.intersected {
            Self::write_outputs(context, result.position, result.normal, 1.0);
        } else {
            Self::write_outputs(context, start, Vec3::Z, 0.0);
        }
    }
}
