use std::sync::Arc;

use anim_raycast_graph::{
    AttributeType, AttributeValue, NodeSchemaRegistry, NodeServices, nodes::register_builtin_nodes,
};
use anim_raycast_physics::{
    BodyKind, QueryType, RaycastProvider, RaycastRequest, RaycastResult, UsecaseHint,
};
use bevy_app::{App, Plugin, Update};
use bevy_ecs::prelude::*;

use crate::{EditorPreview, evaluate_anim_graphs};

/// A [`SystemSet`] containing the animation graph systems.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimGraphSystems;

/// Adds animation graph evaluation to an App.
///
/// The plugin registers the built-in node schemas in a [`NodeSchemaRegistry`]
/// resource and inserts the [`NodeServices`] graphs should be built with. The
/// raycast provider is optional: without one, raycast nodes report misses.
#[derive(Clone, Default)]
pub struct AnimRaycastPlugin {
    /// Where raycast nodes send their rays.
    pub raycast_provider: Option<Arc<dyn RaycastProvider>>,
}

impl AnimRaycastPlugin {
    /// Uses `provider` to answer raycasts.
    pub fn with_raycast_provider(mut self, provider: impl RaycastProvider) -> Self {
        self.raycast_provider = Some(Arc::new(provider));
        self
    }
}

impl Plugin for AnimRaycastPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<QueryType>()
            .register_type::<UsecaseHint>()
            .register_type::<BodyKind>()
            .register_type::<RaycastRequest>()
            .register_type::<RaycastResult>()
            .register_type::<AttributeType>()
            .register_type::<AttributeValue>()
            .register_type::<EditorPreview>();

        let mut schemas = app
            .world_mut()
            .remove_resource::<NodeSchemaRegistry>()
            .unwrap_or_default();
        register_builtin_nodes(&mut schemas);

        app.insert_resource(schemas)
            .insert_resource(NodeServices {
                raycast_provider: self.raycast_provider.clone(),
            })
            .add_systems(Update, evaluate_anim_graphs.in_set(AnimGraphSystems));
    }
}
