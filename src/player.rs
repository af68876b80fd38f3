use std::sync::Arc;

use anim_raycast_graph::{AnimGraph, AnimGraphInstance, AnimGraphNodeIndex, AttributeValue};
use bevy_ecs::{prelude::*, reflect::ReflectComponent};
use bevy_reflect::{Reflect, std_traits::ReflectDefault};

/// Plays an [`AnimGraph`] on the entity it is attached to.
///
/// The graph itself can be shared between any number of players; each player
/// keeps its own [`AnimGraphInstance`].
#[derive(Component, Debug)]
pub struct AnimGraphPlayer {
    graph: Arc<AnimGraph>,
    instance: AnimGraphInstance,
}

impl AnimGraphPlayer {
    /// Creates a player for `graph`.
    pub fn new(graph: Arc<AnimGraph>) -> Self {
        Self {
            graph,
            instance: AnimGraphInstance::default(),
        }
    }

    /// The graph being played.
    pub fn graph(&self) -> &Arc<AnimGraph> {
        &self.graph
    }

    /// The per-entity state of the graph.
    pub fn instance(&self) -> &AnimGraphInstance {
        &self.instance
    }

    /// Mutable access to the per-entity state of the graph.
    pub fn instance_mut(&mut self) -> &mut AnimGraphInstance {
        &mut self.instance
    }

    /// Sets a graph parameter, builder style.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.instance.set_parameter(name, value);
        self
    }

    /// The value last written to output `port` of `node`.
    pub fn output(&self, node: AnimGraphNodeIndex, port: usize) -> Option<AttributeValue> {
        self.instance.output_value(node, port)
    }

    /// Evaluates the whole graph.
    pub fn evaluate(&mut self) {
        self.instance.evaluate(&self.graph);
    }
}

/// Marks an entity whose graphs only preview animation, for example inside
/// an editor viewport.
///
/// Graphs of preview entities never query the physics world.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
#[reflect(Component, Default, Debug)]
pub struct EditorPreview;

/// Evaluates every [`AnimGraphPlayer`].
pub fn evaluate_anim_graphs(mut players: Query<(Entity, &mut AnimGraphPlayer, Has<EditorPreview>)>) {
    for (entity, mut player, preview) in &mut players {
        let actor = player.instance.actor_mut();
        actor.set_entity(entity);
        actor.set_owned_by_runtime(!preview);
        player.evaluate();
    }
}
