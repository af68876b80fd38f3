use bevy_ecs::entity::Entity;

/// The actor an [`AnimGraphInstance`](crate::AnimGraphInstance) animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorInstance {
    entity: Entity,
    owned_by_runtime: bool,
}

impl ActorInstance {
    /// A live actor belonging to `entity`.
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            owned_by_runtime: true,
        }
    }

    /// An actor that only exists to preview a graph, for example inside an
    /// editor. Nodes must not query the world on its behalf.
    pub fn preview(entity: Entity) -> Self {
        Self {
            entity,
            owned_by_runtime: false,
        }
    }

    /// The entity this actor belongs to.
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Moves the actor to another entity.
    pub fn set_entity(&mut self, entity: Entity) {
        self.entity = entity;
    }

    /// Returns `true` for live actors and `false` for preview actors.
    pub fn is_owned_by_runtime(&self) -> bool {
        self.owned_by_runtime
    }

    /// Switches the actor between live and preview.
    pub fn set_owned_by_runtime(&mut self, owned_by_runtime: bool) {
        self.owned_by_runtime = owned_by_runtime;
    }
}

impl Default for ActorInstance {
    fn default() -> Self {
        Self::new(Entity::PLACEHOLDER)
    }
}
