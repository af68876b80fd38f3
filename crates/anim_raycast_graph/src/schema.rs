use bevy_ecs::prelude::Resource;
use tracing::warn;

/// Where a node shows up in a node palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeCategory {
    /// Nodes producing values out of nothing: parameters, constants.
    Sources,
    /// Arithmetic on values.
    Math,
    /// Comparisons and branching.
    Logic,
    /// Everything else.
    Misc,
}

/// Static description of a node type.
///
/// The `version` is bumped whenever the serialized form of the node changes;
/// graphs saved by a newer version are refused on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeSchema {
    /// Stable name used in serialized graphs.
    pub type_name: &'static str,
    /// Serialization version.
    pub version: u32,
    /// Name shown in the palette.
    pub palette_name: &'static str,
    /// Palette section.
    pub category: NodeCategory,
    /// One line describing the node.
    pub description: &'static str,
}

/// The set of node types an application knows about.
#[derive(Resource, Debug, Default)]
pub struct NodeSchemaRegistry {
    schemas: Vec<&'static NodeSchema>,
}

impl NodeSchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node type.
    ///
    /// Registering a type name twice replaces the earlier schema.
    pub fn register(&mut self, schema: &'static NodeSchema) -> &mut Self {
        match self
            .schemas
            .iter_mut()
            .find(|existing| existing.type_name == schema.type_name)
        {
            Some(existing) => {
                if *existing != schema {
                    warn!("replacing the schema registered for node type {}", schema.type_name);
                }
                *existing = schema;
            }
            None => self.schemas.push(schema),
        }
        self
    }

    /// Looks up a node type by its serialized name.
    pub fn get(&self, type_name: &str) -> Option<&'static NodeSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.type_name == type_name)
            .copied()
    }

    /// Returns `true` if `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    /// Iterates over every registered node type, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static NodeSchema> + '_ {
        self.schemas.iter().copied()
    }

    /// The node types of one palette section, sorted by palette name.
    pub fn palette(&self, category: NodeCategory) -> Vec<&'static NodeSchema> {
        let mut schemas: Vec<_> = self
            .iter()
            .filter(|schema| schema.category == category)
            .collect();
        schemas.sort_by_key(|schema| schema.palette_name);
        schemas
    }
}
