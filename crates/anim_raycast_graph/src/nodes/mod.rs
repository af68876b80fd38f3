//! The built-in node types.

mod constant;
mod parameter;
mod raycast;

pub use constant::*;
pub use parameter::*;
pub use raycast::*;

use crate::NodeSchemaRegistry;

/// Registers every built-in node type.
pub fn register_builtin_nodes(registry: &mut NodeSchemaRegistry) {
    registry
        .register(&ConstantNode::SCHEMA)
        .register(&ParameterNode::SCHEMA)
        .register(&RaycastNode::SCHEMA);
}
