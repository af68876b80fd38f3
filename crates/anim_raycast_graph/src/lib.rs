#![doc = "An animation graph whose nodes are pulled once per evaluation pass."]
//!
//! An [`AnimGraph`] holds the shared node definitions and connections, while
//! an [`AnimGraphInstance`] holds everything that is specific to one actor:
//! its output values, error flags and parameters. Evaluating a node first
//! evaluates every node feeding its inputs.
//!
//! The [`RaycastNode`] casts a ray between its two vector inputs through an
//! injected [`RaycastProvider`](anim_raycast_physics::RaycastProvider) and
//! exposes the hit position, normal and a hit flag.

mod actor;
mod attribute;
mod graph;
mod instance;
mod node;
pub mod nodes;
mod schema;
mod serialized;

pub use actor::*;
pub use attribute::*;
pub use graph::*;
pub use instance::*;
pub use node::*;
pub use schema::*;
pub use serialized::*;

/// The animation graph prelude.
///
/// This includes the most common types in this crate, re-exported for your convenience.
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        ActorInstance, AnimGraph, AnimGraphInstance, AnimGraphNode, AnimGraphNodeIndex,
        AttributeType, AttributeValue, NodeCategory, NodeContext, NodeSchema,
        NodeSchemaRegistry, NodeServices,
        nodes::{ConstantNode, ParameterNode, RaycastNode},
    };
}
