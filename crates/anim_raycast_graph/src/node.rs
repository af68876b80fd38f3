use std::collections::HashMap;

use bevy_math::Vec3;

use crate::{ActorInstance, AttributeType, AttributeValue, NodeSchema};

/// Declares one input or output of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Display name.
    pub name: &'static str,
    /// Identifier used by serialized connections. Stays the same when ports
    /// are reordered.
    pub id: u32,
    /// Type of the values carried by the port.
    pub value_type: AttributeType,
}

impl PortDescriptor {
    /// Creates a port descriptor.
    pub const fn new(name: &'static str, id: u32, value_type: AttributeType) -> Self {
        Self {
            name,
            id,
            value_type,
        }
    }
}

/// A node of an [`AnimGraph`](crate::AnimGraph).
///
/// Nodes are shared by every instance of a graph, so they hold no per-actor
/// state; everything they compute goes through the [`NodeContext`].
pub trait AnimGraphNode: Send + Sync + 'static {
    /// The static description of this node type.
    fn schema(&self) -> &'static NodeSchema;

    /// The inputs of this node, indexed by port index.
    fn input_ports(&self) -> &[PortDescriptor] {
        &[]
    }

    /// The outputs of this node, indexed by port index.
    fn output_ports(&self) -> &[PortDescriptor];

    /// Computes the outputs of this node.
    ///
    /// All upstream nodes have already been evaluated when this runs.
    fn output(&self, context: &mut NodeContext<'_>);
}

/// What a node sees of its graph instance while it is being evaluated.
pub struct NodeContext<'a> {
    pub(crate) inputs: &'a [Option<AttributeValue>],
    pub(crate) outputs: &'a mut [Option<AttributeValue>],
    pub(crate) has_error: &'a mut bool,
    pub(crate) actor: &'a ActorInstance,
    pub(crate) parameters: &'a HashMap<String, AttributeValue>,
}

impl<'a> NodeContext<'a> {
    /// The value arriving at input `port`, or `None` if the port is not
    /// connected or the upstream node produced nothing.
    pub fn input(&self, port: usize) -> Option<AttributeValue> {
        self.inputs.get(port).copied().flatten()
    }

    /// The value arriving at input `port` as a finite 3D vector.
    pub fn try_input_vec3(&self, port: usize) -> Option<Vec3> {
        self.input(port)?.as_vec3()
    }

    /// The value arriving at input `port` as a finite float.
    pub fn try_input_float(&self, port: usize) -> Option<f32> {
        self.input(port)?.as_float()
    }

    /// Writes output `port`. Writes to ports the node does not have are
    /// ignored.
    pub fn set_output(&mut self, port: usize, value: impl Into<AttributeValue>) {
        if let Some(slot) = self.outputs.get_mut(port) {
            *slot = Some(value.into());
        }
    }

    /// Marks output `port` as having no value.
    pub fn clear_output(&mut self, port: usize) {
        if let Some(slot) = self.outputs.get_mut(port) {
            *slot = None;
        }
    }

    /// Sets or clears the error flag of this node for the current instance.
    ///
    /// The flag keeps its value across evaluations until set again.
    pub fn set_has_error(&mut self, has_error: bool) {
        *self.has_error = has_error;
    }

    /// The current error flag of this node.
    pub fn has_error(&self) -> bool {
        *self.has_error
    }

    /// The actor being animated.
    pub fn actor(&self) -> &ActorInstance {
        self.actor
    }

    /// Reads a parameter of the graph instance.
    pub fn parameter(&self, name: &str) -> Option<AttributeValue> {
        self.parameters.get(name).copied()
    }
}
