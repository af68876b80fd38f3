use tracing::trace;

use crate::{
    AnimGraphNode, AttributeType, NodeCategory, NodeContext, NodeSchema, PortDescriptor,
};

/// Outputs a named parameter of the graph instance.
///
/// Parameters are how gameplay code feeds values into a graph. A missing
/// parameter, or one whose type cannot be converted to the declared type,
/// leaves the output empty and flags the node as errored.
#[derive(Clone, Debug)]
pub struct ParameterNode {
    name: String,
    ports: [PortDescriptor; 1],
}

impl ParameterNode {
    /// The schema of this node type.
    pub const SCHEMA: NodeSchema = NodeSchema {
        type_name: "ParameterNode",
        version: 1,
        palette_name: "Parameter",
        category: NodeCategory::Sources,
        description: "Outputs a parameter of the graph instance",
    };

    /// Creates a node reading the parameter `name` as `value_type`.
    pub fn new(name: impl Into<String>, value_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            ports: [PortDescriptor::new("Value", 0, value_type)],
        }
    }

    /// The parameter this node reads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type of the output.
    pub fn value_type(&self) -> AttributeType {
        self.ports[0].value_type
    }
}

impl AnimGraphNode for ParameterNode {
    fn schema(&self) -> &'static NodeSchema {
        &Self::SCHEMA
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        &self.ports
    }

    fn output(&self, context: &mut NodeContext<'_>) {
        let value = context
            .parameter(&self.name)
            .and_then(|value| value.convert_to(self.value_type()));
        match value {
            Some(value) => {
                context.set_has_error(false);
                context.set_output(0, value);
            }
            None => {
                trace!("parameter {} is missing or has the wrong type", self.name);
                context.set_has_error(true);
                context.clear_output(0);
            }
        }
    }
}
