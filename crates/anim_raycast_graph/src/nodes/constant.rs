use crate::{AnimGraphNode, AttributeValue, NodeCategory, NodeContext, NodeSchema, PortDescriptor};

/// Outputs the same value on every evaluation.
#[derive(Clone, Debug)]
pub struct ConstantNode {
    value: AttributeValue,
    ports: [PortDescriptor; 1],
}

impl ConstantNode {
    /// The schema of this node type.
    pub const SCHEMA: NodeSchema = NodeSchema {
        type_name: "ConstantNode",
        version: 1,
        palette_name: "Constant",
        category: NodeCategory::Sources,
        description: "Outputs a fixed value",
    };

    /// Creates a node outputting `value`.
    pub fn new(value: impl Into<AttributeValue>) -> Self {
        let value = value.into();
        Self {
            value,
            ports: [PortDescriptor::new("Value", 0, value.value_type())],
        }
    }

    /// The value this node outputs.
    pub fn value(&self) -> AttributeValue {
        self.value
    }
}

impl AnimGraphNode for ConstantNode {
    fn schema(&self) -> &'static NodeSchema {
        &Self::SCHEMA
    }

    fn output_ports(&self) -> &[PortDescriptor] {
        &self.ports
    }

    fn output(&self, context: &mut NodeContext<'_>) {
        context.set_output(0, self.value);
    }
}
