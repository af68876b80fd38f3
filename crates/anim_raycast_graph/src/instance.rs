use std::collections::HashMap;

use bevy_math::Vec3;
use tracing::trace;

use crate::{ActorInstance, AnimGraph, AnimGraphNodeIndex, AttributeValue, NodeContext};

#[derive(Debug, Default)]
struct NodeState {
    outputs: Vec<Option<AttributeValue>>,
    has_error: bool,
    evaluated: bool,
}

/// The per-actor state of an [`AnimGraph`].
///
/// Holds the last output of every node, the sticky error flags and the
/// parameters that [`ParameterNode`](crate::nodes::ParameterNode)s read. The
/// instance grows to match the graph on every evaluation, so nodes may be
/// added to a graph after instances were created.
#[derive(Debug, Default)]
pub struct AnimGraphInstance {
    actor: ActorInstance,
    parameters: HashMap<String, AttributeValue>,
    nodes: Vec<NodeState>,
}

impl AnimGraphInstance {
    /// Creates an instance animating `actor`.
    pub fn new(actor: ActorInstance) -> Self {
        Self {
            actor,
            parameters: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    /// The actor being animated.
    pub fn actor(&self) -> &ActorInstance {
        &self.actor
    }

    /// Mutable access to the actor being animated.
    pub fn actor_mut(&mut self) -> &mut ActorInstance {
        &mut self.actor
    }

    /// Sets a parameter, returning the previous value.
    pub fn set_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.parameters.insert(name.into(), value.into())
    }

    /// Reads a parameter.
    pub fn parameter(&self, name: &str) -> Option<AttributeValue> {
        self.parameters.get(name).copied()
    }

    /// Removes a parameter, returning its value.
    pub fn remove_parameter(&mut self, name: &str) -> Option<AttributeValue> {
        self.parameters.remove(name)
    }

    /// Evaluates every node of `graph` once.
    pub fn evaluate(&mut self, graph: &AnimGraph) {
        self.begin_pass(graph);
        for node in graph.nodes() {
            self.output(graph, node);
        }
    }

    /// Evaluates `node` and everything it depends on, once each.
    pub fn evaluate_node(&mut self, graph: &AnimGraph, node: AnimGraphNodeIndex) {
        self.begin_pass(graph);
        self.output(graph, node);
    }

    /// The value last written to output `port` of `node`.
    pub fn output_value(&self, node: AnimGraphNodeIndex, port: usize) -> Option<AttributeValue> {
        self.nodes
            .get(node.index())?
            .outputs
            .get(port)
            .copied()
            .flatten()
    }

    /// The value last written to output `port` of `node`, as a vector.
    pub fn output_vec3(&self, node: AnimGraphNodeIndex, port: usize) -> Option<Vec3> {
        self.output_value(node, port)?.as_vec3()
    }

    /// The value last written to output `port` of `node`, as a float.
    pub fn output_float(&self, node: AnimGraphNodeIndex, port: usize) -> Option<f32> {
        self.output_value(node, port)?.as_float()
    }

    /// Whether `node` reported an error the last time it was evaluated.
    pub fn has_error(&self, node: AnimGraphNodeIndex) -> bool {
        self.nodes
            .get(node.index())
            .is_some_and(|state| state.has_error)
    }

    /// Returns `true` if any node currently reports an error.
    pub fn has_any_error(&self) -> bool {
        self.nodes.iter().any(|state| state.has_error)
    }

    fn begin_pass(&mut self, graph: &AnimGraph) {
        self.nodes.resize_with(graph.node_count(), NodeState::default);
        for (index, state) in graph.nodes().zip(self.nodes.iter_mut()) {
            state.evaluated = false;
            if let Some(node) = graph.get(index) {
                state.outputs.resize(node.output_ports().len(), None);
            }
        }
    }

    fn output(&mut self, graph: &AnimGraph, index: AnimGraphNodeIndex) {
        let Some(node) = graph.get(index) else {
            return;
        };
        match self.nodes.get_mut(index.index()) {
            Some(state) if !state.evaluated => state.evaluated = true,
            _ => return,
        }

        let mut inputs = vec![None; node.input_ports().len()];
        for (source, connection) in graph.incoming(index) {
            self.output(graph, source);
            if let Some(slot) = inputs.get_mut(connection.target_port) {
                *slot = self.output_value(source, connection.source_port);
            }
        }

        trace!("evaluating {} node {:?}", node.schema().type_name, index);
        let state = &mut self.nodes[index.index()];
        state.outputs.fill(None);
        let mut context = NodeContext {
            inputs: inputs.as_slice(),
            outputs: state.outputs.as_mut_slice(),
            has_error: &mut state.has_error,
            actor: &self.actor,
            parameters: &self.parameters,
        };
        node.output(&mut context);
    }
}
