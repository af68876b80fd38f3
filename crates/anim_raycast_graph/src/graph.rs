//! The animation graph, which wires node outputs into node inputs.

use core::fmt;

use petgraph::{
    Direction,
    algo::has_path_connecting,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use thiserror::Error;

use crate::{AnimGraphNode, AttributeType};

/// The index of a node in an [`AnimGraph`].
pub type AnimGraphNodeIndex = NodeIndex<u32>;

/// The `petgraph` data structure backing an [`AnimGraph`].
///
/// Edges point from the node producing a value to the node consuming it.
pub type AnimGraphDiGraph = DiGraph<Box<dyn AnimGraphNode>, Connection, u32>;

/// Which output of the source node feeds which input of the target node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Output port index on the source node.
    pub source_port: usize,
    /// Input port index on the target node.
    pub target_port: usize,
}

/// Errors raised while editing an [`AnimGraph`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimGraphError {
    /// The node index does not belong to the graph.
    #[error("node {0:?} does not exist")]
    InvalidNode(AnimGraphNodeIndex),
    /// The node has no input with this index.
    #[error("node {node:?} has no input port {port}")]
    InvalidInputPort {
        /// The node.
        node: AnimGraphNodeIndex,
        /// The missing port.
        port: usize,
    },
    /// The node has no output with this index.
    #[error("node {node:?} has no output port {port}")]
    InvalidOutputPort {
        /// The node.
        node: AnimGraphNodeIndex,
        /// The missing port.
        port: usize,
    },
    /// The output cannot feed the input.
    #[error("a {output:?} output cannot feed a {input:?} input")]
    TypeMismatch {
        /// Type of the output port.
        output: AttributeType,
        /// Type of the input port.
        input: AttributeType,
    },
    /// An input can only have one incoming connection.
    #[error("input port {port} of node {node:?} is already connected")]
    InputAlreadyConnected {
        /// The node.
        node: AnimGraphNodeIndex,
        /// The connected port.
        port: usize,
    },
    /// The connection would make a node depend on itself.
    #[error("connecting {from:?} to {to:?} would create a cycle")]
    Cycle {
        /// The node producing the value.
        from: AnimGraphNodeIndex,
        /// The node consuming the value.
        to: AnimGraphNodeIndex,
    },
}

/// A directed acyclic graph of [`AnimGraphNode`]s.
///
/// The graph only describes nodes and connections. Per-actor data lives in an
/// [`AnimGraphInstance`](crate::AnimGraphInstance), so one graph can drive any
/// number of actors.
///
/// ```
/// # use anim_raycast_graph::prelude::*;
/// # use bevy_math::Vec3;
/// let mut graph = AnimGraph::new();
/// let start = graph.add_node(ConstantNode::new(Vec3::new(0.0, 0.0, 2.0)));
/// let end = graph.add_node(ConstantNode::new(Vec3::new(0.0, 0.0, -2.0)));
/// let raycast = graph.add_node(RaycastNode::default());
/// graph.connect(start, 0, raycast, RaycastNode::INPUT_RAY_START).unwrap();
/// graph.connect(end, 0, raycast, RaycastNode::INPUT_RAY_END).unwrap();
/// ```
#[derive(Default)]
pub struct AnimGraph {
    graph: AnimGraphDiGraph,
}

impl AnimGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, node: impl AnimGraphNode) -> AnimGraphNodeIndex {
        self.add_boxed_node(Box::new(node))
    }

    /// Adds an already boxed node and returns its index.
    pub fn add_boxed_node(&mut self, node: Box<dyn AnimGraphNode>) -> AnimGraphNodeIndex {
        self.graph.add_node(node)
    }

    /// Feeds output `source_port` of `source` into input `target_port` of
    /// `target`.
    pub fn connect(
        &mut self,
        source: AnimGraphNodeIndex,
        source_port: usize,
        target: AnimGraphNodeIndex,
        target_port: usize,
    ) -> Result<(), AnimGraphError> {
        let source_node = self.get(source).ok_or(AnimGraphError::InvalidNode(source))?;
        let target_node = self.get(target).ok_or(AnimGraphError::InvalidNode(target))?;

        let output = source_node
            .output_ports()
            .get(source_port)
            .ok_or(AnimGraphError::InvalidOutputPort {
                node: source,
                port: source_port,
            })?;
        let input = target_node
            .input_ports()
            .get(target_port)
            .ok_or(AnimGraphError::InvalidInputPort {
                node: target,
                port: target_port,
            })?;

        if !input.value_type.accepts(output.value_type) {
            return Err(AnimGraphError::TypeMismatch {
                output: output.value_type,
                input: input.value_type,
            });
        }
        if self.input_source(target, target_port).is_some() {
            return Err(AnimGraphError::InputAlreadyConnected {
                node: target,
                port: target_port,
            });
        }
        if source == target || has_path_connecting(&self.graph, target, source, None) {
            return Err(AnimGraphError::Cycle {
                from: source,
                to: target,
            });
        }

        self.graph.add_edge(
            source,
            target,
            Connection {
                source_port,
                target_port,
            },
        );
        Ok(())
    }

    /// Removes the connection feeding input `target_port` of `target`.
    ///
    /// Returns `true` if there was one.
    pub fn disconnect(&mut self, target: AnimGraphNodeIndex, target_port: usize) -> bool {
        let edge = self
            .graph
            .edges_directed(target, Direction::Incoming)
            .find(|edge| edge.weight().target_port == target_port)
            .map(|edge| edge.id());
        edge.and_then(|edge| self.graph.remove_edge(edge))
            .is_some()
    }

    /// The node and output port feeding input `target_port` of `target`.
    pub fn input_source(
        &self,
        target: AnimGraphNodeIndex,
        target_port: usize,
    ) -> Option<(AnimGraphNodeIndex, usize)> {
        self.incoming(target)
            .find(|(_, connection)| connection.target_port == target_port)
            .map(|(source, connection)| (source, connection.source_port))
    }

    /// Every connection ending at `target`, with the node it starts from.
    pub fn incoming(
        &self,
        target: AnimGraphNodeIndex,
    ) -> impl Iterator<Item = (AnimGraphNodeIndex, Connection)> + '_ {
        self.graph
            .edges_directed(target, Direction::Incoming)
            .map(|edge| (edge.source(), *edge.weight()))
    }

    /// Returns the node at `index`, if any.
    pub fn get(&self, index: AnimGraphNodeIndex) -> Option<&dyn AnimGraphNode> {
        self.graph.node_weight(index).map(|node| &**node)
    }

    /// Iterates over the indices of every node.
    pub fn nodes(&self) -> impl Iterator<Item = AnimGraphNodeIndex> {
        self.graph.node_indices()
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of connections in the graph.
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl fmt::Debug for AnimGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<_> = self
            .graph
            .node_weights()
            .map(|node| node.schema().type_name)
            .collect();
        f.debug_struct("AnimGraph")
            .field("nodes", &nodes)
            .field("connections", &self.graph.edge_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{ConstantNode, ParameterNode, RaycastNode};
    use bevy_math::{Vec2, Vec3};

    #[test]
    fn connect_checks_ports() {
        let mut graph = AnimGraph::new();
        let constant = graph.add_node(ConstantNode::new(Vec3::ZERO));
        let raycast = graph.add_node(RaycastNode::default());

        assert_eq!(
            graph.connect(constant, 1, raycast, 0),
            Err(AnimGraphError::InvalidOutputPort {
                node: constant,
                port: 1
            })
        );
        assert_eq!(
            graph.connect(constant, 0, raycast, 2),
            Err(AnimGraphError::InvalidInputPort {
                node: raycast,
                port: 2
            })
        );
        assert_eq!(
            graph.connect(constant, 0, AnimGraphNodeIndex::new(7), 0),
            Err(AnimGraphError::InvalidNode(AnimGraphNodeIndex::new(7)))
        );
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn connect_checks_types() {
        let mut graph = AnimGraph::new();
        let float = graph.add_node(ConstantNode::new(1.0_f32));
        let flat = graph.add_node(ConstantNode::new(Vec2::ONE));
        let raycast = graph.add_node(RaycastNode::default());

        assert_eq!(
            graph.connect(float, 0, raycast, RaycastNode::INPUT_RAY_START),
            Err(AnimGraphError::TypeMismatch {
                output: AttributeType::Float,
                input: AttributeType::Vec3,
            })
        );
        assert!(graph
            .connect(flat, 0, raycast, RaycastNode::INPUT_RAY_START)
            .is_ok());
    }

    #[test]
    fn inputs_take_one_connection() {
        let mut graph = AnimGraph::new();
        let a = graph.add_node(ConstantNode::new(Vec3::ZERO));
        let b = graph.add_node(ConstantNode::new(Vec3::ONE));
        let raycast = graph.add_node(RaycastNode::default());

        graph.connect(a, 0, raycast, 0).unwrap();
        assert_eq!(
            graph.connect(b, 0, raycast, 0),
            Err(AnimGraphError::InputAlreadyConnected {
                node: raycast,
                port: 0
            })
        );
        assert_eq!(graph.input_source(raycast, 0), Some((a, 0)));

        assert!(graph.disconnect(raycast, 0));
        assert!(!graph.disconnect(raycast, 0));
        graph.connect(b, 0, raycast, 0).unwrap();
        assert_eq!(graph.input_source(raycast, 0), Some((b, 0)));
    }

    #[test]
    fn connect_rejects_cycles() {
        let mut graph = AnimGraph::new();
        let first = graph.add_node(RaycastNode::default());
        let second = graph.add_node(RaycastNode::default());

        graph
            .connect(first, RaycastNode::OUTPUT_POSITION, second, 0)
            .unwrap();
        assert_eq!(
            graph.connect(second, RaycastNode::OUTPUT_POSITION, first, 0),
            Err(AnimGraphError::Cycle {
                from: second,
                to: first
            })
        );
        assert_eq!(
            graph.connect(first, RaycastNode::OUTPUT_NORMAL, first, 1),
            Err(AnimGraphError::Cycle {
                from: first,
                to: first
            })
        );
    }

    #[test]
    fn debug_lists_node_types() {
        let mut graph = AnimGraph::new();
        graph.add_node(ParameterNode::new("target", AttributeType::Vec3));
        graph.add_node(RaycastNode::default());
        let debug = format!("{graph:?}");
        assert!(debug.contains("ParameterNode"));
        assert!(debug.contains("RaycastNode"));
    }
}
