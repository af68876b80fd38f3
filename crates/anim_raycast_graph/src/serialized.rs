//! Loading animation graphs from RON.

use std::{io, path::Path, sync::Arc};

use anim_raycast_physics::RaycastProvider;
use bevy_ecs::prelude::Resource;
use ron::de::SpannedError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    AnimGraph, AnimGraphError, AnimGraphNode, AnimGraphNodeIndex, AttributeType, AttributeValue,
    NodeSchema, PortDescriptor,
    nodes::{ConstantNode, ParameterNode, RaycastNode},
};

/// External services handed to nodes when a graph is built.
#[derive(Resource, Clone, Default)]
pub struct NodeServices {
    /// Where [`RaycastNode`]s send their rays.
    pub raycast_provider: Option<Arc<dyn RaycastProvider>>,
}

impl NodeServices {
    /// Services with the given raycast provider.
    pub fn with_raycast_provider(provider: Arc<dyn RaycastProvider>) -> Self {
        Self {
            raycast_provider: Some(provider),
        }
    }
}

/// Errors that can occur when loading an [`AnimGraph`] from RON.
#[derive(Error, Debug)]
pub enum AnimGraphLoadError {
    /// An I/O error occurred.
    #[error("I/O")]
    Io(#[from] io::Error),
    /// An error occurred in RON deserialization, and the location of the error
    /// is supplied.
    #[error("RON deserialization: {0}")]
    SpannedRon(#[from] SpannedError),
    /// The graph was saved by a newer version of a node type.
    #[error("{type_name} version {found} is newer than the supported version {supported}")]
    UnsupportedVersion {
        /// The node type.
        type_name: &'static str,
        /// Version found in the file.
        found: u32,
        /// Newest version this build understands.
        supported: u32,
    },
    /// A connection refers to a node that is not in the file.
    #[error("connection refers to unknown node {0}")]
    UnknownNode(u32),
    /// A connection refers to a port id the node does not have.
    #[error("node {node} has no port with id {port_id}")]
    UnknownPort {
        /// Position of the node in the file.
        node: u32,
        /// The missing port id.
        port_id: u32,
    },
    /// The connections do not form a valid graph.
    #[error(transparent)]
    Graph(#[from] AnimGraphError),
}

/// A version of [`AnimGraph`] suitable for serializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedAnimGraph {
    /// The nodes, in index order.
    pub nodes: Vec<SerializedAnimGraphNode>,
    /// The connections between nodes.
    #[serde(default)]
    pub connections: Vec<SerializedConnection>,
}

/// A node of a [`SerializedAnimGraph`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedAnimGraphNode {
    /// The schema version the node was saved with.
    #[serde(default = "first_version")]
    pub version: u32,
    /// The node type and its settings.
    pub kind: SerializedNodeKind,
}

fn first_version() -> u32 {
    1
}

/// The built-in node types with their settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SerializedNodeKind {
    /// A [`ConstantNode`].
    Constant {
        /// The value it outputs.
        value: AttributeValue,
    },
    /// A [`ParameterNode`].
    Parameter {
        /// The parameter it reads.
        name: String,
        /// The type it outputs.
        value_type: AttributeType,
    },
    /// A [`RaycastNode`].
    Raycast,
}

impl SerializedNodeKind {
    fn schema(&self) -> &'static NodeSchema {
        match self {
            SerializedNodeKind::Constant { .. } => &ConstantNode::SCHEMA,
            SerializedNodeKind::Parameter { .. } => &ParameterNode::SCHEMA,
            SerializedNodeKind::Raycast => &RaycastNode::SCHEMA,
        }
    }

    fn build(&self, services: &NodeServices) -> Box<dyn AnimGraphNode> {
        match self {
            SerializedNodeKind::Constant { value } => Box::new(ConstantNode::new(*value)),
            SerializedNodeKind::Parameter { name, value_type } => {
                Box::new(ParameterNode::new(name.clone(), *value_type))
            }
            SerializedNodeKind::Raycast => {
                Box::new(RaycastNode::new(services.raycast_provider.clone()))
            }
        }
    }
}

/// A connection of a [`SerializedAnimGraph`].
///
/// Nodes are referred to by position in the node list and ports by their
/// stable [`PortDescriptor::id`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedConnection {
    /// The node producing the value.
    pub source: u32,
    /// Id of the output port.
    pub source_port: u32,
    /// The node consuming the value.
    pub target: u32,
    /// Id of the input port.
    pub target_port: u32,
}

fn port_index(ports: &[PortDescriptor], node: u32, port_id: u32) -> Result<usize, AnimGraphLoadError> {
    ports
        .iter()
        .position(|port| port.id == port_id)
        .ok_or(AnimGraphLoadError::UnknownPort { node, port_id })
}

impl AnimGraph {
    /// Builds a graph from its serialized form, handing `services` to the
    /// nodes that need them.
    pub fn from_serialized(
        serialized: &SerializedAnimGraph,
        services: &NodeServices,
    ) -> Result<Self, AnimGraphLoadError> {
        let mut graph = AnimGraph::new();
        for node in &serialized.nodes {
            let schema = node.kind.schema();
            if node.version > schema.version {
                return Err(AnimGraphLoadError::UnsupportedVersion {
                    type_name: schema.type_name,
                    found: node.version,
                    supported: schema.version,
                });
            }
            graph.add_boxed_node(node.kind.build(services));
        }

        for connection in &serialized.connections {
            let source = AnimGraphNodeIndex::new(connection.source as usize);
            let target = AnimGraphNodeIndex::new(connection.target as usize);
            let source_node = graph
                .get(source)
                .ok_or(AnimGraphLoadError::UnknownNode(connection.source))?;
            let target_node = graph
                .get(target)
                .ok_or(AnimGraphLoadError::UnknownNode(connection.target))?;
            let source_port = port_index(
                source_node.output_ports(),
                connection.source,
                connection.source_port,
            )?;
            let target_port = port_index(
                target_node.input_ports(),
                connection.target,
                connection.target_port,
            )?;
            graph.connect(source, source_port, target, target_port)?;
        }

        debug!(
            "built animation graph with {} nodes and {} connections",
            graph.node_count(),
            graph.connection_count()
        );
        Ok(graph)
    }

    /// Parses a graph from RON text.
    ///
    /// Canonically, such files have an `.animgraph.ron` extension.
    pub fn from_ron(text: &str, services: &NodeServices) -> Result<Self, AnimGraphLoadError> {
        let serialized: SerializedAnimGraph = ron::de::from_str(text)?;
        Self::from_serialized(&serialized, services)
    }

    /// Reads a graph from a RON file.
    pub fn load(
        path: impl AsRef<Path>,
        services: &NodeServices,
    ) -> Result<Self, AnimGraphLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text, services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActorInstance, AnimGraphInstance};
    use anim_raycast_physics::{Collider, ColliderScene, ColliderShape};
    use bevy_math::Vec3;

    const FOOT_PROBE: &str = r#"(
        nodes: [
            (kind: Parameter(name: "foot", value_type: Vec3)),
            (kind: Constant(value: Vec3((0.0, 0.0, -2.0)))),
            (version: 1, kind: Raycast),
        ],
        connections: [
            (source: 0, source_port: 0, target: 2, target_port: 0),
            (source: 1, source_port: 0, target: 2, target_port: 1),
        ],
    )"#;

    fn ground() -> NodeServices {
        let scene = ColliderScene::new().with(Collider::fixed(ColliderShape::Plane {
            point: Vec3::ZERO,
            normal: Vec3::Z,
        }));
        NodeServices::with_raycast_provider(Arc::new(scene))
    }

    #[test]
    fn loads_and_evaluates_graph() {
        let graph = AnimGraph::from_ron(FOOT_PROBE, &ground()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.connection_count(), 2);

        let raycast = AnimGraphNodeIndex::new(2);
        let mut instance = AnimGraphInstance::new(ActorInstance::default());
        instance.set_parameter("foot", Vec3::new(1.0, 1.0, 2.0));
        instance.evaluate(&graph);

        assert!(!instance.has_error(raycast));
        let position = instance
            .output_vec3(raycast, RaycastNode::OUTPUT_POSITION)
            .unwrap();
        assert!(position.abs_diff_eq(Vec3::new(0.5, 0.5, 0.0), 0.001));
        assert_eq!(
            instance.output_float(raycast, RaycastNode::OUTPUT_INTERSECTED),
            Some(1.0)
        );
    }

    #[test]
    fn rejects_newer_versions() {
        let text = "(nodes: [(version: 2, kind: Raycast)])";
        assert!(matches!(
            AnimGraph::from_ron(text, &NodeServices::default()),
            Err(AnimGraphLoadError::UnsupportedVersion {
                type_name: "RaycastNode",
                found: 2,
                supported: 1,
            })
        ));
    }

    #[test]
    fn rejects_unknown_ports_and_nodes() {
        let text = r#"(
            nodes: [(kind: Constant(value: Float(1.0))), (kind: Raycast)],
            connections: [(source: 0, source_port: 4, target: 1, target_port: 0)],
        )"#;
        assert!(matches!(
            AnimGraph::from_ron(text, &NodeServices::default()),
            Err(AnimGraphLoadError::UnknownPort { node: 0, port_id: 4 })
        ));

        let text = r#"(
            nodes: [(kind: Raycast)],
            connections: [(source: 3, source_port: 0, target: 0, target_port: 0)],
        )"#;
        assert!(matches!(
            AnimGraph::from_ron(text, &NodeServices::default()),
            Err(AnimGraphLoadError::UnknownNode(3))
        ));
    }

    #[test]
    fn surfaces_graph_errors() {
        let text = r#"(
            nodes: [(kind: Constant(value: Float(1.0))), (kind: Raycast)],
            connections: [(source: 0, source_port: 0, target: 1, target_port: 0)],
        )"#;
        assert!(matches!(
            AnimGraph::from_ron(text, &NodeServices::default()),
            Err(AnimGraphLoadError::Graph(AnimGraphError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn reports_malformed_ron() {
        assert!(matches!(
            AnimGraph::from_ron("(nodes: [(kind: Teleport)])", &NodeServices::default()),
            Err(AnimGraphLoadError::SpannedRon(_))
        ));
    }
}
