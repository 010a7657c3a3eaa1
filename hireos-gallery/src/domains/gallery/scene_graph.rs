//! Owned scene tree
//!
//! Nodes live in a flat arena. Each node records its parent and children by
//! id; world matrices are recomputed top-down on request and never stored.

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local transform: translate, roll around Z, then scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_z: f32,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_z: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_z(self.rotation_z),
            self.translation,
        )
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: Transform,
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// A graph holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                local: Transform::default(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            local: Transform::default(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn local(&self, id: NodeId) -> Transform {
        self.nodes
            .get(id.0)
            .map(|n| n.local)
            .unwrap_or_default()
    }

    pub fn set_local(&mut self, id: NodeId, local: Transform) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.local = local;
        }
    }

    /// World matrix of every node, indexed by `NodeId::index`.
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut world = vec![Mat4::IDENTITY; self.nodes.len()];
        let mut stack = vec![(self.root(), Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let matrix = parent_world * node.local.matrix();
            world[id.0] = matrix;
            for child in &node.children {
                stack.push((*child, matrix));
            }
        }
        world
    }

    /// World matrix of a single node, walking its ancestor chain.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = self.local(id).matrix();
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            matrix = self.local(parent).matrix() * matrix;
            cursor = self.parent(parent);
        }
        matrix
    }
}
