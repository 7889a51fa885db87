//! Scene graph trait and implementations
//!
//! The scene graph is the render backend's container of drawable nodes. A
//! [`Scene`](super::Scene) mirrors every structural change of its game-object
//! tree into it synchronously, keyed by [`GameObjectId`].

use crate::foundation::collections::GameObjectId;
use crate::foundation::math::Transform;
use crate::render::Color;

/// Container of renderable nodes owned by a render backend
///
/// Allows pluggable implementations (flat list, spatial trees, GPU-side
/// instance buffers) behind one interface.
pub trait SceneGraph {
    /// Background color cleared behind every frame
    fn background(&self) -> Color;

    /// Change the background color
    fn set_background(&mut self, color: Color);

    /// Add a node with its world transform; re-adding an existing node updates it
    fn add(&mut self, node: GameObjectId, transform: Transform);

    /// Remove a node; removing an absent node is a no-op
    fn remove(&mut self, node: GameObjectId);

    /// Update a node's world transform
    fn update(&mut self, node: GameObjectId, transform: Transform);

    /// Whether `node` is in the graph
    fn contains(&self, node: GameObjectId) -> bool;

    /// Get the total number of nodes in the scene graph
    fn node_count(&self) -> usize;

    /// Nodes in insertion order
    fn nodes(&self) -> Vec<GameObjectId>;

    /// World transform of a node
    fn transform(&self, node: GameObjectId) -> Option<&Transform>;

    /// Clear all nodes from the scene graph
    fn clear(&mut self);
}

/// Simple list-based scene graph
///
/// Linear search for every query. Sufficient for small scenes.
#[derive(Debug, Default)]
pub struct ListSceneGraph {
    background: Color,
    nodes: Vec<(GameObjectId, Transform)>,
}

impl ListSceneGraph {
    /// Create a new empty scene graph
    pub fn new(background: Color) -> Self {
        Self {
            background,
            nodes: Vec::new(),
        }
    }

    fn position(&self, node: GameObjectId) -> Option<usize> {
        self.nodes.iter().position(|(n, _)| *n == node)
    }
}

impl SceneGraph for ListSceneGraph {
    fn background(&self) -> Color {
        self.background
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn add(&mut self, node: GameObjectId, transform: Transform) {
        match self.position(node) {
            Some(index) => self.nodes[index].1 = transform,
            None => self.nodes.push((node, transform)),
        }
    }

    fn remove(&mut self, node: GameObjectId) {
        self.nodes.retain(|(n, _)| *n != node);
    }

    fn update(&mut self, node: GameObjectId, transform: Transform) {
        if let Some(entry) = self.nodes.iter_mut().find(|(n, _)| *n == node) {
            entry.1 = transform;
        }
    }

    fn contains(&self, node: GameObjectId) -> bool {
        self.position(node).is_some()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn nodes(&self) -> Vec<GameObjectId> {
        self.nodes.iter().map(|(n, _)| *n).collect()
    }

    fn transform(&self, node: GameObjectId) -> Option<&Transform> {
        self.nodes.iter().find(|(n, _)| *n == node).map(|(_, t)| t)
    }

    fn clear(&mut self) {
        self.nodes.clear();
    }
}
